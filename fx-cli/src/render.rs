//! Plain-text rendering for terminal output.

use exchange_rates::country_name;
use fx_types::{CurrencyCode, HistoryResponse, RateTable};

/// Width of the longest chart bar, in cells.
pub const BAR_WIDTH: usize = 40;

/// Bar for `rate` scaled between the series' `min` and `max`.
///
/// The lowest month still gets one cell so every row shows something.
pub fn bar(rate: f64, min: f64, max: f64, width: usize) -> String {
    let span = max - min;
    let cells = if span > 0.0 {
        1 + (((rate - min) / span) * (width.saturating_sub(1)) as f64).round() as usize
    } else {
        width
    };
    "█".repeat(cells.min(width))
}

pub fn chart(history: &HistoryResponse) -> String {
    let mut out = history.title();
    if history.samples.is_empty() {
        out.push_str("\n  no historical data available");
        return out;
    }

    let (min, max) = history
        .samples
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), s| {
            (lo.min(s.rate), hi.max(s.rate))
        });

    for sample in &history.samples {
        out.push_str(&format!(
            "\n  {:<6} {:>12.4}  {}",
            sample.label(),
            sample.rate,
            bar(sample.rate, min, max, BAR_WIDTH)
        ));
    }
    out
}

pub fn rates(table: &RateTable) -> String {
    let mut out = format!(
        "1 {} ({}) as of {}",
        table.base().display_code(),
        country_name(table.base()),
        table.as_of()
    );
    if table.is_empty() {
        out.push_str("\n  no rates available");
    }
    for (code, rate) in table.iter() {
        out.push_str(&format!("\n  {:<8} {:>18.4}", code.display_code(), rate));
    }
    out
}

pub fn currencies(codes: &[CurrencyCode]) -> String {
    codes
        .iter()
        .map(|code| format!("{:<8} {}", code.display_code(), country_name(code)))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use fx_types::{AsOf, HistoricalSample};

    fn code(s: &str) -> CurrencyCode {
        s.parse().unwrap()
    }

    #[test]
    fn test_bar_scales_between_extremes() {
        assert_eq!(bar(80.0, 80.0, 90.0, 10).chars().count(), 1);
        assert_eq!(bar(90.0, 80.0, 90.0, 10).chars().count(), 10);
        assert_eq!(bar(85.0, 80.0, 90.0, 11).chars().count(), 6);
    }

    #[test]
    fn test_bar_flat_series_fills_width() {
        assert_eq!(bar(1.0, 1.0, 1.0, 5), "█████");
    }

    #[test]
    fn test_chart_rows() {
        let date = |m| chrono_date(2025, m);
        let history = HistoryResponse {
            from: code("usd"),
            to: code("inr"),
            samples: vec![
                HistoricalSample::new(date(1), 85.0),
                HistoricalSample::new(date(2), 86.5),
            ],
        };
        let text = chart(&history);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "12-Month Trend: USD → INR");
        assert!(lines[1].contains("Jan 25"));
        assert!(lines[2].contains("86.5000"));
    }

    #[test]
    fn test_empty_chart() {
        let history = HistoryResponse {
            from: code("usd"),
            to: code("inr"),
            samples: vec![],
        };
        assert!(chart(&history).ends_with("no historical data available"));
    }

    #[test]
    fn test_rates_header() {
        let table = RateTable::new(code("usd"), AsOf::Latest, [(code("inr"), 83.1234)]);
        let text = rates(&table);
        assert!(text.starts_with("1 USD (United States) as of latest"));
        assert!(text.contains("INR"));
    }

    #[test]
    fn test_currencies() {
        assert_eq!(currencies(&[code("inr")]), "INR      India");
    }

    fn chrono_date(y: i32, m: u32) -> chrono::NaiveDate {
        chrono::NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }
}
