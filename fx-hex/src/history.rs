//! Twelve-month rate history.

use chrono::{Datelike, Months, NaiveDate};
use futures::future::join_all;

use fx_types::{AsOf, CurrencyCode, HistoricalSample, HistoryError, RateSource};

/// Number of monthly samples requested per chart.
pub const HISTORY_MONTHS: u32 = 12;

/// First-of-month dates from eleven months back through the current month,
/// oldest first.
pub fn month_stamps(today: NaiveDate) -> Result<Vec<NaiveDate>, HistoryError> {
    let current = today
        .with_day(1)
        .ok_or_else(|| HistoryError::Unavailable(format!("no first day for {}", today)))?;

    (0..HISTORY_MONTHS)
        .rev()
        .map(|back| {
            current.checked_sub_months(Months::new(back)).ok_or_else(|| {
                HistoryError::Unavailable(format!("{} months before {} is out of range", back, current))
            })
        })
        .collect()
}

/// Fetches one rate table per month, all at once, and keeps the months that
/// have a usable `to` rate.
///
/// Failed or incomplete months are dropped silently; the batch settles as a
/// whole, so the result arrives only after the slowest month.
pub async fn fetch_history<S: RateSource + ?Sized>(
    source: &S,
    from: &CurrencyCode,
    to: &CurrencyCode,
    today: NaiveDate,
) -> Result<Vec<HistoricalSample>, HistoryError> {
    let stamps = month_stamps(today)?;

    let requests = stamps.iter().map(|&date| async move {
        let table = source.fetch_rates(from, AsOf::Date(date)).await;
        (date, table)
    });
    let settled = join_all(requests).await;

    let samples: Vec<HistoricalSample> = settled
        .into_iter()
        .filter_map(|(date, table)| match table.rate(to) {
            Some(rate) => Some(HistoricalSample::new(date, rate)),
            None => {
                tracing::debug!(%from, %to, %date, "dropping month without rate");
                None
            }
        })
        .collect();

    tracing::info!(
        %from,
        %to,
        kept = samples.len(),
        requested = stamps.len(),
        "historical rates loaded"
    );

    Ok(samples)
}
