//! Exchange Rate Tables and Conversion
//!
//! Leaf library of the workspace. It knows nothing about HTTP or storage; it
//! only models what a rate API hands back and how an amount is converted with
//! it.
//!
//! - [`CurrencyCode`] - lowercase code as published by the rate API (`usd`, `inr`, `1inch`)
//! - [`AsOf`] - `latest` or a calendar date bounded by [`min_supported_date`]
//! - [`RateTable`] - one base currency, one as-of date, code → rate
//! - [`convert`] - amount × rate rounded to [`DISPLAY_SCALE`] decimals
//! - [`countries`] - static code → country table and the country search
//!
//! # Example
//! ```
//! use exchange_rates::{AsOf, CurrencyCode, RateTable, convert};
//!
//! let usd: CurrencyCode = "usd".parse().unwrap();
//! let inr: CurrencyCode = "inr".parse().unwrap();
//! let table = RateTable::new(usd, AsOf::Latest, [(inr.clone(), 83.1234)]);
//!
//! let result = convert(10.0, &table, &inr);
//! assert_eq!(result.to_string(), "831.2340");
//! ```

pub mod countries;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

pub use countries::{SEARCH_LIMIT, country_name, search_by_country};

/// Number of fractional digits a converted value carries.
pub const DISPLAY_SCALE: u32 = 4;

/// Errors raised while parsing user-facing rate inputs.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RateError {
    #[error("Invalid currency code: {0:?}")]
    InvalidCurrency(String),

    #[error("Invalid date: {0:?} (expected YYYY-MM-DD or \"latest\")")]
    InvalidDate(String),

    #[error("Date {date} is outside the supported range {min}..={max}")]
    DateOutOfRange {
        date: NaiveDate,
        min: NaiveDate,
        max: NaiveDate,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// Currency Code
// ─────────────────────────────────────────────────────────────────────────────

/// A currency code in the rate API's lowercase spelling.
///
/// The set of codes is open: the API publishes fiat, metals and crypto
/// tickers, so this is a validated string rather than an enum.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// US dollar, the converter's default source currency.
    pub fn usd() -> Self {
        Self("usd".to_string())
    }

    /// Indian rupee, the converter's default target currency.
    pub fn inr() -> Self {
        Self("inr".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Uppercase form used for display (`usd` → `USD`).
    pub fn display_code(&self) -> String {
        self.0.to_uppercase()
    }
}

impl FromStr for CurrencyCode {
    type Err = RateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_lowercase();
        if code.is_empty() || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(RateError::InvalidCurrency(s.to_string()));
        }
        Ok(Self(code))
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = RateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// As-of Date
// ─────────────────────────────────────────────────────────────────────────────

/// Earliest snapshot the rate API serves.
pub fn min_supported_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 4).expect("2024-03-04 is a valid calendar date")
}

/// Which snapshot of rates to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AsOf {
    #[default]
    Latest,
    Date(NaiveDate),
}

impl AsOf {
    /// Parses user input, enforcing `min_supported_date() <= date <= today`.
    ///
    /// An empty string means "latest", like a cleared date picker.
    pub fn parse_bounded(input: &str, today: NaiveDate) -> Result<Self, RateError> {
        let input = input.trim();
        if input.is_empty() || input.eq_ignore_ascii_case("latest") {
            return Ok(AsOf::Latest);
        }
        let date = NaiveDate::parse_from_str(input, "%Y-%m-%d")
            .map_err(|_| RateError::InvalidDate(input.to_string()))?;
        Self::bounded(date, today)
    }

    /// Wraps an already parsed date after the range check.
    pub fn bounded(date: NaiveDate, today: NaiveDate) -> Result<Self, RateError> {
        let min = min_supported_date();
        if date < min || date > today {
            return Err(RateError::DateOutOfRange {
                date,
                min,
                max: today,
            });
        }
        Ok(AsOf::Date(date))
    }
}

impl fmt::Display for AsOf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AsOf::Latest => f.write_str("latest"),
            AsOf::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rate Table
// ─────────────────────────────────────────────────────────────────────────────

/// Rates relative to one unit of `base`, as of one snapshot.
///
/// Tables are replaced wholesale when the base or date changes and are never
/// merged. An empty table means "rates not yet available".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    base: CurrencyCode,
    as_of: AsOf,
    rates: BTreeMap<CurrencyCode, f64>,
}

impl RateTable {
    pub fn new(
        base: CurrencyCode,
        as_of: AsOf,
        rates: impl IntoIterator<Item = (CurrencyCode, f64)>,
    ) -> Self {
        Self {
            base,
            as_of,
            rates: rates.into_iter().collect(),
        }
    }

    pub fn empty(base: CurrencyCode, as_of: AsOf) -> Self {
        Self::new(base, as_of, [])
    }

    pub fn base(&self) -> &CurrencyCode {
        &self.base
    }

    pub fn as_of(&self) -> AsOf {
        self.as_of
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Rate for `code`, only if it is a finite positive number.
    pub fn rate(&self, code: &CurrencyCode) -> Option<f64> {
        self.rates
            .get(code)
            .copied()
            .filter(|rate| rate.is_finite() && *rate > 0.0)
    }

    /// Codes offered by the currency selectors, sorted.
    pub fn codes(&self) -> impl Iterator<Item = &CurrencyCode> {
        self.rates.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CurrencyCode, f64)> {
        self.rates.iter().map(|(code, rate)| (code, *rate))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Conversion
// ─────────────────────────────────────────────────────────────────────────────

/// Rounds to [`DISPLAY_SCALE`] digits, half away from zero.
///
/// The value is taken at its shortest round-trip decimal form first, so
/// `1.00005` rounds to `1.0001` even though its binary value sits just below
/// the midpoint. Returns `None` for non-finite input or values outside the
/// `Decimal` range.
pub fn round_to_scale(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    // Everything under half a unit in the last place rounds to zero, and
    // would otherwise overflow Decimal's 28-digit scale when parsed.
    let mut rounded = if value.abs() < 0.00005 {
        Decimal::ZERO
    } else {
        Decimal::from_str(&value.to_string())
            .ok()?
            .round_dp_with_strategy(DISPLAY_SCALE, RoundingStrategy::MidpointAwayFromZero)
    };
    rounded.rescale(DISPLAY_SCALE);
    Some(rounded)
}

/// Outcome of one conversion attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversionResult {
    pub amount: f64,
    pub from: CurrencyCode,
    pub to: CurrencyCode,
    /// Rounded value; `None` when no usable rate was available.
    pub value: Option<Decimal>,
}

impl ConversionResult {
    pub fn is_valid(&self) -> bool {
        self.value.is_some()
    }

    pub fn value_f64(&self) -> Option<f64> {
        self.value.and_then(|v| v.to_f64())
    }
}

impl fmt::Display for ConversionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}", value),
            None => f.write_str("no rate available"),
        }
    }
}

/// Converts `amount` of the table's base currency into `target`.
///
/// The result is invalid when the target has no finite positive rate, or when
/// the amount is negative or not finite.
pub fn convert(amount: f64, table: &RateTable, target: &CurrencyCode) -> ConversionResult {
    let value = if amount.is_finite() && amount >= 0.0 {
        table
            .rate(target)
            .and_then(|rate| round_to_scale(amount * rate))
    } else {
        None
    };

    ConversionResult {
        amount,
        from: table.base().clone(),
        to: target.clone(),
        value,
    }
}

/// One-line summary of the unit rate, e.g.
/// `1 USD (United States) = 83.1234 INR (India)`.
pub fn rate_badge(table: &RateTable, target: &CurrencyCode) -> Option<String> {
    let rate = round_to_scale(table.rate(target)?)?;
    let base = table.base();
    Some(format!(
        "1 {} ({}) = {} {} ({})",
        base.display_code(),
        country_name(base),
        rate,
        target.display_code(),
        country_name(target),
    ))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn code(s: &str) -> CurrencyCode {
        s.parse().unwrap()
    }

    fn usd_table(rates: &[(&str, f64)]) -> RateTable {
        RateTable::new(
            code("usd"),
            AsOf::Latest,
            rates.iter().map(|(c, r)| (code(c), *r)),
        )
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_currency_code_parse() {
        assert_eq!(code("USD").as_str(), "usd");
        assert_eq!(code(" eur ").as_str(), "eur");
        assert_eq!(code("1inch").as_str(), "1inch");
    }

    #[test]
    fn test_currency_code_rejects_garbage() {
        assert!("".parse::<CurrencyCode>().is_err());
        assert!("us d".parse::<CurrencyCode>().is_err());
        assert!("../etc".parse::<CurrencyCode>().is_err());
    }

    #[test]
    fn test_currency_code_display() {
        assert_eq!(code("inr").to_string(), "inr");
        assert_eq!(code("inr").display_code(), "INR");
    }

    #[test]
    fn test_as_of_display() {
        assert_eq!(AsOf::Latest.to_string(), "latest");
        assert_eq!(AsOf::Date(date(2025, 1, 1)).to_string(), "2025-01-01");
    }

    #[test]
    fn test_as_of_parse_bounded() {
        let today = date(2025, 6, 15);
        assert_eq!(AsOf::parse_bounded("", today), Ok(AsOf::Latest));
        assert_eq!(AsOf::parse_bounded("latest", today), Ok(AsOf::Latest));
        assert_eq!(
            AsOf::parse_bounded("2024-03-04", today),
            Ok(AsOf::Date(date(2024, 3, 4)))
        );
        assert_eq!(
            AsOf::parse_bounded("2025-06-15", today),
            Ok(AsOf::Date(today))
        );
    }

    #[test]
    fn test_as_of_rejects_out_of_range() {
        let today = date(2025, 6, 15);
        assert!(matches!(
            AsOf::parse_bounded("2024-03-03", today),
            Err(RateError::DateOutOfRange { .. })
        ));
        assert!(matches!(
            AsOf::parse_bounded("2025-06-16", today),
            Err(RateError::DateOutOfRange { .. })
        ));
        assert!(matches!(
            AsOf::parse_bounded("15/06/2025", today),
            Err(RateError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_rate_lookup_filters_unusable_rates() {
        let table = usd_table(&[("inr", 83.0), ("zero", 0.0), ("neg", -1.0), ("nan", f64::NAN)]);
        assert_eq!(table.rate(&code("inr")), Some(83.0));
        assert_eq!(table.rate(&code("zero")), None);
        assert_eq!(table.rate(&code("neg")), None);
        assert_eq!(table.rate(&code("nan")), None);
        assert_eq!(table.rate(&code("eur")), None);
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn test_codes_are_sorted() {
        let table = usd_table(&[("inr", 83.0), ("eur", 0.9), ("gbp", 0.8)]);
        let codes: Vec<&str> = table.codes().map(|c| c.as_str()).collect();
        assert_eq!(codes, vec!["eur", "gbp", "inr"]);
    }

    #[test]
    fn test_convert_usd_to_inr() {
        let table = usd_table(&[("inr", 83.1234)]);
        let result = convert(10.0, &table, &code("inr"));
        assert!(result.is_valid());
        assert_eq!(result.value, Some(Decimal::new(8312340, 4)));
        assert_eq!(result.to_string(), "831.2340");
        assert_eq!(result.from, code("usd"));
    }

    #[test]
    fn test_convert_missing_rate_is_invalid() {
        let table = usd_table(&[]);
        let result = convert(10.0, &table, &code("inr"));
        assert!(!result.is_valid());
        assert_eq!(result.to_string(), "no rate available");
    }

    #[test]
    fn test_convert_rejects_negative_amount() {
        let table = usd_table(&[("inr", 83.0)]);
        assert!(!convert(-1.0, &table, &code("inr")).is_valid());
        assert!(!convert(f64::INFINITY, &table, &code("inr")).is_valid());
    }

    #[test]
    fn test_convert_zero_amount() {
        let table = usd_table(&[("inr", 83.0)]);
        let result = convert(0.0, &table, &code("inr"));
        assert_eq!(result.to_string(), "0.0000");
    }

    #[test]
    fn test_convert_matches_rounded_product() {
        let table = usd_table(&[("eur", 0.9187)]);
        for amount in [1.0, 3.0, 17.0, 1234.56, 0.01] {
            let result = convert(amount, &table, &code("eur"));
            let expected = (amount * 0.9187 * 10_000.0).round() / 10_000.0;
            let got = result.value_f64().unwrap();
            assert!((got - expected).abs() < 1e-9, "{amount}: {got} vs {expected}");
        }
    }

    #[test]
    fn test_rounding_half_away_from_zero() {
        assert_eq!(round_to_scale(1.00005), Some(Decimal::new(10001, 4)));
        assert_eq!(round_to_scale(-1.00005), Some(Decimal::new(-10001, 4)));
        assert_eq!(round_to_scale(2.00004), Some(Decimal::new(20000, 4)));
        assert_eq!(round_to_scale(0.00005), Some(Decimal::new(1, 4)));
        assert_eq!(round_to_scale(0.000049), Some(Decimal::ZERO));
    }

    #[test]
    fn test_rounding_pads_to_four_digits() {
        assert_eq!(round_to_scale(831.234).unwrap().to_string(), "831.2340");
        assert_eq!(round_to_scale(5.0).unwrap().to_string(), "5.0000");
    }

    #[test]
    fn test_rounding_rejects_non_finite() {
        assert_eq!(round_to_scale(f64::NAN), None);
        assert_eq!(round_to_scale(f64::INFINITY), None);
    }

    #[test]
    fn test_rate_badge() {
        let table = usd_table(&[("inr", 83.1234)]);
        assert_eq!(
            rate_badge(&table, &code("inr")).unwrap(),
            "1 USD (United States) = 83.1234 INR (India)"
        );
        assert_eq!(rate_badge(&table, &code("eur")), None);
    }
}
