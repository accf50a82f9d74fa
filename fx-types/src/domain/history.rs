//! Historical rate samples for the trend chart.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One month's rate. Only produced for months whose fetch succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoricalSample {
    pub date: NaiveDate,
    pub rate: f64,
}

impl HistoricalSample {
    pub fn new(date: NaiveDate, rate: f64) -> Self {
        Self { date, rate }
    }

    /// Axis label, e.g. `Mar 25`.
    pub fn label(&self) -> String {
        self.date.format("%b %y").to_string()
    }
}
