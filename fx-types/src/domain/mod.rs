//! Domain models for the currency converter.

pub mod history;
pub mod plan;
pub mod usage;

pub use history::HistoricalSample;
pub use plan::Plan;
pub use usage::{Consumption, Feature, GateDenial, Quota, UsageState, quota, try_consume};
