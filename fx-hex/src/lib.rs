//! # FX Hex
//!
//! Application service layer for the currency converter.
//!
//! ## Architecture
//!
//! - `service/` - Converter state and user intents (orchestrates everything below)
//! - `gate/` - Usage gate bound to the persisted store
//! - `history/` - Twelve-month rate aggregation
//! - `freshness/` - Tickets that keep superseded results out of current state
//!
//! The service is generic over `S: RateSource` and `K: KeyValueStore`,
//! allowing different adapters to be injected.

pub mod freshness;
pub mod gate;
pub mod history;
pub mod service;


pub use gate::UsageGate;
pub use history::{HISTORY_MONTHS, fetch_history, month_stamps};
pub use service::{ChartToggle, ConverterService, HistoryRequest, RateRequest};
