//! # FX Types
//!
//! Domain types and port traits for the currency converter.
//! This crate has ZERO external IO dependencies - only data structures,
//! business rules, and trait definitions.
//!
//! ## Architecture
//!
//! - `domain/` - Usage quota rules, subscription plans, historical samples
//! - `ports/` - Trait definitions that adapters must implement
//! - `dto/` - Request and response shapes at the CLI boundary
//! - `error/` - Domain and application error types

pub mod domain;
pub mod dto;
pub mod error;
pub mod ports;

// Re-export commonly used types
pub use domain::{
    Consumption, Feature, GateDenial, HistoricalSample, Plan, Quota, UsageState, quota,
    try_consume,
};
pub use dto::*;
pub use error::{AppError, DomainError, HistoryError, StoreError};
pub use exchange_rates::{AsOf, ConversionResult, CurrencyCode, RateError, RateTable};
pub use ports::{KeyValueStore, RateSource};
