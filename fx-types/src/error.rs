//! Error types for the currency converter.

use exchange_rates::{CurrencyCode, RateError};

use crate::domain::GateDenial;

/// Domain-level errors (invalid form input).
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Key-value store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(String),

    #[error("Storage format error: {0}")]
    Serialization(String),
}

/// Raised only when the historical batch cannot be dispatched at all.
/// Individual month failures are dropped, never reported.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("History unavailable: {0}")]
    Unavailable(String),
}

/// Application-level errors surfaced to the presentation layer.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("{0}")]
    QuotaExceeded(GateDenial),

    #[error("No rate available for {from} -> {to}")]
    NoRate { from: CurrencyCode, to: CurrencyCode },

    #[error("Failed to load historical data: {0}")]
    HistoryUnavailable(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::ValidationError(msg) => AppError::BadRequest(msg),
        }
    }
}

impl From<RateError> for AppError {
    fn from(err: RateError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<HistoryError> for AppError {
    fn from(err: HistoryError) -> Self {
        match err {
            HistoryError::Unavailable(msg) => AppError::HistoryUnavailable(msg),
        }
    }
}

impl From<GateDenial> for AppError {
    fn from(denial: GateDenial) -> Self {
        AppError::QuotaExceeded(denial)
    }
}
