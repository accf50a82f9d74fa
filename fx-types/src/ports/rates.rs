//! Rate source port.
//!
//! Implementations can be HTTP clients, canned tables for tests, etc.

use exchange_rates::{AsOf, CurrencyCode, RateTable};

/// Port trait for rate providers.
///
/// The call is infallible by contract: transport or decoding failures come
/// back as an empty table, which callers treat as "rates not yet available".
#[async_trait::async_trait]
pub trait RateSource: Send + Sync {
    /// Rates for one unit of `base` as of the given snapshot.
    async fn fetch_rates(&self, base: &CurrencyCode, as_of: AsOf) -> RateTable;
}

#[async_trait::async_trait]
impl<T: RateSource + ?Sized> RateSource for std::sync::Arc<T> {
    async fn fetch_rates(&self, base: &CurrencyCode, as_of: AsOf) -> RateTable {
        (**self).fetch_rates(base, as_of).await
    }
}
