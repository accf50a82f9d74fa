//! # FX Client
//!
//! A typed Rust client for the public currency rate API.
//!
//! Requests go to `{base_url}@{as_of}/v1/currencies/{base}.json` and the
//! response looks like `{ "date": "...", "usd": { "inr": 83.12, ... } }`.

use fx_types::{AsOf, CurrencyCode, RateSource, RateTable};
use reqwest::Client;
use serde_json::Value;

/// Public CDN mirror of the rate API.
pub const DEFAULT_API_URL: &str = "https://cdn.jsdelivr.net/npm/@fawazahmed0/currency-api";

/// Error type for client operations.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status}")]
    Api { status: u16 },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Response has no rate object for {0}")]
    MissingBase(CurrencyCode),
}

/// Rate API client.
pub struct RateClient {
    base_url: String,
    http: Client,
}

impl Default for RateClient {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

impl RateClient {
    /// Creates a new client.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Endpoint for one base currency and snapshot.
    pub fn rates_url(&self, base: &CurrencyCode, as_of: AsOf) -> String {
        format!("{}@{}/v1/currencies/{}.json", self.base_url, as_of, base)
    }

    /// Fetches one rate table, reporting every failure.
    pub async fn try_fetch_rates(
        &self,
        base: &CurrencyCode,
        as_of: AsOf,
    ) -> Result<RateTable, ClientError> {
        let url = self.rates_url(base, as_of);
        tracing::debug!(%url, "fetching rates");
        let resp = self.http.get(&url).send().await?;
        let body = self.handle_response(resp).await?;
        decode_table(base, as_of, &body)
    }

    async fn handle_response(&self, resp: reqwest::Response) -> Result<Value, ClientError> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            Ok(serde_json::from_str(&body)?)
        } else {
            Err(ClientError::Api {
                status: status.as_u16(),
            })
        }
    }
}

/// Pulls the `base` object out of a response body.
///
/// Entries with non-numeric values or codes the API spells oddly are skipped
/// rather than failing the whole table.
pub fn decode_table(
    base: &CurrencyCode,
    as_of: AsOf,
    body: &Value,
) -> Result<RateTable, ClientError> {
    let rates = body
        .get(base.as_str())
        .and_then(Value::as_object)
        .ok_or_else(|| ClientError::MissingBase(base.clone()))?;

    let entries = rates.iter().filter_map(|(code, rate)| {
        let code = code.parse::<CurrencyCode>().ok()?;
        Some((code, rate.as_f64()?))
    });

    Ok(RateTable::new(base.clone(), as_of, entries))
}

#[async_trait::async_trait]
impl RateSource for RateClient {
    async fn fetch_rates(&self, base: &CurrencyCode, as_of: AsOf) -> RateTable {
        match self.try_fetch_rates(base, as_of).await {
            Ok(table) => table,
            Err(err) => {
                tracing::warn!(%base, %as_of, error = %err, "currency fetch failed");
                RateTable::empty(base.clone(), as_of)
            }
        }
    }
}
