//! Data Transfer Objects (DTOs) for requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{HistoricalSample, Plan, Quota, UsageState};
use crate::error::DomainError;
use exchange_rates::{AsOf, ConversionResult, CurrencyCode};

/// Shortest password the login form accepts.
pub const MIN_PASSWORD_LEN: usize = 6;

// ─────────────────────────────────────────────────────────────────────────────
// Session DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// Login form contents. Nothing is sent anywhere; the form is only checked
/// locally before the session flag flips.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    /// Local form validation.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.email.trim().is_empty() || self.password.trim().is_empty() {
            return Err(DomainError::ValidationError(
                "Please fill in all fields".into(),
            ));
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(DomainError::ValidationError(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        Ok(())
    }
}

/// Snapshot of the session for `status` output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub logged_in: bool,
    pub subscribed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<Plan>,
    pub quota: Quota,
    pub conversions_used: u32,
    pub charts_used: u32,
    pub banner: String,
}

impl From<&UsageState> for StatusResponse {
    fn from(state: &UsageState) -> Self {
        Self {
            logged_in: state.is_authenticated,
            subscribed: state.is_subscribed,
            email: state.user_email.clone(),
            plan: state.plan,
            quota: state.quota(),
            conversions_used: state.conversion_count,
            charts_used: state.chart_open_count,
            banner: state.banner(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Conversion DTOs
// ─────────────────────────────────────────────────────────────────────────────

/// A successful conversion plus the unit-rate badge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertResponse {
    pub as_of: AsOf,
    pub result: ConversionResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
}

/// The twelve-month trend for one currency pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub from: CurrencyCode,
    pub to: CurrencyCode,
    pub samples: Vec<HistoricalSample>,
}

impl HistoryResponse {
    /// Chart title, e.g. `12-Month Trend: USD → INR`.
    pub fn title(&self) -> String {
        format!(
            "12-Month Trend: {} → {}",
            self.from.display_code(),
            self.to.display_code()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.into(),
            password: password.into(),
        }
    }

    #[test]
    fn test_login_requires_all_fields() {
        let err = login("", "secret1").validate().unwrap_err();
        assert_eq!(err.to_string(), "Validation error: Please fill in all fields");
        assert!(login("a@b.c", "   ").validate().is_err());
    }

    #[test]
    fn test_login_rejects_short_password() {
        let err = login("a@b.c", "12345").validate().unwrap_err();
        assert!(err.to_string().contains("at least 6 characters"));
    }

    #[test]
    fn test_login_accepts_valid_form() {
        assert!(login("john@gmail.com", "123456").validate().is_ok());
    }

    #[test]
    fn test_status_from_state() {
        let mut state = UsageState::default();
        state.login("a@b.c");
        let status = StatusResponse::from(&state);
        assert!(status.logged_in);
        assert_eq!(status.quota, Quota::Limited(3));
        assert_eq!(status.banner, "Converts: 3  •  Charts: 3");
    }

    #[test]
    fn test_history_title() {
        let resp = HistoryResponse {
            from: "usd".parse().unwrap(),
            to: "inr".parse().unwrap(),
            samples: vec![],
        };
        assert_eq!(resp.title(), "12-Month Trend: USD → INR");
    }
}
