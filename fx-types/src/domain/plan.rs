//! Subscription plans.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// Plans offered by the subscribe dialog. Nothing is charged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    #[default]
    Monthly,
    Yearly,
}

impl Plan {
    pub fn all() -> &'static [Plan] {
        &[Plan::Monthly, Plan::Yearly]
    }

    /// Identifier persisted under the `plan` key.
    pub fn id(&self) -> &'static str {
        match self {
            Plan::Monthly => "monthly",
            Plan::Yearly => "yearly",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Plan::Monthly => "Monthly",
            Plan::Yearly => "Yearly",
        }
    }

    pub fn price(&self) -> &'static str {
        match self {
            Plan::Monthly => "₹199/mo",
            Plan::Yearly => "₹1999/yr",
        }
    }

    pub fn badge(&self) -> Option<&'static str> {
        match self {
            Plan::Monthly => None,
            Plan::Yearly => Some("Save 16.3%"),
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl std::str::FromStr for Plan {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "monthly" => Ok(Plan::Monthly),
            "yearly" => Ok(Plan::Yearly),
            _ => Err(DomainError::ValidationError(format!(
                "Unknown plan: {}. Supported: monthly, yearly",
                s
            ))),
        }
    }
}
