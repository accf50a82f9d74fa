//! Usage quota rules.
//!
//! Authentication and subscription here are trust-free local flags. Nothing
//! is verified; the quota only throttles how often an anonymous or free user
//! can convert or open the chart.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::plan::Plan;

/// A gated action. Each feature has its own counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Feature {
    Convert,
    Chart,
}

/// How many gated actions a session may perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quota {
    Limited(u32),
    Unlimited,
}

impl Quota {
    pub const ANONYMOUS: Quota = Quota::Limited(1);
    pub const FREE: Quota = Quota::Limited(3);

    /// Actions left after `used` have been spent; `None` when unlimited.
    pub fn remaining(&self, used: u32) -> Option<u32> {
        match self {
            Quota::Limited(limit) => Some(limit.saturating_sub(used)),
            Quota::Unlimited => None,
        }
    }
}

/// Quota for a session.
///
/// Authentication is checked first, so a subscription flag without a login
/// still gets the anonymous quota.
pub fn quota(is_authenticated: bool, is_subscribed: bool) -> Quota {
    if !is_authenticated {
        Quota::ANONYMOUS
    } else if is_subscribed {
        Quota::Unlimited
    } else {
        Quota::FREE
    }
}

/// Result of asking the gate for one more action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Consumption {
    pub allowed: bool,
    pub new_count: u32,
}

/// Decides whether one more action fits in `quota`.
///
/// Unlimited quotas never advance the counter.
pub fn try_consume(current_count: u32, quota: Quota) -> Consumption {
    match quota {
        Quota::Unlimited => Consumption {
            allowed: true,
            new_count: current_count,
        },
        Quota::Limited(limit) if current_count < limit => Consumption {
            allowed: true,
            new_count: current_count + 1,
        },
        Quota::Limited(_) => Consumption {
            allowed: false,
            new_count: current_count,
        },
    }
}

/// Why the gate refused an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "reason", content = "feature")]
pub enum GateDenial {
    LoginRequired(Feature),
    SubscriptionRequired(Feature),
}

impl GateDenial {
    fn for_session(is_authenticated: bool, feature: Feature) -> Self {
        if is_authenticated {
            GateDenial::SubscriptionRequired(feature)
        } else {
            GateDenial::LoginRequired(feature)
        }
    }

    pub fn feature(&self) -> Feature {
        match self {
            GateDenial::LoginRequired(f) | GateDenial::SubscriptionRequired(f) => *f,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            GateDenial::LoginRequired(Feature::Convert) => {
                "Please login to continue converting currencies."
            }
            GateDenial::SubscriptionRequired(Feature::Convert) => {
                "Free limit reached. Please subscribe to continue."
            }
            GateDenial::LoginRequired(Feature::Chart) => "Please login to view more charts.",
            GateDenial::SubscriptionRequired(Feature::Chart) => {
                "Chart limit reached. Please subscribe for unlimited."
            }
        }
    }
}

impl fmt::Display for GateDenial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Session flags and per-feature counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageState {
    pub is_authenticated: bool,
    pub is_subscribed: bool,
    pub conversion_count: u32,
    pub chart_open_count: u32,
    pub user_email: Option<String>,
    pub plan: Option<Plan>,
}

impl UsageState {
    pub fn quota(&self) -> Quota {
        quota(self.is_authenticated, self.is_subscribed)
    }

    pub fn count(&self, feature: Feature) -> u32 {
        match feature {
            Feature::Convert => self.conversion_count,
            Feature::Chart => self.chart_open_count,
        }
    }

    fn count_mut(&mut self, feature: Feature) -> &mut u32 {
        match feature {
            Feature::Convert => &mut self.conversion_count,
            Feature::Chart => &mut self.chart_open_count,
        }
    }

    pub fn remaining(&self, feature: Feature) -> Option<u32> {
        self.quota().remaining(self.count(feature))
    }

    /// Would one more `feature` action be allowed right now?
    pub fn check(&self, feature: Feature) -> Result<Consumption, GateDenial> {
        let consumption = try_consume(self.count(feature), self.quota());
        if consumption.allowed {
            Ok(consumption)
        } else {
            Err(GateDenial::for_session(self.is_authenticated, feature))
        }
    }

    /// Records one `feature` action if the quota allows it.
    pub fn consume(&mut self, feature: Feature) -> Result<(), GateDenial> {
        let consumption = self.check(feature)?;
        *self.count_mut(feature) = consumption.new_count;
        Ok(())
    }

    /// Marks the session authenticated and starts both counters over.
    pub fn login(&mut self, email: impl Into<String>) {
        self.is_authenticated = true;
        self.conversion_count = 0;
        self.chart_open_count = 0;
        self.user_email = Some(email.into());
    }

    /// Counters are kept; the unlimited quota simply stops consulting them.
    pub fn subscribe(&mut self, plan: Plan) {
        self.is_subscribed = true;
        self.plan = Some(plan);
    }

    pub fn logout(&mut self) {
        *self = UsageState::default();
    }

    /// Header line shown above the converter.
    pub fn banner(&self) -> String {
        match (
            self.remaining(Feature::Convert),
            self.remaining(Feature::Chart),
        ) {
            (Some(converts), Some(charts)) => {
                format!("Converts: {}  •  Charts: {}", converts, charts)
            }
            _ => "Unlimited conversions & charts".to_string(),
        }
    }
}
