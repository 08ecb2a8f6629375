//! Subscription plans.

use serde::{Deserialize, Serialize};

/// The free tier.
pub const PLAN_FREE: &str = "free";
/// Monthly paid plan.
pub const PLAN_PREMIUM: &str = "premium";
/// Annual paid plan.
pub const PLAN_PREMIUM_ANNUAL: &str = "premium_annual";

/// A purchasable plan, as described by the billing API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price_per_month: f64,
    /// Feature bullet points, in display order.
    #[serde(default)]
    pub features: Vec<String>,
    /// Payment-processor price identifier, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_id: Option<String>,
    #[serde(default)]
    pub is_annual: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discount_percentage: Option<f64>,
}

impl Plan {
    /// Whether this is the free tier.
    pub fn is_free(&self) -> bool {
        self.id == PLAN_FREE
    }
}
