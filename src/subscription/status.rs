//! Subscription snapshots.
//!
//! Two shapes for the same underlying fact, reflecting their sources:
//! [`SubscriptionStatus`] is the billing API's answer (snake_case,
//! includes the plan catalog); [`SubscriptionRecord`] is the live
//! per-user document (camelCase, carries an `updatedAt` stamp used for
//! conflict resolution).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Plan;

/// Billing API snapshot of a user's subscription state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionStatus {
    pub is_active: bool,
    pub is_trial: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription: Option<CurrentSubscription>,
    /// Purchasable plans, in display order.
    #[serde(default)]
    pub available_plans: Vec<Plan>,
}

/// The user's current paid subscription, per the billing API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentSubscription {
    pub plan_id: String,
    pub status: String,
    pub current_period_end: DateTime<Utc>,
    pub cancel_at_period_end: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trial_end: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
}

/// Card-on-file summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub id: String,
    pub brand: String,
    pub last4: String,
    pub exp_month: u8,
    pub exp_year: u16,
}

/// Live per-user subscription document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionRecord {
    pub plan_id: String,
    pub plan_name: String,
    pub status: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trial_end_date: Option<DateTime<Utc>>,
    pub is_trial: bool,
    pub is_active: bool,
    pub is_auto_renew: bool,
    pub customer_id: String,
    pub subscription_id: String,
    /// Write stamp; decides which of two snapshots is newer.
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canceled_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_deserializes_minimal_shape() {
        let json = r#"{"is_active": false, "is_trial": false}"#;
        let status: SubscriptionStatus = serde_json::from_str(json).unwrap();

        assert!(!status.is_active);
        assert!(status.subscription.is_none());
        assert!(status.available_plans.is_empty());
    }

    #[test]
    fn record_uses_camel_case_keys() {
        let record = SubscriptionRecord {
            plan_id: "premium".into(),
            plan_name: "Premium".into(),
            status: "active".into(),
            start_date: Utc::now(),
            end_date: Utc::now(),
            trial_end_date: None,
            is_trial: false,
            is_active: true,
            is_auto_renew: true,
            customer_id: "cus_1".into(),
            subscription_id: "sub_1".into(),
            updated_at: Utc::now(),
            canceled_at: None,
        };

        let json = serde_json::to_string(&record).unwrap();

        assert!(json.contains("planId"));
        assert!(json.contains("updatedAt"));
        assert!(json.contains("isAutoRenew"));
        assert!(!json.contains("plan_id"));
    }

    #[test]
    fn current_subscription_optional_fields_default() {
        let json = r#"{
            "plan_id": "premium",
            "status": "active",
            "current_period_end": "2026-09-01T00:00:00Z",
            "cancel_at_period_end": false
        }"#;

        let sub: CurrentSubscription = serde_json::from_str(json).unwrap();

        assert!(sub.trial_end.is_none());
        assert!(sub.payment_method.is_none());
        assert!(sub.subscription_id.is_none());
    }
}
