//! Billing API contract.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::subscription::SubscriptionStatus;

/// Request to open a hosted checkout for a plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub plan_id: String,
    /// Where the processor sends the user after a completed payment.
    pub success_url: String,
    /// Where the processor sends the user after abandoning checkout.
    pub cancel_url: String,
}

/// A created checkout session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// Redirect target for the hosted checkout page.
    pub checkout_url: String,
}

/// A created billing-portal session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalSession {
    /// Redirect target for the hosted portal.
    pub url: String,
}

/// Operations the subscription store needs from the billing backend.
pub trait BillingApi: Send + Sync {
    /// Current subscription state plus the plan catalog.
    fn subscription_status(&self) -> Result<SubscriptionStatus>;

    /// Open a checkout session for a plan.
    fn create_checkout_session(&self, request: &CheckoutRequest) -> Result<CheckoutSession>;

    /// Open a billing-portal session.
    fn create_portal_session(&self, return_url: &str) -> Result<PortalSession>;

    /// Cancel a subscription, immediately or at period end.
    fn cancel_subscription(&self, subscription_id: &str, at_period_end: bool) -> Result<()>;

    /// Undo a pending at-period-end cancellation.
    fn reactivate_subscription(&self, subscription_id: &str) -> Result<()>;
}
