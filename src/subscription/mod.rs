//! Billing and subscription status tracking.
//!
//! [`SubscriptionStore`] merges two sources: a one-shot
//! [`SubscriptionStatus`] fetch from the billing API and a live
//! [`SubscriptionRecord`] feed from the document store, with the live
//! record taking precedence in every derived predicate.

pub mod plan;
pub mod status;
pub mod store;

pub use plan::{Plan, PLAN_FREE, PLAN_PREMIUM, PLAN_PREMIUM_ANNUAL};
pub use status::{CurrentSubscription, PaymentMethod, SubscriptionRecord, SubscriptionStatus};
pub use store::SubscriptionStore;
