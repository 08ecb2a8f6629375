//! Payment-processor integration surface.
//!
//! The processor itself is opaque: the store only ever asks for the
//! current [`SubscriptionStatus`](crate::subscription::SubscriptionStatus),
//! checkout/portal redirect URLs, and cancel/reactivate side effects.
//! [`returns`] handles the query parameters the processor appends when
//! it redirects back into the app.

pub mod api;
pub mod http;
pub mod returns;

pub use api::{BillingApi, CheckoutRequest, CheckoutSession, PortalSession};
pub use http::HttpBillingClient;
pub use returns::CheckoutReturn;
