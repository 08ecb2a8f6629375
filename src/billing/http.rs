//! HTTP implementation of the billing API.

use std::time::Duration;

use serde::Serialize;

use super::{BillingApi, CheckoutRequest, CheckoutSession, PortalSession};
use crate::error::{Result, SynclineError};
use crate::subscription::SubscriptionStatus;

/// [`BillingApi`] client for the product's JSON backend.
#[derive(Debug, Clone)]
pub struct HttpBillingClient {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl HttpBillingClient {
    /// Create a client for the given API base URL.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("syncline/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<reqwest::blocking::Response> {
        let url = self.url(path);
        let response = self.client.post(&url).json(body).send()?;

        if !response.status().is_success() {
            return Err(SynclineError::Billing {
                message: format!("{} answered {}", url, response.status()),
            });
        }
        Ok(response)
    }
}

impl BillingApi for HttpBillingClient {
    fn subscription_status(&self) -> Result<SubscriptionStatus> {
        let url = self.url("/subscription/status");
        let response = self.client.get(&url).send()?;

        if !response.status().is_success() {
            return Err(SynclineError::Billing {
                message: format!("{} answered {}", url, response.status()),
            });
        }
        Ok(response.json()?)
    }

    fn create_checkout_session(&self, request: &CheckoutRequest) -> Result<CheckoutSession> {
        Ok(self.post("/subscription/checkout", request)?.json()?)
    }

    fn create_portal_session(&self, return_url: &str) -> Result<PortalSession> {
        let body = serde_json::json!({ "return_url": return_url });
        Ok(self.post("/subscription/portal", &body)?.json()?)
    }

    fn cancel_subscription(&self, subscription_id: &str, at_period_end: bool) -> Result<()> {
        let body = serde_json::json!({
            "subscription_id": subscription_id,
            "at_period_end": at_period_end,
        });
        self.post("/subscription/cancel", &body)?;
        Ok(())
    }

    fn reactivate_subscription(&self, subscription_id: &str) -> Result<()> {
        let body = serde_json::json!({ "subscription_id": subscription_id });
        self.post("/subscription/reactivate", &body)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client_for(server: &MockServer) -> HttpBillingClient {
        HttpBillingClient::new(&server.base_url(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn subscription_status_decodes() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/subscription/status");
            then.status(200).json_body(json!({
                "is_active": true,
                "is_trial": false,
                "available_plans": [{
                    "id": "premium",
                    "name": "Premium",
                    "description": "Everything",
                    "price_per_month": 12.0
                }]
            }));
        });

        let status = client_for(&server).subscription_status().unwrap();

        assert!(status.is_active);
        assert_eq!(status.available_plans.len(), 1);
        assert_eq!(status.available_plans[0].id, "premium");
    }

    #[test]
    fn subscription_status_surfaces_server_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/subscription/status");
            then.status(500);
        });

        let err = client_for(&server).subscription_status().unwrap_err();
        assert!(matches!(err, SynclineError::Billing { .. }));
    }

    #[test]
    fn checkout_posts_request_and_returns_url() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/subscription/checkout")
                .json_body(json!({
                    "plan_id": "premium",
                    "success_url": "https://app.example.com/profile?checkout_success=true",
                    "cancel_url": "https://app.example.com/profile?checkout_canceled=true"
                }));
            then.status(200)
                .json_body(json!({"checkout_url": "https://pay.example.com/cs_123"}));
        });

        let session = client_for(&server)
            .create_checkout_session(&CheckoutRequest {
                plan_id: "premium".into(),
                success_url: "https://app.example.com/profile?checkout_success=true".into(),
                cancel_url: "https://app.example.com/profile?checkout_canceled=true".into(),
            })
            .unwrap();

        mock.assert();
        assert_eq!(session.checkout_url, "https://pay.example.com/cs_123");
    }

    #[test]
    fn portal_returns_url() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/subscription/portal");
            then.status(200)
                .json_body(json!({"url": "https://pay.example.com/portal_1"}));
        });

        let session = client_for(&server)
            .create_portal_session("https://app.example.com/profile?portal_return=true")
            .unwrap();

        assert_eq!(session.url, "https://pay.example.com/portal_1");
    }

    #[test]
    fn cancel_posts_flags() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/subscription/cancel")
                .json_body(json!({"subscription_id": "sub_1", "at_period_end": true}));
            then.status(200).json_body(json!({}));
        });

        client_for(&server)
            .cancel_subscription("sub_1", true)
            .unwrap();

        mock.assert();
    }

    #[test]
    fn reactivate_surfaces_rejection() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/subscription/reactivate");
            then.status(409);
        });

        let err = client_for(&server)
            .reactivate_subscription("sub_1")
            .unwrap_err();

        assert!(matches!(err, SynclineError::Billing { .. }));
    }
}
