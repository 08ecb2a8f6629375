//! The syncline client service.
//!
//! A [`Client`] is an explicitly constructed instance: it owns the
//! document backend, the billing API, the configuration, and a shared
//! [`LivenessToken`]. Views receive store instances from it instead of
//! reaching for module-level state, and [`Client::dispose`] marks the
//! end of its lifecycle so late-resolving work is dropped.

use std::sync::Arc;

use crate::billing::{BillingApi, HttpBillingClient};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::progress::ProgressStore;
use crate::remote::{DocumentStore, HttpDocumentStore};
use crate::subscription::SubscriptionStore;
use crate::sync::LivenessToken;

/// Entry point tying configuration, backends, and stores together.
pub struct Client {
    config: ClientConfig,
    documents: Arc<dyn DocumentStore>,
    billing: Arc<dyn BillingApi>,
    liveness: LivenessToken,
}

impl Client {
    /// Create a client over explicit backends.
    pub fn new(
        config: ClientConfig,
        documents: Arc<dyn DocumentStore>,
        billing: Arc<dyn BillingApi>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            documents,
            billing,
            liveness: LivenessToken::new(),
        })
    }

    /// Create a client with HTTP backends derived from the config:
    /// documents and billing both served by `api_base_url`.
    pub fn connect(config: ClientConfig) -> Result<Self> {
        let documents = Arc::new(HttpDocumentStore::new(
            &config.api_base_url,
            config.request_timeout(),
            config.poll_interval(),
        )?);
        let billing = Arc::new(HttpBillingClient::new(
            &config.api_base_url,
            config.request_timeout(),
        )?);
        Self::new(config, documents, billing)
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build a progress store sharing this client's lifecycle.
    pub fn progress(&self) -> ProgressStore {
        ProgressStore::new(
            Arc::clone(&self.documents),
            self.config.progress_collection.clone(),
            self.liveness.clone(),
        )
    }

    /// Build a subscription store sharing this client's lifecycle.
    pub fn subscription(&self) -> SubscriptionStore {
        SubscriptionStore::new(
            Arc::clone(&self.documents),
            Arc::clone(&self.billing),
            self.config.subscriptions_collection.clone(),
            self.config.app_base_url.clone(),
            self.liveness.clone(),
        )
    }

    /// Whether the client has not been disposed yet.
    pub fn is_live(&self) -> bool {
        self.liveness.is_live()
    }

    /// End the client's lifecycle.
    ///
    /// Stores built from this client stop applying remote results;
    /// open feeds are closed by the stores when they are dropped.
    pub fn dispose(&self) {
        self.liveness.revoke();
    }
}

impl Drop for Client {
    fn drop(&mut self) {
        self.liveness.revoke();
    }
}
