//! The subscription store.
//!
//! State arrives from two sources: the billing API (one-shot
//! [`fetch_status`]) and the per-user subscription document (live feed
//! via [`subscribe`] / [`pump_events`]). The live record wins wherever
//! both could answer, and record snapshots pass through a [`Revision`]
//! guard keyed on their `updatedAt` stamp so late, stale deliveries
//! are discarded.
//!
//! [`fetch_status`]: SubscriptionStore::fetch_status
//! [`subscribe`]: SubscriptionStore::subscribe
//! [`pump_events`]: SubscriptionStore::pump_events

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use super::{Plan, SubscriptionRecord, SubscriptionStatus, PLAN_FREE};
use crate::billing::{BillingApi, CheckoutRequest};
use crate::error::{Result, SynclineError};
use crate::remote::{DocumentStore, WatchHandle};
use crate::sync::{LivenessToken, Revision};

/// Store for a user's billing and subscription state.
pub struct SubscriptionStore {
    status: Option<SubscriptionStatus>,
    record: Option<SubscriptionRecord>,
    loading: bool,
    last_error: Option<String>,
    checkout_url: Option<String>,
    revision: Revision,
    documents: Arc<dyn DocumentStore>,
    billing: Arc<dyn BillingApi>,
    collection: String,
    app_base_url: String,
    watch: Option<WatchHandle>,
    liveness: LivenessToken,
}

impl SubscriptionStore {
    /// Create a store over the given backends.
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        billing: Arc<dyn BillingApi>,
        collection: impl Into<String>,
        app_base_url: impl Into<String>,
        liveness: LivenessToken,
    ) -> Self {
        Self {
            status: None,
            record: None,
            loading: false,
            last_error: None,
            checkout_url: None,
            revision: Revision::new(),
            documents,
            billing,
            collection: collection.into(),
            app_base_url: app_base_url.into().trim_end_matches('/').to_string(),
            watch: None,
            liveness,
        }
    }

    /// Latest billing API snapshot, if fetched.
    pub fn status(&self) -> Option<&SubscriptionStatus> {
        self.status.as_ref()
    }

    /// Latest live subscription record, if any.
    pub fn record(&self) -> Option<&SubscriptionRecord> {
        self.record.as_ref()
    }

    /// Whether a billing request is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Most recent remote failure, for the view layer.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Redirect URL of the most recently created checkout session.
    pub fn checkout_url(&self) -> Option<&str> {
        self.checkout_url.as_deref()
    }

    // --- Billing API operations ---

    /// One-shot fetch of the subscription status and plan catalog.
    ///
    /// On failure the previous snapshot is kept; the error is recorded
    /// and returned.
    pub fn fetch_status(&mut self) -> Result<()> {
        self.loading = true;
        self.last_error = None;

        let result = self.billing.subscription_status();
        self.loading = false;

        match result {
            Ok(status) => {
                if self.liveness.is_live() {
                    self.status = Some(status);
                } else {
                    debug!("Dropping subscription status: client disposed");
                }
                Ok(())
            }
            Err(e) => {
                warn!("Failed to fetch subscription status: {}", e);
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Open a hosted checkout for a plan; returns the redirect URL.
    ///
    /// Success and cancel return URLs point back at the app's profile
    /// page, flagged so the outcome can be consumed exactly once
    /// (see [`CheckoutReturn`](crate::billing::CheckoutReturn)).
    pub fn create_checkout_session(&mut self, plan_id: &str) -> Result<String> {
        self.loading = true;
        self.last_error = None;
        self.checkout_url = None;

        let request = CheckoutRequest {
            plan_id: plan_id.to_string(),
            success_url: format!("{}/profile?checkout_success=true", self.app_base_url),
            cancel_url: format!("{}/profile?checkout_canceled=true", self.app_base_url),
        };

        let result = self.billing.create_checkout_session(&request);
        self.loading = false;

        match result {
            Ok(session) => {
                self.checkout_url = Some(session.checkout_url.clone());
                Ok(session.checkout_url)
            }
            Err(e) => {
                warn!("Failed to create checkout session for {}: {}", plan_id, e);
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Open a billing-portal session; returns the redirect URL.
    pub fn create_portal_session(&mut self, return_url: &str) -> Result<String> {
        self.loading = true;
        self.last_error = None;

        let result = self.billing.create_portal_session(return_url);
        self.loading = false;

        match result {
            Ok(session) => Ok(session.url),
            Err(e) => {
                warn!("Failed to create portal session: {}", e);
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Cancel the subscription, then refresh the status snapshot.
    pub fn cancel_subscription(
        &mut self,
        subscription_id: &str,
        at_period_end: bool,
    ) -> Result<()> {
        if let Err(e) = self
            .billing
            .cancel_subscription(subscription_id, at_period_end)
        {
            warn!("Failed to cancel subscription {}: {}", subscription_id, e);
            self.last_error = Some(e.to_string());
            return Err(e);
        }
        self.fetch_status()
    }

    /// Undo a pending cancellation, then refresh the status snapshot.
    pub fn reactivate_subscription(&mut self, subscription_id: &str) -> Result<()> {
        if let Err(e) = self.billing.reactivate_subscription(subscription_id) {
            warn!(
                "Failed to reactivate subscription {}: {}",
                subscription_id, e
            );
            self.last_error = Some(e.to_string());
            return Err(e);
        }
        self.fetch_status()
    }

    // --- Live feed ---

    /// Open a live feed on `{collection}/{user_id}`, replacing any
    /// existing one.
    pub fn subscribe(&mut self, user_id: &str) -> Result<()> {
        self.unsubscribe();
        self.watch = Some(self.documents.watch(&self.collection, user_id)?);
        Ok(())
    }

    /// Close the live feed, if open.
    pub fn unsubscribe(&mut self) {
        if let Some(watch) = self.watch.take() {
            watch.cancel();
        }
    }

    /// Apply pending feed events. Returns how many were applied.
    ///
    /// An absent document clears the record and starts a fresh
    /// revision lifecycle.
    pub fn pump_events(&mut self) -> Result<usize> {
        let events = match &self.watch {
            Some(watch) => watch.try_events(),
            None => return Ok(0),
        };

        let mut applied = 0;
        for event in events {
            if !self.liveness.is_live() {
                debug!("Dropping subscription events: client disposed");
                break;
            }
            match event.data {
                Some(doc) => match self.decode(&event.id, doc) {
                    Ok(record) => {
                        if self.revision.admits(record.updated_at) {
                            self.revision.advance(record.updated_at);
                            self.record = Some(record);
                            applied += 1;
                        } else {
                            debug!("Skipping stale subscription record");
                        }
                    }
                    Err(e) => {
                        warn!("Ignoring malformed subscription event: {}", e);
                        self.last_error = Some(e.to_string());
                    }
                },
                None => {
                    self.record = None;
                    self.revision.reset();
                    applied += 1;
                }
            }
        }
        Ok(applied)
    }

    /// Unsubscribe and drop all state.
    pub fn reset(&mut self) {
        self.unsubscribe();
        self.status = None;
        self.record = None;
        self.loading = false;
        self.last_error = None;
        self.checkout_url = None;
        self.revision.reset();
    }

    // --- Derived predicates (pure functions of the snapshots) ---

    /// Whether the user pays for a non-free plan that is still active.
    pub fn is_subscribed(&self) -> bool {
        if let Some(record) = &self.record {
            return record.is_active && record.plan_id != PLAN_FREE;
        }
        match &self.status {
            Some(status) => match &status.subscription {
                Some(sub) => sub.plan_id != PLAN_FREE && status.is_active,
                None => false,
            },
            None => false,
        }
    }

    /// Whether the user is on the free tier (including "no data yet").
    ///
    /// Mutually exclusive with [`is_subscribed`](Self::is_subscribed).
    pub fn is_on_free_plan(&self) -> bool {
        if let Some(record) = &self.record {
            return record.plan_id == PLAN_FREE || !record.is_active;
        }
        match &self.status {
            Some(status) => match &status.subscription {
                Some(sub) => sub.plan_id == PLAN_FREE,
                None => true,
            },
            None => true,
        }
    }

    /// Whether a trial is running: flagged as trial, and any known
    /// trial end date is still in the future.
    pub fn is_on_trial(&self) -> bool {
        let now = Utc::now();
        if let Some(record) = &self.record {
            return record.is_trial && record.trial_end_date.is_none_or(|end| end > now);
        }
        match &self.status {
            Some(status) => {
                status.is_trial
                    && status
                        .subscription
                        .as_ref()
                        .and_then(|sub| sub.trial_end)
                        .is_none_or(|end| end > now)
            }
            None => false,
        }
    }

    /// The catalog entry for the active plan, if both are known.
    pub fn active_plan(&self) -> Option<&Plan> {
        let plan_id = match self.record.as_ref().filter(|r| r.is_active) {
            Some(record) => record.plan_id.as_str(),
            None => self
                .status
                .as_ref()?
                .subscription
                .as_ref()?
                .plan_id
                .as_str(),
        };
        self.status
            .as_ref()?
            .available_plans
            .iter()
            .find(|plan| plan.id == plan_id)
    }

    /// Days of trial left, rounded up, never negative.
    pub fn remaining_trial_days(&self) -> i64 {
        let trial_end = self
            .record
            .as_ref()
            .and_then(|r| r.trial_end_date)
            .or_else(|| {
                self.status
                    .as_ref()
                    .and_then(|s| s.subscription.as_ref())
                    .and_then(|sub| sub.trial_end)
            });

        let Some(end) = trial_end else { return 0 };
        let seconds = (end - Utc::now()).num_seconds();
        if seconds <= 0 {
            0
        } else {
            (seconds as u64).div_ceil(86_400) as i64
        }
    }

    /// Expiry date (trial end, falling back to period end) rendered
    /// like "March 5, 2026"; empty when unknown.
    pub fn formatted_expiry_date(&self) -> String {
        let date = if let Some(record) = &self.record {
            record.trial_end_date.or(Some(record.end_date))
        } else {
            self.status
                .as_ref()
                .and_then(|s| s.subscription.as_ref())
                .map(|sub| sub.trial_end.unwrap_or(sub.current_period_end))
        };

        match date {
            Some(d) => d.format("%B %-d, %Y").to_string(),
            None => String::new(),
        }
    }

    fn decode(&self, id: &str, doc: serde_json::Value) -> Result<SubscriptionRecord> {
        serde_json::from_value(doc).map_err(|e| SynclineError::MalformedDocument {
            collection: self.collection.clone(),
            id: id.to_string(),
            message: e.to_string(),
        })
    }
}
