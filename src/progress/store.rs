//! The progress store.
//!
//! Mutations apply optimistically to the in-memory record and are
//! persisted separately by [`ProgressStore::save_progress`]; a failed
//! save surfaces in `last_error` but never rolls the mutation back.
//! Remote snapshots (from [`load_progress`] or the change feed) pass
//! through a [`Revision`] guard keyed on the record's `lastUpdated`
//! stamp, so whichever side carries the newest data wins, regardless
//! of arrival order.
//!
//! [`load_progress`]: ProgressStore::load_progress

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use super::UserProgress;
use crate::error::{Result, SynclineError};
use crate::remote::{DocumentStore, WatchHandle};
use crate::sync::{LivenessToken, Revision};

/// Store for a user's guided-flow progress.
///
/// Not internally synchronized; each view owns its store mutably and
/// drains feed events on its own schedule via [`pump_events`].
///
/// [`pump_events`]: ProgressStore::pump_events
pub struct ProgressStore {
    progress: UserProgress,
    loading: bool,
    last_error: Option<String>,
    revision: Revision,
    documents: Arc<dyn DocumentStore>,
    collection: String,
    watch: Option<WatchHandle>,
    liveness: LivenessToken,
}

impl ProgressStore {
    /// Create a store over the given backend.
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        collection: impl Into<String>,
        liveness: LivenessToken,
    ) -> Self {
        Self {
            progress: UserProgress::default(),
            loading: false,
            last_error: None,
            revision: Revision::new(),
            documents,
            collection: collection.into(),
            watch: None,
            liveness,
        }
    }

    /// Current in-memory record.
    pub fn progress(&self) -> &UserProgress {
        &self.progress
    }

    /// Whether an initial load is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Most recent remote failure, for the view layer.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Whether a live feed is open.
    pub fn is_subscribed(&self) -> bool {
        self.watch.is_some()
    }

    // --- Local mutations ---

    /// Show a step, without touching completion state.
    ///
    /// Deliberately unvalidated: navigation may regress to review an
    /// earlier step. Completion monotonicity belongs to
    /// [`complete_step`](Self::complete_step).
    pub fn set_current_step(&mut self, step: u32) {
        self.progress.current_step = step;
        self.touch();
    }

    /// Mark the step the user is actively working on.
    pub fn set_currently_working(&mut self, step: u32) {
        self.progress.currently_working = step;
        self.touch();
    }

    /// Mark a step completed and advance past it.
    ///
    /// Idempotent for repeated calls with the same step. `current_step`
    /// and `currently_working` move to `max(current_step, step + 1)`,
    /// never backwards.
    pub fn complete_step(&mut self, step: u32) {
        self.progress.completed_steps.insert(step);
        let next = self.progress.current_step.max(step + 1);
        self.progress.current_step = next;
        self.progress.currently_working = next;
        self.touch();
    }

    /// Stamp a local mutation, making it the newest known revision.
    fn touch(&mut self) {
        let now = Utc::now();
        self.progress.last_updated = now;
        self.revision.advance(now);
    }

    // --- Remote synchronization ---

    /// Persist the full record as an overwrite of `{collection}/{user_id}`.
    ///
    /// No retry; a transport failure is recorded in `last_error` and
    /// returned, and the optimistic in-memory state stands.
    pub fn save_progress(&mut self, user_id: &str) -> Result<()> {
        self.touch();
        let doc = serde_json::to_value(&self.progress)
            .map_err(|e| self.malformed(user_id, e.to_string()))?;

        if let Err(e) = self.documents.set(&self.collection, user_id, &doc) {
            warn!("Failed to save progress for {}: {}", user_id, e);
            self.last_error = Some(e.to_string());
            return Err(e);
        }

        Ok(())
    }

    /// One-shot fetch of `{collection}/{user_id}`.
    ///
    /// An absent document resets the record to its defaults (fresh
    /// user). A present document replaces the full record, including
    /// `currently_working`, if it is newer than the applied state.
    pub fn load_progress(&mut self, user_id: &str) -> Result<()> {
        self.loading = true;

        let fetched = match self.documents.get(&self.collection, user_id) {
            Ok(doc) => doc,
            Err(e) => {
                warn!("Failed to load progress for {}: {}", user_id, e);
                self.last_error = Some(e.to_string());
                self.loading = false;
                return Err(e);
            }
        };
        self.loading = false;

        if !self.liveness.is_live() {
            debug!("Dropping progress load for {}: client disposed", user_id);
            return Ok(());
        }

        match fetched {
            Some(doc) => {
                let snapshot = self.decode(user_id, doc)?;
                self.apply_snapshot(snapshot);
            }
            None => {
                // No data yet; start fresh.
                self.progress = UserProgress::default();
                self.revision.reset();
            }
        }

        Ok(())
    }

    /// Open a live feed on `{collection}/{user_id}`, replacing any
    /// existing one. Events are applied by [`pump_events`].
    ///
    /// [`pump_events`]: Self::pump_events
    pub fn subscribe_to_progress(&mut self, user_id: &str) -> Result<()> {
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

    /// Apply pending feed events. Returns how many snapshots were applied.
    ///
    /// Absent-document events are ignored (no data yet); snapshots that
    /// fail the revision or liveness guard are skipped.
    pub fn pump_events(&mut self) -> Result<usize> {
        let events = match &self.watch {
            Some(watch) => watch.try_events(),
            None => return Ok(0),
        };

        let mut applied = 0;
        for event in events {
            let Some(doc) = event.data else { continue };
            match self.decode(&event.id, doc) {
                Ok(snapshot) => {
                    if self.apply_snapshot(snapshot) {
                        applied += 1;
                    }
                }
                Err(e) => {
                    warn!("Ignoring malformed progress event: {}", e);
                    self.last_error = Some(e.to_string());
                }
            }
        }
        Ok(applied)
    }

    /// Full-record replacement, gated on liveness and revision.
    fn apply_snapshot(&mut self, snapshot: UserProgress) -> bool {
        if !self.liveness.is_live() {
            debug!("Dropping progress snapshot: client disposed");
            return false;
        }
        if !self.revision.admits(snapshot.last_updated) {
            debug!(
                "Skipping stale progress snapshot from {}",
                snapshot.last_updated
            );
            return false;
        }
        self.revision.advance(snapshot.last_updated);
        self.progress = snapshot;
        true
    }

    fn decode(&self, id: &str, doc: serde_json::Value) -> Result<UserProgress> {
        serde_json::from_value(doc).map_err(|e| self.malformed(id, e.to_string()))
    }

    fn malformed(&self, id: &str, message: String) -> SynclineError {
        SynclineError::MalformedDocument {
            collection: self.collection.clone(),
            id: id.to_string(),
            message,
        }
    }
}
