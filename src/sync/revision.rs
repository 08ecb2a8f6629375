//! Timestamp-ordered snapshot admission.

use chrono::{DateTime, Utc};

/// Tracks the timestamp of the most recently applied snapshot.
///
/// Snapshots arrive from two sources with no ordering guarantee between
/// them: a one-shot fetch and a live change feed. Admission is decided
/// by the timestamp carried in the document itself, so the winner is
/// the most recently *written* data, not the most recently *arrived*.
#[derive(Debug, Clone, Copy, Default)]
pub struct Revision {
    applied: Option<DateTime<Utc>>,
}

impl Revision {
    /// A revision with nothing applied yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a snapshot stamped `at` may be applied.
    ///
    /// Strictly-newer only: a snapshot with the same timestamp as the
    /// applied one is a duplicate and is skipped.
    pub fn admits(&self, at: DateTime<Utc>) -> bool {
        match self.applied {
            None => true,
            Some(applied) => at > applied,
        }
    }

    /// Record that a snapshot stamped `at` has been applied.
    pub fn advance(&mut self, at: DateTime<Utc>) {
        self.applied = Some(at);
    }

    /// Timestamp of the last applied snapshot, if any.
    pub fn applied_at(&self) -> Option<DateTime<Utc>> {
        self.applied
    }

    /// Forget the applied timestamp (document deleted, fresh lifecycle).
    pub fn reset(&mut self) {
        self.applied = None;
    }
}
