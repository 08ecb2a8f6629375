//! Step-based progress tracking for the guided flow.
//!
//! [`UserProgress`] is the per-user record; [`ProgressStore`] keeps an
//! in-memory copy, applies optimistic local mutations, and reconciles
//! one-shot loads with live change-feed events.

pub mod record;
pub mod store;

pub use record::UserProgress;
pub use store::ProgressStore;
