//! Synchronization primitives shared by the stores.
//!
//! Two small guards sit between remote data and store state:
//!
//! - [`Revision`] orders snapshots by their document timestamp, so a
//!   stale one-shot fetch can never overwrite a newer live-feed event
//!   (or the other way around), regardless of arrival order.
//! - [`LivenessToken`] lets a disposed client drop late-resolving
//!   results instead of mutating state that no view owns anymore.

pub mod liveness;
pub mod revision;

pub use liveness::LivenessToken;
pub use revision::Revision;
