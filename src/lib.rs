//! Syncline - client-side state synchronization for progress and
//! subscription data.
//!
//! Syncline is the state layer of a tool-generator product's client:
//! store objects that reconcile a one-shot remote fetch with a live
//! change feed and expose derived view state. The remote document
//! store, the billing backend, and the authentication provider are
//! external; this crate only reads, writes, and watches per-user
//! documents and asks the billing API for snapshots and redirects.
//!
//! # Modules
//!
//! - [`billing`] - Billing API contract, HTTP client, checkout-return parameters
//! - [`client`] - Dependency-injected client service and store construction
//! - [`config`] - Client configuration loading and validation
//! - [`error`] - Error types and result aliases
//! - [`progress`] - Guided-flow progress record and store
//! - [`remote`] - Document store abstraction with memory and HTTP backends
//! - [`subscription`] - Subscription snapshots, live record, and derived predicates
//! - [`sync`] - Revision and liveness guards shared by the stores
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use syncline::config::ClientConfig;
//! use syncline::remote::{DocumentStore, MemoryStore};
//!
//! let backend = Arc::new(MemoryStore::new());
//! let mut progress = syncline::progress::ProgressStore::new(
//!     backend as Arc<dyn DocumentStore>,
//!     ClientConfig::default().progress_collection,
//!     syncline::sync::LivenessToken::new(),
//! );
//!
//! progress.complete_step(1);
//! assert_eq!(progress.progress().current_step, 2);
//! ```

pub mod billing;
pub mod client;
pub mod config;
pub mod error;
pub mod progress;
pub mod remote;
pub mod subscription;
pub mod sync;

pub use client::Client;
pub use config::ClientConfig;
pub use error::{Result, SynclineError};
