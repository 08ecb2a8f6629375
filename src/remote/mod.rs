//! Remote document store abstraction.
//!
//! Stores talk to their backend through [`DocumentStore`], which covers
//! the only three operations this layer needs: full-document read,
//! full-document overwrite, and a change-feed subscription. Two
//! backends are provided:
//!
//! - [`MemoryStore`] - in-process backend for tests and local development
//! - [`HttpDocumentStore`] - JSON REST backend with a polling change feed
//!
//! A watched document delivers [`DocumentEvent`]s through a
//! [`WatchHandle`] in emission order. The feed stays open until the
//! handle is canceled or dropped.

pub mod http;
pub mod memory;

pub use http::HttpDocumentStore;
pub use memory::MemoryStore;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, Sender, TryRecvError};
use std::sync::Arc;

use crate::error::Result;

/// Wire representation of a stored document.
pub type Document = serde_json::Value;

/// A change event for a watched document.
///
/// `data` is `None` when the document does not exist (yet, or anymore).
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentEvent {
    /// Document id within its collection.
    pub id: String,
    /// Current document state.
    pub data: Option<Document>,
}

/// Backend interface for per-user documents.
///
/// Documents are addressed by `(collection, id)`. Absence is reported
/// as `None`, never as an error.
pub trait DocumentStore: Send + Sync {
    /// Read a document. Returns `None` if it does not exist.
    fn get(&self, collection: &str, id: &str) -> Result<Option<Document>>;

    /// Overwrite a document with the given contents, creating it if absent.
    fn set(&self, collection: &str, id: &str, doc: &Document) -> Result<()>;

    /// Open a live feed on a document.
    ///
    /// The feed emits one event with the current state immediately,
    /// then one event per subsequent change, in emission order.
    fn watch(&self, collection: &str, id: &str) -> Result<WatchHandle>;
}

/// Receiving end of a document watch.
///
/// Events are drained without blocking via [`try_events`]; the caller
/// decides when to apply them. Dropping the handle cancels the feed.
///
/// [`try_events`]: WatchHandle::try_events
#[derive(Debug)]
pub struct WatchHandle {
    rx: Receiver<DocumentEvent>,
    canceled: Arc<AtomicBool>,
}

impl WatchHandle {
    /// Create a connected handle/sender pair.
    pub(crate) fn channel() -> (WatchHandle, WatchSender) {
        let (tx, rx) = std::sync::mpsc::channel();
        let canceled = Arc::new(AtomicBool::new(false));
        let handle = WatchHandle {
            rx,
            canceled: Arc::clone(&canceled),
        };
        (handle, WatchSender { tx, canceled })
    }

    /// Drain all pending events without blocking.
    pub fn try_events(&self) -> Vec<DocumentEvent> {
        let mut events = Vec::new();
        loop {
            match self.rx.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        events
    }

    /// Stop the feed. Events already delivered remain drainable.
    pub fn cancel(&self) {
        self.canceled.store(true, Ordering::Release);
    }

    /// Whether the feed has been canceled.
    pub fn is_canceled(&self) -> bool {
        self.canceled.load(Ordering::Acquire)
    }
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Sending end of a document watch, held by the backend.
#[derive(Debug, Clone)]
pub(crate) struct WatchSender {
    tx: Sender<DocumentEvent>,
    canceled: Arc<AtomicBool>,
}

impl WatchSender {
    /// Deliver an event. Returns `false` once the watch is dead,
    /// at which point the backend should drop this sender.
    pub(crate) fn send(&self, event: DocumentEvent) -> bool {
        if self.canceled.load(Ordering::Acquire) {
            return false;
        }
        self.tx.send(event).is_ok()
    }

    pub(crate) fn is_canceled(&self) -> bool {
        self.canceled.load(Ordering::Acquire)
    }
}
