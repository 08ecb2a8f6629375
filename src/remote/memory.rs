//! In-memory document backend.

use std::collections::HashMap;
use std::sync::Mutex;

use super::{Document, DocumentEvent, DocumentStore, WatchHandle, WatchSender};
use crate::error::Result;

/// In-process [`DocumentStore`] used by tests and local development.
///
/// Writes notify watchers synchronously, so a `set` followed by a
/// drain on the watch handle observes the change immediately.
#[derive(Debug, Default)]
pub struct MemoryStore {
    documents: Mutex<HashMap<(String, String), Document>>,
    watchers: Mutex<Vec<Watcher>>,
}

#[derive(Debug)]
struct Watcher {
    collection: String,
    id: String,
    sender: WatchSender,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live watchers, for diagnostics.
    pub fn watcher_count(&self) -> usize {
        let mut watchers = self.watchers.lock().expect("watcher lock poisoned");
        watchers.retain(|w| !w.sender.is_canceled());
        watchers.len()
    }

    fn notify(&self, collection: &str, id: &str, data: Option<Document>) {
        let mut watchers = self.watchers.lock().expect("watcher lock poisoned");
        watchers.retain(|w| {
            if w.collection != collection || w.id != id {
                return !w.sender.is_canceled();
            }
            w.sender.send(DocumentEvent {
                id: id.to_string(),
                data: data.clone(),
            })
        });
    }
}

impl DocumentStore for MemoryStore {
    fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let documents = self.documents.lock().expect("document lock poisoned");
        Ok(documents
            .get(&(collection.to_string(), id.to_string()))
            .cloned())
    }

    fn set(&self, collection: &str, id: &str, doc: &Document) -> Result<()> {
        {
            let mut documents = self.documents.lock().expect("document lock poisoned");
            documents.insert((collection.to_string(), id.to_string()), doc.clone());
        }
        self.notify(collection, id, Some(doc.clone()));
        Ok(())
    }

    fn watch(&self, collection: &str, id: &str) -> Result<WatchHandle> {
        let (handle, sender) = WatchHandle::channel();

        // Initial snapshot, even when the document is absent.
        let current = self.get(collection, id)?;
        sender.send(DocumentEvent {
            id: id.to_string(),
            data: current,
        });

        let mut watchers = self.watchers.lock().expect("watcher lock poisoned");
        watchers.push(Watcher {
            collection: collection.to_string(),
            id: id.to_string(),
            sender,
        });

        Ok(handle)
    }
}
