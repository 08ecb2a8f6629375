//! JSON REST document backend.
//!
//! Documents live at `{base}/{collection}/{id}`. Reads are `GET`
//! (404 means absent), writes are full-document `PUT`. The backing
//! service has no push channel, so [`HttpDocumentStore::watch`] polls
//! on a background thread and emits an event whenever the document
//! value changes.

use std::thread;
use std::time::Duration;

use tracing::warn;

use super::{Document, DocumentEvent, DocumentStore, WatchHandle, WatchSender};
use crate::error::{Result, SynclineError};

/// How finely the poll loop checks for cancellation while sleeping.
const CANCEL_CHECK_INTERVAL: Duration = Duration::from_millis(25);

/// [`DocumentStore`] over a JSON REST service.
#[derive(Debug, Clone)]
pub struct HttpDocumentStore {
    base_url: String,
    client: reqwest::blocking::Client,
    poll_interval: Duration,
}

impl HttpDocumentStore {
    /// Create a store for the given base URL.
    pub fn new(base_url: &str, timeout: Duration, poll_interval: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("syncline/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            poll_interval,
        })
    }

    fn document_url(&self, collection: &str, id: &str) -> String {
        format!("{}/{}/{}", self.base_url, collection, id)
    }

    fn fetch(
        client: &reqwest::blocking::Client,
        url: &str,
    ) -> Result<Option<Document>> {
        let response = client.get(url).send()?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(SynclineError::BackendStatus {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        Ok(Some(response.json()?))
    }
}

impl DocumentStore for HttpDocumentStore {
    fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        Self::fetch(&self.client, &self.document_url(collection, id))
    }

    fn set(&self, collection: &str, id: &str, doc: &Document) -> Result<()> {
        let url = self.document_url(collection, id);
        let response = self.client.put(&url).json(doc).send()?;

        if !response.status().is_success() {
            return Err(SynclineError::BackendStatus {
                url,
                status: response.status().as_u16(),
            });
        }

        Ok(())
    }

    fn watch(&self, collection: &str, id: &str) -> Result<WatchHandle> {
        let (handle, sender) = WatchHandle::channel();
        let url = self.document_url(collection, id);
        let client = self.client.clone();
        let id = id.to_string();
        let poll_interval = self.poll_interval;

        thread::spawn(move || poll_loop(client, url, id, poll_interval, sender));

        Ok(handle)
    }
}

/// Poll a document until the watch is canceled, emitting on change.
fn poll_loop(
    client: reqwest::blocking::Client,
    url: String,
    id: String,
    poll_interval: Duration,
    sender: WatchSender,
) {
    let mut last: Option<Option<Document>> = None;

    loop {
        if sender.is_canceled() {
            return;
        }

        match HttpDocumentStore::fetch(&client, &url) {
            Ok(data) => {
                if last.as_ref() != Some(&data) {
                    if !sender.send(DocumentEvent {
                        id: id.clone(),
                        data: data.clone(),
                    }) {
                        return;
                    }
                    last = Some(data);
                }
            }
            // Transient poll failures degrade to a gap in the feed.
            Err(e) => warn!("Poll of {} failed: {}", url, e),
        }

        let mut slept = Duration::ZERO;
        while slept < poll_interval {
            if sender.is_canceled() {
                return;
            }
            let slice = CANCEL_CHECK_INTERVAL.min(poll_interval - slept);
            thread::sleep(slice);
            slept += slice;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn store_for(server: &MockServer) -> HttpDocumentStore {
        HttpDocumentStore::new(
            &server.base_url(),
            Duration::from_secs(5),
            Duration::from_millis(10),
        )
        .unwrap()
    }

    /// Drain events from a polling watch, waiting up to two seconds.
    fn wait_for_event(handle: &WatchHandle) -> Option<DocumentEvent> {
        for _ in 0..200 {
            if let Some(event) = handle.try_events().into_iter().next() {
                return Some(event);
            }
            thread::sleep(Duration::from_millis(10));
        }
        None
    }

    #[test]
    fn get_decodes_document() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/userProgress/u1");
            then.status(200).json_body(json!({"currentStep": 2}));
        });

        let store = store_for(&server);
        let doc = store.get("userProgress", "u1").unwrap();

        assert_eq!(doc, Some(json!({"currentStep": 2})));
    }

    #[test]
    fn get_treats_404_as_absent() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/userProgress/missing");
            then.status(404);
        });

        let store = store_for(&server);
        assert!(store.get("userProgress", "missing").unwrap().is_none());
    }

    #[test]
    fn get_surfaces_server_errors() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/userProgress/u1");
            then.status(500);
        });

        let store = store_for(&server);
        let err = store.get("userProgress", "u1").unwrap_err();

        assert!(matches!(
            err,
            SynclineError::BackendStatus { status: 500, .. }
        ));
    }

    #[test]
    fn set_puts_full_document() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(PUT)
                .path("/userProgress/u1")
                .json_body(json!({"currentStep": 4}));
            then.status(200);
        });

        let store = store_for(&server);
        store
            .set("userProgress", "u1", &json!({"currentStep": 4}))
            .unwrap();

        mock.assert();
    }

    #[test]
    fn set_surfaces_rejection() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(PUT).path("/userProgress/u1");
            then.status(403);
        });

        let store = store_for(&server);
        let err = store
            .set("userProgress", "u1", &json!({"currentStep": 4}))
            .unwrap_err();

        assert!(matches!(
            err,
            SynclineError::BackendStatus { status: 403, .. }
        ));
    }

    #[test]
    fn watch_emits_initial_state() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/subscriptions/u1");
            then.status(200).json_body(json!({"planId": "premium"}));
        });

        let store = store_for(&server);
        let handle = store.watch("subscriptions", "u1").unwrap();

        let event = wait_for_event(&handle).expect("no initial event");
        assert_eq!(event.data, Some(json!({"planId": "premium"})));
    }

    #[test]
    fn watch_stops_after_cancel() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/subscriptions/u1");
            then.status(200).json_body(json!({"planId": "free"}));
        });

        let store = store_for(&server);
        let handle = store.watch("subscriptions", "u1").unwrap();
        wait_for_event(&handle);

        handle.cancel();
        // Give the poll thread time to observe the cancel and exit.
        thread::sleep(Duration::from_millis(100));
        handle.try_events();
        thread::sleep(Duration::from_millis(100));

        assert!(handle.try_events().is_empty());
    }
}
