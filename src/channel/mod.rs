// # Event Channel
//
// Duplex publish/subscribe transport between the UI and the import worker.
// Topics are plain strings; payloads are JSON values. Delivery order within
// a topic is preserved for every subscriber, and a handler may be async.
//
// The coordinator only depends on the `EventChannel` trait, so it can run
// against `InMemoryChannel` in tests or a real cross-process bridge.

mod memory;

pub use memory::InMemoryChannel;

use futures::future::BoxFuture;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Worker -> UI: one conflict that needs arbitration
pub const EXISTS_DUPLICATE_DATA: &str = "exists_duplicate_data";
/// UI -> worker: reply to exactly one conflict
pub const CONFIRM_DUPLICATE_DATA: &str = "confirm_duplicate_data";
/// Worker -> UI: terminal outcome for a session
pub const IMPORT_RESULT: &str = "import_result";

#[derive(Error, Debug)]
pub enum ChannelError {
    #[error("Failed to decode payload on '{topic}': {source}")]
    Decode {
        topic: String,
        source: serde_json::Error,
    },
    #[error("Failed to encode payload: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Async topic handler. Invoked once per published payload, in publish order.
pub type TopicHandler = Arc<dyn Fn(Value) -> BoxFuture<'static, ()> + Send + Sync>;

/// Transport used by the coordinator.
pub trait EventChannel: Send + Sync {
    /// Register a handler for a topic. The handler stays registered until
    /// the returned `Subscription` is dropped.
    fn subscribe(&self, topic: &str, handler: TopicHandler) -> Subscription;

    /// Publish a payload to every handler currently registered on `topic`.
    fn publish(&self, topic: &str, payload: Value) -> Result<(), ChannelError>;
}

/// Registration token. Dropping it unregisters the handler.
pub struct Subscription {
    unsubscribe: Option<Box<dyn FnOnce() + Send + Sync>>,
}

impl Subscription {
    pub fn new(unsubscribe: impl FnOnce() + Send + Sync + 'static) -> Self {
        Self {
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
    }
}

/// Wrap an async closure as a `TopicHandler`
pub fn handler<F, Fut>(f: F) -> TopicHandler
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: std::future::Future<Output = ()> + Send + 'static,
{
    Arc::new(move |payload| Box::pin(f(payload)))
}

/// Decode a topic payload, attaching the topic name to the error
pub fn decode<T: serde::de::DeserializeOwned>(topic: &str, payload: Value) -> Result<T, ChannelError> {
    serde_json::from_value(payload).map_err(|source| ChannelError::Decode {
        topic: topic.to_string(),
        source,
    })
}
