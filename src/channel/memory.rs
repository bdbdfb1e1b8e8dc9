use super::{ChannelError, EventChannel, Subscription, TopicHandler};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex,
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::trace;

type SubscriptionId = u64;

struct Registration {
    topic: String,
    tx: mpsc::UnboundedSender<Value>,
    task: JoinHandle<()>,
}

/// In-process event channel.
///
/// Every subscription gets its own queue and delivery task, so a slow async
/// handler only delays later payloads for that same subscription.
#[derive(Clone)]
pub struct InMemoryChannel {
    registrations: Arc<Mutex<BTreeMap<SubscriptionId, Registration>>>,
    next_id: Arc<AtomicU64>,
    runtime_handle: tokio::runtime::Handle,
}

impl InMemoryChannel {
    pub fn new(runtime_handle: tokio::runtime::Handle) -> Self {
        Self {
            registrations: Arc::new(Mutex::new(BTreeMap::new())),
            next_id: Arc::new(AtomicU64::new(1)),
            runtime_handle,
        }
    }

    /// Number of live handlers on a topic
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.registrations
            .lock()
            .unwrap()
            .values()
            .filter(|r| r.topic == topic)
            .count()
    }
}

impl EventChannel for InMemoryChannel {
    fn subscribe(&self, topic: &str, handler: TopicHandler) -> Subscription {
        let (tx, mut rx) = mpsc::unbounded_channel::<Value>();
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);

        let task_topic = topic.to_string();
        let task = self.runtime_handle.spawn(async move {
            while let Some(payload) = rx.recv().await {
                handler(payload).await;
            }
            trace!("Subscription {} on '{}' closed", id, task_topic);
        });

        self.registrations.lock().unwrap().insert(
            id,
            Registration {
                topic: topic.to_string(),
                tx,
                task,
            },
        );

        let registrations = self.registrations.clone();
        Subscription::new(move || {
            if let Some(registration) = registrations.lock().unwrap().remove(&id) {
                registration.task.abort();
            }
        })
    }

    fn publish(&self, topic: &str, payload: Value) -> Result<(), ChannelError> {
        let mut registrations = self.registrations.lock().unwrap();
        let mut closed = Vec::new();
        let mut delivered = 0;

        for (id, registration) in registrations.iter() {
            if registration.topic != topic {
                continue;
            }
            // Delivery task gone - drop the registration
            if registration.tx.send(payload.clone()).is_err() {
                closed.push(*id);
            } else {
                delivered += 1;
            }
        }

        for id in closed {
            registrations.remove(&id);
        }

        trace!("Published on '{}' to {} handler(s)", topic, delivered);
        Ok(())
    }
}
