use super::decision::DecisionCallback;
use super::registry::{SessionEntry, SessionEvent, SessionRegistry};
use super::types::{
    CorrelationId, Decision, DecisionReply, DuplicateInfo, ImportOutcome, ImportResultEvent,
};
use crate::channel::{
    self, EventChannel, Subscription, CONFIRM_DUPLICATE_DATA, EXISTS_DUPLICATE_DATA,
    IMPORT_RESULT,
};
use futures::FutureExt;
use serde_json::Value;
use std::fmt::Display;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoordinatorError {
    /// `launch` reported that the import never started
    #[error("Import abandoned before start: {0}")]
    Abandoned(String),
    /// The session ended without the worker reporting a result
    #[error("Import session retired without a result")]
    Retired,
}

/// Arbitrates duplicate-data conflicts for concurrent import sessions.
///
/// Listens on `exists_duplicate_data` and `import_result`, routes each event
/// to its session by correlation id, and replies on `confirm_duplicate_data`.
/// Each session runs its own task, so a callback waiting on the user only
/// holds up that session.
#[derive(Clone)]
pub struct DuplicateCoordinator {
    channel: Arc<dyn EventChannel>,
    registry: SessionRegistry,
    runtime_handle: tokio::runtime::Handle,
    subscriptions: Arc<Mutex<Vec<Subscription>>>,
}

impl DuplicateCoordinator {
    /// Create a coordinator with its own registry and subscribe to the worker topics
    pub fn attach(channel: Arc<dyn EventChannel>, runtime_handle: tokio::runtime::Handle) -> Self {
        Self::with_registry(channel, SessionRegistry::new(), runtime_handle)
    }

    pub fn with_registry(
        channel: Arc<dyn EventChannel>,
        registry: SessionRegistry,
        runtime_handle: tokio::runtime::Handle,
    ) -> Self {
        let duplicate_registry = registry.clone();
        let on_duplicate = channel.subscribe(
            EXISTS_DUPLICATE_DATA,
            channel::handler(move |payload| {
                let registry = duplicate_registry.clone();
                async move { route_duplicate(&registry, payload) }
            }),
        );

        let result_registry = registry.clone();
        let on_result = channel.subscribe(
            IMPORT_RESULT,
            channel::handler(move |payload| {
                let registry = result_registry.clone();
                async move { route_result(&registry, payload) }
            }),
        );

        Self {
            channel,
            registry,
            runtime_handle,
            subscriptions: Arc::new(Mutex::new(vec![on_duplicate, on_result])),
        }
    }

    /// Stop listening for worker events. In-flight sessions stay registered
    /// but will receive nothing further.
    pub fn detach(&self) {
        let released: Vec<Subscription> = self.subscriptions.lock().unwrap().drain(..).collect();
        debug!("Detached coordinator ({} subscriptions)", released.len());
    }

    /// Run one import session to completion.
    ///
    /// Registers a session, calls `launch` with its id so the worker can be
    /// told to begin, then waits for the worker's `import_result`.
    pub async fn start<L, Fut, E>(
        &self,
        launch: L,
        on_duplicate: impl DecisionCallback + 'static,
    ) -> Result<ImportOutcome, CoordinatorError>
    where
        L: FnOnce(CorrelationId) -> Fut,
        Fut: Future<Output = Result<(), E>>,
        E: Display,
    {
        self.begin(launch, on_duplicate).await?.wait().await
    }

    /// Register a session and launch it, returning a handle to await the outcome.
    ///
    /// If `launch` fails the session is retired immediately and
    /// `CoordinatorError::Abandoned` is returned.
    pub async fn begin<L, Fut, E>(
        &self,
        launch: L,
        on_duplicate: impl DecisionCallback + 'static,
    ) -> Result<ImportSession, CoordinatorError>
    where
        L: FnOnce(CorrelationId) -> Fut,
        Fut: Future<Output = Result<(), E>>,
        E: Display,
    {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let (outcome_tx, outcome_rx) = oneshot::channel();
        let last_decision = Arc::new(Mutex::new(Decision::None));

        let entry = SessionEntry {
            events: events_tx,
            last_decision: last_decision.clone(),
        };
        let id = loop {
            let candidate = CorrelationId::generate();
            if self.registry.insert(candidate.clone(), entry.clone()) {
                break candidate;
            }
        };

        let task = self.runtime_handle.spawn(run_session(
            id.clone(),
            Arc::new(on_duplicate),
            events_rx,
            last_decision,
            self.channel.clone(),
            outcome_tx,
        ));

        let session = ImportSession {
            id: id.clone(),
            outcome: Some(outcome_rx),
            registry: self.registry.clone(),
            task,
        };

        info!("Started import session {}", id);

        if let Err(e) = launch(id.clone()).await {
            warn!("Import session {} abandoned at launch: {}", id, e);
            drop(session);
            return Err(CoordinatorError::Abandoned(e.to_string()));
        }

        Ok(session)
    }

    /// Ids of sessions still waiting for a result
    pub fn pending_sessions(&self) -> Vec<CorrelationId> {
        self.registry.ids()
    }

    /// Last decision recorded for a session that is still in flight
    pub fn last_decision(&self, id: &CorrelationId) -> Option<Decision> {
        self.registry.last_decision(id)
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }
}

/// Handle to one in-flight import.
///
/// Dropping it before the outcome arrives retires the session: the registry
/// entry is removed and any pending decision callback is cancelled.
pub struct ImportSession {
    id: CorrelationId,
    outcome: Option<oneshot::Receiver<ImportOutcome>>,
    registry: SessionRegistry,
    task: JoinHandle<()>,
}

impl ImportSession {
    pub fn id(&self) -> &CorrelationId {
        &self.id
    }

    /// Wait for the worker's terminal result
    pub async fn wait(mut self) -> Result<ImportOutcome, CoordinatorError> {
        let outcome = self.outcome.take().ok_or(CoordinatorError::Retired)?;
        outcome.await.map_err(|_| CoordinatorError::Retired)
    }
}

impl Drop for ImportSession {
    fn drop(&mut self) {
        if self.registry.remove(&self.id).is_some() {
            debug!("Retired import session {} on drop", self.id);
        }
        self.task.abort();
    }
}

fn route_duplicate(registry: &SessionRegistry, payload: Value) {
    let info: DuplicateInfo = match channel::decode(EXISTS_DUPLICATE_DATA, payload) {
        Ok(info) => info,
        Err(e) => {
            warn!("Ignoring malformed duplicate notification: {}", e);
            return;
        }
    };

    debug!("Duplicate reported for session {}: {}", info.id, info.message);

    let Some(entry) = registry.get(&info.id) else {
        warn!("Duplicate notification for unknown session {}", info.id);
        return;
    };

    let id = info.id.clone();
    if entry.events.send(SessionEvent::Duplicate(info)).is_err() {
        warn!("Session {} is no longer processing events", id);
    }
}

fn route_result(registry: &SessionRegistry, payload: Value) {
    let result: ImportResultEvent = match channel::decode(IMPORT_RESULT, payload) {
        Ok(result) => result,
        Err(e) => {
            warn!("Ignoring malformed import result: {}", e);
            return;
        }
    };

    // Retire first so late duplicates for this id become routing misses
    let Some(entry) = registry.remove(&result.id) else {
        warn!("Dropping import result for unknown session {}", result.id);
        return;
    };

    let id = result.id.clone();
    if entry.events.send(SessionEvent::Result(result)).is_err() {
        warn!("Import result for session {} arrived after its waiter left", id);
    }
}

/// Per-session worker: answers duplicates in order, then settles the waiter
async fn run_session(
    id: CorrelationId,
    callback: Arc<dyn DecisionCallback>,
    mut events: mpsc::UnboundedReceiver<SessionEvent>,
    last_decision: Arc<Mutex<Decision>>,
    channel: Arc<dyn EventChannel>,
    outcome_tx: oneshot::Sender<ImportOutcome>,
) {
    while let Some(event) = events.recv().await {
        match event {
            SessionEvent::Duplicate(info) => {
                let decided = AssertUnwindSafe(callback.decide(info)).catch_unwind().await;
                let decision = match decided {
                    Ok(Ok(decision)) if decision.is_final() => decision,
                    Ok(Ok(_)) => {
                        error!("Decision callback for session {} returned no decision", id);
                        continue;
                    }
                    Ok(Err(e)) => {
                        error!("Decision callback for session {} failed: {}", id, e);
                        continue;
                    }
                    Err(_) => {
                        error!("Decision callback for session {} panicked", id);
                        continue;
                    }
                };

                *last_decision.lock().unwrap() = decision;
                info!("Session {} resolved duplicate with {:?}", id, decision);

                let reply = DecisionReply {
                    id: id.clone(),
                    decision,
                };
                let published = serde_json::to_value(&reply)
                    .map_err(channel::ChannelError::from)
                    .and_then(|payload| channel.publish(CONFIRM_DUPLICATE_DATA, payload));
                if let Err(e) = published {
                    error!("Failed to send decision for session {}: {}", id, e);
                }
            }
            SessionEvent::Result(result) => {
                let decision = *last_decision.lock().unwrap();
                let outcome = ImportOutcome::from_result(result, decision);
                info!(
                    "Session {} finished (ok: {}, strategy: {:?})",
                    id, outcome.ok, outcome.strategy
                );
                if outcome_tx.send(outcome).is_err() {
                    debug!("Waiter for session {} already gone", id);
                }
                return;
            }
        }
    }

    debug!("Session {} closed without a result", id);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::InMemoryChannel;
    use crate::duplicate::decision::{DecisionError, FixedDecision};
    use crate::test_support::FakeWorker;
    use std::convert::Infallible;
    use std::time::Duration;

    fn setup() -> (DuplicateCoordinator, FakeWorker) {
        let channel = InMemoryChannel::new(tokio::runtime::Handle::current());
        let worker = FakeWorker::attach(&channel);
        let coordinator =
            DuplicateCoordinator::attach(Arc::new(channel), tokio::runtime::Handle::current());
        (coordinator, worker)
    }

    async fn launched(
        coordinator: &DuplicateCoordinator,
        callback: impl DecisionCallback + 'static,
    ) -> ImportSession {
        coordinator
            .begin(|_| async { Ok::<(), Infallible>(()) }, callback)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_duplicate_then_result() {
        let (coordinator, mut worker) = setup();
        let session = launched(&coordinator, FixedDecision(Decision::Replace)).await;
        let id = session.id().clone();

        worker.report_duplicate(&id, "dup");
        let reply = worker.next_reply().await.expect("reply");
        assert_eq!(reply.id, id);
        assert_eq!(reply.decision, Decision::Replace);

        worker.finish(&id, true, 3, 1, 0);
        let outcome = session.wait().await.unwrap();

        assert!(outcome.ok);
        assert_eq!(outcome.success_count, 3);
        assert_eq!(outcome.replace_count, 1);
        assert_eq!(outcome.skip_count, 0);
        assert_eq!(outcome.strategy, Decision::Replace);
        assert!(coordinator.pending_sessions().is_empty());
    }

    #[tokio::test]
    async fn test_no_duplicate_reports_none() {
        let (coordinator, worker) = setup();
        let session = launched(&coordinator, FixedDecision(Decision::Skip)).await;

        worker.finish(session.id(), true, 5, 0, 0);
        let outcome = session.wait().await.unwrap();

        assert_eq!(outcome.strategy, Decision::None);
    }

    #[tokio::test]
    async fn test_unknown_result_is_ignored() {
        let (coordinator, worker) = setup();
        let session = launched(&coordinator, FixedDecision(Decision::Skip)).await;

        worker.finish(&"not-a-session".into(), true, 1, 0, 0);
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(coordinator.pending_sessions(), vec![session.id().clone()]);
    }

    #[tokio::test]
    async fn test_unknown_duplicate_gets_no_reply() {
        let (_coordinator, mut worker) = setup();

        worker.report_duplicate(&"ghost".into(), "dup");
        assert!(worker.next_reply_within(Duration::from_millis(50)).await.is_none());
    }

    #[tokio::test]
    async fn test_replies_follow_duplicate_order_and_last_decision_wins() {
        let (coordinator, mut worker) = setup();
        let session = launched(&coordinator, |info: DuplicateInfo| async move {
            Ok::<_, DecisionError>(if info.message == "first" {
                Decision::Skip
            } else {
                Decision::Replace
            })
        })
        .await;
        let id = session.id().clone();

        worker.report_duplicate(&id, "first");
        worker.report_duplicate(&id, "second");

        assert_eq!(worker.next_reply().await.unwrap().decision, Decision::Skip);
        assert_eq!(worker.next_reply().await.unwrap().decision, Decision::Replace);
        assert_eq!(coordinator.last_decision(&id), Some(Decision::Replace));

        worker.finish(&id, true, 2, 1, 1);
        assert_eq!(session.wait().await.unwrap().strategy, Decision::Replace);
    }

    #[tokio::test]
    async fn test_result_waits_for_pending_decision() {
        let (coordinator, mut worker) = setup();
        let (answer_tx, answer_rx) = oneshot::channel::<Decision>();
        let answer_rx = Arc::new(tokio::sync::Mutex::new(Some(answer_rx)));

        let session = launched(&coordinator, move |_info: DuplicateInfo| {
            let answer_rx = answer_rx.clone();
            async move {
                let Some(rx) = answer_rx.lock().await.take() else {
                    return Err(DecisionError::Dismissed);
                };
                rx.await.map_err(|_| DecisionError::Dismissed)
            }
        })
        .await;
        let id = session.id().clone();

        worker.report_duplicate(&id, "dup");
        worker.finish(&id, true, 1, 0, 0);
        tokio::time::sleep(Duration::from_millis(20)).await;

        // Result already retired the entry, but the outcome waits for the answer
        assert!(coordinator.pending_sessions().is_empty());
        answer_tx.send(Decision::Cancel).unwrap();

        assert_eq!(worker.next_reply().await.unwrap().decision, Decision::Cancel);
        assert_eq!(session.wait().await.unwrap().strategy, Decision::Cancel);
    }

    #[tokio::test]
    async fn test_failing_callback_sends_no_reply() {
        let (coordinator, mut worker) = setup();
        let session = launched(&coordinator, |_info: DuplicateInfo| async {
            Err::<Decision, _>(DecisionError::Failed("dialog crashed".to_string()))
        })
        .await;
        let id = session.id().clone();

        worker.report_duplicate(&id, "dup");
        assert!(worker.next_reply_within(Duration::from_millis(50)).await.is_none());

        worker.finish(&id, false, 0, 0, 0);
        let outcome = session.wait().await.unwrap();
        assert!(!outcome.ok);
        assert_eq!(outcome.strategy, Decision::None);
    }

    #[tokio::test]
    async fn test_panicking_callback_is_contained() {
        let (coordinator, mut worker) = setup();
        let session = launched(&coordinator, |info: DuplicateInfo| async move {
            if info.message == "boom" {
                panic!("callback blew up");
            }
            Ok::<_, DecisionError>(Decision::Skip)
        })
        .await;
        let id = session.id().clone();

        worker.report_duplicate(&id, "boom");
        worker.report_duplicate(&id, "fine");

        // The panic loses one exchange, the next one still gets answered
        assert_eq!(worker.next_reply().await.unwrap().decision, Decision::Skip);
    }

    #[tokio::test]
    async fn test_none_decision_is_never_sent() {
        let (coordinator, mut worker) = setup();
        let session = launched(&coordinator, FixedDecision(Decision::None)).await;

        worker.report_duplicate(session.id(), "dup");
        assert!(worker.next_reply_within(Duration::from_millis(50)).await.is_none());
    }

    #[tokio::test]
    async fn test_abandoned_launch_retires_session() {
        let (coordinator, _worker) = setup();

        let result = coordinator
            .start(
                |_| async { Err::<(), _>("backend refused") },
                FixedDecision(Decision::Skip),
            )
            .await;

        assert_eq!(
            result,
            Err(CoordinatorError::Abandoned("backend refused".to_string()))
        );
        assert!(coordinator.pending_sessions().is_empty());
    }

    #[tokio::test]
    async fn test_launch_receives_registered_id() {
        let (coordinator, _worker) = setup();
        let registry = coordinator.registry().clone();

        let session = coordinator
            .begin(
                |id| {
                    let registered = registry.contains(&id);
                    async move {
                        if registered {
                            Ok(())
                        } else {
                            Err("id not registered before launch")
                        }
                    }
                },
                FixedDecision(Decision::Skip),
            )
            .await
            .unwrap();

        assert_eq!(coordinator.pending_sessions(), vec![session.id().clone()]);
    }

    #[tokio::test]
    async fn test_dropping_handle_retires_session() {
        let (coordinator, _worker) = setup();
        let session = launched(&coordinator, FixedDecision(Decision::Skip)).await;
        assert_eq!(coordinator.pending_sessions().len(), 1);

        drop(session);
        assert!(coordinator.pending_sessions().is_empty());
    }

    #[tokio::test]
    async fn test_sessions_do_not_block_each_other() {
        let (coordinator, mut worker) = setup();

        // Session A never answers
        let stuck = launched(&coordinator, |_info: DuplicateInfo| async {
            futures::future::pending::<Result<Decision, DecisionError>>().await
        })
        .await;
        let quick = launched(&coordinator, FixedDecision(Decision::Skip)).await;

        worker.report_duplicate(stuck.id(), "a");
        worker.report_duplicate(quick.id(), "b");

        let reply = worker.next_reply().await.unwrap();
        assert_eq!(&reply.id, quick.id());
        assert_eq!(reply.decision, Decision::Skip);
    }

    #[tokio::test]
    async fn test_detach_stops_routing() {
        let channel = InMemoryChannel::new(tokio::runtime::Handle::current());
        let mut worker = FakeWorker::attach(&channel);
        let coordinator = DuplicateCoordinator::attach(
            Arc::new(channel.clone()),
            tokio::runtime::Handle::current(),
        );
        let session = launched(&coordinator, FixedDecision(Decision::Skip)).await;

        coordinator.detach();
        assert_eq!(channel.subscriber_count(EXISTS_DUPLICATE_DATA), 0);
        assert_eq!(channel.subscriber_count(IMPORT_RESULT), 0);

        worker.report_duplicate(session.id(), "dup");
        assert!(worker.next_reply_within(Duration::from_millis(50)).await.is_none());
    }
}
