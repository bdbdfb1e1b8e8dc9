use super::{GestureState, GestureTracker, Point, PointerEvent};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::trace;

/// Event sink for a running tracker.
///
/// Presses come from the bound element; moves and releases from the whole
/// surface. All of them share one queue so the tracker sees them in the
/// order they were sent. Everything sent after teardown is discarded.
#[derive(Clone)]
pub struct GestureInput {
    events: mpsc::UnboundedSender<PointerEvent>,
    cancel: CancellationToken,
}

impl GestureInput {
    pub fn press(&self, position: Point) {
        self.send(PointerEvent::Press(position));
    }

    pub fn move_to(&self, position: Point) {
        self.send(PointerEvent::Move(position));
    }

    pub fn release(&self) {
        self.send(PointerEvent::Release);
    }

    fn send(&self, event: PointerEvent) {
        if !self.cancel.is_cancelled() {
            let _ = self.events.send(event);
        }
    }
}

/// Owner of a running tracker. Dropping it tears the tracker down.
pub struct TrackerHandle {
    input: GestureInput,
    state: Arc<watch::Sender<GestureState>>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl TrackerHandle {
    pub fn input(&self) -> GestureInput {
        self.input.clone()
    }

    /// Current offset and active flag
    pub fn state(&self) -> GestureState {
        *self.state.borrow()
    }

    /// Receiver that is notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<GestureState> {
        self.state.subscribe()
    }

    pub fn is_torn_down(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Stop tracking. Equivalent to dropping the handle.
    pub fn teardown(self) {}

    fn shutdown(&mut self) {
        if self.cancel.is_cancelled() {
            return;
        }
        self.cancel.cancel();
        // Teardown mid-drag settles like a release
        self.state.send_if_modified(|state| {
            let was_active = state.active;
            state.active = false;
            was_active
        });
        if let Some(task) = self.task.take() {
            task.abort();
        }
        trace!("Gesture tracker torn down");
    }
}

impl Drop for TrackerHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Start a tracker on the runtime
pub fn spawn_tracker(runtime_handle: &tokio::runtime::Handle) -> TrackerHandle {
    let (events_tx, mut events_rx) = mpsc::unbounded_channel::<PointerEvent>();
    let (state_tx, _) = watch::channel(GestureState::default());
    let state = Arc::new(state_tx);
    let cancel = CancellationToken::new();

    let task_state = state.clone();
    let task_cancel = cancel.clone();
    let task = runtime_handle.spawn(async move {
        let mut tracker = GestureTracker::new();

        loop {
            let event = tokio::select! {
                biased;
                _ = task_cancel.cancelled() => break,
                event = events_rx.recv() => match event {
                    Some(event) => event,
                    None => break,
                },
            };

            // Checked under the watch lock so nothing lands after teardown returns
            task_state.send_if_modified(|shared| {
                if task_cancel.is_cancelled() {
                    return false;
                }
                if !tracker.handle(event) {
                    return false;
                }
                *shared = tracker.state();
                true
            });
        }
    });

    TrackerHandle {
        input: GestureInput {
            events: events_tx,
            cancel: cancel.clone(),
        },
        state,
        cancel,
        task: Some(task),
    }
}
