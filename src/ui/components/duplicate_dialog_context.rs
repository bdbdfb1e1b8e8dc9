use crate::duplicate::{Decision, DecisionCallback, DecisionError, DuplicateInfo};
use dioxus::prelude::*;
use std::collections::VecDeque;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

/// One conflict waiting for the user
pub struct DecisionRequest {
    pub info: DuplicateInfo,
    reply: oneshot::Sender<Decision>,
}

impl DecisionRequest {
    /// The session waiting on this request has ended
    pub fn is_stale(&self) -> bool {
        self.reply.is_closed()
    }

    pub fn answer(self, decision: Decision) {
        if self.reply.send(decision).is_err() {
            debug!("Decision for {} arrived after its session ended", self.info.id);
        }
    }
}

/// `DecisionCallback` that asks the user through the duplicate dialog
#[derive(Clone)]
pub struct DialogDecider {
    requests: mpsc::UnboundedSender<DecisionRequest>,
}

impl DialogDecider {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<DecisionRequest>) {
        let (requests, rx) = mpsc::unbounded_channel();
        (Self { requests }, rx)
    }
}

#[async_trait::async_trait]
impl DecisionCallback for DialogDecider {
    async fn decide(&self, info: DuplicateInfo) -> Result<Decision, DecisionError> {
        let (reply, answer) = oneshot::channel();
        self.requests
            .send(DecisionRequest { info, reply })
            .map_err(|_| DecisionError::Failed("duplicate dialog is not mounted".to_string()))?;

        // Request dropped unanswered means the dialog went away
        answer.await.map_err(|_| DecisionError::Dismissed)
    }
}

#[derive(Clone)]
pub struct DuplicateDialogContext {
    pub decider: DialogDecider,
    pub queue: Signal<VecDeque<DecisionRequest>>,
}

impl DuplicateDialogContext {
    pub fn current(&self) -> Option<DuplicateInfo> {
        first_open(&self.queue.read()).map(|request| request.info.clone())
    }

    /// Answer the first conflict whose session is still waiting
    pub fn resolve(&self, decision: Decision) {
        let mut queue = self.queue;
        let next = take_first_open(&mut queue.write());
        if let Some(request) = next {
            request.answer(decision);
        }
    }
}

fn first_open(queue: &VecDeque<DecisionRequest>) -> Option<&DecisionRequest> {
    queue.iter().find(|request| !request.is_stale())
}

/// Pops requests off the front, discarding those from ended sessions
fn take_first_open(queue: &mut VecDeque<DecisionRequest>) -> Option<DecisionRequest> {
    while let Some(request) = queue.pop_front() {
        if request.is_stale() {
            debug!("Dropping duplicate prompt for ended session {}", request.info.id);
            continue;
        }
        return Some(request);
    }
    None
}

/// Provides `DuplicateDialogContext` and feeds the dialog queue
#[component]
pub fn DuplicateDialogProvider(children: Element) -> Element {
    let mut queue = use_signal(VecDeque::<DecisionRequest>::new);

    let decider = use_hook(|| {
        let (decider, mut requests) = DialogDecider::channel();
        spawn(async move {
            while let Some(request) = requests.recv().await {
                debug!("Duplicate reported for session {}", request.info.id);
                let mut pending = queue.write();
                pending.retain(|queued| !queued.is_stale());
                pending.push_back(request);
            }
        });
        decider
    });

    use_context_provider(|| DuplicateDialogContext { decider, queue });

    rsx! {
        {children}
    }
}
