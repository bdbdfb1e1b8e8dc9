// # Duplicate Resolution
//
// Lets a long-running worker import pause on a data conflict, ask the UI
// how to resolve it, and resume with the answer:
//
// - **DuplicateCoordinator**: routes worker events to sessions by correlation id
// - **SessionRegistry**: in-flight sessions, owned by one coordinator
// - **DecisionCallback**: caller-supplied arbiter (usually a dialog)
//
// Public API:
// - `DuplicateCoordinator::start`: run one import session to its outcome
// - `DuplicateCoordinator::begin`: same, but hands back an `ImportSession` handle
// - `ImportOutcome`: worker's result plus the last recorded `Decision`

mod coordinator;
mod decision;
mod registry;
mod types;

pub use coordinator::{CoordinatorError, DuplicateCoordinator, ImportSession};
pub use decision::{DecisionCallback, DecisionError, FixedDecision};
pub use registry::SessionRegistry;
pub use types::{
    CorrelationId, Decision, DecisionReply, DuplicateInfo, ImportOutcome, ImportResultEvent,
};
