use super::types::{Decision, DuplicateInfo};
use std::future::Future;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecisionError {
    /// The prompt was closed without an answer
    #[error("Decision prompt dismissed")]
    Dismissed,
    #[error("Decision failed: {0}")]
    Failed(String),
}

/// Caller-supplied arbiter for duplicate conflicts.
///
/// May suspend for as long as it likes (e.g. while a dialog waits for a
/// click). Must eventually produce `Replace`, `Skip` or `Cancel`.
#[async_trait::async_trait]
pub trait DecisionCallback: Send + Sync {
    async fn decide(&self, info: DuplicateInfo) -> Result<Decision, DecisionError>;
}

#[async_trait::async_trait]
impl<F, Fut> DecisionCallback for F
where
    F: Fn(DuplicateInfo) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Decision, DecisionError>> + Send + 'static,
{
    async fn decide(&self, info: DuplicateInfo) -> Result<Decision, DecisionError> {
        (self)(info).await
    }
}

/// Answers every conflict with the same decision
#[derive(Debug, Clone, Copy)]
pub struct FixedDecision(pub Decision);

#[async_trait::async_trait]
impl DecisionCallback for FixedDecision {
    async fn decide(&self, _info: DuplicateInfo) -> Result<Decision, DecisionError> {
        Ok(self.0)
    }
}
