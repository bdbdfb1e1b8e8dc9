use super::types::{CorrelationId, Decision, DuplicateInfo, ImportResultEvent};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Work routed to one session's task, in arrival order
#[derive(Debug)]
pub(crate) enum SessionEvent {
    Duplicate(DuplicateInfo),
    Result(ImportResultEvent),
}

/// Registry-side view of an in-flight session
#[derive(Clone)]
pub(crate) struct SessionEntry {
    pub events: mpsc::UnboundedSender<SessionEvent>,
    pub last_decision: Arc<Mutex<Decision>>,
}

/// In-flight import sessions keyed by correlation id.
///
/// Owned by one coordinator; at most one entry per id.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<Mutex<HashMap<CorrelationId, SessionEntry>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session. Returns false (and leaves the registry untouched)
    /// if the id is already taken.
    pub(crate) fn insert(&self, id: CorrelationId, entry: SessionEntry) -> bool {
        let mut sessions = self.sessions.lock().unwrap();
        if sessions.contains_key(&id) {
            return false;
        }
        sessions.insert(id, entry);
        true
    }

    pub(crate) fn get(&self, id: &CorrelationId) -> Option<SessionEntry> {
        self.sessions.lock().unwrap().get(id).cloned()
    }

    pub(crate) fn remove(&self, id: &CorrelationId) -> Option<SessionEntry> {
        self.sessions.lock().unwrap().remove(id)
    }

    pub fn contains(&self, id: &CorrelationId) -> bool {
        self.sessions.lock().unwrap().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ids of all in-flight sessions, sorted
    pub fn ids(&self) -> Vec<CorrelationId> {
        let mut ids: Vec<_> = self.sessions.lock().unwrap().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Last decision recorded for a live session
    pub fn last_decision(&self, id: &CorrelationId) -> Option<Decision> {
        self.get(id).map(|entry| *entry.last_decision.lock().unwrap())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> (SessionEntry, mpsc::UnboundedReceiver<SessionEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        (
            SessionEntry {
                events,
                last_decision: Arc::new(Mutex::new(Decision::None)),
            },
            rx,
        )
    }

    #[test]
    fn test_one_entry_per_id() {
        let registry = SessionRegistry::new();
        let (first, _rx1) = entry();
        let (second, _rx2) = entry();

        assert!(registry.insert("abc".into(), first));
        assert!(!registry.insert("abc".into(), second));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let registry = SessionRegistry::new();
        let (first, _rx) = entry();
        registry.insert("abc".into(), first);

        assert!(registry.remove(&"abc".into()).is_some());
        assert!(registry.remove(&"abc".into()).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_last_decision_defaults_to_none() {
        let registry = SessionRegistry::new();
        let (first, _rx) = entry();
        registry.insert("abc".into(), first);

        assert_eq!(registry.last_decision(&"abc".into()), Some(Decision::None));
        assert_eq!(registry.last_decision(&"missing".into()), None);
    }
}
