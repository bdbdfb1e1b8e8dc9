use crate::file_drop::{DropError, DropEvent, DropHost, DropSink};
use std::sync::Mutex;
use tracing::trace;

/// Drop host fed by the web view's `drop` events
#[derive(Default)]
pub struct WebviewDropHost {
    sink: Mutex<Option<DropSink>>,
}

impl WebviewDropHost {
    /// Hand a drop to the wired enumerator. Returns false when nothing is wired.
    pub fn forward(&self, event: DropEvent) -> bool {
        match self.sink.lock().unwrap().as_ref() {
            Some(sink) => sink.deliver(event),
            None => {
                trace!("Drop ignored, no enumerator wired");
                false
            }
        }
    }
}

impl DropHost for WebviewDropHost {
    fn supports_native_drop(&self) -> bool {
        true
    }

    fn install(&self, sink: DropSink) -> Result<(), DropError> {
        let mut slot = self.sink.lock().unwrap();
        if slot.is_some() {
            return Err(DropError::WireUp("drop sink already installed".to_string()));
        }
        *slot = Some(sink);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_drop::{DropBatch, DropEnumerator};
    use crate::gesture::Point;
    use crate::test_support::ScriptedFileSystem;
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::mpsc;

    #[test]
    fn test_forward_without_wiring_is_refused() {
        let host = WebviewDropHost::default();
        assert!(!host.forward(DropEvent {
            position: Point::ORIGIN,
            paths: vec![PathBuf::from("/a")],
        }));
    }

    #[tokio::test]
    async fn test_forward_reaches_enumerator() {
        let enumerator =
            DropEnumerator::new(Arc::new(ScriptedFileSystem::new().with_file("/a.xlsx", 1)));
        let (tx, mut rx) = mpsc::unbounded_channel();
        enumerator.set_observers(vec![Arc::new(move |batch: &DropBatch| {
            let _ = tx.send(batch.entries.len());
        })]);
        let host = WebviewDropHost::default();
        assert!(enumerator.wire(&host, &tokio::runtime::Handle::current()));

        assert!(host.forward(DropEvent {
            position: Point::new(5.0, 5.0),
            paths: vec![PathBuf::from("/a.xlsx")],
        }));
        let delivered = tokio::time::timeout(Duration::from_secs(1), rx.recv())
            .await
            .unwrap();
        assert_eq!(delivered, Some(1));
    }

    #[test]
    fn test_second_install_fails() {
        let host = WebviewDropHost::default();
        let (tx, _rx) = mpsc::unbounded_channel();
        let sink = DropSink::new(tx);
        assert!(host.install(sink.clone()).is_ok());
        assert!(matches!(host.install(sink), Err(DropError::WireUp(_))));
    }
}
