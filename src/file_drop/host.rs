use super::enumerator::{DropEnumerator, DropEvent};
use super::probe::DropError;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};

const UNKNOWN: u8 = 0;
const WIRING: u8 = 1;
const ENABLED: u8 = 2;
const DISABLED: u8 = 3;

/// Outcome of wiring native drop delivery. Once disabled it stays disabled.
#[derive(Clone, Default)]
pub struct DropSupport {
    state: Arc<AtomicU8>,
}

impl DropSupport {
    pub fn is_supported(&self) -> bool {
        self.state.load(Ordering::SeqCst) == ENABLED
    }

    pub fn is_disabled(&self) -> bool {
        self.state.load(Ordering::SeqCst) == DISABLED
    }

    fn try_begin(&self) -> bool {
        self.state
            .compare_exchange(UNKNOWN, WIRING, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    fn settle(&self, enabled: bool) {
        self.state
            .store(if enabled { ENABLED } else { DISABLED }, Ordering::SeqCst);
    }
}

/// Receiving end handed to a host during wiring
#[derive(Clone)]
pub struct DropSink {
    tx: mpsc::UnboundedSender<DropEvent>,
}

impl DropSink {
    pub fn new(tx: mpsc::UnboundedSender<DropEvent>) -> Self {
        Self { tx }
    }

    /// Forward a native drop to the enumerator. Returns false once the pump is gone.
    pub fn deliver(&self, event: DropEvent) -> bool {
        self.tx.send(event).is_ok()
    }
}

/// Environment that can deliver native file drops
pub trait DropHost: Send + Sync {
    fn supports_native_drop(&self) -> bool;

    /// Start forwarding drops into `sink`
    fn install(&self, sink: DropSink) -> Result<(), DropError>;
}

impl DropEnumerator {
    /// Wire this enumerator to `host`.
    ///
    /// Only the first call does anything. An unsupported host or a failed
    /// install disables drop handling for the lifetime of this enumerator.
    pub fn wire(&self, host: &dyn DropHost, runtime_handle: &tokio::runtime::Handle) -> bool {
        if !self.support.try_begin() {
            return self.support.is_supported();
        }

        if !host.supports_native_drop() {
            info!("Native file drop not supported, drop handling disabled");
            self.support.settle(false);
            return false;
        }

        let (tx, mut rx) = mpsc::unbounded_channel::<DropEvent>();
        if let Err(e) = host.install(DropSink::new(tx)) {
            info!("File drop wire-up failed, drop handling disabled: {}", e);
            self.support.settle(false);
            return false;
        }

        self.support.settle(true);

        let enumerator = self.clone();
        runtime_handle.spawn(async move {
            while let Some(event) = rx.recv().await {
                debug!("Native drop of {} paths", event.paths.len());
                enumerator.handle_drop(event).await;
            }
        });

        true
    }
}
