// Test support utilities for both unit and integration tests

use crate::channel::{
    self, EventChannel, Subscription, CONFIRM_DUPLICATE_DATA, EXISTS_DUPLICATE_DATA,
    IMPORT_RESULT,
};
use crate::duplicate::{CorrelationId, DecisionReply};
use crate::file_drop::{DirListing, DropError, FileInfo, FileSystemProbe};
use serde_json::json;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;

const REPLY_TIMEOUT: Duration = Duration::from_secs(1);

/// Scripted stand-in for the import worker process
///
/// Publishes duplicate and result events the way the worker does and
/// collects the UI's decision replies.
pub struct FakeWorker {
    channel: Arc<dyn EventChannel>,
    replies: mpsc::UnboundedReceiver<DecisionReply>,
    _subscription: Subscription,
}

impl FakeWorker {
    pub fn attach<C>(channel: &C) -> Self
    where
        C: EventChannel + Clone + 'static,
    {
        let (tx, replies) = mpsc::unbounded_channel();
        let subscription = channel.subscribe(
            CONFIRM_DUPLICATE_DATA,
            channel::handler(move |payload| {
                let tx = tx.clone();
                async move {
                    match channel::decode::<DecisionReply>(CONFIRM_DUPLICATE_DATA, payload) {
                        Ok(reply) => {
                            let _ = tx.send(reply);
                        }
                        Err(e) => panic!("Malformed decision reply: {}", e),
                    }
                }
            }),
        );

        Self {
            channel: Arc::new(channel.clone()),
            replies,
            _subscription: subscription,
        }
    }

    pub fn report_duplicate(&self, id: &CorrelationId, message: &str) {
        self.channel
            .publish(
                EXISTS_DUPLICATE_DATA,
                json!({
                    "messageId": id,
                    "message": message,
                    "data": { "code": message },
                    "excelRow": 2,
                    "fileName": "import.xlsx",
                }),
            )
            .unwrap();
    }

    pub fn finish(&self, id: &CorrelationId, ok: bool, success: u64, replace: u64, skip: u64) {
        let message = if ok { "import finished" } else { "import failed" };
        let mut payload = json!({
            "messageId": id,
            "ok": ok,
            "message": message,
            "successCount": success,
            "replaceCount": replace,
            "skipCount": skip,
        });
        if !ok {
            payload["error"] = json!("worker reported failure");
        }
        self.channel.publish(IMPORT_RESULT, payload).unwrap();
    }

    /// Next decision reply, or `None` after a one second timeout
    pub async fn next_reply(&mut self) -> Option<DecisionReply> {
        self.next_reply_within(REPLY_TIMEOUT).await
    }

    pub async fn next_reply_within(&mut self, timeout: Duration) -> Option<DecisionReply> {
        tokio::time::timeout(timeout, self.replies.recv())
            .await
            .ok()
            .flatten()
    }
}

#[derive(Default)]
struct ScriptedState {
    infos: HashMap<PathBuf, FileInfo>,
    listings: HashMap<PathBuf, DirListing>,
    listing_calls: Vec<PathBuf>,
}

/// In-memory `FileSystemProbe` with scripted metadata and listings
///
/// Paths with no scripted metadata report `NotFound`. Directories with no
/// scripted listing list as empty.
#[derive(Default, Clone)]
pub struct ScriptedFileSystem {
    state: Arc<Mutex<ScriptedState>>,
}

impl ScriptedFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, path: &str, size: u64) -> Self {
        self.insert(scripted_info(Path::new(path), size, false));
        self
    }

    pub fn with_directory(self, path: &str) -> Self {
        self.insert(scripted_info(Path::new(path), 0, true));
        self
    }

    pub fn with_listing(self, path: &str, children: &[&str]) -> Self {
        let children = children.iter().map(PathBuf::from).collect();
        self.state
            .lock()
            .unwrap()
            .listings
            .insert(PathBuf::from(path), DirListing::Ok(children));
        self
    }

    pub fn with_failed_listing(self, path: &str, reason: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .listings
            .insert(PathBuf::from(path), DirListing::Failed(reason.to_string()));
        self
    }

    pub fn listing_calls(&self) -> Vec<PathBuf> {
        self.state.lock().unwrap().listing_calls.clone()
    }

    fn insert(&self, info: FileInfo) {
        self.state
            .lock()
            .unwrap()
            .infos
            .insert(info.full_path.clone(), info);
    }
}

fn scripted_info(path: &Path, size: u64, is_directory: bool) -> FileInfo {
    let ext = match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if !is_directory => format!(".{}", ext.to_lowercase()),
        _ => String::new(),
    };
    FileInfo {
        name: path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default(),
        full_path: path.to_path_buf(),
        size,
        is_directory,
        is_file: !is_directory,
        last_modified: None,
        ext,
        parent_dir: path.parent().map(Path::to_path_buf).unwrap_or_default(),
    }
}

#[async_trait::async_trait]
impl FileSystemProbe for ScriptedFileSystem {
    async fn file_info(&self, path: &Path) -> Result<FileInfo, DropError> {
        self.state
            .lock()
            .unwrap()
            .infos
            .get(path)
            .cloned()
            .ok_or_else(|| DropError::NotFound(path.to_path_buf()))
    }

    async fn read_dir(&self, path: &Path) -> DirListing {
        let mut state = self.state.lock().unwrap();
        state.listing_calls.push(path.to_path_buf());
        state
            .listings
            .get(path)
            .cloned()
            .unwrap_or(DirListing::Ok(Vec::new()))
    }
}
