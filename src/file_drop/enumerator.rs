use super::entry::DroppedEntry;
use super::host::DropSupport;
use super::probe::{DirListing, FileSystemProbe};
use crate::gesture::Point;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// Raw drop delivered by the host: pointer position plus dropped paths, in order
#[derive(Debug, Clone, PartialEq)]
pub struct DropEvent {
    pub position: Point,
    pub paths: Vec<PathBuf>,
}

/// Enumerated drop handed to observers
#[derive(Debug, Clone, PartialEq)]
pub struct DropBatch {
    pub entries: Vec<DroppedEntry>,
    pub position: Point,
}

pub type DropObserver = Arc<dyn Fn(&DropBatch) + Send + Sync>;

/// Resolves dropped paths into `DroppedEntry` trees and fans them out to observers
#[derive(Clone)]
pub struct DropEnumerator {
    probe: Arc<dyn FileSystemProbe>,
    observers: Arc<Mutex<Vec<DropObserver>>>,
    pub(super) support: DropSupport,
}

impl DropEnumerator {
    pub fn new(probe: Arc<dyn FileSystemProbe>) -> Self {
        Self {
            probe,
            observers: Arc::new(Mutex::new(Vec::new())),
            support: DropSupport::default(),
        }
    }

    /// Replace every registered observer with `observers`
    pub fn set_observers(&self, observers: Vec<DropObserver>) {
        *self.observers.lock().unwrap() = observers;
    }

    pub fn clear_observers(&self) {
        self.observers.lock().unwrap().clear();
    }

    pub fn observer_count(&self) -> usize {
        self.observers.lock().unwrap().len()
    }

    /// Whether native drop delivery was wired successfully
    pub fn is_supported(&self) -> bool {
        self.support.is_supported()
    }

    /// Enumerate `paths` in order.
    ///
    /// Directories get one level of children. A failed listing leaves the
    /// directory with no children; a path whose metadata cannot be read is
    /// skipped.
    pub async fn enumerate(&self, paths: &[PathBuf]) -> Vec<DroppedEntry> {
        let mut entries = Vec::with_capacity(paths.len());

        for path in paths {
            let info = match self.probe.file_info(path).await {
                Ok(info) => info,
                Err(e) => {
                    warn!("Skipping dropped path {}: {}", path.display(), e);
                    continue;
                }
            };

            if info.is_directory {
                let children = self.list_children(path).await;
                entries.push(DroppedEntry::directory(info, children));
            } else {
                entries.push(DroppedEntry::file(info));
            }
        }

        entries
    }

    async fn list_children(&self, dir: &Path) -> Vec<DroppedEntry> {
        let child_paths = match self.probe.read_dir(dir).await {
            DirListing::Ok(paths) => paths,
            DirListing::Failed(reason) => {
                warn!(
                    "Listing {} failed, treating as empty: {}",
                    dir.display(),
                    reason
                );
                return Vec::new();
            }
        };

        let mut children = Vec::with_capacity(child_paths.len());
        for child in &child_paths {
            match self.probe.file_info(child).await {
                Ok(info) => children.push(DroppedEntry::file(info)),
                Err(e) => warn!("Skipping child {}: {}", child.display(), e),
            }
        }
        children
    }

    /// Enumerate a drop and notify the observers registered at delivery time
    pub async fn handle_drop(&self, event: DropEvent) -> DropBatch {
        let entries = self.enumerate(&event.paths).await;
        let batch = DropBatch {
            entries,
            position: event.position,
        };

        let observers = self.observers.lock().unwrap().clone();
        debug!(
            "Delivering {} dropped entries to {} observers",
            batch.entries.len(),
            observers.len()
        );
        for observer in observers {
            observer(&batch);
        }

        batch
    }
}
