use super::entry::FileInfo;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

#[derive(Error, Debug)]
pub enum DropError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Drop host wire-up failed: {0}")]
    WireUp(String),
}

impl DropError {
    pub fn from_io(path: &Path, source: std::io::Error) -> Self {
        match source.kind() {
            ErrorKind::NotFound => DropError::NotFound(path.to_path_buf()),
            ErrorKind::PermissionDenied => DropError::PermissionDenied(path.to_path_buf()),
            _ => DropError::Io {
                path: path.to_path_buf(),
                source,
            },
        }
    }
}

/// Result of a directory listing. Failure is a value, not an error.
#[derive(Debug, Clone, PartialEq)]
pub enum DirListing {
    Ok(Vec<PathBuf>),
    Failed(String),
}

/// Filesystem queries used by the drop enumerator (allows mocking for tests)
#[async_trait::async_trait]
pub trait FileSystemProbe: Send + Sync {
    async fn file_info(&self, path: &Path) -> Result<FileInfo, DropError>;
    /// Immediate children of a directory, ordered by name
    async fn read_dir(&self, path: &Path) -> DirListing;
}

/// Probe backed by the local filesystem
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

#[async_trait::async_trait]
impl FileSystemProbe for LocalFileSystem {
    async fn file_info(&self, path: &Path) -> Result<FileInfo, DropError> {
        let metadata = fs::metadata(path)
            .await
            .map_err(|e| DropError::from_io(path, e))?;
        Ok(FileInfo::from_metadata(path, &metadata))
    }

    async fn read_dir(&self, path: &Path) -> DirListing {
        let mut read_dir = match fs::read_dir(path).await {
            Ok(read_dir) => read_dir,
            Err(e) => return DirListing::Failed(e.to_string()),
        };

        let mut children = Vec::new();
        loop {
            match read_dir.next_entry().await {
                Ok(Some(entry)) => children.push(entry.path()),
                Ok(None) => break,
                Err(e) => return DirListing::Failed(e.to_string()),
            }
        }

        children.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
        DirListing::Ok(children)
    }
}
