use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Metadata for one filesystem node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    pub name: String,
    pub full_path: PathBuf,
    pub size: u64,
    pub is_directory: bool,
    pub is_file: bool,
    pub last_modified: Option<DateTime<Utc>>,
    /// Lowercased extension with its leading dot, empty for directories
    pub ext: String,
    pub parent_dir: PathBuf,
}

impl FileInfo {
    pub fn from_metadata(path: &Path, metadata: &std::fs::Metadata) -> Self {
        let is_directory = metadata.is_dir();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());

        let ext = if is_directory {
            String::new()
        } else {
            path.extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| format!(".{}", ext.to_lowercase()))
                .unwrap_or_default()
        };

        FileInfo {
            name,
            full_path: path.to_path_buf(),
            size: metadata.len(),
            is_directory,
            is_file: !is_directory,
            last_modified: metadata.modified().ok().map(DateTime::<Utc>::from),
            ext,
            parent_dir: path.parent().map(Path::to_path_buf).unwrap_or_default(),
        }
    }
}

/// A dropped node. Directories carry their immediate children (one level only).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroppedEntry {
    #[serde(flatten)]
    pub info: FileInfo,
    #[serde(rename = "files", default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<DroppedEntry>>,
}

impl DroppedEntry {
    pub fn file(info: FileInfo) -> Self {
        Self {
            info,
            children: None,
        }
    }

    pub fn directory(info: FileInfo, children: Vec<DroppedEntry>) -> Self {
        Self {
            info,
            children: Some(children),
        }
    }

    pub fn name(&self) -> &str {
        &self.info.name
    }

    pub fn is_directory(&self) -> bool {
        self.info.is_directory
    }

    /// Immediate children; empty for files and for directories whose listing failed
    pub fn children(&self) -> &[DroppedEntry] {
        self.children.as_deref().unwrap_or(&[])
    }
}
