//! Object store data types

use crate::s3::error::StoreError;
use std::path::{Path, PathBuf};

/// Derive the remote key for a local file: its final path segment
///
/// `/users/me/images/some.png` becomes `some.png`. Paths with no file name
/// (`/`, `..`, empty) or a non UTF-8 name are rejected.
pub fn object_key_for(local_path: &Path) -> Result<String, StoreError> {
    local_path
        .file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .ok_or_else(|| StoreError::InvalidKey {
            path: local_path.to_path_buf(),
        })
}

/// Result of a successful upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedObject {
    pub key: String,
    pub size: u64,
    pub e_tag: Option<String>,
}

/// Result of a successful download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadedObject {
    pub key: String,
    pub path: PathBuf,
    pub size: u64,
}

/// Result of a delete; also returned when the key was already absent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletedObject {
    pub key: String,
}

/// Human-readable byte count
pub fn size_string(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;
    const TB: u64 = GB * 1024;

    if size >= TB {
        format!("{:.2} TB", size as f64 / TB as f64)
    } else if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} B", size)
    }
}
