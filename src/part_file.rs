//! Atomic local file replacement
//!
//! Downloads are written to a hidden `.part` file in the destination's
//! directory and renamed over the destination once complete. The partial
//! file is removed if the writer is dropped before [`PartFile::persist`].

use crate::s3::error::StoreError;
use std::path::{Path, PathBuf};
use tempfile::TempPath;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

pub(crate) struct PartFile {
    file: File,
    path: TempPath,
    destination: PathBuf,
    written: u64,
}

impl PartFile {
    /// Create an empty part file next to `destination`
    pub(crate) async fn create(destination: &Path) -> Result<Self, StoreError> {
        let dir = match destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let prefix = format!(
            ".{}.",
            destination
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "download".to_string())
        );

        let named = tokio::task::spawn_blocking(move || {
            tempfile::Builder::new()
                .prefix(&prefix)
                .suffix(".part")
                .tempfile_in(dir)
        })
        .await
        .map_err(|e| StoreError::io(destination, std::io::Error::other(e)))?
        .map_err(|e| StoreError::io(destination, e))?;

        let (file, path) = named.into_parts();
        tracing::trace!("Writing {:?} via {:?}", destination, path);

        Ok(Self {
            file: File::from_std(file),
            path,
            destination: destination.to_path_buf(),
            written: 0,
        })
    }

    pub(crate) async fn write_all(&mut self, chunk: &[u8]) -> Result<(), StoreError> {
        self.file
            .write_all(chunk)
            .await
            .map_err(|e| StoreError::io(&self.path, e))?;
        self.written += chunk.len() as u64;
        Ok(())
    }

    /// Flush, fsync and rename over the destination. Returns bytes written.
    pub(crate) async fn persist(self) -> Result<u64, StoreError> {
        let PartFile {
            mut file,
            path,
            destination,
            written,
        } = self;

        file.flush().await.map_err(|e| StoreError::io(&path, e))?;
        file.sync_all().await.map_err(|e| StoreError::io(&path, e))?;
        drop(file);

        let target = destination.clone();
        tokio::task::spawn_blocking(move || path.persist(&target))
            .await
            .map_err(|e| StoreError::io(&destination, std::io::Error::other(e)))?
            .map_err(|e| StoreError::io(&destination, e.error))?;

        Ok(written)
    }
}
