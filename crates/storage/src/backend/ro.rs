//! Read-only storage backend.
//!
//! Wraps another backend and prevents write operations from executing, while
//! still reporting success to the caller.

use std::path::Path;

use crate::{BackendHandle, StorageBackend, error::Result};

/// Read-only storage backend.
///
/// Reads are passed through to the inner backend. Writes and renames are
/// silently dropped, logging an [`info event`](tracing::Event).
#[derive(Clone)]
pub struct ReadOnlyBackend {
    inner: BackendHandle,
}
impl ReadOnlyBackend {
    pub fn new(inner: BackendHandle) -> Self {
        Self { inner }
    }
}

impl StorageBackend for ReadOnlyBackend {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn exists(&self, path: &Path) -> Result<bool> {
        self.inner.exists(path)
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        self.inner.read(path)
    }

    fn write(&self, path: &Path, data: &[u8]) -> Result<()> {
        tracing::info!(path = %path.display(), bytes = data.len(), "Skipping write during read-only mode");
        Ok(())
    }

    fn rename(&self, from: &Path, _to: &Path) -> Result<()> {
        tracing::info!(path = %from.display(), "Skipping rename during read-only mode");
        Ok(())
    }
}
