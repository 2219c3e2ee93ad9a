//! Local filesystem storage backend.
//!
//! Files live under a configured root directory. Writes are staged in a
//! temporary file next to the destination and renamed into place, so a crash
//! mid-write leaves the previous file untouched.

use crate::error::ErrorKind;
use crate::{StorageBackend, error::Result, path::validate as validate_path};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Local filesystem storage backend.
///
/// # Examples
///
/// ```no_run
/// use bookshelf_storage::backend::LocalBackend;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = LocalBackend::new("local", "/home/reader/.local/share/bookshelf")?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct LocalBackend {
    name: String,
    /// Directory holding the catalog file
    root: PathBuf,
}
impl LocalBackend {
    /// Create a new local filesystem backend, creating the root directory if
    /// it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidPath`](ErrorKind::InvalidPath) if `root` is relative
    /// or exists but is not a directory.
    pub fn new(name: impl Into<String>, root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_absolute() {
            exn::bail!(ErrorKind::InvalidPath(root));
        }
        if root.exists() {
            if !root.is_dir() {
                exn::bail!(ErrorKind::InvalidPath(root));
            }
        } else {
            fs::create_dir_all(&root).map_err(|e| Self::map_io_error(e, &root))?;
        }
        Ok(Self { name: name.into(), root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Validates the relative path and joins it onto the root directory.
    fn absolute_path(&self, path: impl AsRef<Path>) -> Result<PathBuf> {
        let validated = validate_path(path.as_ref())?;
        Ok(self.root.join(validated))
    }

    fn map_io_error(e: std::io::Error, path: &Path) -> ErrorKind {
        match e.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied(path.to_path_buf()),
            _ => ErrorKind::Io(e),
        }
    }
}

impl StorageBackend for LocalBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn exists(&self, path: &Path) -> Result<bool> {
        let abs_path = self.absolute_path(path)?;
        Ok(abs_path.try_exists().map_err(|e| Self::map_io_error(e, path))?)
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        let abs_path = self.absolute_path(path)?;
        Ok(fs::read(&abs_path).map_err(|e| Self::map_io_error(e, path))?)
    }

    fn write(&self, path: &Path, data: &[u8]) -> Result<()> {
        let abs_path = self.absolute_path(path)?;
        let parent = abs_path.parent().unwrap_or(&self.root);
        fs::create_dir_all(parent).map_err(|e| Self::map_io_error(e, path))?;
        // The staging file must share a filesystem with the destination for
        // the final rename to be atomic.
        let mut staged = NamedTempFile::new_in(parent).map_err(|e| Self::map_io_error(e, path))?;
        staged.write_all(data).map_err(ErrorKind::Io)?;
        staged.as_file().sync_all().map_err(ErrorKind::Io)?;
        staged.persist(&abs_path).map_err(|e| Self::map_io_error(e.error, path))?;
        tracing::trace!(backend = %self.name, path = %path.display(), bytes = data.len(), "File written");
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        let from_path = self.absolute_path(from)?;
        let to_path = self.absolute_path(to)?;
        if let Some(parent) = to_path.parent() {
            fs::create_dir_all(parent).map_err(|e| Self::map_io_error(e, to))?;
        }
        Ok(fs::rename(&from_path, &to_path).map_err(|e| Self::map_io_error(e, from))?)
    }
}
