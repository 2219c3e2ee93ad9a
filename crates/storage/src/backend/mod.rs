//! Storage backend trait and implementations.
//!
//! The catalog only ever needs whole-file reads and writes against a single
//! root directory, so the trait is deliberately small and synchronous.

mod local;
#[cfg(feature = "mock")]
mod mock;
mod ro;

pub use self::local::LocalBackend;
#[cfg(feature = "mock")]
pub use self::mock::MockBackend;
pub use self::ro::ReadOnlyBackend;
use crate::error::Result;
use std::path::Path;

/// Unified interface for storage backends.
///
/// # Path Handling
/// All paths are relative to the storage root and must be validated using
/// [`validate_path`](crate::validate_path) before use. Implementations
/// enforce this validation.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use bookshelf_storage::{backend::StorageBackend, error::Result};
///
/// fn size_of_catalog(backend: &dyn StorageBackend) -> Result<usize> {
///     let path = Path::new("books.json");
///     if backend.exists(path)? {
///         Ok(backend.read(path)?.len())
///     } else {
///         Ok(0)
///     }
/// }
/// ```
pub trait StorageBackend: Send + Sync {
    /// Name of the configured backend, used for logging only.
    fn name(&self) -> &str;

    /// Check if a file exists.
    fn exists(&self, path: &Path) -> Result<bool>;

    /// Read file contents.
    ///
    /// Returns [`NotFound`](crate::error::ErrorKind::NotFound) if the file
    /// does not exist.
    fn read(&self, path: &Path) -> Result<Vec<u8>>;

    /// Write file contents, replacing whatever was there before.
    ///
    /// # Notes
    /// - Implementations should create parent directories as needed.
    /// - A reader must observe either the previous contents or the new
    ///   contents, never a partially written file.
    fn write(&self, path: &Path, data: &[u8]) -> Result<()>;

    /// Rename/move a file within the same backend.
    ///
    /// Returns [`NotFound`](crate::error::ErrorKind::NotFound) if the source
    /// file does not exist. If the destination already exists, it will be
    /// overwritten.
    fn rename(&self, from: &Path, to: &Path) -> Result<()>;
}
