//! In-memory storage backend for testing.

use crate::StorageBackend;
use crate::error::{ErrorKind, Result};
use crate::path::validate as validate_path;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// In-memory storage backend for testing.
///
/// Files are stored in a `HashMap` behind a [`RwLock`], so all trait methods
/// operate on `&self`. Writes can be made to fail on demand with
/// [`fail_writes`](Self::fail_writes), which is how callers exercise their
/// "saved in memory but not on disk" paths. Reads can be made to fail with
/// [`fail_reads`](Self::fail_reads) while `exists` keeps answering.
///
/// # Examples
///
/// ```
/// use bookshelf_storage::backend::{MockBackend, StorageBackend};
/// use std::path::Path;
///
/// let backend = MockBackend::with_files([("books.json", "[]")]);
/// assert!(backend.exists(Path::new("books.json")).unwrap());
///
/// backend.fail_writes(true);
/// assert!(backend.write(Path::new("books.json"), b"[]").is_err());
/// ```
pub struct MockBackend {
    name: String,
    storage: RwLock<HashMap<PathBuf, Vec<u8>>>,
    failing: AtomicBool,
    unreadable: AtomicBool,
    writes: AtomicUsize,
}

impl MockBackend {
    /// Create a mock backend pre-populated with files.
    ///
    /// Panics if any path fails validation (e.g. path traversal). If test
    /// setup is wrong, then test should not pass.
    pub fn with_files(files: impl IntoIterator<Item = (impl Into<PathBuf>, impl Into<Vec<u8>>)>) -> Self {
        let mut map = HashMap::new();
        for (path, data) in files {
            let path = path.into();
            let Ok(validated) = validate_path(&path) else {
                // The panic here is DELIBERATE. MockBackend is intended to be
                // used in tests; panics are expected.
                panic!("MockBackend::with_files: invalid path {}", path.display());
            };
            map.insert(validated, data.into());
        }
        Self {
            name: "mock".to_string(),
            storage: RwLock::new(map),
            failing: AtomicBool::new(false),
            unreadable: AtomicBool::new(false),
            writes: AtomicUsize::new(0),
        }
    }

    /// Make every subsequent write and rename fail (or succeed again).
    pub fn fail_writes(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Make every subsequent read fail (or succeed again). Writes and renames
    /// are unaffected.
    pub fn fail_reads(&self, failing: bool) {
        self.unreadable.store(failing, Ordering::SeqCst);
    }

    /// Number of successful writes performed so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Snapshot of a file's contents as UTF-8, for assertions.
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        let path = validate_path(path.as_ref()).ok()?;
        self.files().get(&path).map(|data| String::from_utf8_lossy(data).into_owned())
    }

    fn files(&self) -> RwLockReadGuard<'_, HashMap<PathBuf, Vec<u8>>> {
        self.storage.read().expect("mock storage lock poisoned")
    }

    fn files_mut(&self) -> RwLockWriteGuard<'_, HashMap<PathBuf, Vec<u8>>> {
        self.storage.write().expect("mock storage lock poisoned")
    }

    fn check_writable(&self, path: &Path) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            exn::bail!(ErrorKind::BackendError(format!("injected write failure for {}", path.display())));
        }
        Ok(())
    }
}
impl Default for MockBackend {
    fn default() -> Self {
        let files: [(&str, &str); 0] = [];
        Self::with_files(files)
    }
}

impl StorageBackend for MockBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn exists(&self, path: &Path) -> Result<bool> {
        let path = validate_path(path)?;
        Ok(self.files().contains_key(&path))
    }

    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        let path = validate_path(path)?;
        if self.unreadable.load(Ordering::SeqCst) {
            exn::bail!(ErrorKind::BackendError(format!("injected read failure for {}", path.display())));
        }
        let data = self.files().get(&path).cloned();
        data.ok_or_else(|| exn::Exn::from(ErrorKind::NotFound(path)))
    }

    fn write(&self, path: &Path, data: &[u8]) -> Result<()> {
        let path = validate_path(path)?;
        self.check_writable(&path)?;
        self.files_mut().insert(path, data.to_vec());
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        let from = validate_path(from)?;
        let to = validate_path(to)?;
        self.check_writable(&from)?;
        let mut guard = self.files_mut();
        let data = guard.remove(&from).ok_or_else(|| exn::Exn::from(ErrorKind::NotFound(from)))?;
        guard.insert(to, data);
        Ok(())
    }
}
