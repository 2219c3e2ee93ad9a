//! JSON persistence for the catalog.
//!
//! The store is a thin codec over a [`StorageBackend`](bookshelf_storage::StorageBackend):
//! it keeps no state between calls and knows nothing about ids or duplicates.

use crate::Book;
use crate::error::{Error, ErrorKind, Result};
use bookshelf_storage::BackendHandle;
use exn::ResultExt;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Suffix appended to the file name of a catalog that could not be decoded.
pub const QUARANTINE_SUFFIX: &str = ".corrupt";

/// Outcome of [`CatalogStore::load`].
///
/// Loading never fails outright. A catalog that cannot be read or decoded is
/// reported to the caller, who decides what to do with the file.
#[derive(Debug)]
pub enum Loaded {
    /// No catalog file exists yet.
    Missing,
    /// The catalog file was decoded.
    Books(Vec<Book>),
    /// The catalog file exists but could not be read.
    Unreadable(Error),
    /// The catalog file was read but is not a valid catalog.
    Corrupt(Error),
}

/// Reads and writes the catalog as a JSON array of books.
#[derive(Clone)]
pub struct CatalogStore {
    backend: BackendHandle,
}
impl CatalogStore {
    pub fn new(backend: BackendHandle) -> Self {
        Self { backend }
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Load every book from `path`.
    ///
    /// A missing file is an empty catalog, not an error. So is a file that is
    /// empty or contains only `null`.
    #[instrument(skip(self), fields(backend = self.backend.name()))]
    pub fn load(&self, path: &Path) -> Loaded {
        let data = match self.read(path) {
            Ok(None) => return Loaded::Missing,
            Ok(Some(data)) => data,
            Err(err) => {
                tracing::warn!(error = %err, "Catalog file could not be read");
                return Loaded::Unreadable(err);
            },
        };
        match decode(&data).or_raise(|| ErrorKind::Load(path.to_path_buf())) {
            Ok(books) => {
                tracing::debug!(books = books.len(), "Catalog loaded");
                Loaded::Books(books)
            },
            Err(err) => {
                tracing::warn!(error = %err, "Catalog file is not valid JSON");
                Loaded::Corrupt(err)
            },
        }
    }

    /// Overwrite `path` with the full collection.
    #[instrument(skip_all, fields(backend = self.backend.name(), path = %path.display(), books = books.len()))]
    pub fn save(&self, path: &Path, books: &[Book]) -> Result<()> {
        let data = encode(books).or_raise(|| ErrorKind::Persistence(path.to_path_buf()))?;
        self.backend.write(path, &data).or_raise(|| ErrorKind::Persistence(path.to_path_buf()))?;
        tracing::info!(bytes = data.len(), "Catalog saved");
        Ok(())
    }

    /// Move an undecodable catalog out of the way so that the next save does
    /// not destroy it. Returns the path it was moved to.
    #[instrument(skip(self), fields(backend = self.backend.name()))]
    pub fn quarantine(&self, path: &Path) -> Result<PathBuf> {
        let mut target = path.as_os_str().to_owned();
        target.push(QUARANTINE_SUFFIX);
        let target = PathBuf::from(target);
        self.backend.rename(path, &target).or_raise(|| ErrorKind::Persistence(path.to_path_buf()))?;
        tracing::info!(to = %target.display(), "Corrupt catalog file set aside");
        Ok(target)
    }

    fn read(&self, path: &Path) -> Result<Option<Vec<u8>>> {
        let load = || ErrorKind::Load(path.to_path_buf());
        if !self.backend.exists(path).or_raise(load)? {
            return Ok(None);
        }
        Ok(Some(self.backend.read(path).or_raise(load)?))
    }
}

fn decode(data: &[u8]) -> serde_json::Result<Vec<Book>> {
    if data.trim_ascii().is_empty() {
        return Ok(Vec::new());
    }
    let books: Option<Vec<Book>> = serde_json::from_slice(data)?;
    Ok(books.unwrap_or_default())
}

fn encode(books: &[Book]) -> serde_json::Result<Vec<u8>> {
    let mut data = serde_json::to_vec_pretty(books)?;
    data.push(b'\n');
    Ok(data)
}
