//! Personal book catalog.
//!
//! The catalog is a JSON file holding an array of [`Book`] records. The
//! [`CatalogStore`] turns that file into records and back, and the
//! [`Manager`] owns the records in memory and enforces the catalog's rules:
//!
//! - a book is identified by its `id` for lookup and removal,
//! - two books with the same title and author (ignoring case) cannot both be
//!   in the catalog,
//! - ids are repaired into a contiguous `1..=N` sequence every time the file
//!   is opened, because the file is meant to be hand-editable.
//!
//! # Example
//!
//! ```
//! use bookshelf_catalog::{CatalogStore, Manager};
//! use bookshelf_storage::backend::LocalBackend;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let dir = tempfile::tempdir()?;
//! let store = CatalogStore::new(Arc::new(LocalBackend::new("local", dir.path()).unwrap()));
//! let (mut manager, _report) = Manager::initialize(store, "books.json");
//!
//! manager.add("Dune", "Frank Herbert").unwrap();
//! manager.add("1984", "George Orwell").unwrap();
//! assert_eq!(manager.search("herb").len(), 1);
//! # Ok(())
//! # }
//! ```

mod book;
pub mod error;
mod manager;
mod store;

pub use crate::book::Book;
pub use crate::manager::{Manager, Report};
pub use crate::store::{CatalogStore, Loaded, QUARANTINE_SUFFIX};
