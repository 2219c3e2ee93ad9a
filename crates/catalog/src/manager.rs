//! The in-memory catalog and its rules.
//!
//! [`Manager`] exclusively owns the book collection for the lifetime of a
//! session. Every successful mutation is followed by a full save through the
//! [`CatalogStore`]; a failed save is reported but the mutation is kept, so
//! memory can run ahead of disk until the next successful save.

use crate::Book;
use crate::error::{Error, ErrorKind, Field, Result};
use crate::store::{CatalogStore, Loaded};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// What [`Manager::initialize`] found and repaired in the catalog file.
#[derive(Debug, Default)]
pub struct Report {
    /// Records decoded from the file.
    pub loaded: usize,
    /// Records dropped because the title or author was blank.
    pub dropped_blank: usize,
    /// Records dropped because an earlier record already used their id.
    pub dropped_duplicate_ids: usize,
    /// Whether any surviving record was given a new id.
    pub renumbered: bool,
    /// Why the file could not be loaded, if it could not.
    pub load_problem: Option<Error>,
    /// Where an undecodable file was moved to before being replaced.
    pub quarantined: Option<PathBuf>,
    /// Failure of the save that follows cleanup.
    pub save_problem: Option<Error>,
}
impl Report {
    /// Whether the file on disk differed from the cleaned collection.
    pub fn repaired(&self) -> bool {
        self.dropped_blank > 0 || self.dropped_duplicate_ids > 0 || self.renumbered
    }
}

/// Owns the book collection and enforces its invariants.
///
/// - No two books are the same work (see [`Book::is_same_work`]).
/// - Ids are unique. They are contiguous from 1 straight after
///   [`initialize`](Self::initialize), but removal leaves gaps: ids are never
///   renumbered mid-session.
pub struct Manager {
    store: CatalogStore,
    path: PathBuf,
    books: Vec<Book>,
    dirty: bool,
    /// The file on disk could not be loaded and has not been set aside yet.
    keep_existing: bool,
}

impl Manager {
    /// Load the catalog at `path`, repair it and write the repaired copy back.
    ///
    /// Repair drops records with a blank title or author, keeps only the
    /// first record for each assigned id, then renumbers the survivors
    /// `1..=N` in order of their previous id. A file that cannot be read or
    /// decoded is first moved aside to `<file>.corrupt`; if that fails it is
    /// left alone and nothing is written until a later [`save`](Self::save)
    /// manages to move it. Nothing here is fatal: every problem is
    /// recorded in the returned [`Report`] and the manager starts with
    /// whatever could be recovered.
    #[instrument(skip_all, fields(backend = store.backend_name(), path))]
    pub fn initialize(store: CatalogStore, path: impl Into<PathBuf>) -> (Self, Report) {
        let path = path.into();
        tracing::Span::current().record("path", tracing::field::display(path.display()));
        let mut report = Report::default();

        let books = match store.load(&path) {
            Loaded::Missing => Vec::new(),
            Loaded::Books(books) => books,
            Loaded::Unreadable(err) | Loaded::Corrupt(err) => {
                report.load_problem = Some(err);
                Vec::new()
            },
        };
        report.loaded = books.len();

        let books = clean_up(books, &mut report);
        if report.repaired() {
            tracing::warn!(
                dropped_blank = report.dropped_blank,
                dropped_duplicate_ids = report.dropped_duplicate_ids,
                renumbered = report.renumbered,
                "Catalog file repaired"
            );
        }

        let mut manager = Self { store, path, books, dirty: true, keep_existing: false };
        if report.load_problem.is_some() {
            match manager.store.quarantine(&manager.path) {
                Ok(target) => report.quarantined = Some(target),
                Err(err) => {
                    tracing::warn!(error = %err, "Catalog file could not be set aside and will not be overwritten");
                    manager.keep_existing = true;
                    report.save_problem = Some(err);
                    return (manager, report);
                },
            }
        }
        if let Err(err) = manager.save() {
            tracing::warn!(error = %err, "Cleaned catalog could not be saved");
            report.save_problem = Some(err);
        }
        (manager, report)
    }

    /// Add a new book with the next available id.
    ///
    /// Title and author are trimmed before validation and storage. Returns
    /// [`ErrorKind::Validation`] or [`ErrorKind::Duplicate`] without touching
    /// the collection. Returns [`ErrorKind::Persistence`] if the book was
    /// added but could not be saved.
    pub fn add(&mut self, title: &str, author: &str) -> Result<Book> {
        let (title, author) = (title.trim(), author.trim());
        if title.is_empty() {
            exn::bail!(ErrorKind::Validation(Field::Title));
        }
        if author.is_empty() {
            exn::bail!(ErrorKind::Validation(Field::Author));
        }
        if self.books.iter().any(|book| book.is_same_work(title, author)) {
            exn::bail!(ErrorKind::Duplicate { title: title.to_string(), author: author.to_string() });
        }

        let book = Book::new(self.next_id(), title, author);
        self.books.push(book.clone());
        self.dirty = true;
        tracing::info!(id = book.id, title = %book.title, author = %book.author, "Book added");
        self.save()?;
        Ok(book)
    }

    /// Look a book up by id, e.g. to show it before asking for confirmation.
    pub fn find(&self, id: u32) -> Option<&Book> {
        self.books.iter().find(|book| book.has_id(id))
    }

    /// Remove the book with `id`. Confirmation is the caller's job.
    ///
    /// Returns [`ErrorKind::NotFound`] without touching the collection, or
    /// [`ErrorKind::Persistence`] if the book was removed but the change could
    /// not be saved. Remaining ids are left as they are.
    pub fn remove(&mut self, id: u32) -> Result<Book> {
        let Some(position) = self.books.iter().position(|book| book.has_id(id)) else {
            exn::bail!(ErrorKind::NotFound(id));
        };
        let book = self.books.remove(position);
        self.dirty = true;
        tracing::info!(id = book.id, title = %book.title, "Book removed");
        self.save()?;
        Ok(book)
    }

    /// Every book, in insertion order.
    pub fn list(&self) -> &[Book] {
        &self.books
    }

    /// Books whose title or author contains `keyword`, ignoring case.
    ///
    /// Callers are expected to reject blank keywords themselves; an empty
    /// keyword matches everything.
    pub fn search(&self, keyword: &str) -> Vec<&Book> {
        self.books.iter().filter(|book| book.matches(keyword)).collect()
    }

    /// Write the whole collection to disk. Clears [`is_dirty`](Self::is_dirty)
    /// on success.
    ///
    /// A catalog file that could not be loaded is never overwritten: it is
    /// set aside first, and the save fails if that is still impossible.
    pub fn save(&mut self) -> Result<()> {
        if self.keep_existing {
            self.store.quarantine(&self.path)?;
            self.keep_existing = false;
        }
        self.store.save(&self.path, &self.books)?;
        self.dirty = false;
        Ok(())
    }

    /// Whether the collection holds changes that have not been saved.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    fn next_id(&self) -> u32 {
        self.books.iter().map(|book| book.id).max().map_or(1, |max| max.saturating_add(1))
    }
}

fn clean_up(books: Vec<Book>, report: &mut Report) -> Vec<Book> {
    let before = books.len();
    let books: Vec<Book> = books.into_iter().filter(|book| !book.is_blank()).collect();
    report.dropped_blank = before - books.len();

    let before = books.len();
    let mut seen = HashSet::new();
    // Id 0 means unassigned, so those records never collide.
    let mut books: Vec<Book> = books.into_iter().filter(|book| book.id == 0 || seen.insert(book.id)).collect();
    report.dropped_duplicate_ids = before - books.len();

    // Stable sort: unassigned records keep their file order ahead of the rest.
    books.sort_by_key(|book| book.id);
    for (book, id) in books.iter_mut().zip(1..) {
        if book.id != id {
            report.renumbered = true;
            book.id = id;
        }
    }
    books
}
