//! Catalog Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction. Every kind is recoverable: the menu reports it and
//! carries on with whatever is held in memory.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A catalog error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, Error>;

/// A required field of a [`Book`](crate::Book).
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    #[display("title")]
    Title,
    #[display("author")]
    Author,
}

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required field was blank after trimming. Ask the user again.
    #[display("{_0} must not be blank")]
    Validation(#[error(not(source))] Field),
    /// A book with the same title and author (ignoring case) is already in
    /// the catalog.
    #[display("《{title}》 by {author} is already in the catalog")]
    Duplicate { title: String, author: String },
    /// No book carries the requested id.
    #[display("no book with id [{_0}]")]
    NotFound(#[error(not(source))] u32),
    /// Reading or decoding the catalog file failed. The storage or serde
    /// error is attached as a child in the error tree.
    #[display("could not load catalog file {}", _0.display())]
    Load(#[error(not(source))] PathBuf),
    /// Encoding, writing or setting aside the catalog file failed. The
    /// storage or serde error is attached as a child in the error tree.
    #[display("could not write catalog file {}", _0.display())]
    Persistence(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Load(_) | Self::Persistence(_))
    }
}
