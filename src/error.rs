//! Application Error Types
//!
//! Top-level categories for the `bookshelf` binary. Configuration and storage
//! errors keep the crate error as a child in the error tree; catalog errors
//! are flattened into their message because that is what the user needs.

use derive_more::{Display, Error};

/// An application error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for application operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[display("invalid configuration")]
    Config,
    #[display("could not open the data directory")]
    Storage,
    /// Carries the message of the catalog error it replaces.
    #[display("{_0}")]
    Catalog(#[error(not(source))] String),
    #[display("could not talk to the terminal")]
    Console,
}
