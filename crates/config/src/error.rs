//! Configuration Error Types

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A configuration error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for configuration loading.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// One of the configuration sources could not be read or did not match
    /// the expected shape. The figment error is attached as a child.
    #[display("could not load configuration")]
    Load,
    /// An explicitly requested configuration file does not exist.
    #[display("configuration file not found: {}", _0.display())]
    MissingFile(#[error(not(source))] PathBuf),
    /// The configuration file extension is not one of toml, yaml, yml or json.
    #[display("unsupported configuration format: {}", _0.display())]
    UnsupportedFormat(#[error(not(source))] PathBuf),
    /// A configured path is unusable.
    #[display("invalid path in configuration: {}", _0.display())]
    InvalidPath(#[error(not(source))] PathBuf),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
