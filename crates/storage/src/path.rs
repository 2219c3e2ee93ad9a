//! Relative path validation.
//!
//! Every path handed to a backend is relative to that backend's root. The
//! catalog file name comes from user configuration, so it is checked here
//! before it ever reaches the filesystem.

use std::path::{Component, Path, PathBuf};

use crate::error::{ErrorKind, Result};

/// Normalizes a backend-relative path and rejects anything that would leave
/// the backend root.
///
/// `.` segments, repeated separators and trailing slashes are dropped, and
/// `..` segments are resolved lexically. Returns
/// [`InvalidPath`](crate::error::ErrorKind::InvalidPath) for paths that
/// climb above the root, contain null bytes, carry a Windows prefix or
/// normalize to nothing.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use bookshelf_storage::validate_path;
///
/// assert_eq!(validate_path("books.json").unwrap(), Path::new("books.json"));
/// assert_eq!(validate_path("./shelves//home/books.json").unwrap(), Path::new("shelves/home/books.json"));
/// assert_eq!(validate_path("old/../books.json").unwrap(), Path::new("books.json"));
/// assert!(validate_path("../books.json").is_err());
/// assert!(validate_path("").is_err());
/// ```
pub fn validate(path: impl AsRef<Path>) -> Result<PathBuf> {
    let original = path.as_ref();
    let mut components = Vec::new();
    for component in original.components() {
        match component {
            Component::Normal(segment) => {
                // Null bytes survive Path::components() on Unix but truncate
                // the path once it reaches a syscall.
                if segment.as_encoded_bytes().contains(&0) {
                    exn::bail!(ErrorKind::InvalidPath(original.to_path_buf()));
                }
                components.push(segment);
            },
            Component::CurDir | Component::RootDir => {},
            Component::Prefix(_) => exn::bail!(ErrorKind::InvalidPath(original.to_path_buf())),
            Component::ParentDir => {
                if components.pop().is_none() {
                    exn::bail!(ErrorKind::InvalidPath(original.to_path_buf()));
                }
            },
        }
    }
    if components.is_empty() {
        exn::bail!(ErrorKind::InvalidPath(original.to_path_buf()));
    }
    Ok(components.into_iter().collect())
}
