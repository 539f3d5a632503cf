//! Error types for datafiles.
//!
//! This module provides the [`Error`] enum containing all possible errors
//! that can occur while populating a fixture directory, and the [`Result`]
//! type alias.
//!
//! # Error Categories
//!
//! | Category | Errors |
//! |----------|--------|
//! | Declaration | [`Error::InvalidOption`], [`Error::InvalidSource`] |
//! | Source | [`Error::NotFound`] |
//! | Conflict | [`Error::DuplicateEntry`] |
//! | IO | [`Error::Io`], [`Error::TempFile`], [`Error::Persist`] |
//! | Lifecycle | [`Error::AlreadyRun`] |
//!
//! None of these are retried. Declaration, source and conflict errors are
//! deterministic configuration mistakes; IO errors are passed through with
//! the path attached where one is known.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for datafiles operations.
///
/// This is a type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during fixture population.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// An option in the merged overlay has a value outside its allowed set.
    ///
    /// Raised by validation, before anything touches the filesystem.
    #[error("'{name}' must be {expected} (got {value})")]
    InvalidOption {
        /// Option name as declared
        name: String,
        /// Offending value, rendered for display
        value: String,
        /// Human readable description of the accepted values
        expected: &'static str,
    },

    /// A declared source entry does not exist.
    #[error("Declared source does not exist: {0}")]
    NotFound(PathBuf),

    /// A declared source has no file name to use at the destination top level
    /// (for example `/` or a path ending in `..`).
    #[error("Declared source has no usable file name: {0}")]
    InvalidSource(PathBuf),

    /// A flattened entry collides with an existing destination entry and the
    /// policy is [`OnDuplicate::Exception`](crate::OnDuplicate::Exception).
    ///
    /// Entries copied before the collision stay on disk.
    #[error("'{}' already exists (src {})", target.display(), entry.display())]
    DuplicateEntry {
        /// Destination path that already exists
        target: PathBuf,
        /// Source entry that would have been copied there
        entry: PathBuf,
    },

    /// IO error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create temporary file
    #[error("Failed to create temporary file in {path}: {source}")]
    TempFile {
        /// Directory where temp file creation was attempted
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Failed to persist temporary file
    #[error("Failed to persist temporary file to {path}: {source}")]
    Persist {
        /// Target path
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// A [`Populator`](crate::Populator) was asked to run a second time.
    #[error("Populator has already run (stage: {0})")]
    AlreadyRun(crate::Stage),
}

impl Error {
    /// Build an [`Error::InvalidOption`].
    pub(crate) fn invalid_option(
        name: impl Into<String>,
        value: impl std::fmt::Display,
        expected: &'static str,
    ) -> Self {
        Self::InvalidOption {
            name: name.into(),
            value: value.to_string(),
            expected,
        }
    }
}
