//! Declarations: which sources a test wants staged, and how.
//!
//! A test attaches zero or more [`DeclarationGroup`]s. [`Declaration::merge`]
//! folds them in attachment order: source lists concatenate, option
//! overlays are applied on top of each other with later values winning.
//!
//! # Example
//!
//! ```
//! use datafiles::{Declaration, DeclarationGroup, OnDuplicate};
//!
//! let shared = DeclarationGroup::new()
//!     .path("data/img1.jpg")
//!     .path(std::path::PathBuf::from("data/img2.jpg"));
//! let extra = DeclarationGroup::new()
//!     .path("data/dir1")
//!     .on_duplicate(OnDuplicate::Ignore);
//!
//! let declaration = Declaration::merge([shared, extra]);
//! assert_eq!(declaration.sources().len(), 3);
//! ```

use crate::options::{KEEP_TOP_DIR, ON_DUPLICATE, OnDuplicate, OptionValue, Overlay};
use std::path::{Path, PathBuf};

/// A declared source path.
///
/// Accepts anything path-like (`&str`, `String`, `&Path`, `PathBuf`, ...) and
/// stores it in one canonical representation. The path is kept exactly as
/// declared; resolution against a root happens at flatten time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SourcePath(PathBuf);

impl SourcePath {
    /// Normalize a path-like value into a source path.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self(path.as_ref().to_path_buf())
    }

    /// The declared path.
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

impl AsRef<Path> for SourcePath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

macro_rules! source_path_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for SourcePath {
                fn from(path: $ty) -> Self {
                    Self::new(path)
                }
            }
        )*
    };
}

source_path_from!(&str, String, &Path, PathBuf);

/// One attached set of source paths plus an option overlay.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DeclarationGroup {
    sources: Vec<SourcePath>,
    options: Overlay,
}

impl DeclarationGroup {
    /// Create an empty group.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one source path.
    #[must_use]
    pub fn path(mut self, path: impl AsRef<Path>) -> Self {
        self.sources.push(SourcePath::new(path));
        self
    }

    /// Append several source paths, in iteration order.
    #[must_use]
    pub fn paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.sources.extend(paths.into_iter().map(SourcePath::new));
        self
    }

    /// Set `keep_top_dir` for this group.
    #[must_use]
    pub fn keep_top_dir(self, keep: bool) -> Self {
        self.option(KEEP_TOP_DIR, keep)
    }

    /// Set `on_duplicate` for this group.
    #[must_use]
    pub fn on_duplicate(self, on_duplicate: OnDuplicate) -> Self {
        self.option(ON_DUPLICATE, on_duplicate)
    }

    /// Set an option by name with an untyped value.
    ///
    /// The value is only checked when the merged declaration is validated,
    /// so `option("keep_top_dir", "yes")` is accepted here and rejected at
    /// population time.
    #[must_use]
    pub fn option(mut self, name: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.options.set(name, value);
        self
    }

    /// The declared sources, in order.
    #[must_use]
    pub fn sources(&self) -> &[SourcePath] {
        &self.sources
    }

    /// The option overlay of this group alone.
    #[must_use]
    pub fn options(&self) -> &Overlay {
        &self.options
    }
}

/// All groups attached to one test, merged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Declaration {
    sources: Vec<SourcePath>,
    options: Overlay,
    groups: usize,
}

impl Declaration {
    /// Merge groups in attachment order.
    pub fn merge<I>(groups: I) -> Self
    where
        I: IntoIterator<Item = DeclarationGroup>,
    {
        groups
            .into_iter()
            .fold(Self::default(), |mut merged, group| {
                merged.push(group);
                merged
            })
    }

    /// Attach one more group after the existing ones.
    pub fn push(&mut self, group: DeclarationGroup) {
        self.sources.extend(group.sources);
        self.options.extend(&group.options);
        self.groups += 1;
    }

    /// Concatenated sources of every group.
    #[must_use]
    pub fn sources(&self) -> &[SourcePath] {
        &self.sources
    }

    /// Overlay after applying every group's options in order.
    #[must_use]
    pub fn options(&self) -> &Overlay {
        &self.options
    }

    /// Returns `true` if no group was attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups == 0
    }

    /// Number of attached groups.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.groups
    }
}

impl From<DeclarationGroup> for Declaration {
    fn from(group: DeclarationGroup) -> Self {
        Self::merge([group])
    }
}

impl FromIterator<DeclarationGroup> for Declaration {
    fn from_iter<I: IntoIterator<Item = DeclarationGroup>>(iter: I) -> Self {
        Self::merge(iter)
    }
}
