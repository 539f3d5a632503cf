//! Builder API for declaring and populating fixture directories.
//!
//! The builder pattern provides a fluent interface for declaring sources,
//! options and configuration in one expression. This is often more
//! convenient than assembling [`DeclarationGroup`]s and a [`Config`] by hand.
//!
//! # Examples
//!
//! ## Basic Usage
//!
//! ```no_run
//! use datafiles::DatafilesBuilder;
//!
//! let datafiles = DatafilesBuilder::new()
//!     .path("tests/data/img1.jpg")
//!     .path("tests/data/img2.jpg")
//!     .build()?;
//! assert_eq!(datafiles.names()?.len(), 2);
//! # Ok::<(), datafiles::Error>(())
//! ```
//!
//! ## Several Groups
//!
//! ```no_run
//! use datafiles::{DatafilesBuilder, DeclarationGroup, OnDuplicate};
//!
//! let all_images = DeclarationGroup::new().paths(["img1.jpg", "img2.jpg"]);
//!
//! let datafiles = DatafilesBuilder::new()
//!     .root("tests/data")
//!     .group(all_images)
//!     .group(DeclarationGroup::new().path("dir1").on_duplicate(OnDuplicate::Ignore))
//!     .build()?;
//! # Ok::<(), datafiles::Error>(())
//! ```

use crate::config::Config;
use crate::datafiles::Datafiles;
use crate::declaration::{Declaration, DeclarationGroup};
use crate::error::Result;
use crate::options::{OnDuplicate, OptionValue};
use crate::populate::{PopulateStats, Populator};
use std::path::{Path, PathBuf};

/// A builder for declaring and populating a fixture directory.
///
/// Groups are attached in call order. [`path`](Self::path),
/// [`keep_top_dir`](Self::keep_top_dir) and the other declaration methods
/// edit the most recently attached group, starting a first group if none
/// exists yet.
#[derive(Debug, Clone, Default)]
pub struct DatafilesBuilder {
    groups: Vec<DeclarationGroup>,
    config: Config,
    parent: Option<PathBuf>,
}

impl DatafilesBuilder {
    /// Create a builder with no groups and default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder whose configuration comes from the environment.
    ///
    /// See [`Config::from_env`].
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            config: Config::from_env(),
            ..Self::default()
        }
    }

    fn edit(mut self, f: impl FnOnce(DeclarationGroup) -> DeclarationGroup) -> Self {
        let current = self.groups.pop().unwrap_or_default();
        self.groups.push(f(current));
        self
    }

    /// Attach a declaration group after the existing ones.
    #[must_use]
    pub fn group(mut self, group: DeclarationGroup) -> Self {
        self.groups.push(group);
        self
    }

    /// Add a source path to the current group.
    #[must_use]
    pub fn path(self, path: impl AsRef<Path>) -> Self {
        self.edit(|g| g.path(path))
    }

    /// Add several source paths to the current group.
    #[must_use]
    pub fn paths<I, P>(self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.edit(|g| g.paths(paths))
    }

    /// Copy directory sources as named subdirectories.
    #[must_use]
    pub fn keep_top_dir(self, keep: bool) -> Self {
        self.edit(|g| g.keep_top_dir(keep))
    }

    /// Set the duplicate policy on the current group.
    #[must_use]
    pub fn on_duplicate(self, on_duplicate: OnDuplicate) -> Self {
        self.edit(|g| g.on_duplicate(on_duplicate))
    }

    /// Keep the first entry for each top-level name.
    #[must_use]
    pub fn ignore_duplicates(self) -> Self {
        self.on_duplicate(OnDuplicate::Ignore)
    }

    /// Keep the last entry for each top-level name.
    #[must_use]
    pub fn overwrite_duplicates(self) -> Self {
        self.on_duplicate(OnDuplicate::Overwrite)
    }

    /// Set an option by name with an untyped value, checked at build time.
    #[must_use]
    pub fn option(self, name: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.edit(|g| g.option(name, value))
    }

    /// Resolve relative source paths against `root`.
    #[must_use]
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config = self.config.with_root(root);
        self
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Sync copied files to disk.
    #[must_use]
    pub fn fsync(mut self) -> Self {
        self.config = self.config.with_fsync();
        self
    }

    /// Disable timestamp preservation.
    #[must_use]
    pub fn no_timestamps(mut self) -> Self {
        self.config = self.config.without_timestamps();
        self
    }

    /// Set a warning handler for non-fatal issues.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use datafiles::DatafilesBuilder;
    ///
    /// let datafiles = DatafilesBuilder::new()
    ///     .path("tests/data/links")
    ///     .on_warning(|msg| eprintln!("Warning: {}", msg))
    ///     .build()?;
    /// # Ok::<(), datafiles::Error>(())
    /// ```
    #[must_use]
    pub fn on_warning(mut self, handler: fn(&str)) -> Self {
        self.config = self.config.with_warn_handler(handler);
        self
    }

    /// Receive a message for every entry copied, skipped or replaced.
    #[must_use]
    pub fn verbose(mut self, handler: fn(&str)) -> Self {
        self.config = self.config.with_verbose_handler(handler);
        self
    }

    /// Create the fixture directory inside `parent` instead of the system
    /// temp location.
    #[must_use]
    pub fn in_dir(mut self, parent: impl Into<PathBuf>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Get a reference to the current configuration.
    #[must_use]
    pub fn config_ref(&self) -> &Config {
        &self.config
    }

    /// Merge the attached groups.
    #[must_use]
    pub fn declaration(&self) -> Declaration {
        Declaration::merge(self.groups.iter().cloned())
    }

    /// Create a fresh fixture directory and populate it.
    ///
    /// # Errors
    ///
    /// See [`Populator::run`]. A failed population removes the directory.
    pub fn build(self) -> Result<Datafiles> {
        let mut datafiles = match &self.parent {
            Some(parent) => Datafiles::in_dir(parent)?,
            None => Datafiles::new()?,
        };
        datafiles.fill(Declaration::merge(self.groups), self.config)?;
        Ok(datafiles)
    }

    /// Populate an existing, empty directory that the caller owns.
    ///
    /// # Errors
    ///
    /// See [`Populator::run`].
    pub fn populate_into(self, dest: impl AsRef<Path>) -> Result<PopulateStats> {
        Populator::new(Declaration::merge(self.groups), self.config).run(dest.as_ref())
    }
}

impl Datafiles {
    /// Start a [`DatafilesBuilder`].
    #[must_use]
    pub fn builder() -> DatafilesBuilder {
        DatafilesBuilder::new()
    }
}
