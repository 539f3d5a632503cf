//! Fixture population: validate, flatten, copy.
//!
//! [`copy_all`] is the conflict-aware copier; [`Populator`] drives one
//! population through its stages and records where it stopped.
//!
//! # Example
//!
//! ```no_run
//! use datafiles::{Config, Declaration, DeclarationGroup, OnDuplicate, Populator};
//!
//! let declaration = Declaration::merge([DeclarationGroup::new()
//!     .paths(["tests/data/dir1", "tests/data/dir2"])
//!     .on_duplicate(OnDuplicate::Ignore)]);
//!
//! let dest = tempfile::tempdir()?;
//! let mut populator = Populator::new(declaration, Config::default());
//! let stats = populator.run(dest.path())?;
//! println!("{} entries copied, {} skipped", stats.entries_copied, stats.entries_skipped);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::config::Config;
use crate::copy::{CopyStats, copy_entry, remove_existing};
use crate::declaration::Declaration;
use crate::error::{Error, Result};
use crate::flatten::{FlatEntry, flatten};
use crate::options::{OnDuplicate, Options};
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

/// Statistics from one population.
///
/// Entry counts are per flattened top-level entry; the copy counts include
/// everything written inside copied directories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopulateStats {
    /// Top-level entries copied into a free name
    pub entries_copied: u64,
    /// Top-level entries skipped because the name was taken (`ignore`)
    pub entries_skipped: u64,
    /// Top-level entries that replaced an existing one (`overwrite`)
    pub entries_replaced: u64,
    /// Everything written to disk
    pub copied: CopyStats,
    /// Duration of the population
    pub duration: Duration,
}

/// Copy flattened entries into `dest`, applying `on_duplicate` to top-level
/// name collisions.
///
/// Entries are processed strictly in order. A collision is any existing
/// entry with the same name directly under `dest`, including one copied
/// earlier in the same call. Directories with the same name are never
/// merged: the later one is skipped, replaces the earlier one, or fails.
///
/// # Errors
///
/// - [`Error::DuplicateEntry`] on the first collision under
///   [`OnDuplicate::Exception`]; entries copied before it stay on disk
/// - [`Error::InvalidSource`] if an entry has no file name
/// - any error of the copy primitive
pub fn copy_all(
    entries: &[FlatEntry],
    dest: &Path,
    on_duplicate: OnDuplicate,
    config: &Config,
) -> Result<PopulateStats> {
    let start_time = Instant::now();
    let mut stats = PopulateStats::default();

    for entry in entries {
        let target = dest.join(entry.name()?);

        let exists = match fs::symlink_metadata(&target) {
            Ok(_) => true,
            Err(e) if e.kind() == io::ErrorKind::NotFound => false,
            Err(e) => return Err(e.into()),
        };

        if exists {
            match on_duplicate {
                OnDuplicate::Exception => {
                    return Err(Error::DuplicateEntry {
                        target,
                        entry: entry.path().to_path_buf(),
                    });
                }
                OnDuplicate::Ignore => {
                    config.verbose(&format!(
                        "skipped {} -> {} (already exists)",
                        entry.path().display(),
                        target.display()
                    ));
                    stats.entries_skipped += 1;
                    continue;
                }
                OnDuplicate::Overwrite => {
                    remove_existing(&target)?;
                    stats.copied += copy_entry(entry.kind(), entry.path(), &target, config)?;
                    config.verbose(&format!(
                        "replaced {} with {}",
                        target.display(),
                        entry.path().display()
                    ));
                    stats.entries_replaced += 1;
                    continue;
                }
            }
        }

        stats.copied += copy_entry(entry.kind(), entry.path(), &target, config)?;
        config.verbose(&format!(
            "copied {} -> {}",
            entry.path().display(),
            target.display()
        ));
        stats.entries_copied += 1;
    }

    stats.duration = start_time.elapsed();
    Ok(stats)
}

/// Where a [`Populator`] is in its run.
///
/// `Unstarted -> Validating -> Flattening -> Copying -> Ready`, or `Failed`
/// from any of the middle stages. `Ready` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Not run yet
    Unstarted,
    /// Checking the merged options
    Validating,
    /// Resolving sources into flattened entries
    Flattening,
    /// Copying entries into the destination
    Copying,
    /// Population finished; the destination belongs to the test
    Ready,
    /// Population stopped with an error
    Failed,
}

impl Stage {
    /// Returns `true` for `Ready` and `Failed`.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Ready | Self::Failed)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unstarted => "unstarted",
            Self::Validating => "validating",
            Self::Flattening => "flattening",
            Self::Copying => "copying",
            Self::Ready => "ready",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Runs one population of a destination directory.
///
/// A populator is single use: once it reaches [`Stage::Ready`] or
/// [`Stage::Failed`], further calls to [`run`](Self::run) return
/// [`Error::AlreadyRun`].
#[derive(Debug)]
pub struct Populator {
    declaration: Declaration,
    config: Config,
    stage: Stage,
}

impl Populator {
    /// Create a populator for a merged declaration.
    #[must_use]
    pub fn new(declaration: Declaration, config: Config) -> Self {
        Self {
            declaration,
            config,
            stage: Stage::Unstarted,
        }
    }

    /// Current stage.
    #[must_use]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// The declaration this populator copies.
    #[must_use]
    pub fn declaration(&self) -> &Declaration {
        &self.declaration
    }

    /// Populate `dest`, which should be an empty directory.
    ///
    /// With no declaration groups attached, `dest` is left untouched.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidOption`] before anything is copied
    /// - [`Error::NotFound`] before anything is copied
    /// - [`Error::DuplicateEntry`] or IO errors while copying; entries copied
    ///   so far are left in place
    /// - [`Error::AlreadyRun`] if called again
    pub fn run(&mut self, dest: &Path) -> Result<PopulateStats> {
        if self.stage != Stage::Unstarted {
            return Err(Error::AlreadyRun(self.stage));
        }

        let result = self.run_stages(dest);
        match &result {
            Ok(stats) => {
                self.enter(Stage::Ready);
                self.config.verbose(&format!(
                    "populated {} ({} copied, {} skipped, {} replaced)",
                    dest.display(),
                    stats.entries_copied,
                    stats.entries_skipped,
                    stats.entries_replaced
                ));
            }
            Err(e) => {
                let failed_in = self.stage;
                self.enter(Stage::Failed);
                self.config.warn(&format!(
                    "Populating {} failed while {}: {}",
                    dest.display(),
                    failed_in,
                    e
                ));
            }
        }
        result
    }

    fn run_stages(&mut self, dest: &Path) -> Result<PopulateStats> {
        if self.declaration.is_empty() {
            return Ok(PopulateStats::default());
        }

        self.enter(Stage::Validating);
        let options = Options::validate(self.declaration.options())?;

        self.enter(Stage::Flattening);
        let entries = flatten(
            self.declaration.sources(),
            options.keep_top_dir,
            &self.config,
        )?;

        self.enter(Stage::Copying);
        copy_all(&entries, dest, options.on_duplicate, &self.config)
    }

    fn enter(&mut self, stage: Stage) {
        #[cfg(feature = "tracing")]
        tracing::trace!(from = %self.stage, to = %stage, "populator stage");
        self.stage = stage;
    }
}

/// Validate, flatten and copy `declaration` into `dest` in one call.
///
/// # Errors
///
/// See [`Populator::run`].
pub fn populate(declaration: Declaration, dest: &Path, config: Config) -> Result<PopulateStats> {
    Populator::new(declaration, config).run(dest)
}
