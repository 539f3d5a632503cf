//! The destination handle handed to a test.
//!
//! [`Datafiles`] owns a fresh temporary directory, populates it from a
//! [`Declaration`], and derefs to [`Path`] so it can be used anywhere a path
//! is expected. The directory is removed when the handle is dropped.

use crate::config::Config;
use crate::copy::remove_existing;
use crate::declaration::Declaration;
use crate::error::{Error, Result};
use crate::populate::{PopulateStats, Populator};
use std::ffi::OsString;
use std::fs;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const TEMP_PREFIX: &str = "datafiles-";

/// A populated, disposable fixture directory.
///
/// # Example
///
/// ```no_run
/// use datafiles::{Config, Datafiles, DeclarationGroup};
///
/// let datafiles = Datafiles::populate(
///     DeclarationGroup::new().path("tests/data/img1.jpg").into(),
///     Config::default(),
/// )?;
///
/// assert_eq!(datafiles.names()?, ["img1.jpg"]);
/// assert!(datafiles.is_file("img1.jpg"));
///
/// // Destructive tests only touch the copy
/// datafiles.remove("img1.jpg")?;
/// assert!(datafiles.names()?.is_empty());
/// # Ok::<(), datafiles::Error>(())
/// ```
#[derive(Debug)]
pub struct Datafiles {
    dir: TempDir,
    stats: PopulateStats,
}

impl Datafiles {
    /// Create an empty fixture directory in the system temp location.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TempFile`] if the directory cannot be created.
    pub fn new() -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .tempdir()
            .map_err(|e| Error::TempFile {
                path: std::env::temp_dir(),
                source: e,
            })?;
        Ok(Self::from_temp_dir(dir))
    }

    /// Create an empty fixture directory inside `parent`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TempFile`] if the directory cannot be created.
    pub fn in_dir(parent: impl AsRef<Path>) -> Result<Self> {
        let parent = parent.as_ref();
        let dir = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .tempdir_in(parent)
            .map_err(|e| Error::TempFile {
                path: parent.to_path_buf(),
                source: e,
            })?;
        Ok(Self::from_temp_dir(dir))
    }

    /// Wrap an existing, empty temporary directory.
    #[must_use]
    pub fn from_temp_dir(dir: TempDir) -> Self {
        Self {
            dir,
            stats: PopulateStats::default(),
        }
    }

    /// Create a fixture directory and populate it.
    ///
    /// On failure the partially populated directory is removed along with
    /// the handle.
    ///
    /// # Errors
    ///
    /// See [`Populator::run`].
    pub fn populate(declaration: Declaration, config: Config) -> Result<Self> {
        let mut datafiles = Self::new()?;
        datafiles.fill(declaration, config)?;
        Ok(datafiles)
    }

    pub(crate) fn fill(&mut self, declaration: Declaration, config: Config) -> Result<()> {
        self.stats = Populator::new(declaration, config).run(self.dir.path())?;
        Ok(())
    }

    /// Path of the fixture directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// What population copied.
    #[must_use]
    pub fn stats(&self) -> &PopulateStats {
        &self.stats
    }

    /// Path of a top-level entry (or any relative path below the fixture).
    #[must_use]
    pub fn join(&self, name: impl AsRef<Path>) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Paths of the immediate children, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the directory cannot be listed.
    pub fn entries(&self) -> Result<Vec<PathBuf>> {
        let mut entries = fs::read_dir(self.dir.path())?
            .map(|entry| entry.map(|e| e.path()))
            .collect::<std::io::Result<Vec<_>>>()?;
        entries.sort();
        Ok(entries)
    }

    /// Names of the immediate children, sorted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the directory cannot be listed.
    pub fn names(&self) -> Result<Vec<OsString>> {
        let mut names = fs::read_dir(self.dir.path())?
            .map(|entry| entry.map(|e| e.file_name()))
            .collect::<std::io::Result<Vec<_>>>()?;
        names.sort();
        Ok(names)
    }

    /// Whether `name` exists, without following a final symlink.
    #[must_use]
    pub fn exists(&self, name: impl AsRef<Path>) -> bool {
        fs::symlink_metadata(self.join(name)).is_ok()
    }

    /// Whether `name` is a regular file (following symlinks).
    #[must_use]
    pub fn is_file(&self, name: impl AsRef<Path>) -> bool {
        self.join(name).is_file()
    }

    /// Whether `name` is a directory (following symlinks).
    #[must_use]
    pub fn is_dir(&self, name: impl AsRef<Path>) -> bool {
        self.join(name).is_dir()
    }

    /// Whether `name` is itself a symlink.
    #[must_use]
    pub fn is_symlink(&self, name: impl AsRef<Path>) -> bool {
        self.join(name).is_symlink()
    }

    /// Read the bytes of `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read.
    pub fn read(&self, name: impl AsRef<Path>) -> Result<Vec<u8>> {
        Ok(fs::read(self.join(name))?)
    }

    /// Read `name` as UTF-8 text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read or is not UTF-8.
    pub fn read_to_string(&self, name: impl AsRef<Path>) -> Result<String> {
        Ok(fs::read_to_string(self.join(name))?)
    }

    /// Delete `name`: a file, a symlink (not its target), or a whole directory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the entry does not exist or cannot be removed.
    pub fn remove(&self, name: impl AsRef<Path>) -> Result<()> {
        Ok(remove_existing(&self.join(name))?)
    }

    /// Keep the directory on disk after the handle is gone and return its
    /// path. Useful when debugging a failing test.
    #[must_use]
    pub fn keep(self) -> PathBuf {
        self.dir.keep()
    }

    /// Remove the directory now, reporting any error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if removal fails.
    pub fn close(self) -> Result<()> {
        Ok(self.dir.close()?)
    }
}

impl Deref for Datafiles {
    type Target = Path;

    fn deref(&self) -> &Path {
        self.dir.path()
    }
}

impl AsRef<Path> for Datafiles {
    fn as_ref(&self) -> &Path {
        self.dir.path()
    }
}
