//! Process-wide configuration for fixture population.
//!
//! [`Config`] holds everything that is not part of a test's declaration:
//! where relative source paths are resolved from, how the copy primitive
//! behaves, and where diagnostics go.
//!
//! # Example
//!
//! ```
//! use datafiles::Config;
//!
//! let config = Config::default()
//!     .with_root("tests/data")
//!     .with_fsync()
//!     .without_timestamps();
//! assert_eq!(config.resolve("img1.jpg"), std::path::Path::new("tests/data/img1.jpg"));
//! ```

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Environment variable read by [`Config::from_env`] for the source root.
pub const ROOT_ENV: &str = "DATAFILES_ROOT";

/// Configuration shared by every population.
///
/// Use [`Default::default()`] to get sensible defaults, then customize
/// using the builder methods.
///
/// # Default Values
///
/// | Field | Default | Description |
/// |-------|---------|-------------|
/// | `root` | `None` | Source paths are used as given |
/// | `fsync` | `false` | Don't sync fixture files to disk |
/// | `preserve_timestamps` | `true` | Copy file timestamps (mtime/atime) |
/// | `warn_escaping_symlinks` | `true` | Warn about `..` in copied symlinks |
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory that relative source paths are joined to.
    ///
    /// Absolute source paths ignore it.
    pub root: Option<PathBuf>,

    /// Whether to sync copied files to disk before renaming them into place.
    ///
    /// Fixture directories are thrown away after one test, so this is off
    /// unless asked for.
    pub fsync: bool,

    /// Whether to preserve file timestamps (default: true)
    pub preserve_timestamps: bool,

    /// Warn about relative symlinks that escape upward (default: true)
    ///
    /// A symlink like `../shared/data.bin` copied into a fixture directory
    /// usually dangles, since its target is not copied along.
    pub warn_escaping_symlinks: bool,

    /// Callback for warnings (optional)
    ///
    /// If not set and `tracing` feature is enabled, warnings are logged via tracing.
    /// Otherwise, warnings are silently ignored.
    pub warn_handler: Option<fn(&str)>,

    /// Callback for per-entry progress messages (optional)
    ///
    /// If not set and `tracing` feature is enabled, messages are logged at
    /// debug level.
    pub verbose_handler: Option<fn(&str)>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: None,
            fsync: false,
            preserve_timestamps: true,
            warn_escaping_symlinks: true,
            warn_handler: None,
            verbose_handler: None,
        }
    }
}

impl Config {
    /// Build a configuration from the process environment.
    ///
    /// Reads [`ROOT_ENV`] (`DATAFILES_ROOT`); an unset or empty value leaves
    /// `root` unset. Everything else takes its default.
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_root_from(std::env::var_os(ROOT_ENV))
    }

    fn with_root_from(mut self, value: Option<OsString>) -> Self {
        self.root = value.filter(|v| !v.is_empty()).map(PathBuf::from);
        self
    }

    /// Resolve relative source paths against `root`
    #[must_use]
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Sync every copied file to disk before it is renamed into place
    #[must_use]
    pub fn with_fsync(mut self) -> Self {
        self.fsync = true;
        self
    }

    /// Disable timestamp preservation
    #[must_use]
    pub fn without_timestamps(mut self) -> Self {
        self.preserve_timestamps = false;
        self
    }

    /// Don't warn about symlinks whose relative target climbs out with `..`
    #[must_use]
    pub fn without_symlink_warnings(mut self) -> Self {
        self.warn_escaping_symlinks = false;
        self
    }

    /// Create config with a warning handler
    #[must_use]
    pub fn with_warn_handler(mut self, handler: fn(&str)) -> Self {
        self.warn_handler = Some(handler);
        self
    }

    /// Create config with a verbose handler
    #[must_use]
    pub fn with_verbose_handler(mut self, handler: fn(&str)) -> Self {
        self.verbose_handler = Some(handler);
        self
    }

    /// Resolve a declared source path.
    ///
    /// Relative paths are joined to `root` when one is set; absolute paths
    /// and paths without a root are returned unchanged.
    #[must_use]
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }

    pub(crate) fn warn(&self, msg: &str) {
        if let Some(handler) = self.warn_handler {
            handler(msg);
        } else {
            #[cfg(feature = "tracing")]
            tracing::warn!("{}", msg);
        }
    }

    pub(crate) fn verbose(&self, msg: &str) {
        if let Some(handler) = self.verbose_handler {
            handler(msg);
        } else {
            #[cfg(feature = "tracing")]
            tracing::debug!("{}", msg);
        }
    }
}
