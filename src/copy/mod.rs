//! Copy primitive.
//!
//! Copies one file, directory tree or symlink to a destination path that
//! does not exist yet, preserving permission bits, timestamps and symlink
//! targets. Conflict policy is not handled here; see
//! [`copy_all`](crate::populate::copy_all).

mod dir;
mod file;
mod symlink;
mod utils;

use crate::config::Config;
use crate::error::Result;
use crate::flatten::EntryKind;
use std::ops::AddAssign;
use std::path::Path;

pub use dir::copy_dir;
pub use file::copy_file;
pub use symlink::copy_symlink;

pub(crate) use utils::remove_existing;

/// What a copy wrote to disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyStats {
    /// Regular files written
    pub files: u64,
    /// Directories created
    pub dirs: u64,
    /// Symlinks recreated
    pub symlinks: u64,
    /// Bytes of file content copied
    pub bytes: u64,
}

impl AddAssign for CopyStats {
    fn add_assign(&mut self, other: Self) {
        self.files += other.files;
        self.dirs += other.dirs;
        self.symlinks += other.symlinks;
        self.bytes += other.bytes;
    }
}

/// Copy `src` to `dst` according to its already resolved kind.
///
/// # Errors
///
/// Propagates the error of [`copy_file`], [`copy_dir`] or [`copy_symlink`].
pub fn copy_entry(kind: EntryKind, src: &Path, dst: &Path, config: &Config) -> Result<CopyStats> {
    match kind {
        EntryKind::File => {
            let bytes = copy_file(src, dst, config)?;
            Ok(CopyStats {
                files: 1,
                bytes,
                ..CopyStats::default()
            })
        }
        EntryKind::Directory => copy_dir(src, dst, config),
        EntryKind::Symlink => {
            copy_symlink(src, dst, config)?;
            Ok(CopyStats {
                symlinks: 1,
                ..CopyStats::default()
            })
        }
    }
}
