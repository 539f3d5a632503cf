//! Entry flattening: turning declared sources into top-level copy units.
//!
//! With `keep_top_dir` every source is one unit. Without it, a directory
//! source is replaced by its immediate children (one level only) and files
//! and symlinks pass through. Kinds are resolved without following
//! symlinks, so a symlink to a directory is copied as a link and never
//! expanded.

use crate::config::Config;
use crate::declaration::SourcePath;
use crate::error::{Error, Result};
use std::ffi::OsStr;
use std::fs::{self, FileType};
use std::io;
use std::path::{Path, PathBuf};

/// Kind of a filesystem entry, resolved once without following symlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Regular file
    File,
    /// Directory
    Directory,
    /// Symbolic link
    Symlink,
}

impl EntryKind {
    /// `None` for sockets, devices and fifos.
    fn of(file_type: FileType) -> Option<Self> {
        if file_type.is_symlink() {
            Some(Self::Symlink)
        } else if file_type.is_dir() {
            Some(Self::Directory)
        } else if file_type.is_file() {
            Some(Self::File)
        } else {
            None
        }
    }
}

/// A concrete unit to be copied directly into the destination root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatEntry {
    path: PathBuf,
    kind: EntryKind,
}

impl FlatEntry {
    /// Source path of the entry.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Resolved kind of the entry.
    #[must_use]
    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Name the entry takes at the destination top level.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSource`] if the path has no final component
    /// (for example `/` or `dir/..`).
    pub fn name(&self) -> Result<&OsStr> {
        self.path
            .file_name()
            .ok_or_else(|| Error::InvalidSource(self.path.clone()))
    }
}

/// Look up the kind of `path` without following a final symlink; `None`
/// for special files.
fn resolve_kind(path: &Path) -> Result<Option<EntryKind>> {
    match fs::symlink_metadata(path) {
        Ok(meta) => Ok(EntryKind::of(meta.file_type())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(Error::NotFound(path.to_path_buf())),
        Err(e) => Err(e.into()),
    }
}

/// Expand declared sources into flattened entries, in declaration order.
///
/// Every source is resolved against [`Config::root`] and checked before
/// anything is returned, so a bad source fails the whole call before any
/// copy can happen. Special files (sockets, devices, fifos) are skipped
/// with a warning, the same way [`copy_dir`](crate::copy::copy_dir) skips
/// them deeper in a tree.
///
/// Children of an expanded directory come in `read_dir` order, which is
/// filesystem dependent.
///
/// # Errors
///
/// - [`Error::NotFound`] if a source does not exist
/// - [`Error::InvalidSource`] if a top-level entry has no file name
/// - [`Error::Io`] if a directory cannot be listed
pub fn flatten(
    sources: &[SourcePath],
    keep_top_dir: bool,
    config: &Config,
) -> Result<Vec<FlatEntry>> {
    let mut resolved = Vec::with_capacity(sources.len());
    for source in sources {
        let path = config.resolve(source);
        match resolve_kind(&path)? {
            Some(kind) => resolved.push(FlatEntry { path, kind }),
            None => skip_special(&path, config),
        }
    }

    let mut entries = Vec::with_capacity(resolved.len());
    for entry in resolved {
        if !keep_top_dir && entry.kind == EntryKind::Directory {
            for child in fs::read_dir(&entry.path)? {
                let child = child?;
                let path = child.path();
                match EntryKind::of(child.file_type()?) {
                    Some(kind) => entries.push(FlatEntry { path, kind }),
                    None => skip_special(&path, config),
                }
            }
        } else {
            entry.name()?;
            entries.push(entry);
        }
    }

    Ok(entries)
}

fn skip_special(path: &Path, config: &Config) {
    config.warn(&format!("Skipping special file: {}", path.display()));
}
