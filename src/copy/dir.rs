//! Recursive directory copy.

use crate::config::Config;
use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};

use super::CopyStats;
use super::file::copy_file;
use super::symlink::copy_symlink;

/// Directory with source and destination paths
struct DirEntry {
    src: PathBuf,
    dst: PathBuf,
}

/// Everything found under a source directory, in `read_dir` order.
#[derive(Default)]
struct Collected {
    dirs: Vec<DirEntry>,
    files: Vec<(PathBuf, PathBuf)>,
    symlinks: Vec<(PathBuf, PathBuf)>,
}

/// Copy a directory tree to `dst`, which must not exist yet.
///
/// Symlinks anywhere in the tree are recreated with their original target
/// and never followed, so the walk cannot loop. Directory permissions are
/// applied after the directory's contents are written, which lets read-only
/// source directories be copied.
///
/// # Strategy
///
/// 1. Collect all entries (dirs, files, symlinks) in a single pass
/// 2. Create directory structure (parents first)
/// 3. Copy files
/// 4. Recreate symlinks (preserving targets)
/// 5. Apply directory permissions (children first)
///
/// # Errors
///
/// Returns an error if:
/// - Source is not a directory ([`Error::NotFound`] if it is missing)
/// - `dst` already exists ([`Error::Io`] with `AlreadyExists`)
/// - Any file or symlink fails to copy (the first failure is returned)
pub fn copy_dir(src: &Path, dst: &Path, config: &Config) -> Result<CopyStats> {
    let src_meta = match fs::symlink_metadata(src) {
        Ok(meta) => meta,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(Error::NotFound(src.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };
    if !src_meta.is_dir() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotADirectory,
            format!("Source is not a directory: {}", src.display()),
        )
        .into());
    }

    // Phase 1: Collect all entries recursively
    let mut collected = Collected::default();
    collect_entries(src, dst, &mut collected, config)?;

    let mut stats = CopyStats::default();

    // Phase 2: Create directory structure. The root must be new, so a
    // colliding destination is never merged into.
    for (i, dir) in collected.dirs.iter().enumerate() {
        if i == 0 {
            fs::create_dir(&dir.dst)?;
        } else {
            fs::create_dir_all(&dir.dst)?;
        }
        stats.dirs += 1;
    }

    // Phase 3: Copy files
    for (src_file, dst_file) in &collected.files {
        let bytes = copy_file(src_file, dst_file, config)?;
        stats.files += 1;
        stats.bytes += bytes;
        config.verbose(&format!(
            "copied {} -> {} ({} bytes)",
            src_file.display(),
            dst_file.display(),
            bytes
        ));
    }

    // Phase 4: Recreate symlinks
    for (src_link, dst_link) in &collected.symlinks {
        copy_symlink(src_link, dst_link, config)?;
        stats.symlinks += 1;
    }

    // Phase 5: Directory permissions, deepest first
    for dir in collected.dirs.iter().rev() {
        match fs::metadata(&dir.src) {
            Ok(metadata) => {
                if let Err(e) = fs::set_permissions(&dir.dst, metadata.permissions()) {
                    config.warn(&format!(
                        "Failed to set permissions on {}: {}",
                        dir.dst.display(),
                        e
                    ));
                }
            }
            Err(e) => {
                config.warn(&format!(
                    "Failed to read metadata from {}: {}",
                    dir.src.display(),
                    e
                ));
            }
        }
    }

    Ok(stats)
}

/// Recursively collect all directories, files, and symlinks to copy
fn collect_entries(src: &Path, dst: &Path, out: &mut Collected, config: &Config) -> Result<()> {
    out.dirs.push(DirEntry {
        src: src.to_path_buf(),
        dst: dst.to_path_buf(),
    });

    for entry in fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        // DirEntry::file_type does not follow symlinks
        let file_type = entry.file_type()?;

        if file_type.is_symlink() {
            out.symlinks.push((src_path, dst_path));
        } else if file_type.is_dir() {
            collect_entries(&src_path, &dst_path, out, config)?;
        } else if file_type.is_file() {
            out.files.push((src_path, dst_path));
        } else {
            // Sockets, devices, fifos
            config.warn(&format!("Skipping special file: {}", src_path.display()));
        }
    }

    Ok(())
}

// =============================================================================
// Tests
// =============================================================================
