//! Single file copy.
//!
//! Files are written to a temporary file next to the destination and renamed
//! into place, so a fixture never contains a half-written file even if the
//! copy fails midway.

use crate::config::Config;
use crate::error::{Error, Result};
use std::fs::{self, File};
use std::path::Path;

use super::utils::{copy_file_contents, preserve_timestamps};

/// Copy a single regular file, preserving its permission bits.
///
/// The destination must not exist; the rename uses `persist_noclobber`, so a
/// destination that appears concurrently is reported rather than replaced.
///
/// # Returns
///
/// The number of bytes copied.
///
/// # Errors
///
/// Returns an error if:
/// - Source is missing or unreadable ([`Error::Io`])
/// - Temp file creation fails ([`Error::TempFile`])
/// - The destination already exists or the rename fails ([`Error::Persist`])
pub fn copy_file(src: &Path, dst: &Path, config: &Config) -> Result<u64> {
    let src_meta = fs::metadata(src)?;
    let src_file = File::open(src)?;

    let dst_parent = dst.parent().unwrap_or(Path::new("."));
    // Created 0o600; the source permissions are applied before the rename.
    let temp_file = tempfile::NamedTempFile::new_in(dst_parent).map_err(|e| Error::TempFile {
        path: dst_parent.to_path_buf(),
        source: e,
    })?;

    let bytes_copied = copy_file_contents(&src_file, temp_file.as_file(), src_meta.len())?;

    if config.fsync {
        temp_file.as_file().sync_all()?;
    }

    fs::set_permissions(temp_file.path(), src_meta.permissions())?;

    temp_file
        .persist_noclobber(dst)
        .map_err(|e| Error::Persist {
            path: dst.to_path_buf(),
            source: e.error,
        })?;

    if config.preserve_timestamps {
        if let Err(e) = preserve_timestamps(&src_meta, dst) {
            config.warn(&format!(
                "Failed to preserve timestamps on {}: {}",
                dst.display(),
                e
            ));
        }
    }

    Ok(bytes_copied)
}

// =============================================================================
// Tests
// =============================================================================
