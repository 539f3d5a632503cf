//! Helpers shared by the file, directory and symlink copy operations.

use filetime::{FileTime, set_file_times};
use std::fs::{self, Metadata};
use std::io;
use std::path::Path;

// =============================================================================
// File content copying
// =============================================================================

/// Copy file contents using the best available method.
///
/// On Linux 4.5+, uses `copy_file_range` for kernel-side transfer.
/// Falls back to `std::io::copy` on other platforms or on error.
pub(crate) fn copy_file_contents(
    src: &std::fs::File,
    dst: &std::fs::File,
    len: u64,
) -> io::Result<u64> {
    #[cfg(target_os = "linux")]
    {
        copy_file_range_all(src, dst, len)
    }
    #[cfg(not(target_os = "linux"))]
    {
        use std::io::BufReader;
        let _ = len;
        io::copy(&mut BufReader::new(src), &mut &*dst)
    }
}

/// Linux-specific: copy using copy_file_range(2).
///
/// Falls back to io::copy if the first call is refused (cross-filesystem,
/// unsupported filesystem, old kernel).
#[cfg(target_os = "linux")]
fn copy_file_range_all(src: &std::fs::File, dst: &std::fs::File, len: u64) -> io::Result<u64> {
    use std::os::unix::io::AsRawFd;

    let src_fd = src.as_raw_fd();
    let dst_fd = dst.as_raw_fd();
    let mut remaining = len;
    let mut copied: u64 = 0;

    while remaining > 0 {
        // 128MB chunks
        let chunk_size = remaining.min(128 * 1024 * 1024) as usize;

        // SAFETY: both descriptors are open for the duration of the call and
        // null offsets mean "use and advance the current file position".
        let result = unsafe {
            libc::copy_file_range(
                src_fd,
                std::ptr::null_mut(),
                dst_fd,
                std::ptr::null_mut(),
                chunk_size,
                0,
            )
        };

        if result < 0 {
            let err = io::Error::last_os_error();
            if copied == 0
                && matches!(
                    err.raw_os_error(),
                    Some(libc::EXDEV)
                        | Some(libc::ENOSYS)
                        | Some(libc::EINVAL)
                        | Some(libc::EOPNOTSUPP)
                )
            {
                use std::io::BufReader;
                return io::copy(&mut BufReader::new(src), &mut &*dst);
            }
            return Err(err);
        }

        if result == 0 {
            // Source shrank while copying
            break;
        }

        let bytes_copied = result as u64;
        copied += bytes_copied;
        remaining = remaining.saturating_sub(bytes_copied);
    }

    Ok(copied)
}

// =============================================================================
// Symlink utilities
// =============================================================================

/// Check if a symlink target contains ".." components
#[inline]
pub(crate) fn is_escaping_symlink(target: &Path) -> bool {
    use std::path::Component;
    target
        .components()
        .any(|c| matches!(c, Component::ParentDir))
}

#[cfg(unix)]
pub(crate) fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

/// Windows distinguishes file and directory links; pick by what the target
/// currently resolves to, relative to the link's own directory.
#[cfg(windows)]
pub(crate) fn symlink(target: &Path, link: &Path) -> io::Result<()> {
    let resolved = match link.parent() {
        Some(parent) if target.is_relative() => parent.join(target),
        _ => target.to_path_buf(),
    };
    if resolved.is_dir() {
        std::os::windows::fs::symlink_dir(target, link)
    } else {
        std::os::windows::fs::symlink_file(target, link)
    }
}

#[cfg(not(any(unix, windows)))]
pub(crate) fn symlink(_target: &Path, _link: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "Symlinks not supported on this platform",
    ))
}

// =============================================================================
// Metadata and timestamp utilities
// =============================================================================

/// Preserve file timestamps (mtime and atime)
pub(crate) fn preserve_timestamps(src_meta: &Metadata, dst: &Path) -> io::Result<()> {
    let mtime = FileTime::from_last_modification_time(src_meta);
    let atime = FileTime::from_last_access_time(src_meta);
    set_file_times(dst, atime, mtime)
}

/// Remove an existing file, symlink, or directory at the given path.
///
/// Symlinks are removed as links; a symlink to a directory never has its
/// target's contents deleted.
pub(crate) fn remove_existing(path: &Path) -> io::Result<()> {
    let meta = fs::symlink_metadata(path)?;
    let ft = meta.file_type();
    if ft.is_dir() {
        fs::remove_dir_all(path)
    } else {
        remove_file_or_link(path)
    }
}

#[cfg(windows)]
fn remove_file_or_link(path: &Path) -> io::Result<()> {
    // Directory symlinks must be removed with remove_dir on Windows.
    fs::remove_file(path).or_else(|_| fs::remove_dir(path))
}

#[cfg(not(windows))]
fn remove_file_or_link(path: &Path) -> io::Result<()> {
    fs::remove_file(path)
}

// =============================================================================
// Tests
// =============================================================================
