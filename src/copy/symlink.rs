//! Symlink copy.

use crate::config::Config;
use crate::error::Result;
use std::fs;
use std::path::Path;

use super::utils::{is_escaping_symlink, symlink};

/// Recreate the symlink `src` at `dst` with the same target.
///
/// The target is copied verbatim: relative targets stay relative, and a
/// dangling link stays dangling. The link is never dereferenced.
pub fn copy_symlink(src: &Path, dst: &Path, config: &Config) -> Result<()> {
    let target = fs::read_link(src)?;

    if config.warn_escaping_symlinks && target.is_relative() && is_escaping_symlink(&target) {
        config.warn(&format!(
            "Symlink {} -> {} uses relative path escaping upward",
            src.display(),
            target.display()
        ));
    }

    symlink(&target, dst)?;
    config.verbose(&format!(
        "linked {} -> {}",
        dst.display(),
        target.display()
    ));
    Ok(())
}
