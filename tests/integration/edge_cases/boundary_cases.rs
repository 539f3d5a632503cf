//! Boundary cases integration tests.
//!
//! These tests verify behavior at edge cases and boundary conditions:
//! - Empty files and empty directories
//! - Files with special characters in names
//! - Hidden files inside expanded directories
//! - Deep directory nesting
//! - Named pipes inside expanded directories
//! - Declarations loaded from data

use crate::common::{FixtureFiles, count_recursive, init_tracing};
use datafiles::{Config, Datafiles, DatafilesBuilder, Declaration, DeclarationGroup, OnDuplicate};
use std::fs;
use tempfile::TempDir;

// =============================================================================
// Empty Entries
// =============================================================================

/// Test copying an empty file (0 bytes)
#[test]
fn test_empty_file() {
    let src = TempDir::new().unwrap();
    fs::write(src.path().join("empty.txt"), "").unwrap();

    let datafiles = DatafilesBuilder::new()
        .path(src.path().join("empty.txt"))
        .build()
        .unwrap();

    assert!(datafiles.is_file("empty.txt"));
    assert_eq!(datafiles.read("empty.txt").unwrap().len(), 0);
    assert_eq!(datafiles.stats().copied.bytes, 0);
}

/// Test an empty directory source contributes nothing when expanded
#[test]
fn test_empty_directory_expanded() {
    let src = TempDir::new().unwrap();
    fs::create_dir(src.path().join("hollow")).unwrap();

    let datafiles = DatafilesBuilder::new()
        .path(src.path().join("hollow"))
        .build()
        .unwrap();

    assert!(datafiles.names().unwrap().is_empty());
    assert_eq!(datafiles.stats().entries_copied, 0);
}

/// Test an empty directory source is kept as an empty directory
#[test]
fn test_empty_directory_kept() {
    let src = TempDir::new().unwrap();
    fs::create_dir(src.path().join("hollow")).unwrap();

    let datafiles = DatafilesBuilder::new()
        .path(src.path().join("hollow"))
        .keep_top_dir(true)
        .build()
        .unwrap();

    assert_eq!(datafiles.names().unwrap(), ["hollow"]);
    assert!(datafiles.is_dir("hollow"));
    assert_eq!(count_recursive(datafiles.path()), 1);
}

/// Test an empty nested directory inside an expanded source
#[test]
fn test_empty_nested_directory() {
    let src = TempDir::new().unwrap();
    fs::create_dir_all(src.path().join("outer/inner")).unwrap();

    let datafiles = DatafilesBuilder::new()
        .path(src.path().join("outer"))
        .build()
        .unwrap();

    assert!(datafiles.is_dir("inner"));
}

// =============================================================================
// Names
// =============================================================================

/// Test files with spaces, unicode and punctuation in their names
#[test]
fn test_special_names() {
    let src = TempDir::new().unwrap();
    let names = [
        "with space.txt",
        "ünïcödé.txt",
        "数据.bin",
        "semi;colon",
        "dash-and_underscore.txt",
    ];
    for name in names {
        fs::write(src.path().join(name), name).unwrap();
    }

    let datafiles = DatafilesBuilder::new().path(src.path()).build().unwrap();

    for name in names {
        assert_eq!(datafiles.read_to_string(name).unwrap(), name);
    }
    assert_eq!(datafiles.names().unwrap().len(), names.len());
}

/// Test hidden files are copied when a directory is expanded
#[test]
fn test_hidden_files() {
    let src = TempDir::new().unwrap();
    fs::write(src.path().join(".hidden"), "shh").unwrap();
    fs::write(src.path().join("visible"), "hi").unwrap();

    let datafiles = DatafilesBuilder::new().path(src.path()).build().unwrap();

    assert_eq!(datafiles.names().unwrap(), [".hidden", "visible"]);
}

/// Test a declared source with a trailing separator
#[test]
fn test_trailing_separator() {
    let fixture = FixtureFiles::new();
    let with_slash = format!("{}/", fixture.path_str("dir1"));

    let datafiles = DatafilesBuilder::new()
        .path(with_slash)
        .keep_top_dir(true)
        .build()
        .unwrap();

    assert_eq!(datafiles.names().unwrap(), ["dir1"]);
}

// =============================================================================
// Depth
// =============================================================================

/// Test a deeply nested tree is copied completely
#[test]
fn test_deep_nesting() {
    let src = TempDir::new().unwrap();
    let mut deep = src.path().join("top");
    for level in 0..20 {
        deep = deep.join(format!("level{level}"));
    }
    fs::create_dir_all(&deep).unwrap();
    fs::write(deep.join("bottom.txt"), "found").unwrap();

    let datafiles = DatafilesBuilder::new()
        .path(src.path().join("top"))
        .keep_top_dir(true)
        .build()
        .unwrap();

    let copied = datafiles.join(deep.strip_prefix(src.path()).unwrap());
    assert_eq!(fs::read_to_string(copied.join("bottom.txt")).unwrap(), "found");
    assert_eq!(datafiles.stats().copied.dirs, 21);
}

/// Test many files in one directory
#[test]
fn test_many_files() {
    let src = TempDir::new().unwrap();
    for i in 0..200 {
        fs::write(src.path().join(format!("file{i:03}")), i.to_string()).unwrap();
    }

    let datafiles = DatafilesBuilder::new().path(src.path()).build().unwrap();

    assert_eq!(datafiles.names().unwrap().len(), 200);
    assert_eq!(datafiles.read_to_string("file199").unwrap(), "199");
    assert_eq!(datafiles.stats().entries_copied, 200);
}

// =============================================================================
// Special Files
// =============================================================================

#[cfg(target_os = "linux")]
fn mkfifo(path: &std::path::Path) {
    use std::os::unix::ffi::OsStrExt;
    let c_path = std::ffi::CString::new(path.as_os_str().as_bytes()).unwrap();
    // SAFETY: c_path is a valid NUL-terminated string for the call
    assert_eq!(unsafe { libc::mkfifo(c_path.as_ptr(), 0o644) }, 0);
}

/// Test named pipes are skipped at the top level and inside nested directories
#[cfg(target_os = "linux")]
#[test]
fn test_fifo_children_skipped() {
    use std::sync::Mutex;
    static WARNINGS: Mutex<Vec<String>> = Mutex::new(Vec::new());
    fn record(msg: &str) {
        WARNINGS.lock().unwrap().push(msg.to_string());
    }

    let src = TempDir::new().unwrap();
    fs::write(src.path().join("plain.txt"), "plain").unwrap();
    fs::create_dir(src.path().join("nested")).unwrap();
    mkfifo(&src.path().join("pipe"));
    mkfifo(&src.path().join("nested/pipe"));

    let datafiles = DatafilesBuilder::new()
        .path(src.path())
        .on_warning(record)
        .build()
        .unwrap();

    assert_eq!(datafiles.names().unwrap(), ["nested", "plain.txt"]);
    assert!(!datafiles.exists("pipe"));
    assert!(!datafiles.exists("nested/pipe"));
    assert_eq!(datafiles.read_to_string("plain.txt").unwrap(), "plain");

    let warnings = WARNINGS.lock().unwrap();
    assert_eq!(warnings.len(), 2, "{warnings:?}");
    assert!(warnings.iter().all(|w| w.contains("pipe")), "{warnings:?}");
}

// =============================================================================
// Handle and Logging
// =============================================================================

/// Test a kept directory outlives its handle
#[test]
fn test_keep_for_debugging() {
    let fixture = FixtureFiles::new();
    let parent = TempDir::new().unwrap();

    let datafiles = DatafilesBuilder::new()
        .path(fixture.path("huckleberry.txt"))
        .in_dir(parent.path())
        .build()
        .unwrap();
    let kept = datafiles.keep();

    assert!(kept.join("huckleberry.txt").is_file());
    assert!(kept.starts_with(parent.path()));
}

/// Test population with a tracing subscriber installed
#[test]
fn test_population_with_tracing() {
    init_tracing();
    let fixture = FixtureFiles::new();

    let datafiles = Datafiles::populate(
        Declaration::merge([
            DeclarationGroup::new().path(fixture.path("dir1")),
            DeclarationGroup::new()
                .path(fixture.path("dir3"))
                .on_duplicate(OnDuplicate::Ignore),
        ]),
        Config::default().with_fsync(),
    )
    .unwrap();

    assert_eq!(datafiles.names().unwrap().len(), 4);
    assert_eq!(datafiles.stats().entries_skipped, 1);
}

// =============================================================================
// Declarations from data
// =============================================================================

#[cfg(feature = "serde")]
mod serde_declarations {
    use super::*;
    use datafiles::Options;

    /// Test a declaration group read from JSON
    #[test]
    fn test_declaration_from_json() {
        let fixture = FixtureFiles::new();
        let json = format!(
            r#"{{
                "sources": [{dir1:?}, {dir3:?}],
                "options": [["on_duplicate", "overwrite"]]
            }}"#,
            dir1 = fixture.path_str("dir1"),
            dir3 = fixture.path_str("dir3"),
        );
        let group: DeclarationGroup = serde_json::from_str(&json).unwrap();

        let datafiles = DatafilesBuilder::new().group(group).build().unwrap();
        assert_eq!(datafiles.read_to_string("file1").unwrap(), "dir3\n123\n");
    }

    /// Test a group with only options deserializes with no sources
    #[test]
    fn test_options_only_group() {
        let group: DeclarationGroup =
            serde_json::from_str(r#"{"options": [["keep_top_dir", true]]}"#).unwrap();
        assert!(group.sources().is_empty());

        let options = Options::validate(Declaration::from(group).options()).unwrap();
        assert!(options.keep_top_dir);
        assert_eq!(options.on_duplicate, OnDuplicate::Exception);
    }
}
