//! Population tests: declaring files and directories and inspecting the copies.

#[path = "../common/mod.rs"]
mod common;

use common::{FixtureFiles, count_recursive, snapshot};
use datafiles::{
    Config, Datafiles, DatafilesBuilder, Declaration, DeclarationGroup, ROOT_ENV, SourcePath,
    populate,
};
use serial_test::serial;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Test a single file declared as a string
#[test]
fn test_single_file_as_str() {
    let fixture = FixtureFiles::new();
    let datafiles = DatafilesBuilder::new()
        .path(fixture.path_str("huckleberry.txt"))
        .build()
        .unwrap();

    assert_eq!(datafiles.names().unwrap(), ["huckleberry.txt"]);
    assert!(datafiles.is_file("huckleberry.txt"));
    assert!(
        datafiles
            .read_to_string("huckleberry.txt")
            .unwrap()
            .contains("Mark Twain")
    );
}

/// Test a single file declared as a path object
#[test]
fn test_single_file_as_path() {
    let fixture = FixtureFiles::new();
    let source: PathBuf = fixture.path("huckleberry.txt");
    let datafiles = DatafilesBuilder::new().path(&source).build().unwrap();

    assert_eq!(datafiles.names().unwrap(), ["huckleberry.txt"]);
    assert_eq!(
        datafiles.read("huckleberry.txt").unwrap(),
        fs::read(&source).unwrap()
    );
}

/// Test that string and path sources normalize to the same thing
#[test]
fn test_source_path_normalization() {
    let as_str = SourcePath::from("data/img1.jpg");
    let as_string = SourcePath::from(String::from("data/img1.jpg"));
    let as_path = SourcePath::from(PathBuf::from("data/img1.jpg"));
    assert_eq!(as_str, as_string);
    assert_eq!(as_str, as_path);
}

/// Test several files in one group
#[test]
fn test_multiple_files() {
    let fixture = FixtureFiles::new();
    let datafiles = DatafilesBuilder::new()
        .root(fixture.root())
        .paths(["huckleberry.txt", "random.bin", "sparrow.jpg"])
        .build()
        .unwrap();

    assert_eq!(
        datafiles.names().unwrap(),
        ["huckleberry.txt", "random.bin", "sparrow.jpg"]
    );
    assert_eq!(
        datafiles.read("random.bin").unwrap(),
        fs::read(fixture.path("random.bin")).unwrap()
    );
}

/// Test sources spread over several declaration groups
#[test]
fn test_multiple_groups() {
    let fixture = FixtureFiles::new();
    let datafiles = DatafilesBuilder::new()
        .group(DeclarationGroup::new().path(fixture.path("huckleberry.txt")))
        .group(DeclarationGroup::new().path(fixture.path("random.bin")))
        .group(DeclarationGroup::new().path(fixture.path("sparrow.jpg")))
        .build()
        .unwrap();

    assert_eq!(datafiles.names().unwrap().len(), 3);
    assert_eq!(datafiles.stats().entries_copied, 3);
}

/// Test that no declaration gives an empty directory
#[test]
fn test_no_files() {
    let datafiles = DatafilesBuilder::new().build().unwrap();
    assert!(datafiles.path().is_dir());
    assert!(datafiles.names().unwrap().is_empty());
}

/// Test that a group with zero sources also gives an empty directory
#[test]
fn test_group_without_sources() {
    let datafiles = DatafilesBuilder::new()
        .group(DeclarationGroup::new())
        .build()
        .unwrap();
    assert!(datafiles.names().unwrap().is_empty());
}

/// Test that a directory source copies its children, not itself
#[test]
fn test_directory_expansion() {
    let fixture = FixtureFiles::new();
    let datafiles = DatafilesBuilder::new()
        .path(fixture.path("dir1"))
        .build()
        .unwrap();

    assert_eq!(datafiles.names().unwrap(), ["file1", "file2", "file3"]);
    assert!(!datafiles.exists("dir1"));
    assert_eq!(datafiles.read_to_string("file1").unwrap(), "dir1\n123\n");
}

/// Test that nested subdirectories are copied recursively
#[test]
fn test_directory_expansion_nested() {
    let fixture = FixtureFiles::new();
    let datafiles = DatafilesBuilder::new()
        .path(fixture.path("dir4"))
        .build()
        .unwrap();

    assert_eq!(datafiles.names().unwrap(), ["subdir1", "subdir2"]);
    assert!(datafiles.is_file("subdir1/file1"));
    assert!(datafiles.is_file("subdir2/file2"));
    assert_eq!(count_recursive(datafiles.path()), 4);
}

/// Test several directories without name collisions
#[test]
fn test_multiple_directories() {
    let fixture = FixtureFiles::new();
    let datafiles = DatafilesBuilder::new()
        .root(fixture.root())
        .paths(["dir1", "dir2"])
        .build()
        .unwrap();

    assert_eq!(
        datafiles.names().unwrap(),
        ["file1", "file2", "file3", "file4", "file5", "file6"]
    );
    assert_eq!(datafiles.read_to_string("file4").unwrap(), "dir2\n101112\n");
}

/// Test files and directories mixed in one declaration
#[test]
fn test_mixed_sources() {
    let fixture = FixtureFiles::new();
    let datafiles = DatafilesBuilder::new()
        .root(fixture.root())
        .path("huckleberry.txt")
        .group(DeclarationGroup::new().paths(["dir1", "dir2"]))
        .build()
        .unwrap();

    assert_eq!(datafiles.names().unwrap().len(), 7);
    assert!(datafiles.is_file("huckleberry.txt"));
    assert!(datafiles.is_file("file6"));
}

/// Test that keep_top_dir copies each directory as a named subdirectory
#[test]
fn test_keep_top_dir() {
    let fixture = FixtureFiles::new();
    let datafiles = DatafilesBuilder::new()
        .root(fixture.root())
        .paths(["dir1", "dir2", "dir3"])
        .keep_top_dir(true)
        .build()
        .unwrap();

    assert_eq!(datafiles.names().unwrap(), ["dir1", "dir2", "dir3"]);
    // 3 directories + 3 + 3 + 2 files
    assert_eq!(count_recursive(datafiles.path()), 11);
    assert_eq!(
        datafiles.read_to_string("dir3/file1").unwrap(),
        "dir3\n123\n"
    );
}

/// Test that keep_top_dir leaves file sources unchanged
#[test]
fn test_keep_top_dir_with_file() {
    let fixture = FixtureFiles::new();
    let datafiles = DatafilesBuilder::new()
        .root(fixture.root())
        .paths(["huckleberry.txt", "dir4"])
        .keep_top_dir(true)
        .build()
        .unwrap();

    assert_eq!(datafiles.names().unwrap(), ["dir4", "huckleberry.txt"]);
    assert!(datafiles.is_file("dir4/subdir1/file1"));
}

/// Test that an explicit keep_top_dir=false behaves like the default
#[test]
fn test_keep_top_dir_false_explicit() {
    let fixture = FixtureFiles::new();
    let datafiles = DatafilesBuilder::new()
        .path(fixture.path("dir1"))
        .keep_top_dir(false)
        .build()
        .unwrap();
    assert_eq!(datafiles.names().unwrap(), ["file1", "file2", "file3"]);
}

/// Test that populating the same declaration twice gives identical trees
#[test]
fn test_idempotent() {
    let fixture = FixtureFiles::new();
    let declaration = || {
        Declaration::merge([
            DeclarationGroup::new().path(fixture.path("huckleberry.txt")),
            DeclarationGroup::new()
                .paths([fixture.path("dir1"), fixture.path("dir4")])
                .keep_top_dir(true),
        ])
    };

    let first = Datafiles::populate(declaration(), Config::default()).unwrap();
    let second = Datafiles::populate(declaration(), Config::default()).unwrap();

    assert_ne!(first.path(), second.path());
    assert_eq!(snapshot(first.path()), snapshot(second.path()));
}

/// Test that destructive operations only affect the copies
#[test]
fn test_destructive_test_leaves_sources_intact() {
    let fixture = FixtureFiles::new();
    let before = snapshot(fixture.root());

    let datafiles = DatafilesBuilder::new()
        .root(fixture.root())
        .paths(["dir1", "huckleberry.txt"])
        .build()
        .unwrap();

    datafiles.remove("file1").unwrap();
    fs::write(datafiles.join("file2"), "clobbered").unwrap();
    datafiles.remove("huckleberry.txt").unwrap();

    assert_eq!(datafiles.names().unwrap(), ["file2", "file3"]);
    assert_eq!(snapshot(fixture.root()), before);
}

/// Test the function API into a caller-owned directory
#[test]
fn test_populate_function() {
    let fixture = FixtureFiles::new();
    let dest = TempDir::new().unwrap();

    let stats = populate(
        DeclarationGroup::new().path(fixture.path("dir2")).into(),
        dest.path(),
        Config::default(),
    )
    .unwrap();

    assert_eq!(stats.entries_copied, 3);
    assert_eq!(stats.copied.files, 3);
    assert!(dest.path().join("file5").is_file());
}

/// Test that the fixture directory is removed with its handle
#[test]
fn test_cleanup_on_drop() {
    let fixture = FixtureFiles::new();
    let datafiles = DatafilesBuilder::new()
        .path(fixture.path("dir1"))
        .build()
        .unwrap();
    let path = datafiles.path().to_path_buf();
    drop(datafiles);

    assert!(!path.exists());
    assert!(fixture.path("dir1/file1").is_file());
}

/// Test resolving relative sources with DATAFILES_ROOT
#[test]
#[serial]
fn test_root_from_env() {
    let fixture = FixtureFiles::new();
    // SAFETY: serialized with every other test touching the environment
    unsafe { std::env::set_var(ROOT_ENV, fixture.root()) };

    let result = DatafilesBuilder::from_env().path("dir3").build();

    // SAFETY: as above
    unsafe { std::env::remove_var(ROOT_ENV) };

    let datafiles = result.unwrap();
    assert_eq!(datafiles.names().unwrap(), ["file1", "file4"]);
}

/// Test that an unset DATAFILES_ROOT leaves relative paths as declared
#[test]
#[serial]
fn test_root_env_unset() {
    // SAFETY: serialized with every other test touching the environment
    unsafe { std::env::remove_var(ROOT_ENV) };
    assert!(Config::from_env().root.is_none());
}

#[cfg(unix)]
mod unix_tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    /// Test that mode bits survive the copy
    #[test]
    fn test_executable_mode_preserved() {
        let fixture = FixtureFiles::new();
        let datafiles = DatafilesBuilder::new()
            .path(fixture.path("executable.sh"))
            .build()
            .unwrap();

        let mode = fs::metadata(datafiles.join("executable.sh"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    /// Test that directory permissions survive the copy
    #[test]
    fn test_directory_mode_preserved() {
        let fixture = FixtureFiles::new();
        let subdir = fixture.path("dir4/subdir2");
        fs::set_permissions(&subdir, fs::Permissions::from_mode(0o750)).unwrap();

        let datafiles = DatafilesBuilder::new()
            .path(fixture.path("dir4"))
            .build()
            .unwrap();

        let mode = fs::metadata(datafiles.join("subdir2"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o750);
    }
}
