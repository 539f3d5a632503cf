//! # datafiles
//!
//! Stage declared files and directories into a fresh temporary directory
//! before a test runs, so the test works on disposable copies and never
//! mutates the originals.
//!
//! ## Core Features
//!
//! - **Declarative**: tests list source paths in one or more declaration groups
//! - **Directory expansion**: copy a directory's children, or the directory itself (`keep_top_dir`)
//! - **Duplicate policies**: fail, keep the first, or keep the last entry per top-level name (`on_duplicate`)
//! - **Symlink aware**: symlinks are recreated with their original target, never followed
//! - **Permission preserving**: file and directory mode bits are copied
//! - **Timestamp preserving**: file modification and access times are copied
//! - **Fail fast**: options and sources are checked before anything is copied
//! - **Atomic writes**: files are written to a temp file and renamed into place
//!
//! ## Quick Start with Builder API
//!
//! ```no_run
//! use datafiles::DatafilesBuilder;
//!
//! let datafiles = DatafilesBuilder::new()
//!     .root("tests/_fixture_files")
//!     .paths(["dir1", "huckleberry.txt"])
//!     .build()?;
//!
//! assert!(datafiles.is_file("huckleberry.txt"));
//! let text = datafiles.read_to_string("file1")?;
//! # Ok::<(), datafiles::Error>(())
//! ```
//!
//! ### Same Names in Several Directories
//!
//! ```no_run
//! use datafiles::{DatafilesBuilder, OnDuplicate};
//!
//! // dir1, dir2 and dir3 all contain `fileA`; keep the one from dir1
//! let datafiles = DatafilesBuilder::new()
//!     .paths(["dir1", "dir2", "dir3"])
//!     .on_duplicate(OnDuplicate::Ignore)
//!     .build()?;
//! # Ok::<(), datafiles::Error>(())
//! ```
//!
//! ## Function API
//!
//! For a destination directory you already own, use a [`Populator`]:
//!
//! ```no_run
//! use datafiles::{Config, Declaration, DeclarationGroup, Populator};
//!
//! let declaration = Declaration::merge([
//!     DeclarationGroup::new().path("tests/data/img1.jpg"),
//!     DeclarationGroup::new().path("tests/data/dir1").keep_top_dir(true),
//! ]);
//!
//! let dest = tempfile::tempdir()?;
//! let stats = Populator::new(declaration, Config::default()).run(dest.path())?;
//! println!("Copied {} entries ({} bytes)", stats.entries_copied, stats.copied.bytes);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Population Order
//!
//! 1. Groups are merged: sources concatenate, options overlay (later wins)
//! 2. Options are validated ([`Error::InvalidOption`])
//! 3. Every source is resolved and checked ([`Error::NotFound`],
//!    [`Error::InvalidSource`]); special files are skipped with a warning
//! 4. Entries are copied in declaration order, applying [`OnDuplicate`]
//!    per top-level name ([`Error::DuplicateEntry`])
//!
//! Steps 2 and 3 finish before the first copy, so a bad declaration never
//! leaves partial output. A duplicate under [`OnDuplicate::Exception`]
//! stops step 4 where it is; nothing already copied is rolled back.
//!
//! ## Optional Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `tracing` | Structured logging with tracing crate (default) |
//! | `serde` | Serialize/Deserialize for options and declaration groups |
//! | `full` | Enable all optional features |

#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod config;
pub mod copy;
mod datafiles;
mod declaration;
mod error;
mod flatten;
mod options;
mod populate;

pub use builder::DatafilesBuilder;
pub use config::{Config, ROOT_ENV};
pub use copy::CopyStats;
pub use datafiles::Datafiles;
pub use declaration::{Declaration, DeclarationGroup, SourcePath};
pub use error::{Error, Result};
pub use flatten::{EntryKind, FlatEntry, flatten};
pub use options::{KEEP_TOP_DIR, ON_DUPLICATE, OnDuplicate, OptionValue, Options, Overlay};
pub use populate::{PopulateStats, Populator, Stage, copy_all, populate};
