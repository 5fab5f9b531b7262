//! No-clobber file primitives and transfer counters.
//!
//! This crate provides the filesystem side effects the tree copier performs for
//! each entry:
//!
//! * Copy-on-write copies via `reflink-copy` (APFS, Btrfs, `ReFS`), falling back to a byte copy
//! * Staged writes for plugin-rewritten content, moved into place without clobbering
//! * No-clobber renames
//! * Source cleanup for move transfers
//! * Thread-safe counters for progress reporting
//!
//! None of the copy or write helpers ever overwrite an existing target.
//!
//! # Example
//!
//! ```rust,ignore
//! use cpdirplus_copy::{copy_file, CopyResult};
//!
//! match copy_file(source, target)? {
//!     CopyResult::Created { .. } => println!("copied"),
//!     CopyResult::Exists => println!("kept existing"),
//!     CopyResult::SourceNotFound => println!("nothing to copy"),
//! }
//! ```

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

mod cleanup;
mod copy;
mod error;
mod progress;

pub use cleanup::{prune_empty_dirs, remove_file};
pub use copy::{CopyResult, copy_file, ensure_dir, rename_entry, write_file};
pub use error::CopyError;
pub use progress::{CopyProgress, TransferStats};
