//! Recursive tree copying with filtering, renaming and a plugin pipeline.
//!
//! This crate drives a whole transfer:
//!
//! * Include/exclude resolution once at the root (`cpdirplus_glob`)
//! * A per-entry pipeline of plugin stages, run in registration order
//! * Parallel traversal on a bounded `rayon` pool
//! * No-clobber copies followed by exact-name renames
//! * Completion tracking that fires exactly once per directory
//! * An explicit move mode that cleans up transferred sources
//!
//! # Example
//!
//! ```rust,ignore
//! use cpdirplus_operations::{copy_tree, CopyOptions};
//!
//! let report = copy_tree("assets", "dist/assets", CopyOptions::default())?;
//! println!("{} files copied", report.files_copied);
//! ```

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

mod completion;
mod context;
mod engine;
mod error;
mod pipeline;
mod rename;
mod replacement;
mod request;
mod tree;

pub use completion::CompletionTracker;
pub use context::EntryContext;
pub use cpdirplus_config::{CopyOptions, PatternSet, ReplacementRule, TransferMode};
pub use cpdirplus_copy::CopyProgress;
pub use error::OperationError;
pub use pipeline::{Pipeline, Plugin, StageError, StageOutcome};
pub use rename::RenameMap;
pub use replacement::ReplacementPlugin;
pub use request::CopyRequest;
pub use tree::{CopyReport, TreeCopy, copy_tree};
