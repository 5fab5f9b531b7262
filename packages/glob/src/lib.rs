//! Include/exclude glob resolution for cpdirplus.
//!
//! Patterns are resolved once against the traversal root into concrete sets of
//! root-relative paths. The copy engine then only performs set lookups while it
//! walks the tree.
//!
//! * Parallel directory enumeration using `jwalk`
//! * Pattern compilation using `globset`
//! * Exclude always wins over include
//!
//! # Example
//!
//! ```rust,ignore
//! use cpdirplus_glob::MatchSets;
//!
//! let matches = MatchSets::resolve(source, &["**/*.txt"], &["**/secret.txt"])?;
//! assert!(matches.admits(Path::new("notes.txt"), false));
//! ```

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

mod error;
mod matches;
mod resolve;

pub use error::GlobError;
pub use matches::MatchSets;
pub use resolve::{build_glob_set, resolve_matches};

/// Pattern used when no include patterns are configured.
pub const MATCH_ALL: &str = "**/*";
