//! Error types for glob resolution.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while resolving glob patterns.
#[derive(Debug, Error)]
pub enum GlobError {
    /// A pattern could not be compiled.
    #[error("Invalid glob pattern {pattern:?}: {source}")]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// The underlying globset error.
        #[source]
        source: globset::Error,
    },

    /// Directory traversal failed.
    #[error("Failed to walk {}: {message}", path.display())]
    Walk {
        /// The directory being walked.
        path: PathBuf,
        /// Error message from the walker.
        message: String,
    },
}
