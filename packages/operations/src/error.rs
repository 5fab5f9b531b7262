//! Error types for tree transfers.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::io;
use std::path::PathBuf;

use cpdirplus_config::ConfigError;
use cpdirplus_copy::CopyError;
use cpdirplus_glob::GlobError;
use thiserror::Error;

use crate::pipeline::StageError;

/// Errors that can occur during a tree transfer.
///
/// Every variant is fatal to the whole transfer. Files copied before the
/// failure are left in place.
#[derive(Debug, Error)]
pub enum OperationError {
    /// The options failed validation.
    #[error("Invalid options: {0}")]
    Config(#[from] ConfigError),

    /// The working directory could not be determined.
    #[error("Failed to determine the current directory: {0}")]
    CurrentDir(#[source] io::Error),

    /// The source root could not be read.
    #[error("Failed to read source {}: {source}", path.display())]
    ReadSource {
        /// The source root.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },

    /// A source directory could not be enumerated.
    #[error("Failed to read directory {}: {source}", path.display())]
    ReadDir {
        /// The directory path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },

    /// An entry could not be inspected.
    #[error("Failed to get metadata for {}: {source}", path.display())]
    Metadata {
        /// The entry path.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },

    /// A regular expression option failed to compile.
    #[error("Invalid `{field}` pattern {pattern:?}: {source}")]
    InvalidPattern {
        /// The option the pattern came from.
        field: &'static str,
        /// The offending pattern.
        pattern: String,
        /// The underlying regex error.
        #[source]
        source: regex::Error,
    },

    /// Include/exclude resolution failed.
    #[error(transparent)]
    Glob(#[from] GlobError),

    /// A filesystem side effect failed.
    #[error(transparent)]
    Copy(#[from] CopyError),

    /// A pipeline stage failed.
    #[error("Stage `{stage}` failed on {}: {source}", path.display())]
    Plugin {
        /// Name of the failing stage.
        stage: String,
        /// Entry path relative to the source root.
        path: PathBuf,
        /// The error the stage returned.
        #[source]
        source: StageError,
    },

    /// The worker pool could not be created.
    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// The root directory never reported completion.
    #[error("Transfer of {} finished without processing every entry", path.display())]
    Incomplete {
        /// The source root.
        path: PathBuf,
    },
}

impl OperationError {
    /// The kind of the underlying IO error, if this is a filesystem failure.
    #[must_use]
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        match self {
            Self::CurrentDir(source)
            | Self::ReadSource { source, .. }
            | Self::ReadDir { source, .. }
            | Self::Metadata { source, .. } => Some(source.kind()),
            Self::Copy(error) => Some(error.io_error().kind()),
            _ => None,
        }
    }

    /// Whether this failure was caused by a missing path.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.io_kind() == Some(io::ErrorKind::NotFound)
    }
}
