//! Error types for copy operations.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;

/// Errors that can occur during copy operations.
#[derive(Debug, thiserror::Error)]
pub enum CopyError {
    /// Failed to create target directory.
    #[error("Failed to create directory {}: {io_error}", path.display())]
    CreateDirError {
        /// The directory path.
        path: PathBuf,
        /// The underlying IO error.
        io_error: std::io::Error,
    },

    /// Failed to copy a file.
    #[error("Failed to copy {} to {}: {io_error}", source_path.display(), target_path.display())]
    FileCopyError {
        /// Source file path.
        source_path: PathBuf,
        /// Target file path.
        target_path: PathBuf,
        /// The underlying IO error.
        io_error: std::io::Error,
    },

    /// Failed to write rewritten content.
    #[error("Failed to write {}: {io_error}", path.display())]
    WriteError {
        /// The file path.
        path: PathBuf,
        /// The underlying IO error.
        io_error: std::io::Error,
    },

    /// Failed to rename a copied entry.
    #[error("Failed to rename {} to {}: {io_error}", source_path.display(), target_path.display())]
    RenameError {
        /// Path before the rename.
        source_path: PathBuf,
        /// Path after the rename.
        target_path: PathBuf,
        /// The underlying IO error.
        io_error: std::io::Error,
    },

    /// Failed to remove a source entry after a move.
    #[error("Failed to remove {}: {io_error}", path.display())]
    RemoveError {
        /// The path being removed.
        path: PathBuf,
        /// The underlying IO error.
        io_error: std::io::Error,
    },
}

impl CopyError {
    /// The underlying IO error.
    #[must_use]
    pub const fn io_error(&self) -> &std::io::Error {
        match self {
            Self::CreateDirError { io_error, .. }
            | Self::FileCopyError { io_error, .. }
            | Self::WriteError { io_error, .. }
            | Self::RenameError { io_error, .. }
            | Self::RemoveError { io_error, .. } => io_error,
        }
    }
}
