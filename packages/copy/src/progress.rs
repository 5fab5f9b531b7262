//! Progress tracking for tree transfers.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::sync::atomic::{AtomicU64, Ordering};

/// Progress information for a transfer.
#[derive(Debug, Clone)]
pub struct CopyProgress {
    /// Number of files materialized so far.
    pub files_copied: u64,
    /// Number of bytes written so far.
    pub bytes_copied: u64,
    /// Current file being copied (if any).
    pub current_file: Option<String>,
}

/// Thread-safe transfer counters using atomics.
///
/// Shared by every worker of one transfer; each counter only ever grows.
#[derive(Debug, Default)]
pub struct TransferStats {
    files_copied: AtomicU64,
    bytes_copied: AtomicU64,
    files_existing: AtomicU64,
    directories: AtomicU64,
    renamed: AtomicU64,
    dropped: AtomicU64,
    filtered: AtomicU64,
}

impl TransferStats {
    /// Create a zeroed set of counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a materialized file of `bytes` bytes.
    pub fn record_copied(&self, bytes: u64) {
        self.files_copied.fetch_add(1, Ordering::SeqCst);
        self.bytes_copied.fetch_add(bytes, Ordering::SeqCst);
    }

    /// Record a file left alone because the target already existed.
    pub fn record_existing(&self) {
        self.files_existing.fetch_add(1, Ordering::SeqCst);
    }

    /// Record a fully traversed subdirectory.
    pub fn record_directory(&self) {
        self.directories.fetch_add(1, Ordering::SeqCst);
    }

    /// Record a post-copy rename.
    pub fn record_renamed(&self) {
        self.renamed.fetch_add(1, Ordering::SeqCst);
    }

    /// Record an entry a pipeline stage dropped.
    pub fn record_dropped(&self) {
        self.dropped.fetch_add(1, Ordering::SeqCst);
    }

    /// Record an entry rejected by include/exclude/test filtering.
    pub fn record_filtered(&self) {
        self.filtered.fetch_add(1, Ordering::SeqCst);
    }

    #[must_use]
    pub fn files_copied(&self) -> u64 {
        self.files_copied.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn bytes_copied(&self) -> u64 {
        self.bytes_copied.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn files_existing(&self) -> u64 {
        self.files_existing.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn directories(&self) -> u64 {
        self.directories.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn renamed(&self) -> u64 {
        self.renamed.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn filtered(&self) -> u64 {
        self.filtered.load(Ordering::SeqCst)
    }

    /// Get a progress snapshot.
    #[must_use]
    pub fn snapshot(&self, current_file: Option<String>) -> CopyProgress {
        CopyProgress {
            files_copied: self.files_copied(),
            bytes_copied: self.bytes_copied(),
            current_file,
        }
    }
}
