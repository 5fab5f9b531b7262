//! Progress display for the CLI.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::time::Duration;

use cpdirplus_operations::CopyProgress;
use indicatif::{ProgressBar, ProgressStyle};

/// Spinner showing files copied so far.
///
/// The number of files is not known up front, so this is a spinner with a
/// running count rather than a bar. Safe to update from worker threads.
pub struct ProgressManager {
    bar: ProgressBar,
}

impl ProgressManager {
    /// Create a progress display. When `enabled` is false nothing is drawn.
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        if !enabled {
            return Self {
                bar: ProgressBar::hidden(),
            };
        }

        let bar = ProgressBar::new_spinner();
        if let Ok(style) =
            ProgressStyle::default_spinner().template("  {spinner:.green} {prefix} files {wide_msg:.dim}")
        {
            bar.set_style(style);
        }
        bar.enable_steady_tick(Duration::from_millis(100));

        Self { bar }
    }

    /// Reflect one materialized file.
    pub fn update(&self, progress: &CopyProgress) {
        self.bar.set_prefix(progress.files_copied.to_string());
        if let Some(current) = &progress.current_file {
            self.bar.set_message(current.clone());
        }
    }

    /// Remove the spinner from the terminal.
    pub fn clear(&self) {
        self.bar.finish_and_clear();
    }
}
