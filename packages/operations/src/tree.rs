//! Entry point for a whole tree transfer.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use cpdirplus_config::{CopyOptions, TransferMode};
use cpdirplus_copy::{CopyProgress, TransferStats};
use cpdirplus_glob::MatchSets;

use crate::context::DirLevel;
use crate::engine::{Engine, MoveLedger};
use crate::error::OperationError;
use crate::pipeline::{Pipeline, Plugin};
use crate::replacement::ReplacementPlugin;
use crate::request::CopyRequest;

type FinishFn = Box<dyn FnOnce() + Send>;

/// Summary of a finished transfer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CopyReport {
    /// Copy or move.
    pub mode: TransferMode,
    /// Files created at the destination.
    pub files_copied: u64,
    /// Bytes written at the destination.
    pub bytes_copied: u64,
    /// Files left alone because the target already existed.
    pub files_existing: u64,
    /// Subdirectories traversed.
    pub directories: u64,
    /// Files that ended up under a renamed name.
    pub renamed: u64,
    /// Entries dropped by a pipeline stage.
    pub dropped: u64,
    /// Entries rejected by include/exclude or the name test.
    pub filtered: u64,
    /// Source files removed by a move.
    pub sources_removed: u64,
}

impl CopyReport {
    fn collect(mode: TransferMode, stats: &TransferStats, sources_removed: u64) -> Self {
        Self {
            mode,
            files_copied: stats.files_copied(),
            bytes_copied: stats.bytes_copied(),
            files_existing: stats.files_existing(),
            directories: stats.directories(),
            renamed: stats.renamed(),
            dropped: stats.dropped(),
            filtered: stats.filtered(),
            sources_removed,
        }
    }
}

/// Builder for one tree transfer.
///
/// Each call to [`TreeCopy::run`] builds its own pipeline and worker pool, so
/// nothing leaks between transfers.
///
/// # Example
///
/// ```rust,ignore
/// use cpdirplus_operations::TreeCopy;
///
/// let report = TreeCopy::new(options)
///     .plugin(MyPlugin)
///     .on_finish(|| println!("done"))
///     .run()?;
/// ```
pub struct TreeCopy {
    options: CopyOptions,
    base: Option<PathBuf>,
    plugins: Vec<Box<dyn Plugin>>,
    on_finish: Option<FinishFn>,
}

impl TreeCopy {
    #[must_use]
    pub fn new(options: CopyOptions) -> Self {
        Self {
            options,
            base: None,
            plugins: Vec::new(),
            on_finish: None,
        }
    }

    /// Resolve relative `from`/`to` against `base` instead of the current directory.
    #[must_use]
    pub fn base_dir(mut self, base: impl Into<PathBuf>) -> Self {
        self.base = Some(base.into());
        self
    }

    /// Append a plugin. Plugins register their stages in the order added.
    #[must_use]
    pub fn plugin(mut self, plugin: impl Plugin + 'static) -> Self {
        self.plugins.push(Box::new(plugin));
        self
    }

    /// Append several plugins.
    #[must_use]
    pub fn plugins(mut self, plugins: impl IntoIterator<Item = Box<dyn Plugin>>) -> Self {
        self.plugins.extend(plugins);
        self
    }

    /// Called exactly once when the root directory has been fully processed.
    ///
    /// Not called if the transfer fails.
    #[must_use]
    pub fn on_finish(mut self, on_finish: impl FnOnce() + Send + 'static) -> Self {
        self.on_finish = Some(Box::new(on_finish));
        self
    }

    /// Run the transfer.
    ///
    /// # Errors
    ///
    /// * If the options are invalid
    /// * If the source cannot be read
    /// * If any pipeline stage fails
    /// * If any filesystem operation fails
    pub fn run(self) -> Result<CopyReport, OperationError> {
        self.run_with_progress(|_| {})
    }

    /// Run the transfer, reporting each materialized file to `on_progress`.
    ///
    /// `on_progress` may be called from several worker threads at once.
    ///
    /// # Errors
    ///
    /// * If the options are invalid
    /// * If the source cannot be read
    /// * If any pipeline stage fails
    /// * If any filesystem operation fails
    pub fn run_with_progress<F>(self, on_progress: F) -> Result<CopyReport, OperationError>
    where
        F: Fn(&CopyProgress) + Sync,
    {
        let request = CopyRequest::resolve(self.options, self.base.as_deref())?;

        check_source(&request.from)?;

        let matches = MatchSets::resolve(&request.from, &request.include, &request.exclude)?;
        log::debug!(
            "{} included, {} excluded path(s) under {}",
            matches.include_len(),
            matches.exclude_len(),
            request.from.display()
        );

        let pipeline = build_pipeline(&request, self.plugins)?;

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(request.concurrency)
            .build()?;

        let stats = TransferStats::new();
        let ledger = (request.mode == TransferMode::Move).then(MoveLedger::default);
        let finished = AtomicBool::new(false);
        let on_finish = self.on_finish;

        let engine = Engine {
            matches: &matches,
            test: request.test.as_ref(),
            pipeline: &pipeline,
            stats: &stats,
            on_progress: &on_progress,
            ledger: ledger.as_ref(),
            destination: &request.to,
        };

        let root = DirLevel {
            from: request.from.clone(),
            to: request.to.clone(),
            relative: PathBuf::new(),
            rename_files: Arc::clone(&request.rename_files),
            raw: Arc::clone(&request.raw),
        };

        log::debug!(
            "Starting {} of {} -> {} with {} worker(s)",
            request.mode,
            request.from.display(),
            request.to.display(),
            request.concurrency
        );

        pool.install(|| {
            engine.copy_dir(&root, || {
                finished.store(true, Ordering::SeqCst);
                if let Some(on_finish) = on_finish {
                    on_finish();
                }
            })
        })?;

        // An Ok traversal has recorded every root entry, so the root tracker
        // has fired. Guards the tracker's contract rather than a runtime path.
        debug_assert!(finished.load(Ordering::SeqCst));
        if !finished.load(Ordering::SeqCst) {
            return Err(OperationError::Incomplete { path: request.from });
        }

        let sources_removed = match ledger {
            Some(ledger) => ledger.clean_up(&request.from)?,
            None => 0,
        };

        Ok(CopyReport::collect(request.mode, &stats, sources_removed))
    }
}

impl fmt::Debug for TreeCopy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeCopy")
            .field("options", &self.options)
            .field("base", &self.base)
            .field(
                "plugins",
                &self.plugins.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

/// Copy the tree at `from` into `to`.
///
/// `from` and `to` override whatever `options` carries.
///
/// # Errors
///
/// * See [`TreeCopy::run`]
pub fn copy_tree(
    from: impl Into<PathBuf>,
    to: impl Into<PathBuf>,
    options: CopyOptions,
) -> Result<CopyReport, OperationError> {
    TreeCopy::new(CopyOptions {
        from: Some(from.into()),
        to: Some(to.into()),
        ..options
    })
    .run()
}

/// The source root must be an existing directory before anything is written.
fn check_source(from: &Path) -> Result<(), OperationError> {
    let metadata = fs::metadata(from).map_err(|source| OperationError::ReadSource {
        path: from.to_path_buf(),
        source,
    })?;

    if metadata.is_dir() {
        Ok(())
    } else {
        Err(OperationError::ReadSource {
            path: from.to_path_buf(),
            source: io::Error::from(io::ErrorKind::NotADirectory),
        })
    }
}

/// Build the per-transfer pipeline, with the replacement plugin first when
/// replacements are configured.
fn build_pipeline(
    request: &CopyRequest,
    plugins: Vec<Box<dyn Plugin>>,
) -> Result<Pipeline, OperationError> {
    let mut all: Vec<Box<dyn Plugin>> = Vec::with_capacity(plugins.len() + 1);

    if !request.raw.replacements.is_empty() {
        all.push(Box::new(ReplacementPlugin::new(&request.raw.replacements)?));
    }
    all.extend(plugins);

    let mut pipeline = Pipeline::new();
    for plugin in &all {
        log::debug!("Registering plugin `{}`", plugin.name());
        plugin.on_before_copy(&mut pipeline);
    }

    Ok(pipeline)
}
