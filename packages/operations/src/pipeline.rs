//! Ordered, short-circuitable transformation pipeline.
//!
//! Stages run in registration order and each stage receives the context the
//! previous one produced. A stage can pass the context on (possibly modified),
//! drop the entry with [`StageOutcome::Skip`], or fail, which aborts the
//! remaining stages and the whole transfer.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::fmt;

use crate::context::EntryContext;
use crate::error::OperationError;

/// Error type stages report failures with.
pub type StageError = Box<dyn std::error::Error + Send + Sync>;

/// What a stage decided for an entry.
#[derive(Debug)]
pub enum StageOutcome {
    /// Hand this context to the next stage.
    Continue(EntryContext),
    /// Drop the entry. It is counted as processed but nothing is written.
    Skip,
}

type StageFn = dyn Fn(EntryContext) -> Result<StageOutcome, StageError> + Send + Sync;

struct Stage {
    name: String,
    handler: Box<StageFn>,
}

/// An ordered chain of stages, built fresh for every transfer.
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Stage>,
}

impl Pipeline {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage.
    pub fn tap<F>(&mut self, name: impl Into<String>, handler: F)
    where
        F: Fn(EntryContext) -> Result<StageOutcome, StageError> + Send + Sync + 'static,
    {
        let name = name.into();
        log::debug!("Registering pipeline stage `{name}`");
        self.stages.push(Stage {
            name,
            handler: Box::new(handler),
        });
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Names of the registered stages, in execution order.
    pub fn stage_names(&self) -> impl Iterator<Item = &str> {
        self.stages.iter().map(|stage| stage.name.as_str())
    }

    /// Run `ctx` through every stage.
    ///
    /// Returns `None` when a stage dropped the entry.
    ///
    /// # Errors
    ///
    /// * If any stage fails; later stages are not run
    pub fn run(&self, mut ctx: EntryContext) -> Result<Option<EntryContext>, OperationError> {
        for stage in &self.stages {
            let path = ctx.relative_path().to_path_buf();

            match (stage.handler)(ctx) {
                Ok(StageOutcome::Continue(next)) => ctx = next,
                Ok(StageOutcome::Skip) => {
                    log::debug!("Stage `{}` dropped {}", stage.name, path.display());
                    return Ok(None);
                }
                Err(source) => {
                    return Err(OperationError::Plugin {
                        stage: stage.name.clone(),
                        path,
                        source,
                    });
                }
            }
        }

        Ok(Some(ctx))
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.stage_names()).finish()
    }
}

/// Something that extends the pipeline before a transfer starts.
///
/// `on_before_copy` is called exactly once per transfer, in plugin order,
/// before any entry is enumerated.
pub trait Plugin: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Register this plugin's stages.
    fn on_before_copy(&self, pipeline: &mut Pipeline);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use cpdirplus_config::CopyOptions;

    fn ctx(name: &str) -> EntryContext {
        EntryContext::new("/src", "/dist", name, Arc::new(CopyOptions::default()))
    }

    #[test]
    fn test_empty_pipeline_passes_through() {
        let pipeline = Pipeline::new();
        let result = pipeline.run(ctx("a.txt")).unwrap().unwrap();
        assert_eq!(result.filename, "a.txt");
    }

    #[test]
    fn test_stages_run_in_order() {
        let mut pipeline = Pipeline::new();
        pipeline.tap("first", |mut ctx| {
            ctx.filename.push_str(".1");
            Ok(StageOutcome::Continue(ctx))
        });
        pipeline.tap("second", |mut ctx| {
            ctx.filename.push_str(".2");
            Ok(StageOutcome::Continue(ctx))
        });

        let result = pipeline.run(ctx("a")).unwrap().unwrap();

        assert_eq!(result.filename, "a.1.2");
        assert_eq!(
            pipeline.stage_names().collect::<Vec<_>>(),
            vec!["first", "second"]
        );
    }

    #[test]
    fn test_skip_short_circuits() {
        let later_calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&later_calls);

        let mut pipeline = Pipeline::new();
        pipeline.tap("drop", |_| Ok(StageOutcome::Skip));
        pipeline.tap("after", move |ctx| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(StageOutcome::Continue(ctx))
        });

        assert!(pipeline.run(ctx("a")).unwrap().is_none());
        assert_eq!(later_calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_failure_names_stage_and_entry() {
        let mut pipeline = Pipeline::new();
        pipeline.tap("broken", |_| Err("boom".into()));

        let err = pipeline.run(ctx("a.txt")).unwrap_err();

        match err {
            OperationError::Plugin {
                stage,
                path,
                source,
            } => {
                assert_eq!(stage, "broken");
                assert_eq!(path, PathBuf::from("a.txt"));
                assert_eq!(source.to_string(), "boom");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
