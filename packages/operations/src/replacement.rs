//! Built-in content replacement plugin.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::fs;
use std::sync::Arc;

use cpdirplus_config::{ConfigError, ReplacementRule};
use globset::GlobSet;
use regex::Regex;

use crate::context::EntryContext;
use crate::error::OperationError;
use crate::pipeline::{Pipeline, Plugin, StageError, StageOutcome};

#[derive(Debug)]
enum Matcher {
    Literal(String),
    Regex(Regex),
}

#[derive(Debug)]
struct CompiledRule {
    matcher: Matcher,
    replace: String,
    files: Option<GlobSet>,
}

impl CompiledRule {
    fn compile(rule: &ReplacementRule) -> Result<Self, OperationError> {
        if rule.search.is_empty() {
            return Err(ConfigError::Invalid {
                field: "replacements",
                message: "search text must not be empty".to_string(),
            }
            .into());
        }

        let matcher = if rule.regex {
            Matcher::Regex(Regex::new(&rule.search).map_err(|source| {
                OperationError::InvalidPattern {
                    field: "replacements",
                    pattern: rule.search.clone(),
                    source,
                }
            })?)
        } else {
            Matcher::Literal(rule.search.clone())
        };

        let files = if rule.files.is_empty() {
            None
        } else {
            Some(cpdirplus_glob::build_glob_set(&rule.files)?)
        };

        Ok(Self {
            matcher,
            replace: rule.replace.clone(),
            files,
        })
    }

    fn applies_to(&self, filename: &str) -> bool {
        self.files.as_ref().is_none_or(|files| files.is_match(filename))
    }

    fn apply(&self, text: &str) -> String {
        match &self.matcher {
            Matcher::Literal(search) => text.replace(search.as_str(), &self.replace),
            Matcher::Regex(regex) => regex.replace_all(text, self.replace.as_str()).into_owned(),
        }
    }
}

/// Rewrites file contents using [`ReplacementRule`]s.
///
/// Registers a single `replacement` stage. Rules whose `files` globs match the
/// entry's file name are applied in order; when the text changes, the result
/// is handed to the engine through [`EntryContext::contents`]. Directories and
/// files that are not valid UTF-8 pass through untouched.
#[derive(Debug, Clone)]
pub struct ReplacementPlugin {
    rules: Arc<Vec<CompiledRule>>,
}

impl ReplacementPlugin {
    /// Compile `rules`.
    ///
    /// # Errors
    ///
    /// * If a rule has empty search text
    /// * If a regex rule or a `files` glob fails to compile
    pub fn new(rules: &[ReplacementRule]) -> Result<Self, OperationError> {
        let rules = rules
            .iter()
            .map(CompiledRule::compile)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            rules: Arc::new(rules),
        })
    }
}

impl Plugin for ReplacementPlugin {
    fn name(&self) -> &str {
        "replacement"
    }

    fn on_before_copy(&self, pipeline: &mut Pipeline) {
        let rules = Arc::clone(&self.rules);
        pipeline.tap(self.name(), move |ctx| replace_contents(&rules, ctx));
    }
}

fn replace_contents(
    rules: &[CompiledRule],
    mut ctx: EntryContext,
) -> Result<StageOutcome, StageError> {
    let applicable: Vec<&CompiledRule> = rules
        .iter()
        .filter(|rule| rule.applies_to(&ctx.filename))
        .collect();

    if applicable.is_empty() {
        return Ok(StageOutcome::Continue(ctx));
    }

    let source = ctx.source_path();
    if !source.is_file() {
        return Ok(StageOutcome::Continue(ctx));
    }

    let supplied = ctx.contents.take();
    let had_override = supplied.is_some();
    let bytes = match supplied {
        Some(bytes) => bytes,
        None => fs::read(&source)?,
    };

    let original = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            log::debug!("Not rewriting non UTF-8 file {}", source.display());
            if had_override {
                ctx.contents = Some(e.into_bytes());
            }
            return Ok(StageOutcome::Continue(ctx));
        }
    };

    let replaced = applicable
        .iter()
        .fold(original.clone(), |text, rule| rule.apply(&text));

    if replaced != original {
        log::debug!("Rewrote contents of {}", ctx.relative_path().display());
        ctx.contents = Some(replaced.into_bytes());
    } else if had_override {
        ctx.contents = Some(original.into_bytes());
    }

    Ok(StageOutcome::Continue(ctx))
}
