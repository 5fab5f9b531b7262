//! CLI argument definitions.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::PathBuf;

use clap::Parser;
use cpdirplus_config::{CopyOptions, PatternSet, ReplacementRule, TransferMode};

/// CLI arguments for cpdirplus.
#[derive(Debug, Parser)]
#[command(
    name = "cpdirplus",
    about = "Copy a directory tree with glob filters, renames, and content rewriting",
    version
)]
pub struct Args {
    /// Source directory (used when --from is not given).
    #[arg(index = 1, value_name = "SOURCE")]
    pub source: Option<PathBuf>,

    /// Target directory (used when --to is not given).
    #[arg(index = 2, value_name = "TARGET")]
    pub target: Option<PathBuf>,

    /// Source directory.
    #[arg(long, short = 'f')]
    pub from: Option<PathBuf>,

    /// Target directory.
    #[arg(long, short = 't')]
    pub to: Option<PathBuf>,

    /// Move instead of copy: sources are removed once the tree is transferred.
    #[arg(long = "move", short = 'm', conflicts_with = "copy")]
    pub move_files: bool,

    /// Copy even when the config file asks for a move.
    #[arg(long)]
    pub copy: bool,

    /// Directory that relative paths resolve against (defaults to the current directory).
    #[arg(long, short = 'b')]
    pub base: Option<PathBuf>,

    /// Glob selecting entries to copy (can be specified multiple times).
    #[arg(long, short = 'i')]
    pub include: Vec<String>,

    /// Glob selecting entries to leave out (can be specified multiple times).
    #[arg(long, short = 'e')]
    pub exclude: Vec<String>,

    /// Regular expression every entry name must match.
    #[arg(long)]
    pub test: Option<String>,

    /// Rename a file at the destination, as FROM=TO (can be specified multiple times).
    #[arg(long = "rename", value_name = "FROM=TO", value_parser = parse_pair)]
    pub renames: Vec<(String, String)>,

    /// Replace text in copied files, as SEARCH=REPLACE (can be specified multiple times).
    #[arg(long = "replace", value_name = "SEARCH=REPLACE", value_parser = parse_pair)]
    pub replacements: Vec<(String, String)>,

    /// Options file (.toml or .json). Flags override its values.
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Number of worker threads (defaults to one per CPU).
    #[arg(long, short = 'j')]
    pub jobs: Option<usize>,

    /// Disable the progress bar (useful for CI environments).
    #[arg(long = "no-progress")]
    pub no_progress: bool,

    /// Enable verbose output.
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

impl Args {
    /// Options given on the command line, to be merged over any config file.
    #[must_use]
    pub fn to_options(&self) -> CopyOptions {
        CopyOptions {
            from: self.from.clone().or_else(|| self.source.clone()),
            to: self.to.clone().or_else(|| self.target.clone()),
            test: self.test.clone(),
            include: non_empty(&self.include),
            exclude: non_empty(&self.exclude),
            rename_files: self.renames.iter().cloned().collect(),
            replacements: self
                .replacements
                .iter()
                .map(|(search, replace)| ReplacementRule::literal(search, replace))
                .collect(),
            mode: if self.move_files {
                Some(TransferMode::Move)
            } else if self.copy {
                Some(TransferMode::Copy)
            } else {
                None
            },
            concurrency: self.jobs,
        }
    }

    /// Determine if we should show the progress bar.
    #[must_use]
    pub const fn should_show_progress(&self) -> bool {
        !self.no_progress
    }
}

fn non_empty(patterns: &[String]) -> Option<PatternSet> {
    if patterns.is_empty() {
        None
    } else {
        Some(PatternSet::from(patterns.to_vec()))
    }
}

fn parse_pair(value: &str) -> Result<(String, String), String> {
    match value.split_once('=') {
        Some((key, _)) if key.is_empty() => Err(format!("missing text before '=' in `{value}`")),
        Some((key, val)) => Ok((key.to_string(), val.to_string())),
        None => Err(format!("expected KEY=VALUE, got `{value}`")),
    }
}
