//! cpdirplus CLI entry point.
//!
//! Copies (or moves) a directory tree with glob filters, renames, and
//! content replacements.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

mod args;
mod output;
mod progress;

use std::env;

use clap::Parser;

use args::Args;
use cpdirplus_config::load_config;
use cpdirplus_operations::{CopyOptions, TreeCopy};
use progress::ProgressManager;

fn main() {
    let args = Args::parse();

    // Set up logging
    if args.verbose {
        // SAFETY: We're setting this before any other threads are spawned
        unsafe {
            env::set_var("RUST_LOG", "debug");
        }
    }
    pretty_env_logger::init();

    if let Err(e) = run(&args) {
        output::print_error(&e.to_string());
        std::process::exit(1);
    }
}

/// Main application logic.
fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let options = build_options(args)?;

    if let (Some(from), Some(to)) = (&options.from, &options.to) {
        output::print_header(options.transfer_mode(), from, to);
    }

    let mode = options.transfer_mode();
    let progress = ProgressManager::new(args.should_show_progress());

    let mut copy = TreeCopy::new(options);
    if let Some(base) = &args.base {
        copy = copy.base_dir(base);
    }

    let result = copy.run_with_progress(|p| progress.update(p));
    progress.clear();
    let report = result?;

    log::debug!("{report:?}");

    output::print_report(&report);
    println!();
    output::print_success(mode);
    Ok(())
}

/// Command-line options merged over the config file, if one was given.
fn build_options(args: &Args) -> Result<CopyOptions, Box<dyn std::error::Error>> {
    let overrides = args.to_options();

    let Some(path) = &args.config else {
        return Ok(overrides);
    };

    let loaded = load_config(path)?;
    output::print_config_path(&loaded.config_path);

    Ok(loaded.options.merge(overrides))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    use cpdirplus_config::TransferMode;
    use tempfile::TempDir;

    #[test]
    fn test_flags_override_config() {
        let dir = TempDir::new().unwrap();
        let config = dir.path().join("cpdirplus.toml");
        fs::write(
            &config,
            r#"
from = "assets"
to = "public"
include = "**/*.png"
concurrency = 8

[renameFiles]
"_gitignore" = ".gitignore"
"#,
        )
        .unwrap();

        let args = Args::try_parse_from([
            "cpdirplus",
            "-c",
            config.to_str().unwrap(),
            "--to",
            "dist",
            "--rename",
            "_npmrc=.npmrc",
            "-m",
        ])
        .unwrap();

        let options = build_options(&args).unwrap();

        assert_eq!(options.from, Some(PathBuf::from("assets")));
        assert_eq!(options.to, Some(PathBuf::from("dist")));
        assert_eq!(options.concurrency, Some(8));
        assert_eq!(options.transfer_mode(), TransferMode::Move);
        assert_eq!(options.rename_files.len(), 2);
    }

    #[test]
    fn test_missing_config_is_an_error() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.toml");

        let args =
            Args::try_parse_from(["cpdirplus", "-c", missing.to_str().unwrap(), "a", "b"]).unwrap();

        assert!(build_options(&args).is_err());
    }

    #[test]
    fn test_run_copies_tree() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src");
        fs::create_dir_all(src.join("nested")).unwrap();
        fs::write(src.join("nested/a.txt"), "hello").unwrap();

        let args = Args::try_parse_from([
            "cpdirplus",
            "--no-progress",
            "-b",
            dir.path().to_str().unwrap(),
            "src",
            "out",
        ])
        .unwrap();

        run(&args).unwrap();

        assert_eq!(
            fs::read_to_string(dir.path().join("out/nested/a.txt")).unwrap(),
            "hello"
        );
    }
}
