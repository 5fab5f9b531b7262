//! Terminal output formatting.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use std::path::Path;

use colored::Colorize;
use cpdirplus_config::TransferMode;
use cpdirplus_operations::CopyReport;

/// Print the transfer about to run.
pub fn print_header(mode: TransferMode, from: &Path, to: &Path) {
    let verb = match mode {
        TransferMode::Copy => "Copying",
        TransferMode::Move => "Moving",
    };
    println!(
        "{} {} {} {}",
        verb.bold(),
        from.display().to_string().cyan(),
        "→".dimmed(),
        to.display().to_string().cyan()
    );
}

/// Print the options file in use.
pub fn print_config_path(path: &Path) {
    println!("Config: {}", path.display().to_string().yellow());
}

/// Print the counts of a finished transfer.
pub fn print_report(report: &CopyReport) {
    print_count("copied", report.files_copied);
    print_count("already present", report.files_existing);
    print_count("renamed", report.renamed);
    print_count("dropped by plugins", report.dropped);
    print_count("filtered out", report.filtered);
    if report.mode == TransferMode::Move {
        print_count("sources removed", report.sources_removed);
    }
    println!(
        "  {} {} in {} director{}",
        "•".dimmed(),
        format_bytes(report.bytes_copied),
        report.directories,
        if report.directories == 1 { "y" } else { "ies" }
    );
}

fn print_count(label: &str, count: u64) {
    if count > 0 {
        println!("  {} {:<20} {}", "✓".green(), label, count);
    }
}

#[allow(clippy::cast_precision_loss)]
fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KiB", "MiB", "GiB", "TiB"];

    if bytes < 1024 {
        return format!("{bytes} B");
    }

    let mut value = bytes as f64 / 1024.0;
    let mut unit = UNITS[0];
    for next in &UNITS[1..] {
        if value < 1024.0 {
            break;
        }
        value /= 1024.0;
        unit = next;
    }
    format!("{value:.1} {unit}")
}

/// Print success message.
pub fn print_success(mode: TransferMode) {
    let label = match mode {
        TransferMode::Copy => "Copy",
        TransferMode::Move => "Move",
    };
    println!("{} {label} complete!", "✅");
}

/// Print error message.
pub fn print_error(message: &str) {
    eprintln!("{} {}", "Error:".red().bold(), message);
}
