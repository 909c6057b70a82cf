//! Command-line interface module for tidydl.
//!
//! This module handles all CLI-related functionality including:
//! - Argument parsing
//! - Resolving the downloads directory and category tables
//! - Setting up the per-run log file
//! - Running the organization pass and printing its progress

use crate::config::{self, CategoryConfig};
use crate::file_category::FileClassifier;
use crate::file_organizer::{DownloadsOrganizer, EntryKind, OrganizeReport, Outcome, Progress};
use crate::logging::{self, RunLog};
use crate::output::OutputFormatter;
use clap::Parser;
use std::path::{Path, PathBuf};

/// Sort a downloads directory into numbered category folders.
#[derive(Debug, Parser)]
#[command(name = "tidydl", version, about)]
pub struct Cli {
    /// Directory to organize. Defaults to $DOWNLOADS_DIRECTORY.
    pub directory: Option<PathBuf>,

    /// Show what would be moved without changing anything.
    #[arg(long)]
    pub dry_run: bool,

    /// Category table configuration file (TOML).
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory for the run log. Defaults to logs/ next to the executable.
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    /// Do not write a log file.
    #[arg(long)]
    pub no_log: bool,
}

/// Runs the CLI application with parsed arguments.
///
/// This is the main entry point for CLI operations. Configuration errors are
/// returned before anything on disk is touched; errors on individual entries
/// are printed and do not make the run fail.
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use tidydl::cli::{run_cli, Cli};
///
/// let cli = Cli::parse_from(["tidydl", "/home/user/Downloads", "--dry-run"]);
/// if let Err(e) = run_cli(cli) {
///     eprintln!("Error: {}", e);
/// }
/// ```
pub fn run_cli(cli: Cli) -> Result<OrganizeReport, String> {
    let root = config::resolve_root(cli.directory.as_deref(), config::root_from_env())
        .map_err(|e| e.to_string())?;
    let categories = CategoryConfig::load(cli.config.as_deref())
        .map_err(|e| format!("Error loading configuration: {}", e))?;

    let run_log = if cli.no_log {
        None
    } else {
        let log_dir = cli.log_dir.clone().unwrap_or_else(logging::default_log_dir);
        match RunLog::init(&log_dir) {
            Ok(run_log) => Some(run_log),
            Err(e) => {
                OutputFormatter::warning(&format!("{}; continuing without a log file", e));
                None
            }
        }
    };

    let log_dir = run_log.as_ref().and_then(|log| log.dir());
    let report = organize_directory(&root, &categories, cli.dry_run, log_dir)?;

    if let Some(run_log) = &run_log
        && !report.is_complete_success()
    {
        OutputFormatter::plain(&format!("Details in {}", run_log.path().display()));
    }

    Ok(report)
}

/// Organizes `root` and prints progress and a summary.
///
/// `keep` names a directory (typically the log directory) that must not be
/// moved even if it sits at the top level of `root`.
pub fn organize_directory(
    root: &Path,
    categories: &CategoryConfig,
    dry_run: bool,
    keep: Option<&Path>,
) -> Result<OrganizeReport, String> {
    if dry_run {
        OutputFormatter::dry_run_notice(&format!("Analyzing contents of: {}", root.display()));
    } else {
        OutputFormatter::info(&format!("Organizing contents of: {}", root.display()));
    }

    let mut organizer =
        DownloadsOrganizer::new(root, FileClassifier::with_config(categories)).dry_run(dry_run);
    if let Some(keep) = keep {
        organizer = organizer.exclude(keep);
    }

    let mut progress_bar = None;
    let report = organizer
        .run_with(|progress| match progress {
            Progress::Started { total } => {
                progress_bar = Some(OutputFormatter::create_progress_bar(total as u64));
            }
            Progress::CreatedDir(path) => {
                let name = display_name(path);
                with_bar(&progress_bar, || {
                    if dry_run {
                        OutputFormatter::dry_run_notice(&format!("Would create {}/", name));
                    } else {
                        OutputFormatter::plain(&format!("Created {}/", name));
                    }
                });
            }
            Progress::Entry(outcome) => {
                with_bar(&progress_bar, || print_outcome(outcome, dry_run));
                if let Some(pb) = &progress_bar {
                    pb.inc(1);
                }
            }
        })
        .map_err(|e| format!("Error: {}", e))?;

    if let Some(pb) = progress_bar {
        pb.finish_and_clear();
    }

    print_summary(&report);
    Ok(report)
}

/// Runs `print` without the progress bar getting in the way.
fn with_bar(progress_bar: &Option<indicatif::ProgressBar>, print: impl FnOnce()) {
    match progress_bar {
        Some(pb) => pb.suspend(print),
        None => print(),
    }
}

fn print_outcome(outcome: &Outcome, dry_run: bool) {
    match outcome {
        Outcome::Moved(mv) => {
            let kind = match mv.kind {
                EntryKind::Directory => "directory",
                EntryKind::File => "file",
            };
            let message = format!(
                "{} {}: {} → {}/",
                if dry_run { "Would move" } else { "Moved" },
                kind,
                display_name(&mv.source),
                mv.category
            );
            if dry_run {
                OutputFormatter::dry_run_notice(&message);
            } else {
                OutputFormatter::success(&message);
            }
        }
        Outcome::Kept(_) => {}
        Outcome::Skipped { path, reason } => {
            OutputFormatter::warning(&format!("Skipped {}: {}", display_name(path), reason));
        }
        Outcome::Failed { path, reason } => {
            OutputFormatter::error(&format!("{}: {}", display_name(path), reason));
        }
    }
}

fn print_summary(report: &OrganizeReport) {
    if report.total_moved() == 0 && report.is_complete_success() {
        OutputFormatter::plain("\nNothing to organize.");
        return;
    }

    OutputFormatter::summary_table(&report.category_counts(), report.total_moved());

    if !report.skipped.is_empty() {
        OutputFormatter::warning(&format!(
            "{} entries skipped because the destination already exists",
            report.skipped.len()
        ));
    }
    if !report.failed.is_empty() {
        OutputFormatter::error(&format!(
            "{} entries could not be organized. Please review errors above.",
            report.failed.len()
        ));
    }

    if report.dry_run {
        OutputFormatter::plain("\n✓ Dry run complete. No files were modified.");
    } else {
        OutputFormatter::plain("\nOrganization complete!");
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
