//! Output formatting and styling module.
//!
//! Provides a centralized interface for all CLI output: colored notices for
//! each moved, skipped or failed entry, a progress bar for the pass, and the
//! closing summary table.

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;

/// Manages all CLI output with consistent styling and formatting.
///
/// This struct provides methods for:
/// - Success messages (green with ✓)
/// - Error messages (red with ✗)
/// - Warning messages (yellow with ⚠)
/// - Info messages (cyan)
/// - Progress bars for the organization pass
/// - Summary tables with statistics
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use tidydl::output::OutputFormatter;
    /// OutputFormatter::success("Moved file: report.pdf → 02. Document/");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use tidydl::output::OutputFormatter;
    /// OutputFormatter::info("Organizing directory: /home/user/Downloads");
    /// ```
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a regular message without styling.
    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints a dry-run notice message.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[DRY RUN] {}", message).yellow());
    }

    /// Creates a progress bar over the entries of a pass.
    ///
    /// The bar draws to stderr and stays hidden when stderr is not a terminal.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use tidydl::output::OutputFormatter;
    /// let pb = OutputFormatter::create_progress_bar(100);
    /// pb.inc(1);
    /// pb.finish_and_clear();
    /// ```
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        let template = "{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}";
        if let Ok(style) = ProgressStyle::default_bar().template(template) {
            pb.set_style(style.progress_chars("█▓░"));
        }
        pb
    }

    /// Prints a summary table with the number of moved entries per directory.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use tidydl::output::OutputFormatter;
    /// use std::collections::BTreeMap;
    ///
    /// let mut counts = BTreeMap::new();
    /// counts.insert("01. Folder".to_string(), 2);
    /// counts.insert("02. Document".to_string(), 15);
    /// OutputFormatter::summary_table(&counts, 17);
    /// ```
    pub fn summary_table(category_counts: &BTreeMap<String, usize>, total_moved: usize) {
        Self::header("SUMMARY");

        let max_category_len = category_counts
            .keys()
            .map(|name| name.chars().count())
            .max()
            .unwrap_or(0)
            .max(9); // At least "Directory" width

        println!(
            "{:<width$} | {}",
            "Directory".bold(),
            "Entries".bold(),
            width = max_category_len
        );
        println!("{}", "-".repeat(max_category_len + 12));

        for (category, count) in category_counts {
            let entry_word = if *count == 1 { "entry" } else { "entries" };
            println!(
                "{:<width$} | {} {}",
                category,
                count.to_string().green(),
                entry_word,
                width = max_category_len
            );
        }

        println!("{}", "-".repeat(max_category_len + 12));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total_moved.to_string().green().bold(),
            if total_moved == 1 { "entry" } else { "entries" },
            width = max_category_len
        );
    }
}
