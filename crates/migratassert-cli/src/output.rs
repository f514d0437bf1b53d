//! Output formatting and writing utilities
//!
//! This module provides utilities for formatting and writing output
//! in various formats (JSON, YAML, human-readable), including the
//! migration report and the batch progress bar.
//!
//! Copyright (c) 2025 Migratassert Team
//! Licensed under the Apache-2.0 license

use crate::batch::MigrationSummary;
use crate::cli::OutputFormat;
use crate::error::Result;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use is_terminal::IsTerminal;
use serde::Serialize;
use std::io::{self, Write};

/// Width of the report banner
const BANNER_WIDTH: usize = 60;

/// Report title
pub const REPORT_TITLE: &str = "TABLASSERT MIGRATION REPORT (v4.4.0 -> TC3)";

/// Trait for formatting output with specialized support for common types
pub trait OutputFormatter {
    /// Format a serializable value
    fn format<T: Serialize>(&self, value: &T) -> Result<String>;

    /// Format a batch summary as a report
    fn format_summary(&self, summary: &MigrationSummary, verbose: bool) -> Result<String>;
}

impl OutputFormatter for OutputFormat {
    fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        match self {
            OutputFormat::Json => Ok(serde_json::to_string(value)?),
            OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(value)?),
            OutputFormat::Yaml => Ok(serde_yaml::to_string(value)?),
            // Human format falls back to pretty JSON
            OutputFormat::Human => Ok(serde_json::to_string_pretty(value)?),
        }
    }

    fn format_summary(&self, summary: &MigrationSummary, verbose: bool) -> Result<String> {
        match self {
            OutputFormat::Human => Ok(format_report_human(summary, verbose)),
            _ => self.format(summary),
        }
    }
}

/// Output writer that handles different output formats and colors
pub struct OutputWriter {
    format: OutputFormat,
    use_color: bool,
    show_progress: bool,
    quiet: bool,
    verbose: u8,
    writer: Box<dyn Write>,
}

impl OutputWriter {
    /// Create a new output writer
    pub fn new(format: OutputFormat, use_color: bool, quiet: bool, verbose: u8) -> Self {
        Self {
            format,
            use_color,
            show_progress: !quiet && io::stdout().is_terminal(),
            quiet,
            verbose,
            writer: Box::new(io::stdout()),
        }
    }

    /// Create an output writer with a custom writer
    pub fn with_writer(
        format: OutputFormat,
        use_color: bool,
        quiet: bool,
        verbose: u8,
        writer: Box<dyn Write>,
    ) -> Self {
        Self {
            format,
            use_color,
            show_progress: false, // No progress bars with custom writers
            quiet,
            verbose,
            writer,
        }
    }

    /// Disable progress indicators regardless of the terminal
    pub fn disable_progress(&mut self) {
        self.show_progress = false;
    }

    /// Check if verbose output should be shown
    pub fn is_verbose(&self) -> bool {
        self.verbose > 0
    }

    /// Write raw output
    pub fn write(&mut self, content: &str) -> Result<()> {
        write!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write a line of output
    pub fn writeln(&mut self, content: &str) -> Result<()> {
        writeln!(self.writer, "{}", content)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Write an info message
    pub fn info(&mut self, message: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.blue().to_string())
        } else {
            self.writeln(message)
        }
    }

    /// Write a success message
    pub fn success(&mut self, message: &str) -> Result<()> {
        if self.quiet || self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.green().to_string())
        } else {
            self.writeln(message)
        }
    }

    /// Write a warning message
    pub fn warning(&mut self, message: &str) -> Result<()> {
        if self.format != OutputFormat::Human {
            return Ok(());
        }

        if self.use_color {
            self.writeln(&message.yellow().to_string())
        } else {
            self.writeln(&format!("WARNING: {}", message))
        }
    }

    /// Write the migration report
    ///
    /// Reports are written even in quiet mode, since they are the result
    /// of the command.
    pub fn summary(&mut self, summary: &MigrationSummary) -> Result<()> {
        let formatted = self.format.format_summary(summary, self.is_verbose())?;

        if self.format == OutputFormat::Human && self.use_color {
            let colored = colorize_report(&formatted);
            self.writeln(&colored)
        } else if self.format == OutputFormat::Human {
            self.writeln(&formatted)
        } else {
            self.write(&formatted)
        }
    }

    /// Create a progress bar for long operations
    pub fn progress_bar(&self, length: u64, message: &str) -> Option<ProgressBar> {
        if !self.show_progress || self.format != OutputFormat::Human {
            return None;
        }

        let pb = ProgressBar::new(length);
        pb.set_style(default_progress_style());
        pb.set_message(message.to_string());
        Some(pb)
    }
}

/// Helper function to create a progress bar style
pub fn default_progress_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-")
}

/// Format a batch summary as the plain-text migration report
pub fn format_report_human(summary: &MigrationSummary, verbose: bool) -> String {
    let banner = "=".repeat(BANNER_WIDTH);
    let mut lines = vec![
        banner.clone(),
        REPORT_TITLE.to_string(),
        banner.clone(),
        String::new(),
        format!("Files processed: {}", summary.files_processed),
        format!("  Succeeded: {}", summary.files_succeeded),
        format!("  Failed: {}", summary.files_failed),
        String::new(),
    ];

    if !summary.dropped_histogram.is_empty() {
        lines.push("Dropped fields (across all files):".to_string());
        for (field, count) in summary.dropped_histogram.sorted() {
            lines.push(format!("  {}: {} occurrences", field, count));
        }
        lines.push(String::new());
    }

    if summary.has_failures() {
        lines.push("Failed files:".to_string());
        for result in summary.failures() {
            lines.push(format!(
                "  {}: {}",
                result.name(),
                result.error.as_deref().unwrap_or("unknown error")
            ));
        }
        lines.push(String::new());
    }

    lines.push(banner);

    if verbose && !summary.file_results.is_empty() {
        lines.push(String::new());
        lines.push("Per-file details:".to_string());
        for result in &summary.file_results {
            let status = if result.success { "OK" } else { "FAILED" };
            lines.push(format!("  [{}] {}", status, result.name()));
            for field in &result.dropped_fields {
                lines.push(format!("         dropped: {}", field));
            }
        }
    }

    lines.join("\n")
}

/// Highlight status markers in a rendered report
fn colorize_report(report: &str) -> String {
    report
        .lines()
        .map(|line| {
            if line.starts_with("  [OK]") {
                line.replacen("[OK]", &"[OK]".green().to_string(), 1)
            } else if line.starts_with("  [FAILED]") {
                line.replacen("[FAILED]", &"[FAILED]".red().to_string(), 1)
            } else if line == REPORT_TITLE {
                line.bold().to_string()
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
