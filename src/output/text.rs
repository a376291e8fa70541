//! Text output formatter for the terminal
//!
//! This module provides:
//! - One line per dependency with its checklist score
//! - Unmet items and coverage gaps for incomplete dependencies
//! - A colored overall verdict

use crate::domain::{ChecklistItem, ValidationReport, ValidationResult};
use crate::orchestrator::OrchestratorResult;
use crate::output::{OutputFormatter, Verbosity};
use crate::store::FindingStore;
use colored::Colorize;
use std::io::Write;

/// Text formatter for human-readable output
pub struct TextFormatter {
    verbosity: Verbosity,
    color: bool,
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self {
            verbosity,
            color: true,
        }
    }

    /// Create a new text formatter with color option
    pub fn with_color(verbosity: Verbosity, color: bool) -> Self {
        Self { verbosity, color }
    }

    fn plural(count: usize, word: &str) -> String {
        if count == 1 {
            format!("{} {}", count, word)
        } else {
            format!("{} {}s", count, word)
        }
    }

    /// Calculate the maximum label length for alignment
    fn max_label_length(&self, store: &FindingStore) -> usize {
        store
            .dependencies()
            .iter()
            .map(|d| d.to_string().chars().count())
            .max()
            .unwrap_or(0)
    }

    fn format_line(
        &self,
        label: &str,
        result: &ValidationResult,
        store: &FindingStore,
        width: usize,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let total = ChecklistItem::all().len();
        let met = total - result.unmet.len();
        let findings = store.query(&result.dependency).len();
        let gaps = store.gaps(&result.dependency).len();
        let counts = if gaps > 0 {
            format!(
                "{}, {}",
                Self::plural(findings, "finding"),
                Self::plural(gaps, "gap")
            )
        } else {
            Self::plural(findings, "finding")
        };

        let score = format!("{}/{}", met, total);
        let padded = format!("{:width$}", label, width = width);

        if self.color {
            let (icon, score) = if result.passed() {
                ("✓".green().bold(), score.green())
            } else if met == 0 {
                ("✗".red().bold(), score.red())
            } else {
                ("!".yellow().bold(), score.yellow())
            };
            writeln!(writer, "  {} {} {} {}", icon, padded.bold(), score, counts.dimmed())?;
        } else {
            let icon = if result.passed() { "✓" } else { "✗" };
            writeln!(writer, "  {} {} {} {}", icon, padded, score, counts)?;
        }

        if !result.passed() {
            let unmet: Vec<&str> = result.unmet_items().map(|i| i.display_name()).collect();
            let line = format!("missing: {}", unmet.join(", "));
            if self.color {
                writeln!(writer, "      {}", line.dimmed())?;
            } else {
                writeln!(writer, "      {}", line)?;
            }
        }

        if self.verbosity == Verbosity::Verbose {
            for gap in store.gaps(&result.dependency) {
                let line = format!("gap: {}", gap);
                if self.color {
                    writeln!(writer, "      {}", line.dimmed())?;
                } else {
                    writeln!(writer, "      {}", line)?;
                }
            }
        }

        Ok(())
    }

    fn format_verdict(
        &self,
        report: &ValidationReport,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let noun = if report.results.len() == 1 {
            "dependency"
        } else {
            "dependencies"
        };
        let line = format!(
            "{} of {} {} fully researched",
            report.passed_count(),
            report.results.len(),
            noun
        );

        if self.color {
            if report.passed() {
                writeln!(writer, "{} {}", "Research complete:".green().bold(), line)
            } else {
                writeln!(writer, "{} {}", "Research incomplete:".yellow().bold(), line)
            }
        } else if report.passed() {
            writeln!(writer, "Research complete: {}", line)
        } else {
            writeln!(writer, "Research incomplete: {}", line)
        }
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()> {
        if result.dependencies().is_empty() {
            if self.verbosity != Verbosity::Quiet {
                writeln!(writer, "No external dependencies found in the task.")?;
            }
            return Ok(());
        }

        if self.verbosity != Verbosity::Quiet {
            let header = format!("Research report ({})", result.time_info.date_iso);
            if self.color {
                writeln!(writer, "{}", header.bold())?;
            } else {
                writeln!(writer, "{}", header)?;
            }
            writeln!(writer)?;

            let width = self.max_label_length(&result.store).max(12);
            for dependency in result.dependencies() {
                if let Some(validation) = result.report.get(&dependency.name) {
                    let label = dependency.to_string();
                    self.format_line(&label, validation, &result.store, width, writer)?;
                }
            }

            if !result.skipped.is_empty() {
                let names: Vec<String> = result.skipped.iter().map(|d| d.to_string()).collect();
                let line = format!("  skipped: {}", names.join(", "));
                if self.color {
                    writeln!(writer, "{}", line.dimmed())?;
                } else {
                    writeln!(writer, "{}", line)?;
                }
            }
            writeln!(writer)?;
        }

        self.format_verdict(&result.report, writer)
    }
}
