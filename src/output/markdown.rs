//! Markdown citation report
//!
//! The default artifact: a checklist table followed by one section per
//! dependency listing every cited source and every coverage gap.

use crate::domain::{ChecklistItem, Dependency, ValidationReport};
use crate::orchestrator::OrchestratorResult;
use crate::output::{excerpt, OutputFormatter, Verbosity};
use crate::store::FindingStore;
use std::io::Write;

/// Excerpt length in normal verbosity
const EXCERPT_CHARS: usize = 240;

/// Markdown formatter for the citation report
pub struct MarkdownFormatter {
    verbosity: Verbosity,
}

impl MarkdownFormatter {
    /// Create a new markdown formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }

    fn mark(met: bool) -> &'static str {
        if met {
            "✅"
        } else {
            "❌"
        }
    }

    fn write_checklist(
        &self,
        store: &FindingStore,
        report: &ValidationReport,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        let headers: Vec<&str> = ChecklistItem::all().iter().map(|i| i.display_name()).collect();
        writeln!(writer, "| Dependency | Version | {} |", headers.join(" | "))?;
        writeln!(writer, "|---|---|{}", "---|".repeat(headers.len()))?;

        for result in &report.results {
            let version = store
                .dependency(&result.dependency)
                .and_then(|d| d.version.as_deref())
                .unwrap_or("-");
            let marks: Vec<&str> = ChecklistItem::all()
                .iter()
                .map(|item| Self::mark(result.is_met(*item)))
                .collect();
            writeln!(
                writer,
                "| {} | {} | {} |",
                result.dependency,
                version,
                marks.join(" | ")
            )?;
        }
        writeln!(writer)?;

        let verdict = if report.passed() { "PASS" } else { "INCOMPLETE" };
        writeln!(
            writer,
            "**{}**: {} of {} dependencies fully researched",
            verdict,
            report.passed_count(),
            report.results.len()
        )?;
        writeln!(writer)
    }

    fn write_dependency(
        &self,
        store: &FindingStore,
        dependency: &Dependency,
        writer: &mut dyn Write,
    ) -> std::io::Result<()> {
        writeln!(writer, "## {}", dependency)?;
        writeln!(writer)?;
        if !dependency.rationale.is_empty() {
            writeln!(writer, "_Why:_ {}", dependency.rationale)?;
            writeln!(writer)?;
        }

        let findings = store.query(&dependency.name);
        if findings.is_empty() {
            writeln!(writer, "No sources found.")?;
            writeln!(writer)?;
        } else {
            writeln!(writer, "### Sources")?;
            writeln!(writer)?;
            for (i, finding) in findings.iter().enumerate() {
                let source = if finding.has_citation() {
                    format!("<{}>", finding.source_url)
                } else {
                    "(no source URL)".to_string()
                };
                let version = if finding.has_version() {
                    format!(", version {}", finding.version)
                } else {
                    String::new()
                };
                writeln!(
                    writer,
                    "{}. [{}] {}{} (retrieved {})",
                    i + 1,
                    finding.capability,
                    source,
                    version,
                    finding.retrieved_at.format("%Y-%m-%d %H:%M UTC")
                )?;

                match self.verbosity {
                    Verbosity::Quiet => {}
                    Verbosity::Normal => {
                        let text = excerpt(&finding.content, EXCERPT_CHARS);
                        if !text.is_empty() {
                            writeln!(writer, "   > {}", text)?;
                        }
                    }
                    Verbosity::Verbose => {
                        for line in finding.content.lines().filter(|l| !l.trim().is_empty()) {
                            writeln!(writer, "   > {}", line.trim_end())?;
                        }
                    }
                }
            }
            writeln!(writer)?;
        }

        let gaps = store.gaps(&dependency.name);
        if !gaps.is_empty() {
            writeln!(writer, "### Coverage gaps")?;
            writeln!(writer)?;
            for gap in gaps {
                writeln!(writer, "- {}", gap)?;
            }
            writeln!(writer)?;
        }

        Ok(())
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()> {
        writeln!(writer, "# Research report")?;
        writeln!(writer)?;
        writeln!(
            writer,
            "Generated {} ({})",
            result.time_info.date_iso, result.time_info.quarter
        )?;
        writeln!(writer)?;

        if self.verbosity != Verbosity::Quiet && !result.task.trim().is_empty() {
            writeln!(writer, "## Task")?;
            writeln!(writer)?;
            for line in result.task.trim().lines() {
                writeln!(writer, "> {}", line)?;
            }
            writeln!(writer)?;
        }

        if result.dependencies().is_empty() {
            writeln!(writer, "No external dependencies to research.")?;
        } else {
            writeln!(writer, "## Checklist")?;
            writeln!(writer)?;
            self.write_checklist(&result.store, &result.report, writer)?;

            for dependency in result.dependencies() {
                self.write_dependency(&result.store, dependency, writer)?;
            }
        }

        if !result.skipped.is_empty() {
            let names: Vec<String> = result.skipped.iter().map(|d| d.to_string()).collect();
            writeln!(writer)?;
            writeln!(writer, "_Not researched (filtered):_ {}", names.join(", "))?;
        }

        Ok(())
    }
}
