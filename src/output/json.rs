//! JSON output formatter for machine processing
//!
//! This module provides:
//! - JSON serialization of research results
//! - Per-dependency checklist, findings and coverage gaps

use crate::clock::TimeInfo;
use crate::domain::{ChecklistItem, CoverageGap, Finding, ValidationReport};
use crate::orchestrator::OrchestratorResult;
use crate::output::{OutputFormatter, Verbosity};
use serde::Serialize;
use std::io::Write;

/// JSON formatter for machine-readable output
pub struct JsonFormatter {
    /// Quiet mode leaves out findings and gaps
    verbosity: Verbosity,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }
}

/// JSON representation of the full result
#[derive(Serialize)]
struct JsonOutput<'a> {
    generated: &'a str,
    quarter: &'a str,
    /// Every date format of the run
    time: &'a TimeInfo,
    task: &'a str,
    passed: bool,
    summary: JsonSummary,
    dependencies: Vec<JsonDependency<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    skipped: Vec<&'a str>,
}

/// JSON representation of summary statistics
#[derive(Serialize)]
struct JsonSummary {
    dependencies: usize,
    passed: usize,
    failed: usize,
    findings: usize,
    gaps: usize,
}

/// JSON representation of one researched dependency
#[derive(Serialize)]
struct JsonDependency<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<&'a str>,
    rationale: &'a str,
    passed: bool,
    unmet: Vec<ChecklistItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    findings: Option<&'a [Finding]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    gaps: Option<&'a [CoverageGap]>,
}

impl JsonFormatter {
    fn summary(report: &ValidationReport, findings: usize, gaps: usize) -> JsonSummary {
        JsonSummary {
            dependencies: report.results.len(),
            passed: report.passed_count(),
            failed: report.failed_count(),
            findings,
            gaps,
        }
    }

    fn write_json<T: Serialize>(value: &T, writer: &mut dyn Write) -> std::io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(std::io::Error::other)?;
        writeln!(writer, "{}", json)
    }
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()> {
        let store = &result.store;
        let detailed = self.verbosity != Verbosity::Quiet;

        let dependencies = store
            .dependencies()
            .iter()
            .map(|dep| {
                let validation = result.report.get(&dep.name);
                JsonDependency {
                    name: &dep.name,
                    version: dep.version.as_deref(),
                    rationale: &dep.rationale,
                    passed: validation.is_some_and(|v| v.passed()),
                    unmet: validation
                        .map(|v| v.unmet_items().collect())
                        .unwrap_or_default(),
                    findings: detailed.then(|| store.query(&dep.name)),
                    gaps: detailed.then(|| store.gaps(&dep.name)),
                }
            })
            .collect();

        let output = JsonOutput {
            generated: &result.time_info.date_iso,
            quarter: &result.time_info.quarter,
            time: &result.time_info,
            task: &result.task,
            passed: result.passed(),
            summary: Self::summary(&result.report, store.total_findings(), store.total_gaps()),
            dependencies,
            skipped: result.skipped.iter().map(|d| d.name.as_str()).collect(),
        };

        Self::write_json(&output, writer)
    }
}
