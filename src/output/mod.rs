//! Output formatting for research results
//!
//! This module provides:
//! - Markdown citation report (default)
//! - JSON output for machine processing
//! - Colored terminal summary

mod json;
mod markdown;
mod text;

pub use json::JsonFormatter;
pub use markdown::MarkdownFormatter;
pub use text::TextFormatter;

use crate::orchestrator::OrchestratorResult;
use std::io::Write;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Markdown citation report
    #[default]
    Markdown,
    /// JSON output for machine processing
    Json,
    /// Colored checklist summary for the terminal
    Summary,
}

/// Output verbosity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verbosity {
    /// Minimal output
    Quiet,
    /// Normal output
    #[default]
    Normal,
    /// Detailed output with additional information
    Verbose,
}

/// Configuration for output formatting
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub verbosity: Verbosity,
    /// Whether to use colors (summary format only)
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            verbosity: Verbosity::default(),
            color: true,
        }
    }
}

impl OutputConfig {
    /// Create a new output configuration
    pub fn new(format: OutputFormat, verbosity: Verbosity) -> Self {
        Self {
            format,
            verbosity,
            color: true,
        }
    }

    /// Create configuration from CLI arguments; `--json` wins over `--summary`
    pub fn from_cli(json: bool, summary: bool, verbose: bool, quiet: bool) -> Self {
        let format = if json {
            OutputFormat::Json
        } else if summary {
            OutputFormat::Summary
        } else {
            OutputFormat::Markdown
        };

        let verbosity = if quiet {
            Verbosity::Quiet
        } else if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Normal
        };

        Self {
            format,
            verbosity,
            color: true,
        }
    }

    /// Set whether colors are used (builder pattern)
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }
}

/// Trait for output formatters
pub trait OutputFormatter {
    /// Format and write the full research result
    fn format(&self, result: &OrchestratorResult, writer: &mut dyn Write) -> std::io::Result<()>;
}

/// Create an output formatter based on configuration
pub fn create_formatter(config: OutputConfig) -> Box<dyn OutputFormatter> {
    match config.format {
        OutputFormat::Markdown => Box::new(MarkdownFormatter::new(config.verbosity)),
        OutputFormat::Json => Box::new(JsonFormatter::new(config.verbosity)),
        OutputFormat::Summary => {
            Box::new(TextFormatter::with_color(config.verbosity, config.color))
        }
    }
}

/// Collapse content to one line of at most `max` characters
pub(crate) fn excerpt(content: &str, max: usize) -> String {
    let flat = content.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() <= max {
        return flat;
    }
    let mut cut: String = flat.chars().take(max).collect();
    cut.push('…');
    cut
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Markdown);
    }

    #[test]
    fn test_output_config_default() {
        let config = OutputConfig::default();
        assert_eq!(config.format, OutputFormat::Markdown);
        assert_eq!(config.verbosity, Verbosity::Normal);
        assert!(config.color);
    }

    #[test]
    fn test_output_config_from_cli() {
        assert_eq!(OutputConfig::from_cli(true, false, false, false).format, OutputFormat::Json);
        assert_eq!(
            OutputConfig::from_cli(false, true, false, false).format,
            OutputFormat::Summary
        );
        assert_eq!(OutputConfig::from_cli(true, true, false, false).format, OutputFormat::Json);
        assert_eq!(
            OutputConfig::from_cli(false, false, true, false).verbosity,
            Verbosity::Verbose
        );
        assert_eq!(
            OutputConfig::from_cli(false, false, false, true).verbosity,
            Verbosity::Quiet
        );
    }

    #[test]
    fn test_with_color() {
        assert!(!OutputConfig::default().with_color(false).color);
    }

    #[test]
    fn test_excerpt() {
        assert_eq!(excerpt("a\n  b\tc", 10), "a b c");
        assert_eq!(excerpt("abcdef", 3), "abc…");
    }
}
