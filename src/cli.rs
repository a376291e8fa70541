//! CLI argument parsing module for groundwork

use crate::config::{parse_domain_hint, ConfigOverrides};
use crate::error::{ConfigError, IoError};
use crate::orchestrator::DependencyFilter;
use crate::output::OutputConfig;
use clap::{ArgAction, Parser};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Research the external dependencies of a coding task before writing code
#[derive(Parser, Debug, Clone)]
#[command(
    name = "groundwork",
    version,
    about = "Research the external dependencies of a coding task before writing code"
)]
pub struct CliArgs {
    /// Task description (reads --task-file or stdin when omitted)
    #[arg(value_name = "TASK")]
    pub task: Vec<String>,

    /// Read the task description from a file
    #[arg(short = 'f', long, value_name = "PATH")]
    pub task_file: Option<PathBuf>,

    /// Config file (default: ./groundwork.toml when present)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // General options
    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable quiet mode - minimal output
    #[arg(short, long)]
    pub quiet: bool,

    // Dependency filters
    /// Skip a dependency (can be specified multiple times)
    #[arg(long, action = ArgAction::Append, value_name = "NAME")]
    pub exclude: Vec<String>,

    /// Research only this dependency (can be specified multiple times)
    #[arg(long, action = ArgAction::Append, value_name = "NAME")]
    pub only: Vec<String>,

    // Research overrides
    /// URLs fetched per dependency
    #[arg(long, value_name = "N")]
    pub max_urls: Option<usize>,

    /// Dependencies researched at once
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// SearXNG endpoint
    #[arg(long, value_name = "URL")]
    pub search_endpoint: Option<String>,

    /// Context7 API endpoint
    #[arg(long, value_name = "URL")]
    pub docs_endpoint: Option<String>,

    /// Narrow a dependency's search to a site (can be specified multiple times)
    #[arg(
        long,
        action = ArgAction::Append,
        value_name = "NAME=HOST",
        value_parser = parse_domain_hint
    )]
    pub domain: Vec<(String, String)>,

    // Output options
    /// Output results in JSON format
    #[arg(long)]
    pub json: bool,

    /// Print a colored checklist summary instead of the markdown report
    #[arg(long)]
    pub summary: bool,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

/// Where the task description comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskSource {
    /// Words given on the command line
    Inline(String),
    /// A file path
    File(PathBuf),
    /// Standard input
    Stdin,
}

impl CliArgs {
    /// Reject option combinations clap cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.quiet && self.verbose {
            return Err(ConfigError::ConflictingOptions {
                message: "--quiet and --verbose cannot be used together".to_string(),
            });
        }
        if self.task_file.is_some() && !self.task.is_empty() {
            return Err(ConfigError::ConflictingOptions {
                message: "give the task either as text or with --task-file, not both".to_string(),
            });
        }
        if self.concurrency == Some(0) {
            return Err(ConfigError::invalid_value("--concurrency", "must be at least 1"));
        }
        Ok(())
    }

    /// Determine where the task description is read from
    pub fn task_source(&self) -> TaskSource {
        if let Some(path) = &self.task_file {
            TaskSource::File(path.clone())
        } else if !self.task.is_empty() {
            TaskSource::Inline(self.task.join(" "))
        } else {
            TaskSource::Stdin
        }
    }

    /// Config values given on the command line
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            max_urls: self.max_urls,
            concurrency: self.concurrency,
            search_endpoint: self.search_endpoint.clone(),
            docs_endpoint: self.docs_endpoint.clone(),
            domains: self.domain.clone(),
        }
    }

    /// Dependency filter from --only / --exclude
    pub fn filter(&self) -> DependencyFilter {
        DependencyFilter::new()
            .with_only(self.only.clone())
            .with_exclude(self.exclude.clone())
    }

    /// Output configuration from the output flags
    pub fn output_config(&self) -> OutputConfig {
        OutputConfig::from_cli(self.json, self.summary, self.verbose, self.quiet)
            .with_color(!self.no_color && self.output.is_none())
    }

    /// Whether the progress bar should be drawn
    pub fn show_progress(&self) -> bool {
        !self.quiet && !self.json
    }
}

/// Read the task description from its source
///
/// Text from stdin must not be blank; an empty file is a valid (empty) task.
pub fn read_task(source: &TaskSource, stdin: &mut dyn Read) -> Result<String, IoError> {
    match source {
        TaskSource::Inline(text) => Ok(text.clone()),
        TaskSource::File(path) => read_task_file(path),
        TaskSource::Stdin => {
            let mut text = String::new();
            stdin
                .read_to_string(&mut text)
                .map_err(|e| IoError::TaskRead {
                    path: PathBuf::from("<stdin>"),
                    source: e,
                })?;
            if text.trim().is_empty() {
                return Err(IoError::MissingTask);
            }
            Ok(text)
        }
    }
}

fn read_task_file(path: &Path) -> Result<String, IoError> {
    std::fs::read_to_string(path).map_err(|e| IoError::TaskRead {
        path: path.to_path_buf(),
        source: e,
    })
}
