//! groundwork - research before you code
//!
//! Reads a task description, extracts the external dependencies it relies
//! on, researches each one and prints a citation report.
//!
//! Exit codes: 0 when every checklist item is met, 2 when coverage gaps
//! remain, 1 on fatal errors.

use anyhow::Context;
use clap::Parser;
use groundwork::capability::create_capabilities;
use groundwork::cli::{read_task, CliArgs, TaskSource};
use groundwork::config::ResearchConfig;
use groundwork::error::IoError;
use groundwork::orchestrator::Orchestrator;
use groundwork::output::create_formatter;
use std::fs::File;
use std::io::{self, BufWriter, IsTerminal, Write};
use std::process::ExitCode;

/// Log filter environment variable
const LOG_ENV: &str = "GROUNDWORK_LOG";

#[tokio::main]
async fn main() -> ExitCode {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            // Usage errors are fatal (1); --help and --version are not
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    if let Err(e) = init_tracing(args.quiet, args.verbose) {
        eprintln!("Error: {:#}", e);
        return ExitCode::FAILURE;
    }

    match run(args).await {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "groundwork=debug,warn"
    } else {
        "warn"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

/// Main application logic
async fn run(args: CliArgs) -> anyhow::Result<ExitCode> {
    args.validate()?;

    let mut config = ResearchConfig::load(args.config.as_deref())?;
    config.apply(args.overrides());
    config.validate()?;

    let source = args.task_source();
    if source == TaskSource::Stdin && io::stdin().is_terminal() {
        return Err(IoError::MissingTask.into());
    }
    let task = read_task(&source, &mut io::stdin().lock())?;

    if args.verbose {
        eprintln!("groundwork v{}", env!("CARGO_PKG_VERSION"));
        eprintln!("Search: {}", config.search.endpoint);
        eprintln!("Docs: {}", config.docs.endpoint);
    }

    let capabilities =
        create_capabilities(&config).context("failed to set up research capabilities")?;
    let orchestrator = Orchestrator::new(config, capabilities)
        .with_filter(args.filter())
        .with_progress(args.show_progress());
    let result = orchestrator.run(&task).await;

    let output_config = args.output_config();
    if !output_config.color {
        colored::control::set_override(false);
    }
    let formatter = create_formatter(output_config);

    match &args.output {
        Some(path) => {
            let file = File::create(path).map_err(|e| IoError::ReportWrite {
                path: path.clone(),
                source: e,
            })?;
            let mut writer = BufWriter::new(file);
            formatter
                .format(&result, &mut writer)
                .and_then(|_| writer.flush())
                .map_err(|e| IoError::ReportWrite {
                    path: path.clone(),
                    source: e,
                })?;
            if !args.quiet {
                eprintln!("Report written to {}", path.display());
            }
        }
        None => {
            let mut stdout = io::stdout().lock();
            formatter.format(&result, &mut stdout)?;
            stdout.flush()?;
        }
    }

    if result.passed() {
        Ok(ExitCode::SUCCESS)
    } else {
        // Research ran, but coverage gaps remain
        Ok(ExitCode::from(2))
    }
}
