use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use syslog_insight_logs::ErrorAggregator;

mod config;
mod summary;

use config::{FileConfig, Settings};

/// Syslog Insight - analyze system logs and generate error reports
#[derive(Parser, Debug)]
#[command(name = "syslog-insight")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the input log file [default: data/syslog.log]
    #[arg(short, long, value_name = "PATH")]
    input: Option<PathBuf>,

    /// Path to the output CSV report [default: error_report.csv]
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Number of errors shown in the console summary [default: 5]
    #[arg(short = 'n', long, value_name = "N")]
    top: Option<usize>,

    /// Config file (defaults to ./syslog-insight.toml when present)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize tracing; stdout is reserved for the report
    let default_level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let file_config = FileConfig::load(args.config.as_deref())?;
    let settings = Settings::resolve(args.input, args.output, args.top, file_config);
    tracing::debug!(?settings, "Resolved settings");

    println!("Starting analysis on file: {}...", settings.input.display());

    let mut aggregator = ErrorAggregator::new(&settings.input);
    aggregator.analyze().context("Log analysis failed")?;

    let top_errors = aggregator.get_top_errors(settings.top);
    println!("{}", summary::render(&top_errors, aggregator.is_empty()));

    // A failed export is reported but does not fail the run
    match aggregator.export(&settings.output) {
        Ok(()) => println!("Successfully saved report to: {}", settings.output.display()),
        Err(e) => {
            tracing::error!(error = %e, "Report export failed");
            eprintln!("Failed to write CSV file: {}", e);
        }
    }

    Ok(())
}
