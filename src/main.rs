// src/main.rs

use anyhow::{Context, Result};
use clap::Parser;
use repocheck::config::{CheckConfig, OutputFormat};
use repocheck::report::{JsonReport, ReportSink, TextReport};
use repocheck::repository::{self, RepodataLoader};
use std::io;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "repocheck")]
#[command(author, version, about = "Check package repositories for unresolved dependencies and shared libraries", long_about = None)]
struct Cli {
    /// Repository directories to check
    #[arg(required = true, value_name = "REPOSITORY")]
    repositories: Vec<PathBuf>,

    /// Architecture to check (default: native architecture)
    #[arg(short, long, env = "XBPS_ARCH")]
    arch: Option<String>,

    /// Report format (text, json)
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout only carries the report
    let default_level = if cli.debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    let config = CheckConfig::new(cli.repositories)
        .with_arch(cli.arch)
        .with_format(cli.format);
    info!(
        "Checking {} repositories for {}",
        config.repositories.len(),
        config.target_arch
    );

    // Any repository failing to load aborts before a report is written
    let registry = repository::load_registry(&RepodataLoader::new(), &config)?;
    info!(
        "{} of {} repositories have a {} index",
        registry.indexes().count(),
        registry.len(),
        registry.target_arch()
    );

    let stdout = io::stdout().lock();
    let mut sink: Box<dyn ReportSink> = match config.format {
        OutputFormat::Text => Box::new(TextReport::new(stdout)),
        OutputFormat::Json => Box::new(JsonReport::new(stdout)),
    };

    repocheck::check::run(&registry, sink.as_mut()).context("Failed to write report")?;
    Ok(())
}
