use std::io::Write;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use fb_cli::report;
use fb_cli::{Cli, Config, OutputFormat};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Diagnostics go to stderr so the report on stdout stays parseable
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let mut config =
        Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    if cli.json {
        config.format = OutputFormat::Json;
    }
    if let Some(date) = cli.date {
        config.reference_date = Some(date);
    }
    tracing::debug!(?config, "loaded configuration");

    let mut stdout = std::io::stdout().lock();
    report::run(&mut stdout, &cli.log, &config)?;
    stdout.flush()?;

    Ok(())
}
