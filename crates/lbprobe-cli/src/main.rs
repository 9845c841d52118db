//! lbprobe - smoke tests for a leaderboard HTTP API
//!
//! Logs in once, runs six ordered read/write checks and exits 0 only when
//! every check passed.

use std::io::stderr;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser as _;
use lbprobe_core::Runner;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt as _, util::SubscriberInitExt as _};

mod cli;
mod term;

use cli::Cli;
use term::TermReporter;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = cli.resolve_config()?;
    let mut reporter = TermReporter::stdout();

    if cli.show_config {
        reporter.raw(&config.to_masked_toml()?);
        return Ok(ExitCode::SUCCESS);
    }

    tracing::debug!(base_url = %config.target.base_url, "starting run");
    let runner = Runner::new(config)?;
    let outcome = runner.run(&mut reporter).await;

    Ok(ExitCode::from(outcome.exit_status()))
}

/// Logs go to stderr so they never mix with the report on stdout.
fn init_logging(verbose: bool) {
    let default_filter = if verbose {
        "lbprobe=debug,lbprobe_core=debug"
    } else {
        "lbprobe=warn,lbprobe_core=warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(stderr))
        .init();
}
