//! Itinera CLI binary.

use anyhow::Result;
use itinera::cli::Cli;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Main entry point for the itinera CLI.
///
/// Uses tokio's current_thread runtime; every command is a short sequence of
/// file reads and writes.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    // Controlled via RUST_LOG, e.g. RUST_LOG=itinera=debug,itinera_jsonl=trace
    // Logs go to stderr so `--json` output on stdout stays parseable.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("itinera=info,itinera_jsonl=info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("Starting itinera CLI");

    let cli = Cli::parse_args();
    let code = cli.execute().await?;

    tracing::debug!("Itinera CLI completed");
    Ok(code)
}
