//! telemetry-deck: live telemetry charts in the terminal.
//!
//! Run with:  `RUST_LOG=info telemetry-deck [path/to/deck.toml]`

mod dashboard;

use anyhow::Result;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Structured logging to stderr; RUST_LOG controls verbosity (default: info).
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("telemetry-deck v{} starting", env!("CARGO_PKG_VERSION"));

    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(deck_config::default_path);
    let config = deck_config::load(&path)?;

    dashboard::run(path, config).await
}
