//! Headless host bridge binary for stdin/stdout JSON communication.
//!
//! This binary reads `CommandEnvelope` messages as newline-delimited JSON
//! from stdin, routes them through a search session, and writes
//! `ResponseEnvelope` and `EventEnvelope` messages to stdout.
//!
//! All tracing/diagnostic output goes to stderr so that stdout remains a
//! clean JSON protocol channel. Set `SCOUT_CONFIG` to load a specific
//! config file.

use std::path::PathBuf;

use scout::config::ScoutConfig;
use scout::host::stdio::run_stdio_bridge;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise tracing to stderr only (stdout is reserved for the JSON
    // protocol).
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("scout-host starting");

    let explicit = std::env::var_os("SCOUT_CONFIG").map(PathBuf::from);
    let config = ScoutConfig::discover(explicit.as_deref())
        .and_then(|config| config.validate().map(|()| config))
        .map_err(|e| {
            tracing::error!(error = %e, "invalid configuration");
            anyhow::anyhow!("scout-host config: {e}")
        })?;

    run_stdio_bridge(&config).await.map_err(|e| {
        tracing::error!(error = %e, "scout-host exited with error");
        anyhow::anyhow!("scout-host failed: {e}")
    })?;

    tracing::info!("scout-host shut down cleanly");
    Ok(())
}
