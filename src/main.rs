//! gemflux: Gemini gateway to Miniflux.
//!
//! # Architecture Overview
//!
//! ```text
//!   Gemini client
//!       │ TLS + client certificate
//!       ▼
//!   net (listener, tls) ──▶ gemini::server ──▶ pipeline
//!                                                 │
//!                      ┌──────────────────────────┘
//!                      ▼
//!            identity (fingerprint → credential store)
//!                      ▼
//!            session (Miniflux client for that account)
//!                      ▼
//!            router ──▶ handlers ──▶ articles / render ──▶ Miniflux API
//! ```

use std::path::PathBuf;

use clap::Parser;

use gemflux::config::load_or_default;
use gemflux::lifecycle::startup;
use gemflux::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "gemflux")]
#[command(about = "Gemini gateway to the Miniflux feed reader", long_about = None)]
struct Cli {
    /// Configuration file (TOML); defaults are used when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_or_default(cli.config.as_deref())?;

    init_logging(&config.observability)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "gemflux starting");
    tracing::info!(
        bind_address = %config.listener.bind_address,
        max_connections = config.listener.max_connections,
        store = %config.store.path,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    startup::run(config).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
