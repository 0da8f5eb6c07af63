//! Startup orchestration.
//!
//! # Order
//! metrics → credential store → HTTP client → TLS → listener → serve
//!
//! Any startup error is fatal; the listener is bound last so traffic only
//! arrives once everything it needs exists.

use std::net::SocketAddr;
use std::time::Duration;

use metrics_exporter_prometheus::BuildError;

use crate::config::GatewayConfig;
use crate::gemini::GeminiServer;
use crate::lifecycle::signals::spawn_signal_handler;
use crate::lifecycle::Shutdown;
use crate::miniflux::{build_http_client, ApiError};
use crate::net::listener::{Listener, ListenerError};
use crate::net::tls::{load_tls_acceptor, TlsError};
use crate::observability::metrics;
use crate::routing::gateway_pipeline;
use crate::store::{CredentialStore, StoreError};

/// Fatal startup failures.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("invalid metrics address {0:?}")]
    MetricsAddress(String),

    #[error("failed to start metrics exporter: {0}")]
    Metrics(#[from] BuildError),

    #[error("credential store: {0}")]
    Store(#[from] StoreError),

    #[error("HTTP client: {0}")]
    Http(#[from] ApiError),

    #[error("TLS: {0}")]
    Tls(#[from] TlsError),

    #[error("listener: {0}")]
    Listener(#[from] ListenerError),
}

/// Bring up every subsystem and serve until a termination signal.
pub async fn run(config: GatewayConfig) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        let address: SocketAddr = config
            .observability
            .metrics_address
            .parse()
            .map_err(|_| StartupError::MetricsAddress(config.observability.metrics_address.clone()))?;
        metrics::init_metrics(address)?;
    }

    let store = CredentialStore::open(&config.store.path).await?;
    let http = build_http_client(Duration::from_secs(config.timeouts.api_secs))?;
    let acceptor = load_tls_acceptor(&config.tls)?;

    let pipeline = gateway_pipeline(store.clone(), http);
    let server = GeminiServer::new(&config, acceptor, pipeline);
    let listener = Listener::bind(&config.listener).await?;

    let shutdown = Shutdown::new();
    spawn_signal_handler(shutdown.clone());
    server.run(listener, shutdown.subscribe()).await;

    store.close().await;
    Ok(())
}
