//! Gemini server: accept loop and per-connection request cycle.
//!
//! # Responsibilities
//! - Accept connections until shutdown is signalled
//! - TLS handshake and request line under the read deadline
//! - Pipeline under the request deadline, response under the write deadline
//! - Drain in-flight connections within the grace period

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::sync::broadcast;
use tokio::time::timeout;
use tokio_rustls::TlsAcceptor;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::gemini::middleware::{Pipeline, RequestContext};
use crate::gemini::{Request, RequestError, Response, Status};
use crate::net::connection::{ConnectionId, ConnectionTracker};
use crate::net::listener::{Listener, ListenerError};
use crate::observability::metrics;
use crate::observability::tracing::request_span;
use crate::routing::route_label;

/// Pause after a failed accept, so a persistent error (e.g. out of file
/// descriptors) does not spin.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

struct Shared {
    acceptor: TlsAcceptor,
    pipeline: Pipeline,
    hostname: Option<String>,
    read_timeout: Duration,
    write_timeout: Duration,
    request_timeout: Duration,
}

/// The gateway's Gemini server.
pub struct GeminiServer {
    shared: Arc<Shared>,
    tracker: ConnectionTracker,
    grace: Duration,
}

impl GeminiServer {
    pub fn new(config: &GatewayConfig, acceptor: TlsAcceptor, pipeline: Pipeline) -> Self {
        tracing::info!(interceptors = ?pipeline.names(), "Request pipeline assembled");
        Self {
            shared: Arc::new(Shared {
                acceptor,
                pipeline,
                hostname: config.listener.hostname.clone(),
                read_timeout: Duration::from_secs(config.timeouts.read_secs),
                write_timeout: Duration::from_secs(config.timeouts.write_secs),
                request_timeout: Duration::from_secs(config.timeouts.request_secs),
            }),
            tracker: ConnectionTracker::new(),
            grace: Duration::from_secs(config.shutdown.grace_secs),
        }
    }

    /// Serve until `shutdown` fires, then wait for open connections.
    pub async fn run(self, listener: Listener, mut shutdown: broadcast::Receiver<()>) {
        if let Ok(addr) = listener.local_addr() {
            tracing::info!(
                address = %addr,
                max_connections = listener.max_connections(),
                "Gemini server starting"
            );
        }

        loop {
            tokio::select! {
                _ = shutdown.recv() => {
                    tracing::info!("Shutdown signal received, no longer accepting");
                    break;
                }
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer_addr, permit)) => {
                        let guard = self.tracker.track();
                        metrics::set_active_connections(self.tracker.active_count());
                        let shared = Arc::clone(&self.shared);
                        let tracker = self.tracker.clone();
                        tokio::spawn(async move {
                            serve_connection(&shared, stream, peer_addr, guard.id()).await;
                            drop(guard);
                            drop(permit);
                            metrics::set_active_connections(tracker.active_count());
                        });
                    }
                    Err(ListenerError::Closed(_)) => break,
                    Err(e) => {
                        tracing::warn!(error = %e, "Accept failed");
                        tokio::time::sleep(ACCEPT_BACKOFF).await;
                    }
                },
            }
        }

        drop(listener);
        let open = self.tracker.active_count();
        if open > 0 {
            tracing::info!(open_connections = open, grace_secs = self.grace.as_secs(), "Draining connections");
            if timeout(self.grace, self.tracker.wait_until_idle()).await.is_err() {
                tracing::warn!(
                    open_connections = self.tracker.active_count(),
                    "Grace period elapsed with connections still open"
                );
            }
        }
        tracing::info!("Gemini server stopped");
    }
}

async fn serve_connection(shared: &Shared, stream: TcpStream, peer_addr: SocketAddr, connection_id: ConnectionId) {
    let request_id = Uuid::new_v4();
    let span = request_span(request_id, connection_id, peer_addr);

    async move {
        let mut tls = match timeout(shared.read_timeout, shared.acceptor.accept(stream)).await {
            Ok(Ok(tls)) => tls,
            Ok(Err(e)) => {
                tracing::debug!(error = %e, "TLS handshake failed");
                return;
            }
            Err(_) => {
                tracing::debug!("TLS handshake timed out");
                return;
            }
        };

        let start = Instant::now();
        let (response, route) = match timeout(shared.read_timeout, Request::read_from(&mut tls)).await {
            Ok(Ok(request)) => {
                let certificates = tls
                    .get_ref()
                    .1
                    .peer_certificates()
                    .map(<[_]>::to_vec)
                    .unwrap_or_default();
                let route = route_label(request.path());
                (respond(shared, request_id, request, certificates).await, route)
            }
            Ok(Err(RequestError::Io(e))) => {
                tracing::debug!(error = %e, "Failed to read request");
                return;
            }
            Ok(Err(RequestError::Incomplete)) => {
                tracing::debug!("Connection closed before request line");
                return;
            }
            Ok(Err(e)) => (GatewayError::BadRequest(e.to_string()).into_response(), "invalid"),
            Err(_) => {
                tracing::debug!("Request line timed out");
                return;
            }
        };

        let code = response.status().code();
        tracing::Span::current().record("status", code);
        let written = timeout(shared.write_timeout, async {
            response.write_to(&mut tls).await?;
            tls.shutdown().await
        })
        .await;
        match written {
            Ok(Ok(())) => tracing::info!(status = code, route, "Request served"),
            Ok(Err(e)) => tracing::debug!(error = %e, "Failed to write response"),
            Err(_) => tracing::debug!("Response write timed out"),
        }
        metrics::record_request(route, code, start);
    }
    .instrument(span)
    .await
}

async fn respond(
    shared: &Shared,
    request_id: Uuid,
    request: Request,
    certificates: Vec<rustls::pki_types::CertificateDer<'static>>,
) -> Response {
    tracing::Span::current().record("path", request.path());

    if let Some(hostname) = &shared.hostname {
        if !request.host().eq_ignore_ascii_case(hostname) {
            tracing::debug!(host = %request.host(), "Request for foreign host");
            return Response::new(Status::ProxyRequestRefused, "Proxy request refused");
        }
    }

    let mut ctx = RequestContext::new(request, certificates);
    ctx.request_id = request_id;

    match timeout(shared.request_timeout, shared.pipeline.handle(ctx)).await {
        Ok(response) => response,
        Err(_) => {
            tracing::warn!(timeout_secs = shared.request_timeout.as_secs(), "Request deadline exceeded");
            Response::new(Status::TemporaryFailure, "Request timed out")
        }
    }
}
