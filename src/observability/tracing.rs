//! Request spans.
//!
//! Every log line emitted while a request is handled carries the request
//! id and the connection it arrived on.

use std::net::SocketAddr;

use tracing::Span;
use uuid::Uuid;

use crate::net::connection::ConnectionId;

/// Span covering one request from handshake to response.
pub fn request_span(request_id: Uuid, connection_id: ConnectionId, peer_addr: SocketAddr) -> Span {
    tracing::info_span!(
        "request",
        request_id = %request_id,
        connection_id = %connection_id,
        peer_addr = %peer_addr,
        path = tracing::field::Empty,
        status = tracing::field::Empty,
    )
}
