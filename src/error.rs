//! Request-level errors and their Gemini responses.

use crate::gemini::{Response, Status};
use crate::miniflux::ApiError;
use crate::observability::metrics;
use crate::render::RenderError;
use crate::store::{Fingerprint, StoreError};

/// Everything that can end a request without a page.
///
/// Internal detail is logged here and never sent to the client.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Missing or malformed request parameter.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The client presented no certificate.
    #[error("client certificate required")]
    CertificateRequired,

    /// The certificate is not enrolled.
    #[error("certificate {fingerprint} is not authorized")]
    CertificateNotAuthorized { fingerprint: Fingerprint },

    /// A Miniflux read failed.
    #[error("{operation} failed: {source}")]
    Upstream {
        operation: &'static str,
        #[source]
        source: ApiError,
    },

    /// The entry query matched nothing.
    #[error("no entry returned")]
    NoEntry,

    /// A Miniflux write action failed.
    #[error("{operation} failed: {source}")]
    UpstreamAction {
        operation: &'static str,
        #[source]
        source: ApiError,
    },

    #[error("internal error: {0}")]
    Internal(String),

    #[error("not found: {0}")]
    NotFound(String),
}

impl GatewayError {
    pub fn upstream(operation: &'static str, source: ApiError) -> Self {
        GatewayError::Upstream { operation, source }
    }

    pub fn upstream_action(operation: &'static str, source: ApiError) -> Self {
        GatewayError::UpstreamAction { operation, source }
    }

    /// Status code this error is answered with.
    pub fn status(&self) -> Status {
        match self {
            GatewayError::BadRequest(_) => Status::BadRequest,
            GatewayError::CertificateRequired => Status::CertificateRequired,
            GatewayError::CertificateNotAuthorized { .. } => Status::CertificateNotAuthorized,
            GatewayError::Upstream { .. } | GatewayError::NoEntry => Status::TemporaryFailure,
            GatewayError::UpstreamAction { .. } => Status::CgiError,
            GatewayError::Internal(_) => Status::PermanentFailure,
            GatewayError::NotFound(_) => Status::NotFound,
        }
    }

    /// Log the error and turn it into the response sent to the client.
    pub fn into_response(self) -> Response {
        let status = self.status();
        let meta = match &self {
            GatewayError::BadRequest(message) => {
                tracing::debug!(error = %message, "Bad request");
                message.clone()
            }
            GatewayError::CertificateRequired => {
                metrics::record_auth_rejection("missing_certificate");
                "Client certificate required".to_string()
            }
            GatewayError::CertificateNotAuthorized { fingerprint } => {
                metrics::record_auth_rejection("unknown_certificate");
                tracing::info!(fingerprint = %fingerprint, "Unknown client certificate");
                format!("Certificate not authorized: {}", fingerprint)
            }
            GatewayError::Upstream { operation, source } => {
                metrics::record_upstream_error(*operation);
                tracing::error!(operation = %operation, error = %source, "Miniflux query failed");
                "Error querying Miniflux".to_string()
            }
            GatewayError::NoEntry => "No entry returned".to_string(),
            GatewayError::UpstreamAction { operation, source } => {
                metrics::record_upstream_error(*operation);
                tracing::error!(operation = %operation, error = %source, "Miniflux action failed");
                "Miniflux error".to_string()
            }
            GatewayError::Internal(detail) => {
                tracing::error!(error = %detail, "Internal error");
                "Internal error".to_string()
            }
            GatewayError::NotFound(path) => {
                tracing::debug!(path = %path, "No route");
                "Not found".to_string()
            }
        };
        Response::new(status, meta)
    }
}

impl From<StoreError> for GatewayError {
    fn from(e: StoreError) -> Self {
        GatewayError::Internal(e.to_string())
    }
}

impl From<RenderError> for GatewayError {
    fn from(e: RenderError) -> Self {
        GatewayError::Internal(e.to_string())
    }
}
