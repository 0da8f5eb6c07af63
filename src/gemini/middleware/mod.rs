//! Request interceptors.
//!
//! # Data Flow
//! ```text
//! RequestContext
//!     → interceptor 1 (e.g. identity)  ─┐ each may answer early
//!     → interceptor 2 (e.g. session)   ─┤ or call `next.run(ctx)`
//!     → endpoint (router)              ─┘
//!     ← Response
//! ```
//!
//! Request-scoped values travel in typed fields of [`RequestContext`], set
//! by the interceptor that produces them.

pub mod identity;
pub mod session;

use std::sync::Arc;

use futures_util::future::BoxFuture;
use rustls::pki_types::CertificateDer;
use uuid::Uuid;

use crate::gemini::{Request, Response};
use crate::miniflux::MinifluxClient;

pub use identity::{Identity, IdentityResolver};
pub use session::SessionFactory;

/// Everything known about the request being handled.
#[derive(Debug)]
pub struct RequestContext {
    pub request_id: Uuid,
    pub request: Request,
    /// Client chain as presented in the handshake, leaf first.
    pub peer_certificates: Vec<CertificateDer<'static>>,
    /// Set by [`IdentityResolver`].
    pub identity: Option<Identity>,
    /// Set by [`SessionFactory`].
    pub client: Option<MinifluxClient>,
}

impl RequestContext {
    pub fn new(request: Request, peer_certificates: Vec<CertificateDer<'static>>) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            request,
            peer_certificates,
            identity: None,
            client: None,
        }
    }
}

/// One stage of the pipeline.
pub trait Interceptor: Send + Sync {
    fn name(&self) -> &'static str;

    /// Handle the request, either answering directly or delegating to `next`.
    fn intercept<'a>(&'a self, ctx: RequestContext, next: Next<'a>) -> BoxFuture<'a, Response>;
}

/// The final stage, reached once every interceptor has passed the request on.
pub trait Endpoint: Send + Sync {
    fn call<'a>(&'a self, ctx: RequestContext) -> BoxFuture<'a, Response>;
}

/// The rest of the pipeline after the current interceptor.
pub struct Next<'a> {
    interceptors: &'a [Arc<dyn Interceptor>],
    endpoint: &'a dyn Endpoint,
}

impl<'a> Next<'a> {
    pub async fn run(self, ctx: RequestContext) -> Response {
        match self.interceptors.split_first() {
            Some((current, rest)) => {
                let next = Next {
                    interceptors: rest,
                    endpoint: self.endpoint,
                };
                current.intercept(ctx, next).await
            }
            None => self.endpoint.call(ctx).await,
        }
    }
}

/// Ordered interceptors in front of an endpoint.
pub struct Pipeline {
    interceptors: Vec<Arc<dyn Interceptor>>,
    endpoint: Arc<dyn Endpoint>,
}

impl Pipeline {
    pub fn new(endpoint: Arc<dyn Endpoint>) -> Self {
        Self {
            interceptors: Vec::new(),
            endpoint,
        }
    }

    /// Append an interceptor; it runs after those added before it.
    pub fn with(mut self, interceptor: Arc<dyn Interceptor>) -> Self {
        self.interceptors.push(interceptor);
        self
    }

    /// Interceptor names in execution order.
    pub fn names(&self) -> Vec<&'static str> {
        self.interceptors.iter().map(|i| i.name()).collect()
    }

    pub async fn handle(&self, ctx: RequestContext) -> Response {
        Next {
            interceptors: &self.interceptors,
            endpoint: self.endpoint.as_ref(),
        }
        .run(ctx)
        .await
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("interceptors", &self.names())
            .finish()
    }
}
