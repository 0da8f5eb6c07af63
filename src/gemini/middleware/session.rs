//! Miniflux session construction.

use futures_util::future::BoxFuture;

use crate::error::GatewayError;
use crate::gemini::middleware::{Interceptor, Next, RequestContext};
use crate::gemini::Response;
use crate::miniflux::MinifluxClient;

/// Binds a Miniflux client to the resolved identity.
///
/// Must run after [`IdentityResolver`](super::IdentityResolver); a missing
/// identity is answered as an internal error. Performs no network I/O.
#[derive(Debug, Clone)]
pub struct SessionFactory {
    http: reqwest::Client,
}

impl SessionFactory {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    pub fn session(&self, ctx: &RequestContext) -> Result<MinifluxClient, GatewayError> {
        let identity = ctx
            .identity
            .as_ref()
            .ok_or_else(|| GatewayError::Internal("session requested before identity was resolved".into()))?;
        Ok(MinifluxClient::new(self.http.clone(), &identity.instance, &identity.token))
    }
}

impl Interceptor for SessionFactory {
    fn name(&self) -> &'static str {
        "session"
    }

    fn intercept<'a>(&'a self, mut ctx: RequestContext, next: Next<'a>) -> BoxFuture<'a, Response> {
        Box::pin(async move {
            match self.session(&ctx) {
                Ok(client) => {
                    ctx.client = Some(client);
                    next.run(ctx).await
                }
                Err(e) => e.into_response(),
            }
        })
    }
}
