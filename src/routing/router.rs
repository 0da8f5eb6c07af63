//! Route lookup and dispatch.
//!
//! # Design Decisions
//! - Exact path matching; the gateway serves a fixed set of pages
//! - Explicit not-found rather than a silent default

use std::sync::Arc;

use futures_util::future::BoxFuture;

use crate::error::GatewayError;
use crate::gemini::middleware::{Endpoint, IdentityResolver, Pipeline, RequestContext, SessionFactory};
use crate::gemini::Response;
use crate::handlers;
use crate::store::CredentialStore;

/// Pages served by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Entry,
    MarkAs,
    Refresh,
}

impl Route {
    pub fn from_path(path: &str) -> Option<Self> {
        match path {
            "/" => Some(Route::Home),
            "/entry" => Some(Route::Entry),
            "/entry/mark" => Some(Route::MarkAs),
            "/refresh" => Some(Route::Refresh),
            _ => None,
        }
    }

    /// Metric label.
    pub fn label(&self) -> &'static str {
        match self {
            Route::Home => "home",
            Route::Entry => "entry",
            Route::MarkAs => "mark_as",
            Route::Refresh => "refresh",
        }
    }
}

/// Label for any request path, including unknown ones.
pub fn route_label(path: &str) -> &'static str {
    Route::from_path(path).map_or("unmatched", |route| route.label())
}

/// Endpoint dispatching to the route handlers.
#[derive(Debug, Default)]
pub struct Router;

impl Router {
    pub async fn dispatch(&self, ctx: &RequestContext) -> Result<Response, GatewayError> {
        let path = ctx.request.path();
        let route = Route::from_path(path).ok_or_else(|| GatewayError::NotFound(path.to_string()))?;
        let client = ctx
            .client
            .as_ref()
            .ok_or_else(|| GatewayError::Internal("router reached without a Miniflux session".into()))?;
        let params = ctx.request.params();

        match route {
            Route::Home => handlers::home(params, client).await,
            Route::Entry => handlers::entry(params, client).await,
            Route::MarkAs => handlers::mark_as(params, client).await,
            Route::Refresh => handlers::refresh(params, client).await,
        }
    }
}

impl Endpoint for Router {
    fn call<'a>(&'a self, ctx: RequestContext) -> BoxFuture<'a, Response> {
        Box::pin(async move {
            self.dispatch(&ctx)
                .await
                .unwrap_or_else(GatewayError::into_response)
        })
    }
}

/// The standard pipeline: identity, then session, then the router.
pub fn gateway_pipeline(store: CredentialStore, http: reqwest::Client) -> Pipeline {
    Pipeline::new(Arc::new(Router))
        .with(Arc::new(IdentityResolver::new(store)))
        .with(Arc::new(SessionFactory::new(http)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemini::{Request, Status};

    #[test]
    fn test_route_lookup() {
        assert_eq!(Route::from_path("/"), Some(Route::Home));
        assert_eq!(Route::from_path("/entry"), Some(Route::Entry));
        assert_eq!(Route::from_path("/entry/mark"), Some(Route::MarkAs));
        assert_eq!(Route::from_path("/refresh"), Some(Route::Refresh));
        assert_eq!(Route::from_path("/entry/"), None);
        assert_eq!(route_label("/nope"), "unmatched");
    }

    #[tokio::test]
    async fn test_pipeline_order() {
        let store = CredentialStore::in_memory().await.unwrap();
        let pipeline = gateway_pipeline(store, reqwest::Client::new());
        assert_eq!(pipeline.names(), vec!["identity", "session"]);
    }

    #[tokio::test]
    async fn test_router_without_session_is_internal() {
        let ctx = RequestContext::new(Request::parse("gemini://localhost/").unwrap(), Vec::new());
        let response = Router.call(ctx).await;
        assert_eq!(response.status(), Status::PermanentFailure);
    }

    #[tokio::test]
    async fn test_unknown_path_is_not_found() {
        let ctx = RequestContext::new(Request::parse("gemini://localhost/admin").unwrap(), Vec::new());
        let response = Router.call(ctx).await;
        assert_eq!(response.status(), Status::NotFound);
    }
}
