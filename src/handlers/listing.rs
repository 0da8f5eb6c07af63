//! `/`: categories and feeds.

use crate::articles::QueryParams;
use crate::error::GatewayError;
use crate::gemini::Response;
use crate::miniflux::MinifluxClient;
use crate::render::HomePage;

pub async fn home(params: &QueryParams, client: &MinifluxClient) -> Result<Response, GatewayError> {
    let categories = client
        .categories()
        .await
        .map_err(|e| GatewayError::upstream("categories", e))?;
    let feeds = client
        .feeds()
        .await
        .map_err(|e| GatewayError::upstream("feeds", e))?;

    let body = HomePage::new(&categories, &feeds, params).render()?;
    Ok(Response::gemtext(body))
}
