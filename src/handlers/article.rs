//! `/entry`: the entry at the current position of the filtered list.

use crate::articles::{ArticleList, QueryParams};
use crate::error::GatewayError;
use crate::gemini::Response;
use crate::miniflux::MinifluxClient;
use crate::render::EntryPage;

pub async fn entry(params: &QueryParams, client: &MinifluxClient) -> Result<Response, GatewayError> {
    let mut list = ArticleList::from_params(params);
    let entry = list
        .first(client)
        .await
        .map_err(|e| GatewayError::upstream("entries", e))?
        .ok_or(GatewayError::NoEntry)?;

    tracing::debug!(entry_id = entry.id, offset = list.filter.offset, "Rendering entry");
    let body = EntryPage::new(&entry, params)?.render()?;
    Ok(Response::gemtext(body))
}
