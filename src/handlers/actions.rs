//! `/entry/mark` and `/refresh`: state changes answered with a redirect.

use crate::articles::cursor::{ACTION_ID, ACTION_STATUS};
use crate::articles::QueryParams;
use crate::error::GatewayError;
use crate::gemini::Response;
use crate::miniflux::{EntryStatus, MinifluxClient};

/// Set one entry's status, then return to the same position in the list.
///
/// Both action parameters are validated before Miniflux is contacted. The
/// redirect keeps every other parameter, so with the default unread filter
/// the next unread entry slides into the current offset.
pub async fn mark_as(params: &QueryParams, client: &MinifluxClient) -> Result<Response, GatewayError> {
    let (id, status) = parse_action(params)?;

    client
        .update_entries(&[id], status)
        .await
        .map_err(|e| GatewayError::upstream_action("update_entries", e))?;
    tracing::info!(entry_id = id, status = %status, "Entry status updated");

    let mut rest = params.clone();
    rest.remove(ACTION_ID);
    rest.remove(ACTION_STATUS);
    Ok(Response::redirect(rest.link("/entry")))
}

/// Refresh every feed, then return to the listing the request came from.
pub async fn refresh(params: &QueryParams, client: &MinifluxClient) -> Result<Response, GatewayError> {
    client
        .refresh_all_feeds()
        .await
        .map_err(|e| GatewayError::upstream_action("refresh_feeds", e))?;
    tracing::info!("Feed refresh requested");
    Ok(Response::redirect(params.link("/")))
}

fn parse_action(params: &QueryParams) -> Result<(i64, EntryStatus), GatewayError> {
    let status = match params.get(ACTION_STATUS).map(str::parse::<EntryStatus>) {
        Some(Ok(status @ (EntryStatus::Read | EntryStatus::Unread))) => status,
        _ => return Err(GatewayError::BadRequest("missing or invalid status".into())),
    };
    let id = params
        .get(ACTION_ID)
        .ok_or_else(|| GatewayError::BadRequest("missing id".into()))?
        .parse::<i64>()
        .map_err(|_| GatewayError::BadRequest("invalid id".into()))?;
    Ok((id, status))
}
