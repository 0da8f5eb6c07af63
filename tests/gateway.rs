//! Pipeline tests against a mock Miniflux API.
//!
//! These drive the full interceptor chain and router without TLS; the
//! transport is covered in `transport.rs`.

mod common;

use axum::http::Method;
use common::*;
use gemflux::gemini::Status;
use gemflux::routing::gateway_pipeline;
use gemflux::store::Fingerprint;
use rustls::pki_types::CertificateDer;

#[tokio::test]
async fn test_missing_certificate_never_reaches_miniflux() {
    let mock = MockMiniflux::start().await;
    let pipeline = pipeline_for(&mock).await;

    let response = pipeline.handle(context("gemini://localhost/", Vec::new())).await;

    assert_eq!(response.status(), Status::CertificateRequired);
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn test_unknown_certificate_reports_fingerprint() {
    let mock = MockMiniflux::start().await;
    let pipeline = pipeline_for(&mock).await;

    let stranger = b"somebody else".to_vec();
    let response = pipeline
        .handle(context("gemini://localhost/", vec![CertificateDer::from(stranger.clone())]))
        .await;

    assert_eq!(response.status(), Status::CertificateNotAuthorized);
    assert!(response
        .meta()
        .contains(Fingerprint::of_certificate(&stranger).as_str()));
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn test_home_groups_feeds_by_category() {
    let mock = MockMiniflux::start().await;
    mock.set_categories(vec![category_json(1, "Tech"), category_json(2, "News")]);
    mock.set_feeds(vec![
        feed_json(10, "Rust Blog", category_json(1, "Tech")),
        feed_json(11, "LWN", category_json(1, "Tech")),
        feed_json(12, "Daily", category_json(2, "News")),
    ]);
    let pipeline = pipeline_for(&mock).await;

    let response = pipeline.handle(reader_context("gemini://localhost/")).await;

    assert_eq!(response.status(), Status::Success);
    let body = response.body().unwrap();
    let tech = body.find("## Tech").unwrap();
    let news = body.find("## News").unwrap();
    let rust = body.find("Rust Blog").unwrap();
    let lwn = body.find("LWN").unwrap();
    assert!(tech < rust && rust < news);
    assert!(tech < lwn && lwn < news);
    assert!(body.contains("=> /entry?categoryID=1 All of Tech"));
    assert!(body.contains("=> /entry?feedID=12 Daily"));

    let paths: Vec<String> = mock.calls().into_iter().map(|c| c.path).collect();
    assert_eq!(paths, vec!["/v1/categories", "/v1/feeds"]);
}

#[tokio::test]
async fn test_entry_page_links_and_upstream_query() {
    let mock = MockMiniflux::start().await;
    mock.set_entries(vec![
        entry_json(1, "First", "unread"),
        entry_json(2, "Second", "unread"),
        entry_json(3, "Third", "unread"),
    ]);
    let pipeline = pipeline_for(&mock).await;

    let response = pipeline
        .handle(reader_context("gemini://localhost/entry?offset=1"))
        .await;

    assert_eq!(response.status(), Status::Success);
    let body = response.body().unwrap();
    assert!(body.starts_with("# Second\n"));
    assert!(body.contains("Body of Second"));
    assert!(body.contains("=> /entry?offset=2 Next"));
    assert!(body.contains("=> /entry?offset=0 Previous"));
    assert!(body.contains("=> /entry/mark?offset=1&_id=2&_status=read Mark as read"));

    let calls = mock.calls();
    assert_eq!(calls.len(), 1);
    let query = calls[0].query.clone().unwrap();
    assert!(query.contains("status=unread"));
    assert!(query.contains("limit=1"));
    assert!(query.contains("offset=1"));
    assert!(query.contains("order=published_at"));
    assert!(query.contains("direction=desc"));
}

#[tokio::test]
async fn test_first_entry_has_no_previous() {
    let mock = MockMiniflux::start().await;
    mock.set_entries(vec![entry_json(1, "Only", "unread")]);
    let pipeline = pipeline_for(&mock).await;

    let response = pipeline.handle(reader_context("gemini://localhost/entry")).await;

    let body = response.body().unwrap();
    assert!(body.contains("=> /entry?offset=1 Next"));
    assert!(!body.contains("Previous"));
}

#[tokio::test]
async fn test_empty_listing_is_temporary_failure() {
    let mock = MockMiniflux::start().await;
    let pipeline = pipeline_for(&mock).await;

    let response = pipeline.handle(reader_context("gemini://localhost/entry")).await;

    assert_eq!(response.status(), Status::TemporaryFailure);
    assert_eq!(response.meta(), "No entry returned");
}

#[tokio::test]
async fn test_mark_read_moves_on_to_next_unread() {
    let mock = MockMiniflux::start().await;
    mock.set_entries(vec![
        entry_json(1, "First", "unread"),
        entry_json(2, "Second", "unread"),
    ]);
    let pipeline = pipeline_for(&mock).await;

    let response = pipeline
        .handle(reader_context("gemini://localhost/entry/mark?offset=0&_id=1&_status=read"))
        .await;

    assert_eq!(response.status(), Status::Redirect);
    assert_eq!(response.meta(), "/entry?offset=0");
    assert_eq!(mock.entry_status(1).as_deref(), Some("read"));

    let update = &mock.calls()[0];
    assert_eq!(update.method, Method::PUT);
    assert_eq!(update.path, "/v1/entries");
    let body = update.body.clone().unwrap();
    assert_eq!(body["entry_ids"], serde_json::json!([1]));
    assert_eq!(body["status"], "read");

    let response = pipeline
        .handle(reader_context("gemini://localhost/entry?offset=0"))
        .await;
    assert!(response.body().unwrap().starts_with("# Second\n"));
}

#[tokio::test]
async fn test_mark_with_invalid_status_is_rejected_locally() {
    let mock = MockMiniflux::start().await;
    mock.set_entries(vec![entry_json(1, "First", "unread")]);
    let pipeline = pipeline_for(&mock).await;

    let response = pipeline
        .handle(reader_context("gemini://localhost/entry/mark?_id=1&_status=archived"))
        .await;

    assert_eq!(response.status(), Status::BadRequest);
    assert!(mock.calls().is_empty());
    assert_eq!(mock.entry_status(1).as_deref(), Some("unread"));
}

#[tokio::test]
async fn test_mark_without_id_is_rejected_locally() {
    let mock = MockMiniflux::start().await;
    let pipeline = pipeline_for(&mock).await;

    let response = pipeline
        .handle(reader_context("gemini://localhost/entry/mark?_status=read"))
        .await;

    assert_eq!(response.status(), Status::BadRequest);
    assert_eq!(response.meta(), "missing id");
    assert!(mock.calls().is_empty());
}

#[tokio::test]
async fn test_refresh_redirects_home_with_params() {
    let mock = MockMiniflux::start().await;
    let pipeline = pipeline_for(&mock).await;

    let response = pipeline
        .handle(reader_context("gemini://localhost/refresh?categoryID=3"))
        .await;

    assert_eq!(response.status(), Status::Redirect);
    assert_eq!(response.meta(), "/?categoryID=3");
    let calls = mock.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].method, Method::PUT);
    assert_eq!(calls[0].path, "/v1/feeds/refresh");
}

#[tokio::test]
async fn test_upstream_failures() {
    let mock = MockMiniflux::start().await;
    mock.fail_with(500);
    let pipeline = pipeline_for(&mock).await;

    let entry = pipeline.handle(reader_context("gemini://localhost/entry")).await;
    assert_eq!(entry.status(), Status::TemporaryFailure);
    assert_eq!(entry.meta(), "Error querying Miniflux");

    let home = pipeline.handle(reader_context("gemini://localhost/")).await;
    assert_eq!(home.status(), Status::TemporaryFailure);

    let mark = pipeline
        .handle(reader_context("gemini://localhost/entry/mark?_id=1&_status=read"))
        .await;
    assert_eq!(mark.status(), Status::CgiError);

    let refresh = pipeline.handle(reader_context("gemini://localhost/refresh")).await;
    assert_eq!(refresh.status(), Status::CgiError);
}

#[tokio::test]
async fn test_rejected_token_is_temporary_failure() {
    let mock = MockMiniflux::start().await;
    let store = gemflux::store::CredentialStore::in_memory().await.unwrap();
    store
        .upsert(&Fingerprint::of_certificate(READER_CERT), &mock.url(), "stale-token")
        .await
        .unwrap();
    let pipeline = gateway_pipeline(store, reqwest::Client::new());

    let response = pipeline.handle(reader_context("gemini://localhost/entry")).await;

    assert_eq!(response.status(), Status::TemporaryFailure);
    assert_eq!(mock.calls().len(), 1);
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let mock = MockMiniflux::start().await;
    let pipeline = pipeline_for(&mock).await;

    let response = pipeline.handle(reader_context("gemini://localhost/settings")).await;

    assert_eq!(response.status(), Status::NotFound);
    assert!(mock.calls().is_empty());
}
