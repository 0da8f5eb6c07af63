//! Shared utilities for integration tests.
//!
//! `MockMiniflux` is a small in-process Miniflux API (axum) on an ephemeral
//! port. It records every call so tests can assert what the gateway asked
//! for, and what it did not.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{RawQuery, State};
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use gemflux::gemini::middleware::{Pipeline, RequestContext};
use gemflux::gemini::Request;
use gemflux::miniflux::MinifluxClient;
use gemflux::routing::gateway_pipeline;
use gemflux::store::{CredentialStore, Fingerprint};
use rustls::pki_types::CertificateDer;

pub const TOKEN: &str = "test-token";

/// DER bytes standing in for an enrolled client certificate.
pub const READER_CERT: &[u8] = b"reader certificate";

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub body: Option<Value>,
}

#[derive(Debug, Default)]
pub struct MockData {
    pub categories: Vec<Value>,
    pub feeds: Vec<Value>,
    pub entries: Vec<Value>,
    pub calls: Vec<Call>,
    /// When set, every call is answered with this status.
    pub fail_with: Option<u16>,
    /// When set, every call waits this long before answering.
    pub delay: Option<Duration>,
}

#[derive(Clone)]
pub struct MockMiniflux {
    pub addr: SocketAddr,
    pub data: Arc<Mutex<MockData>>,
}

impl MockMiniflux {
    pub async fn start() -> Self {
        let data = Arc::new(Mutex::new(MockData::default()));
        let app = Router::new()
            .route("/v1/categories", get(list_categories))
            .route("/v1/feeds", get(list_feeds))
            .route("/v1/entries", get(list_entries).put(update_entries))
            .route("/v1/feeds/refresh", put(refresh_feeds))
            .with_state(Arc::clone(&data));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, data }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.data.lock().unwrap().calls.clone()
    }

    pub fn set_categories(&self, categories: Vec<Value>) {
        self.data.lock().unwrap().categories = categories;
    }

    pub fn set_feeds(&self, feeds: Vec<Value>) {
        self.data.lock().unwrap().feeds = feeds;
    }

    pub fn set_entries(&self, entries: Vec<Value>) {
        self.data.lock().unwrap().entries = entries;
    }

    pub fn fail_with(&self, status: u16) {
        self.data.lock().unwrap().fail_with = Some(status);
    }

    pub fn delay_by(&self, delay: Duration) {
        self.data.lock().unwrap().delay = Some(delay);
    }

    /// Client for the enrolled reader's account on this instance.
    pub fn client(&self, http: reqwest::Client) -> MinifluxClient {
        MinifluxClient::new(http, &self.url(), TOKEN)
    }

    pub fn entry_status(&self, id: i64) -> Option<String> {
        self.data
            .lock()
            .unwrap()
            .entries
            .iter()
            .find(|e| e["id"] == id)
            .and_then(|e| e["status"].as_str().map(str::to_string))
    }
}

type Shared = Arc<Mutex<MockData>>;

/// Wait out the configured delay, if any.
async fn stall(data: &Shared) {
    let delay = data.lock().unwrap().delay;
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
}

/// Record the call and check auth. `Err` carries the response to send.
fn admit(data: &Shared, method: Method, uri: &Uri, headers: &HeaderMap, body: Option<Value>) -> Result<(), Response> {
    let mut data = data.lock().unwrap();
    data.calls.push(Call {
        method,
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        body,
    });

    if let Some(status) = data.fail_with {
        let status = StatusCode::from_u16(status).unwrap();
        return Err((status, Json(json!({"error_message": "mock failure"}))).into_response());
    }
    if headers.get("X-Auth-Token").and_then(|v| v.to_str().ok()) != Some(TOKEN) {
        return Err((StatusCode::UNAUTHORIZED, Json(json!({"error_message": "Access Unauthorized"}))).into_response());
    }
    Ok(())
}

async fn list_categories(State(data): State<Shared>, uri: Uri, headers: HeaderMap) -> Response {
    stall(&data).await;
    if let Err(response) = admit(&data, Method::GET, &uri, &headers, None) {
        return response;
    }
    let categories = data.lock().unwrap().categories.clone();
    Json(categories).into_response()
}

async fn list_feeds(State(data): State<Shared>, uri: Uri, headers: HeaderMap) -> Response {
    stall(&data).await;
    if let Err(response) = admit(&data, Method::GET, &uri, &headers, None) {
        return response;
    }
    let feeds = data.lock().unwrap().feeds.clone();
    Json(feeds).into_response()
}

async fn list_entries(
    State(data): State<Shared>,
    uri: Uri,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Response {
    stall(&data).await;
    if let Err(response) = admit(&data, Method::GET, &uri, &headers, None) {
        return response;
    }

    let pairs: Vec<(String, String)> = url::form_urlencoded::parse(query.unwrap_or_default().as_bytes())
        .into_owned()
        .collect();
    let statuses: Vec<&str> = pairs
        .iter()
        .filter(|(k, _)| k == "status")
        .map(|(_, v)| v.as_str())
        .collect();
    let number = |key: &str, default: usize| {
        pairs
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v.parse().ok())
            .unwrap_or(default)
    };
    let offset = number("offset", 0);
    let limit = number("limit", 100);

    let data = data.lock().unwrap();
    let matching: Vec<&Value> = data
        .entries
        .iter()
        .filter(|e| statuses.is_empty() || statuses.iter().any(|s| e["status"] == *s))
        .collect();
    let page: Vec<Value> = matching.iter().skip(offset).take(limit).map(|e| (*e).clone()).collect();

    Json(json!({"total": matching.len(), "entries": page})).into_response()
}

async fn update_entries(
    State(data): State<Shared>,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    stall(&data).await;
    if let Err(response) = admit(&data, Method::PUT, &uri, &headers, Some(body.clone())) {
        return response;
    }

    let status = body["status"].clone();
    let ids: Vec<i64> = body["entry_ids"]
        .as_array()
        .map(|ids| ids.iter().filter_map(Value::as_i64).collect())
        .unwrap_or_default();
    let mut data = data.lock().unwrap();
    for entry in data.entries.iter_mut() {
        if entry["id"].as_i64().is_some_and(|id| ids.contains(&id)) {
            entry["status"] = status.clone();
        }
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn refresh_feeds(State(data): State<Shared>, uri: Uri, headers: HeaderMap) -> Response {
    stall(&data).await;
    if let Err(response) = admit(&data, Method::PUT, &uri, &headers, None) {
        return response;
    }
    StatusCode::NO_CONTENT.into_response()
}

pub fn category_json(id: i64, title: &str) -> Value {
    json!({"id": id, "title": title, "user_id": 1})
}

pub fn feed_json(id: i64, title: &str, category: Value) -> Value {
    json!({
        "id": id,
        "title": title,
        "site_url": "https://example.org",
        "feed_url": "https://example.org/feed.xml",
        "category": category,
        "parsing_error_count": 0
    })
}

pub fn entry_json(id: i64, title: &str, status: &str) -> Value {
    json!({
        "id": id,
        "feed_id": 1,
        "status": status,
        "title": title,
        "url": format!("https://example.org/{}", id),
        "comments_url": "",
        "author": "Ada",
        "content": format!("<p>Body of {}</p>", title),
        "published_at": "2024-05-01T10:00:00Z",
        "starred": false,
        "reading_time": 1,
        "feed": {"id": 1, "title": "Example Feed"}
    })
}

/// Store with `der` enrolled against `instance`.
pub async fn store_with(der: &[u8], instance: &str) -> CredentialStore {
    let store = CredentialStore::in_memory().await.unwrap();
    store
        .upsert(&Fingerprint::of_certificate(der), instance, TOKEN)
        .await
        .unwrap();
    store
}

/// Standard pipeline whose enrolled reader points at `mock`.
pub async fn pipeline_for(mock: &MockMiniflux) -> Pipeline {
    let store = store_with(READER_CERT, &mock.url()).await;
    gateway_pipeline(store, reqwest::Client::new())
}

/// Request context for `url` as presented with `certificates`.
pub fn context(url: &str, certificates: Vec<CertificateDer<'static>>) -> RequestContext {
    RequestContext::new(Request::parse(url).unwrap(), certificates)
}

/// Request context from the enrolled reader.
pub fn reader_context(url: &str) -> RequestContext {
    context(url, vec![CertificateDer::from(READER_CERT.to_vec())])
}

pub fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}
