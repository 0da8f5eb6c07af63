//! Miniflux API payloads and error definitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Read state of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    Unread,
    Read,
    Removed,
}

impl EntryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryStatus::Unread => "unread",
            EntryStatus::Read => "read",
            EntryStatus::Removed => "removed",
        }
    }
}

impl std::str::FromStr for EntryStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unread" => Ok(EntryStatus::Unread),
            "read" => Ok(EntryStatus::Read),
            "removed" => Ok(EntryStatus::Removed),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for EntryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A feed category.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Category {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub user_id: i64,
}

/// A subscribed feed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Feed {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub site_url: String,
    #[serde(default)]
    pub feed_url: String,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default)]
    pub parsing_error_count: i64,
}

impl Feed {
    /// Identifier of the owning category, if the API reported one.
    pub fn category_id(&self) -> Option<i64> {
        self.category.as_ref().map(|c| c.id)
    }
}

/// A single article.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Entry {
    pub id: i64,
    #[serde(default)]
    pub feed_id: i64,
    pub status: EntryStatus,
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub comments_url: String,
    #[serde(default)]
    pub author: String,
    /// HTML body as stored by Miniflux.
    #[serde(default)]
    pub content: String,
    /// RFC 3339 timestamp.
    #[serde(default)]
    pub published_at: String,
    #[serde(default)]
    pub starred: bool,
    #[serde(default)]
    pub reading_time: i64,
    #[serde(default)]
    pub feed: Option<Feed>,
}

/// Response of `GET /v1/entries`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct EntryResultSet {
    pub total: u64,
    #[serde(default)]
    pub entries: Vec<Entry>,
}

/// Body of `PUT /v1/entries`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct EntriesStatusUpdate<'a> {
    pub entry_ids: &'a [i64],
    pub status: EntryStatus,
}

/// Error body returned by Miniflux on failures.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub error_message: String,
}

/// Errors that can occur when talking to a Miniflux instance.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection, TLS or protocol failure.
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    /// The call did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The token was rejected.
    #[error("access unauthorized")]
    Unauthorized,

    /// The resource does not exist.
    #[error("resource not found")]
    NotFound,

    /// Any other non-success status.
    #[error("status {status}: {message}")]
    Status { status: u16, message: String },

    /// The body was not the JSON we expected.
    #[error("invalid response body: {0}")]
    Decode(#[source] reqwest::Error),
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ApiError::Timeout
        } else if e.is_decode() {
            ApiError::Decode(e)
        } else {
            ApiError::Transport(e)
        }
    }
}

/// Result type for Miniflux operations.
pub type ApiResult<T> = Result<T, ApiError>;
