//! Miniflux API access.

pub mod client;
pub mod types;

pub use client::{build_http_client, EntrySource, MinifluxClient};
pub use types::{ApiError, ApiResult, Category, Entry, EntryResultSet, EntryStatus, Feed};
