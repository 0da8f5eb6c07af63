//! Fetching the entry a filter points at.

use std::mem;

use crate::articles::filter::ArticleFilter;
use crate::articles::params::QueryParams;
use crate::miniflux::{ApiResult, Entry, EntrySource};

/// The unread-first article list, navigated one entry at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleList {
    pub filter: ArticleFilter,
}

impl ArticleList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default filter overlaid with the request parameters.
    pub fn from_params(params: &QueryParams) -> Self {
        Self {
            filter: ArticleFilter::from_params(params),
        }
    }

    /// Fetch the entry at the filter's current position.
    ///
    /// The query always asks for exactly one entry; the filter's own limit is
    /// put back afterwards whether or not the call succeeded. Returns
    /// `Ok(None)` when nothing matches.
    pub async fn first<S: EntrySource>(&mut self, source: &S) -> ApiResult<Option<Entry>> {
        let limit = mem::replace(&mut self.filter.limit, 1);
        let result = source.fetch_entries(&self.filter).await;
        self.filter.limit = limit;

        let result = result?;
        if result.total == 0 {
            return Ok(None);
        }
        Ok(result.entries.into_iter().next())
    }
}
