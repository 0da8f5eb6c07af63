//! The article filter: which slice of the Miniflux entry list a page shows.
//!
//! A filter starts from fixed defaults (unread, newest first, one entry) and
//! is then overlaid with whatever recognized parameters the request carries.
//!
//! Parsing is deliberately best-effort: a value that does not parse (for
//! example `offset=abc` in a hand-edited or stale bookmark) is ignored and
//! the field keeps its previous value. One bad field never rejects the
//! request and never disturbs the other fields.

use std::str::FromStr;

use crate::articles::params::QueryParams;
use crate::miniflux::EntryStatus;

/// Query keys understood on listing and article requests.
pub mod keys {
    pub const STATUS: &str = "status";
    pub const OFFSET: &str = "offset";
    pub const LIMIT: &str = "limit";
    pub const ORDER: &str = "order";
    pub const DIRECTION: &str = "direction";
    pub const STARRED: &str = "starred";
    pub const BEFORE: &str = "before";
    pub const AFTER: &str = "after";
    pub const AFTER_ENTRY_ID: &str = "afterEntryID";
    pub const BEFORE_ENTRY_ID: &str = "beforeEntryID";
    pub const SEARCH: &str = "search";
    pub const CATEGORY_ID: &str = "categoryID";
    pub const FEED_ID: &str = "feedID";
    pub const STATUSES: &str = "statuses";
}

/// Status constraint; `None` in a filter means every status.
const STATUS_ALL: &str = "all";

/// Sort key accepted by Miniflux.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryOrder {
    Id,
    Status,
    PublishedAt,
    CreatedAt,
    ChangedAt,
    CategoryTitle,
    CategoryId,
    Title,
    Author,
}

impl EntryOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryOrder::Id => "id",
            EntryOrder::Status => "status",
            EntryOrder::PublishedAt => "published_at",
            EntryOrder::CreatedAt => "created_at",
            EntryOrder::ChangedAt => "changed_at",
            EntryOrder::CategoryTitle => "category_title",
            EntryOrder::CategoryId => "category_id",
            EntryOrder::Title => "title",
            EntryOrder::Author => "author",
        }
    }
}

impl FromStr for EntryOrder {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "id" => EntryOrder::Id,
            "status" => EntryOrder::Status,
            "published_at" => EntryOrder::PublishedAt,
            "created_at" => EntryOrder::CreatedAt,
            "changed_at" => EntryOrder::ChangedAt,
            "category_title" => EntryOrder::CategoryTitle,
            "category_id" => EntryOrder::CategoryId,
            "title" => EntryOrder::Title,
            "author" => EntryOrder::Author,
            _ => return Err(()),
        })
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Asc => "asc",
            Direction::Desc => "desc",
        }
    }
}

impl FromStr for Direction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(Direction::Asc),
            "desc" => Ok(Direction::Desc),
            _ => Err(()),
        }
    }
}

/// Complete description of the requested slice of the entry list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleFilter {
    /// `None` selects every status.
    pub status: Option<EntryStatus>,
    pub order: EntryOrder,
    pub direction: Direction,
    pub offset: u64,
    pub limit: u64,
    pub starred: Option<bool>,
    /// Unix timestamps bounding the publication date.
    pub before: Option<i64>,
    pub after: Option<i64>,
    pub before_entry_id: Option<i64>,
    pub after_entry_id: Option<i64>,
    pub search: Option<String>,
    pub category_id: Option<i64>,
    pub feed_id: Option<i64>,
    /// Explicit status set, sent in addition to `status`.
    pub statuses: Vec<EntryStatus>,
}

impl Default for ArticleFilter {
    fn default() -> Self {
        Self {
            status: Some(EntryStatus::Unread),
            order: EntryOrder::PublishedAt,
            direction: Direction::Desc,
            offset: 0,
            limit: 1,
            starred: None,
            before: None,
            after: None,
            before_entry_id: None,
            after_entry_id: None,
            search: None,
            category_id: None,
            feed_id: None,
            statuses: Vec::new(),
        }
    }
}

impl ArticleFilter {
    /// Defaults overlaid with `params`.
    pub fn from_params(params: &QueryParams) -> Self {
        let mut filter = Self::default();
        filter.apply_parameters(params);
        filter
    }

    /// Overwrite each field whose key is present in `params` and parses.
    ///
    /// Absent keys and unparsable values leave the field untouched.
    pub fn apply_parameters(&mut self, params: &QueryParams) {
        if let Some(value) = params.get(keys::STATUS) {
            if value == STATUS_ALL {
                self.status = None;
            } else if let Ok(status) = value.parse() {
                self.status = Some(status);
            }
        }
        overwrite(params, keys::OFFSET, &mut self.offset);
        overwrite(params, keys::LIMIT, &mut self.limit);
        overwrite(params, keys::ORDER, &mut self.order);
        overwrite(params, keys::DIRECTION, &mut self.direction);
        if let Some(starred) = params.get(keys::STARRED).and_then(parse_flag) {
            self.starred = Some(starred);
        }
        overwrite_some(params, keys::BEFORE, &mut self.before);
        overwrite_some(params, keys::AFTER, &mut self.after);
        overwrite_some(params, keys::AFTER_ENTRY_ID, &mut self.after_entry_id);
        overwrite_some(params, keys::BEFORE_ENTRY_ID, &mut self.before_entry_id);
        if let Some(search) = params.get(keys::SEARCH) {
            self.search = (!search.is_empty()).then(|| search.to_string());
        }
        overwrite_some(params, keys::CATEGORY_ID, &mut self.category_id);
        overwrite_some(params, keys::FEED_ID, &mut self.feed_id);
        if params.contains(keys::STATUSES) {
            let statuses: Vec<EntryStatus> = params
                .get_all(keys::STATUSES)
                .filter_map(|s| s.parse().ok())
                .collect();
            if !statuses.is_empty() {
                self.statuses = statuses;
            }
        }
    }

    /// Miniflux `GET /v1/entries` query parameters for this filter.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        pairs.push(("direction", self.direction.as_str().to_string()));
        pairs.push(("order", self.order.as_str().to_string()));
        pairs.push(("limit", self.limit.to_string()));
        pairs.push(("offset", self.offset.to_string()));

        let bounds = [
            ("after", self.after),
            ("before", self.before),
            ("after_entry_id", self.after_entry_id),
            ("before_entry_id", self.before_entry_id),
        ];
        for (key, value) in bounds {
            if let Some(value) = value.filter(|v| *v > 0) {
                pairs.push((key, value.to_string()));
            }
        }

        if let Some(starred) = self.starred {
            pairs.push(("starred", starred.to_string()));
        }
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(id) = self.category_id.filter(|id| *id > 0) {
            pairs.push(("category_id", id.to_string()));
        }
        if let Some(id) = self.feed_id.filter(|id| *id > 0) {
            pairs.push(("feed_id", id.to_string()));
        }
        for status in &self.statuses {
            pairs.push(("status", status.as_str().to_string()));
        }
        pairs
    }
}

fn overwrite<T: FromStr>(params: &QueryParams, key: &str, slot: &mut T) {
    if let Some(value) = params.get(key).and_then(|v| v.parse().ok()) {
        *slot = value;
    }
}

fn overwrite_some<T: FromStr>(params: &QueryParams, key: &str, slot: &mut Option<T>) {
    if let Some(value) = params.get(key).and_then(|v| v.parse().ok()) {
        *slot = Some(value);
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}
