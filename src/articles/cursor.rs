//! Link parameters for moving through the article list.
//!
//! Position is an offset into the filtered list and travels only inside the
//! links a page emits. Every helper copies the incoming parameters, so the
//! caller's filter (status, feed, search, ...) is carried along unchanged.

use crate::articles::filter::keys;
use crate::articles::params::QueryParams;
use crate::miniflux::EntryStatus;

/// Parameter naming the entry a mark-as action applies to.
pub const ACTION_ID: &str = "_id";
/// Parameter naming the status a mark-as action sets.
pub const ACTION_STATUS: &str = "_status";

/// Offset carried by `params`, read the same way [`ArticleFilter`] reads it.
///
/// Missing, unparsable or negative means 0.
///
/// [`ArticleFilter`]: crate::articles::ArticleFilter
pub fn current_offset(params: &QueryParams) -> u64 {
    params
        .get(keys::OFFSET)
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(0)
}

/// Parameters for the entry after the current one.
pub fn next_params(params: &QueryParams) -> QueryParams {
    with_offset(params, current_offset(params).saturating_add(1))
}

/// Parameters for the entry before the current one, `None` at the head.
pub fn prev_params(params: &QueryParams) -> Option<QueryParams> {
    match current_offset(params) {
        0 => None,
        offset => Some(with_offset(params, offset - 1)),
    }
}

/// Parameters for the mark-as action on `id`.
///
/// The action keeps the navigation parameters so the redirect that follows
/// lands at the same offset.
pub fn mark_as_params(params: &QueryParams, id: i64, status: EntryStatus) -> QueryParams {
    let mut next = params.clone();
    next.set(ACTION_ID, id.to_string());
    next.set(ACTION_STATUS, status.as_str());
    next
}

/// Parameters for browsing one category or feed from the listing page.
///
/// Scope and position from the current view are dropped; any other filter
/// (status, order, search) still applies.
pub fn scoped_params(params: &QueryParams, key: &str, id: i64) -> QueryParams {
    let mut next = params.clone();
    next.remove(keys::OFFSET);
    next.remove(keys::CATEGORY_ID);
    next.remove(keys::FEED_ID);
    next.set(key, id.to_string());
    next
}

fn with_offset(params: &QueryParams, offset: u64) -> QueryParams {
    let mut next = params.clone();
    next.set(keys::OFFSET, offset.to_string());
    next
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_offset() {
        assert_eq!(current_offset(&QueryParams::new()), 0);
        assert_eq!(current_offset(&QueryParams::parse("offset=12")), 12);
        assert_eq!(current_offset(&QueryParams::parse("offset=abc")), 0);
        assert_eq!(current_offset(&QueryParams::parse("offset=-4")), 0);
    }

    #[test]
    fn test_offset_agrees_with_filter_beyond_i64() {
        use crate::articles::ArticleFilter;

        let params = QueryParams::parse("offset=9223372036854775808");
        let filter = ArticleFilter::from_params(&params);
        assert_eq!(current_offset(&params), filter.offset);
        assert_eq!(next_params(&params).get("offset"), Some("9223372036854775809"));
        assert_eq!(prev_params(&params).unwrap().get("offset"), Some("9223372036854775807"));

        let max = QueryParams::parse(&format!("offset={}", u64::MAX));
        assert_eq!(next_params(&max).get("offset"), Some(u64::MAX.to_string().as_str()));
    }

    #[test]
    fn test_next_increments_by_one() {
        for n in [0u64, 1, 2, 41, 1_000_000] {
            let params = QueryParams::parse(&format!("offset={}", n));
            assert_eq!(next_params(&params).get("offset"), Some((n + 1).to_string().as_str()));
        }
    }

    #[test]
    fn test_next_from_missing_or_invalid_offset() {
        assert_eq!(next_params(&QueryParams::new()).get("offset"), Some("1"));
        assert_eq!(next_params(&QueryParams::parse("offset=zz")).get("offset"), Some("1"));
    }

    #[test]
    fn test_prev_absent_at_head() {
        assert!(prev_params(&QueryParams::new()).is_none());
        assert!(prev_params(&QueryParams::parse("offset=0")).is_none());
        assert!(prev_params(&QueryParams::parse("offset=junk")).is_none());
        assert!(prev_params(&QueryParams::parse("offset=-3")).is_none());
    }

    #[test]
    fn test_prev_decrements_by_one() {
        let prev = prev_params(&QueryParams::parse("offset=5")).unwrap();
        assert_eq!(prev.get("offset"), Some("4"));
    }

    #[test]
    fn test_navigation_keeps_other_params() {
        let params = QueryParams::parse("feedID=3&offset=2&search=gemini");
        assert_eq!(next_params(&params).encode(), "feedID=3&offset=3&search=gemini");
        assert_eq!(prev_params(&params).unwrap().encode(), "feedID=3&offset=1&search=gemini");
    }

    #[test]
    fn test_mark_as_params() {
        let params = QueryParams::parse("status=unread&offset=1");
        let action = mark_as_params(&params, 77, EntryStatus::Read);
        assert_eq!(action.encode(), "status=unread&offset=1&_id=77&_status=read");
    }

    #[test]
    fn test_scoped_params_resets_position() {
        let params = QueryParams::parse("offset=6&feedID=2&status=read");
        let scoped = scoped_params(&params, keys::CATEGORY_ID, 9);
        assert_eq!(scoped.encode(), "status=read&categoryID=9");
    }
}
