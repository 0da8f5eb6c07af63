//! The listing page: categories with their feeds.

use std::collections::HashMap;
use std::fmt::Write;

use crate::articles::cursor::scoped_params;
use crate::articles::filter::keys;
use crate::articles::QueryParams;
use crate::miniflux::{Category, Feed};
use crate::render::{single_line, RenderError};

/// A category and the feeds filed under it.
#[derive(Debug)]
pub struct CategoryGroup<'a> {
    pub category: &'a Category,
    pub feeds: Vec<&'a Feed>,
}

#[derive(Debug)]
pub struct HomePage<'a> {
    pub groups: Vec<CategoryGroup<'a>>,
    /// Feeds whose category is missing from the category list.
    pub ungrouped: Vec<&'a Feed>,
    params: &'a QueryParams,
}

impl<'a> HomePage<'a> {
    /// Group `feeds` under `categories` by category id, keeping API order.
    pub fn new(categories: &'a [Category], feeds: &'a [Feed], params: &'a QueryParams) -> Self {
        let mut by_category: HashMap<i64, Vec<&'a Feed>> = HashMap::new();
        let mut ungrouped = Vec::new();
        for feed in feeds {
            match feed.category_id() {
                Some(id) if categories.iter().any(|c| c.id == id) => {
                    by_category.entry(id).or_default().push(feed)
                }
                _ => ungrouped.push(feed),
            }
        }

        let groups = categories
            .iter()
            .map(|category| CategoryGroup {
                category,
                feeds: by_category.remove(&category.id).unwrap_or_default(),
            })
            .collect();

        Self {
            groups,
            ungrouped,
            params,
        }
    }

    pub fn render(&self) -> Result<String, RenderError> {
        let mut out = String::new();
        writeln!(out, "# Miniflux")?;
        writeln!(out)?;
        writeln!(out, "=> {} Start reading", self.params.link("/entry"))?;
        writeln!(out, "=> {} Refresh all feeds", self.params.link("/refresh"))?;

        for group in &self.groups {
            writeln!(out)?;
            let title = single_line(&group.category.title);
            writeln!(out, "## {}", title)?;
            let all = scoped_params(self.params, keys::CATEGORY_ID, group.category.id);
            writeln!(out, "=> {} All of {}", all.link("/entry"), title)?;
            self.render_feeds(&mut out, &group.feeds)?;
        }

        if !self.ungrouped.is_empty() {
            writeln!(out)?;
            writeln!(out, "## Other feeds")?;
            self.render_feeds(&mut out, &self.ungrouped)?;
        }
        Ok(out)
    }

    fn render_feeds(&self, out: &mut String, feeds: &[&Feed]) -> std::fmt::Result {
        for feed in feeds {
            let params = scoped_params(self.params, keys::FEED_ID, feed.id);
            write!(out, "=> {} {}", params.link("/entry"), single_line(&feed.title))?;
            if feed.parsing_error_count > 0 {
                write!(out, " (failing)")?;
            }
            writeln!(out)?;
        }
        Ok(())
    }
}
