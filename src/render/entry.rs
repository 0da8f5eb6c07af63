//! The article page.

use std::fmt::Write;

use crate::articles::cursor::{mark_as_params, next_params, prev_params};
use crate::articles::QueryParams;
use crate::miniflux::{Entry, EntryStatus};
use crate::render::{content, link_target, single_line, RenderError};

/// One entry, converted, with the links that move away from it.
#[derive(Debug)]
pub struct EntryPage<'a> {
    pub entry: &'a Entry,
    pub content: String,
    params: &'a QueryParams,
}

impl<'a> EntryPage<'a> {
    /// Convert the entry body up front so a conversion failure is reported
    /// before anything is written.
    pub fn new(entry: &'a Entry, params: &'a QueryParams) -> Result<Self, RenderError> {
        Ok(Self {
            entry,
            content: content::to_gemtext(entry.id, &entry.content)?,
            params,
        })
    }

    /// Status the mark-as link switches the entry to.
    pub fn toggle_status(&self) -> EntryStatus {
        match self.entry.status {
            EntryStatus::Read => EntryStatus::Unread,
            _ => EntryStatus::Read,
        }
    }

    pub fn next_link(&self) -> String {
        next_params(self.params).link("/entry")
    }

    /// Absent on the first entry of the list.
    pub fn prev_link(&self) -> Option<String> {
        prev_params(self.params).map(|p| p.link("/entry"))
    }

    pub fn mark_link(&self) -> String {
        mark_as_params(self.params, self.entry.id, self.toggle_status()).link("/entry/mark")
    }

    pub fn render(&self) -> Result<String, RenderError> {
        let entry = self.entry;
        let mut out = String::new();

        writeln!(out, "# {}", single_line(&entry.title))?;
        let mut byline = Vec::new();
        if let Some(feed) = &entry.feed {
            byline.push(single_line(&feed.title));
        }
        if !entry.author.trim().is_empty() {
            byline.push(single_line(&entry.author));
        }
        if !entry.published_at.is_empty() {
            byline.push(entry.published_at.clone());
        }
        if !byline.is_empty() {
            writeln!(out, "{}", byline.join(" | "))?;
        }
        if let Some(url) = link_target(&entry.url) {
            writeln!(out, "=> {} Original article", url)?;
        }
        if let Some(url) = link_target(&entry.comments_url) {
            writeln!(out, "=> {} Comments", url)?;
        }
        writeln!(out)?;

        out.push_str(&self.content);
        if !self.content.ends_with('\n') {
            writeln!(out)?;
        }
        writeln!(out)?;

        let action = match self.toggle_status() {
            EntryStatus::Unread => "Mark as unread",
            _ => "Mark as read",
        };
        writeln!(out, "=> {} {}", self.mark_link(), action)?;
        writeln!(out, "=> {} Next", self.next_link())?;
        if let Some(prev) = self.prev_link() {
            writeln!(out, "=> {} Previous", prev)?;
        }
        writeln!(out, "=> {} Back to feeds", self.params.link("/"))?;
        Ok(out)
    }
}
