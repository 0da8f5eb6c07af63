//! Gemtext pages.
//!
//! Pages are written into a `String` with `std::fmt::Write`; the handler only
//! sends the body once rendering finished, so a failure never leaves a
//! partial response on the wire.

pub mod content;
pub mod entry;
pub mod home;

pub use entry::EntryPage;
pub use home::HomePage;

/// Errors raised while rendering a page.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("rendering failed for entry {entry_id}: {message}")]
    Conversion { entry_id: i64, message: String },

    #[error("template error: {0}")]
    Template(#[from] std::fmt::Error),
}

/// Meta line for successful page responses.
pub const GEMTEXT_MIME: &str = "text/gemini; charset=utf-8";

/// Collapse a value onto one line so it cannot break gemtext line syntax.
pub(crate) fn single_line(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Make a URL safe to place in a `=>` line.
///
/// Surrounding whitespace is dropped and any whitespace or control character
/// left inside is percent-encoded, so the target stays one token on one line.
/// Returns `None` when nothing remains.
pub(crate) fn link_target(url: &str) -> Option<String> {
    let url = url.trim();
    if url.is_empty() {
        return None;
    }
    let mut out = String::with_capacity(url.len());
    for c in url.chars() {
        if c.is_whitespace() || c.is_control() {
            let mut buf = [0u8; 4];
            for byte in c.encode_utf8(&mut buf).bytes() {
                out.push_str(&format!("%{:02X}", byte));
            }
        } else {
            out.push(c);
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line() {
        assert_eq!(single_line("  A\ntitle\r\n with\tbreaks "), "A title with breaks");
    }

    #[test]
    fn test_link_target() {
        assert_eq!(link_target("https://example.org/a").as_deref(), Some("https://example.org/a"));
        assert_eq!(
            link_target(" https://example.org/a b\nc ").as_deref(),
            Some("https://example.org/a%20b%0Ac")
        );
        assert_eq!(link_target("https://example.org/\u{3000}x").as_deref(), Some("https://example.org/%E3%80%80x"));
        assert_eq!(link_target(" \r\n"), None);
    }
}
