//! HTML to gemtext conversion for entry bodies.

use crate::render::RenderError;

/// Column width handed to the converter. Gemini clients reflow text lines,
/// so this only bounds tables and rules.
const CONTENT_WIDTH: usize = 100;

/// Convert an entry's HTML body into gemtext.
pub fn to_gemtext(entry_id: i64, html: &str) -> Result<String, RenderError> {
    let text = html2text::from_read(html.as_bytes(), CONTENT_WIDTH).map_err(|e| {
        RenderError::Conversion {
            entry_id,
            message: e.to_string(),
        }
    })?;
    Ok(gemtextify(&text))
}

/// Rewrite converter output into valid gemtext.
///
/// Link footnotes (`[3]: https://...`) become link lines. Text lines that
/// would be misread as gemtext link or preformat toggles are indented by one
/// space.
fn gemtextify(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.lines() {
        if let Some((label, target)) = footnote(line) {
            out.push_str("=> ");
            out.push_str(target);
            out.push_str(" [");
            out.push_str(label);
            out.push(']');
        } else if line.starts_with("=>") || line.starts_with("```") {
            out.push(' ');
            out.push_str(line);
        } else {
            out.push_str(line);
        }
        out.push('\n');
    }
    out
}

fn footnote(line: &str) -> Option<(&str, &str)> {
    let rest = line.strip_prefix('[')?;
    let (label, target) = rest.split_once("]: ")?;
    if label.is_empty() || !label.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let target = target.trim();
    if target.is_empty() || target.contains(char::is_whitespace) {
        return None;
    }
    Some((label, target))
}
