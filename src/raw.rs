//! Line-numbered rendering for non-markdown text.

use crate::escape::escape_html;
use crate::highlight::{highlight_as, Flavor, Language};

/// Renders `content` one line at a time.
///
/// Lines are split on `\n` only, so the output always holds exactly one
/// `raw-line` per input line, including a trailing empty one. Empty lines
/// carry a `&nbsp;` so they keep their height.
pub fn render_raw(content: &str, ext: &str) -> String {
    let lang = Language::from_tag(ext);
    let mut out = String::with_capacity(content.len() * 2);

    for (idx, line) in content.split('\n').enumerate() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let body = match lang {
            Some(lang) => highlight_as(line, lang, Flavor::Line),
            None => escape_html(line),
        };
        out.push_str("<div class=\"raw-line\"><span class=\"line-num\">");
        out.push_str(&(idx + 1).to_string());
        out.push_str("</span><span class=\"line-content\">");
        if body.is_empty() {
            out.push_str("&nbsp;");
        } else {
            out.push_str(&body);
        }
        out.push_str("</span></div>");
    }
    out
}
