//! Local document viewer.
//!
//! The core is a set of pure text transforms: a name-based text
//! classifier, a regex syntax highlighter, a markdown parser and a
//! line-numbered raw renderer. [`server`] wraps them in a small HTTP
//! service over a root directory.

pub mod access_log;
pub mod classify;
pub mod escape;
pub mod files;
pub mod highlight;
pub mod launch;
pub mod markdown;
pub mod raw;
pub mod server;

/// Whether a file with this name gets a text preview.
pub fn classify(name: &str) -> bool {
    classify::is_text_file(name)
}

/// Whether documents with this extension go through the markdown parser.
pub fn is_markdown(ext: &str) -> bool {
    matches!(ext.to_ascii_lowercase().as_str(), "md" | "markdown")
}

/// Renders file content for display: markdown becomes a document tree,
/// anything else the line-numbered raw view.
pub fn render_document(content: &str, ext: &str) -> String {
    if is_markdown(ext) {
        markdown::parse(content)
    } else {
        raw::render_raw(content, ext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markdown_goes_through_the_parser() {
        assert_eq!(render_document("# Hi", "md"), "<h1>Hi</h1>");
        assert_eq!(render_document("# Hi", "MD"), "<h1>Hi</h1>");
    }

    #[test]
    fn everything_else_is_raw() {
        let html = render_document("# Hi", "txt");
        assert!(html.starts_with("<div class=\"raw-line\">"));
        assert!(html.contains("# Hi"));
    }

    #[test]
    fn classify_matches_the_classifier() {
        assert!(classify("notes.md"));
        assert!(!classify("archive.zip"));
    }
}
