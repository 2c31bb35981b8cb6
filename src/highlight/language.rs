/// A lexical rule set the highlighter knows how to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    JavaScript,
    Python,
    Bash,
    Go,
    Rust,
    Json,
    Yaml,
    Dockerfile,
    Css,
    Markup,
    Sql,
}

/// Fence tags whose bodies are highlighted inside markdown documents.
/// Any other tag is rendered as escaped text.
pub const FENCE_TAGS: &[&str] = &[
    "javascript", "js", "ts", "tsx", "jsx", "python", "py", "bash", "sh", "json", "go", "rust",
    "rs",
];

impl Language {
    /// Resolves a fence tag or file extension, folding the usual aliases
    /// (`ts`, `jsx` and friends are JavaScript, `sh`/`zsh` are Bash).
    pub fn from_tag(tag: &str) -> Option<Self> {
        let lang = match tag.to_ascii_lowercase().as_str() {
            "javascript" | "js" | "ts" | "jsx" | "tsx" | "mjs" | "cjs" => Self::JavaScript,
            "python" | "py" => Self::Python,
            "bash" | "sh" | "zsh" => Self::Bash,
            "go" => Self::Go,
            "rust" | "rs" => Self::Rust,
            "json" => Self::Json,
            "yaml" | "yml" => Self::Yaml,
            "dockerfile" => Self::Dockerfile,
            "css" | "scss" | "less" => Self::Css,
            "html" | "htm" | "xml" | "svg" => Self::Markup,
            "sql" => Self::Sql,
            _ => return None,
        };
        Some(lang)
    }

    /// Like [`Language::from_tag`], restricted to the tags markdown fences
    /// highlight.
    pub fn from_fence_tag(tag: &str) -> Option<Self> {
        let lower = tag.to_ascii_lowercase();
        if FENCE_TAGS.contains(&lower.as_str()) {
            Self::from_tag(&lower)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_fold_to_one_language() {
        for tag in ["ts", "jsx", "tsx", "mjs", "cjs", "js", "javascript"] {
            assert_eq!(Language::from_tag(tag), Some(Language::JavaScript), "{tag}");
        }
        assert_eq!(Language::from_tag("zsh"), Some(Language::Bash));
        assert_eq!(Language::from_tag("YML"), Some(Language::Yaml));
        assert_eq!(Language::from_tag("cobol"), None);
    }

    #[test]
    fn fence_tags_are_a_subset() {
        assert_eq!(Language::from_fence_tag("rs"), Some(Language::Rust));
        assert_eq!(Language::from_fence_tag("JSON"), Some(Language::Json));
        // Known to the raw view but not highlighted in fences
        assert_eq!(Language::from_fence_tag("zsh"), None);
        assert_eq!(Language::from_fence_tag("yaml"), None);
        assert_eq!(Language::from_fence_tag(""), None);
    }
}
