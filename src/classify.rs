//! Name-based file classification.
//!
//! Nothing here looks at file contents: a file is previewable when its
//! name says so, which keeps directory listings cheap.

/// Extensions whose files are treated as text.
pub const TEXT_EXTENSIONS: &[&str] = &[
    "md", "txt", "js", "ts", "jsx", "tsx", "mjs", "cjs",
    "json", "yaml", "yml", "toml", "cfg", "ini", "conf",
    "env", "gitignore", "dockerignore", "editorconfig",
    "prettierrc", "eslintrc", "babelrc",
    "html", "htm", "css", "scss", "less", "xml", "svg",
    "sh", "bash", "zsh", "fish", "bat", "cmd", "ps1",
    "py", "rb", "java", "c", "cpp", "h", "hpp", "cs",
    "go", "rs", "php", "sql", "r", "swift", "kt",
    "makefile", "dockerfile", "log", "csv", "tsv",
    "properties", "gradle", "lock", "map",
    "vue", "svelte", "astro",
];

/// Lower-cased base names that are text regardless of extension.
pub const KNOWN_TEXT_FILES: &[&str] = &[
    "makefile", "dockerfile", "license", "readme", "changelog",
    "gemfile", "rakefile", "procfile", "vagrantfile",
    ".gitignore", ".dockerignore", ".editorconfig", ".env",
    ".npmrc", ".yarnrc", ".nvmrc", ".prettierrc", ".eslintrc",
    ".babelrc", ".browserslistrc",
];

/// Entries hidden from the file tree unless the user asks for them.
pub const HIDDEN_NAMES: &[&str] = &[
    "node_modules", ".git", ".svn", ".hg", ".DS_Store",
    "Thumbs.db", ".idea", ".vscode", "__pycache__",
    ".cache", ".npm", ".yarn", "dist", "build", ".next",
    ".nuxt", "coverage", ".env.local", ".env.production",
];

/// Returns the lower-cased text after the last `.` of `name`, or an empty
/// string when there is no dot.
pub fn extension_of(name: &str) -> String {
    let base = base_name(name);
    // a leading dot names a dotfile, not an extension
    match base.rfind('.') {
        Some(idx) if idx > 0 => base[idx + 1..].to_lowercase(),
        _ => String::new(),
    }
}

/// Decides whether `name` can be previewed as text.
pub fn is_text_file(name: &str) -> bool {
    let base = base_name(name).to_lowercase();
    if KNOWN_TEXT_FILES.contains(&base.as_str()) {
        return true;
    }
    let ext = extension_of(&base);
    if ext.is_empty() {
        return false;
    }
    TEXT_EXTENSIONS.contains(&ext.as_str())
}

pub fn is_hidden(name: &str) -> bool {
    name.starts_with('.') || HIDDEN_NAMES.contains(&name)
}

/// The tag used for badges, icons and rendering.
///
/// Well-known extensionless files get their own tag so that a `Dockerfile`
/// is highlighted like one and a `LICENSE` reads as plain text.
pub fn display_extension(name: &str) -> String {
    match base_name(name) {
        "Dockerfile" | "dockerfile" => "dockerfile".to_string(),
        "Makefile" | "makefile" => "makefile".to_string(),
        "LICENSE" | "CHANGELOG" | "README" => "txt".to_string(),
        other => match other.rfind('.') {
            Some(idx) if idx + 1 < other.len() => other[idx + 1..].to_lowercase(),
            _ => String::new(),
        },
    }
}

pub fn icon_for(name: &str, is_dir: bool) -> &'static str {
    if is_dir {
        return "📁";
    }
    match display_extension(name).as_str() {
        "md" => "📘",
        "json" => "📦",
        "ts" | "tsx" => "🔷",
        "js" | "jsx" => "🟡",
        "py" => "🐍",
        "rb" => "💎",
        "html" => "🌐",
        "css" => "🎨",
        "yaml" | "yml" => "⚙️",
        "dockerfile" => "🐳",
        "sh" | "bash" => "💻",
        "sql" => "🗄",
        "lock" => "🔒",
        "svg" => "🖼",
        "go" => "🐹",
        "rs" => "🦀",
        "java" => "☕",
        "env" => "🔐",
        "gitignore" => "🚫",
        _ => "📄",
    }
}

/// CSS colour expression for an extension badge.
pub fn badge_color(ext: &str) -> &'static str {
    match ext {
        "md" => "var(--badge-md)",
        "json" => "var(--badge-json)",
        "ts" | "tsx" => "var(--badge-ts)",
        "js" | "jsx" => "var(--badge-js)",
        "yaml" | "yml" => "var(--badge-yaml)",
        "dockerfile" => "var(--badge-docker)",
        "py" => "var(--badge-py)",
        "html" => "var(--badge-html)",
        "css" => "var(--badge-css)",
        _ => "var(--badge-text)",
    }
}

fn base_name(name: &str) -> &str {
    name.rsplit(['/', '\\']).next().unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_extension_is_text() {
        for ext in TEXT_EXTENSIONS {
            assert!(is_text_file(&format!("x.{ext}")), "x.{ext} should be text");
        }
    }

    #[test]
    fn binaries_and_unknown_names_are_not_text() {
        assert!(!is_text_file("binary.exe"));
        assert!(!is_text_file("photo.PNG"));
        assert!(!is_text_file("noextension"));
    }

    #[test]
    fn dotfiles_have_no_extension() {
        assert!(!is_text_file(".json"));
        assert!(!is_text_file("src/.md"));
        assert!(is_text_file(".eslintrc.json"));
        assert_eq!(extension_of(".md"), "");
    }

    #[test]
    fn well_known_names_are_text() {
        assert!(is_text_file("Makefile"));
        assert!(is_text_file("LICENSE"));
        assert!(is_text_file(".gitignore"));
        assert!(is_text_file("some/dir/Dockerfile"));
    }

    #[test]
    fn classification_is_case_insensitive() {
        assert!(is_text_file("README.MD"));
        assert!(is_text_file("Main.RS"));
    }

    #[test]
    fn hidden_names() {
        assert!(is_hidden(".env"));
        assert!(is_hidden("node_modules"));
        assert!(!is_hidden("src"));
    }

    #[test]
    fn display_extension_special_cases() {
        assert_eq!(display_extension("Dockerfile"), "dockerfile");
        assert_eq!(display_extension("LICENSE"), "txt");
        assert_eq!(display_extension("notes.Md"), "md");
        assert_eq!(display_extension(".gitignore"), "gitignore");
        assert_eq!(display_extension("trailing."), "");
        assert_eq!(icon_for("main.rs", false), "🦀");
        assert_eq!(badge_color("yml"), "var(--badge-yaml)");
    }
}
