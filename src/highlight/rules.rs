//! Constant per-language rule tables.
//!
//! Each table is an ordered list of passes. Earlier passes win: once a
//! range is claimed, later passes cannot match inside it.

use regex::Regex;
use std::sync::LazyLock;

use super::{Category, Flavor, Language};

pub struct Rule {
    pub category: Category,
    pub pattern: Regex,
    /// Capture group that is claimed; 0 claims the whole match.
    pub group: usize,
}

impl Rule {
    fn new(category: Category, pattern: &str) -> Self {
        Self::group(category, pattern, 0)
    }

    fn group(category: Category, pattern: &str, group: usize) -> Self {
        Self {
            category,
            pattern: Regex::new(pattern).expect("valid highlight pattern"),
            group,
        }
    }

    fn keywords(words: &[&str]) -> Self {
        Self::new(Category::Keyword, &format!(r"\b(?:{})\b", words.join("|")))
    }
}

// === Shared patterns ===

const C_COMMENT: &str = r"(?m)//.*$|(?s:/\*.*?\*/)";
const HASH_COMMENT: &str = r"(?m)#.*$";
const PYTHON_COMMENT: &str = r#"(?m)#.*$|(?s:""".*?"""|'''.*?''')"#;
const STRING: &str = r#""[^"\n]*"|'[^'\n]*'"#;
const NUMBER: &str = r"\b\d+(?:\.\d+)?\b";

// === Keyword sets ===

const JS_KEYWORDS: &[&str] = &[
    "function", "const", "let", "var", "return", "if", "else", "for", "while", "class", "new",
    "this", "import", "export", "from", "of", "in", "typeof", "instanceof", "async", "await",
    "try", "catch", "throw", "switch", "case", "break", "continue", "default", "yield", "delete",
    "void", "null", "undefined", "true", "false",
];

const PYTHON_KEYWORDS: &[&str] = &[
    "def", "class", "return", "if", "elif", "else", "for", "while", "import", "from", "as",
    "with", "try", "except", "raise", "in", "not", "and", "or", "is", "None", "True", "False",
    "self", "lambda", "yield", "pass", "break", "continue", "finally", "global", "nonlocal",
    "assert", "del",
];

const PYTHON_LINE_KEYWORDS: &[&str] = &[
    "def", "class", "return", "if", "elif", "else", "for", "while", "import", "from", "as",
    "with", "try", "except", "raise", "in", "not", "and", "or", "is", "None", "True", "False",
    "self", "lambda", "yield", "pass", "break", "continue", "finally", "global", "async",
    "await",
];

const BASH_KEYWORDS: &[&str] = &[
    "echo", "for", "do", "done", "if", "then", "fi", "else", "elif", "in", "function", "local",
    "export", "source", "cd", "ls", "mkdir", "rm", "cp", "mv", "cat", "grep", "awk", "sed",
    "chmod", "chown", "while", "case", "esac", "read", "shift", "set", "unset",
];

const BASH_LINE_KEYWORDS: &[&str] = &[
    "echo", "for", "do", "done", "if", "then", "fi", "else", "elif", "in", "function", "local",
    "export", "source", "cd", "ls", "mkdir", "rm", "cp", "mv", "cat", "grep", "awk", "sed",
    "chmod", "chown", "while", "case", "esac",
];

const GO_KEYWORDS: &[&str] = &[
    "func", "var", "const", "type", "struct", "interface", "return", "if", "else", "for",
    "range", "switch", "case", "break", "continue", "default", "package", "import", "defer",
    "go", "chan", "select", "map", "make", "new", "nil", "true", "false",
];

const RUST_KEYWORDS: &[&str] = &[
    "fn", "let", "mut", "const", "if", "else", "for", "while", "loop", "match", "return",
    "struct", "enum", "impl", "trait", "pub", "use", "mod", "self", "super", "crate", "where",
    "async", "await", "move", "unsafe", "extern", "type", "true", "false", "None", "Some", "Ok",
    "Err",
];

const DOCKERFILE_INSTRUCTIONS: &str = r"^(?:FROM|RUN|COPY|WORKDIR|EXPOSE|CMD|ENV|ARG|ENTRYPOINT|ADD|VOLUME|USER|LABEL|ONBUILD|STOPSIGNAL|HEALTHCHECK|SHELL)\b";

const SQL_KEYWORDS: &str = r"(?i)\b(?:SELECT|FROM|WHERE|INSERT|UPDATE|DELETE|CREATE|DROP|ALTER|TABLE|INTO|VALUES|SET|JOIN|LEFT|RIGHT|INNER|OUTER|ON|AND|OR|NOT|NULL|AS|ORDER|BY|GROUP|HAVING|LIMIT|DISTINCT|UNION|INDEX|VIEW|BEGIN|COMMIT|ROLLBACK|IN|EXISTS|BETWEEN|LIKE|IS|COUNT|SUM|AVG|MAX|MIN|CASE|WHEN|THEN|ELSE|END)\b";

// === Fenced-code tables ===

fn c_like(keywords: &[&str]) -> Vec<Rule> {
    vec![
        Rule::new(Category::Comment, C_COMMENT),
        Rule::new(Category::String, STRING),
        Rule::keywords(keywords),
        Rule::new(Category::Number, NUMBER),
    ]
}

static BLOCK_JAVASCRIPT: LazyLock<Vec<Rule>> = LazyLock::new(|| c_like(JS_KEYWORDS));
static BLOCK_GO: LazyLock<Vec<Rule>> = LazyLock::new(|| c_like(GO_KEYWORDS));
static BLOCK_RUST: LazyLock<Vec<Rule>> = LazyLock::new(|| c_like(RUST_KEYWORDS));

static BLOCK_PYTHON: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        Rule::new(Category::Comment, PYTHON_COMMENT),
        Rule::new(Category::String, STRING),
        Rule::keywords(PYTHON_KEYWORDS),
        Rule::new(Category::Number, NUMBER),
    ]
});

static BLOCK_BASH: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        Rule::new(Category::Comment, HASH_COMMENT),
        Rule::new(Category::String, STRING),
        Rule::keywords(BASH_KEYWORDS),
        Rule::new(Category::Number, NUMBER),
    ]
});

// JSON keys keep their colon inside the attribute span.
static BLOCK_JSON: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        Rule::new(Category::Attribute, r#""[^"\n]*"\s*:"#),
        Rule::new(Category::String, r#""[^"\n]*""#),
        Rule::new(Category::Keyword, r"\b(?:true|false|null)\b"),
        Rule::new(Category::Number, NUMBER),
    ]
});

// === Raw line tables ===

static LINE_JAVASCRIPT: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        Rule::new(Category::Comment, r"//.*$"),
        Rule::new(Category::String, STRING),
        Rule::keywords(JS_KEYWORDS),
        Rule::new(Category::Number, NUMBER),
    ]
});

static LINE_JSON: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        Rule::group(Category::Attribute, r#"("[^"]*")\s*:"#, 1),
        Rule::group(Category::String, r#":\s*("[^"]*")"#, 1),
        Rule::new(Category::Number, NUMBER),
        Rule::new(Category::Keyword, r"\b(?:true|false|null)\b"),
    ]
});

static LINE_YAML: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        Rule::new(Category::Comment, HASH_COMMENT),
        Rule::group(Category::Attribute, r"^\s*(\w[\w-]*):", 1),
    ]
});

static LINE_DOCKERFILE: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        Rule::new(Category::Comment, HASH_COMMENT),
        Rule::new(Category::Keyword, DOCKERFILE_INSTRUCTIONS),
    ]
});

static LINE_PYTHON: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        Rule::new(Category::Comment, HASH_COMMENT),
        Rule::new(
            Category::String,
            r#""""[^"]*"""|"[^"]*"|'''[^']*'''|'[^']*'"#,
        ),
        Rule::keywords(PYTHON_LINE_KEYWORDS),
    ]
});

static LINE_BASH: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        Rule::new(Category::Comment, HASH_COMMENT),
        Rule::keywords(BASH_LINE_KEYWORDS),
    ]
});

static LINE_CSS: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        Rule::new(Category::Comment, r"(?s)/\*.*?\*/"),
        Rule::new(Category::Function, r"[.#][\w-]+"),
        Rule::new(
            Category::Number,
            r"\b\d+(?:\.\d+)?(?:px|em|rem|vh|vw|ms|s|%)?",
        ),
    ]
});

static LINE_MARKUP: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        Rule::new(Category::Keyword, r"</?[\w-]+"),
        Rule::group(Category::String, r#"\s[\w-]+=("[^"]*")"#, 1),
    ]
});

static LINE_SQL: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    vec![
        Rule::new(Category::Comment, r"--.*$"),
        Rule::new(Category::Keyword, SQL_KEYWORDS),
    ]
});

fn block_table(lang: Language) -> Option<&'static [Rule]> {
    let table: &'static Vec<Rule> = match lang {
        Language::JavaScript => &*BLOCK_JAVASCRIPT,
        Language::Python => &*BLOCK_PYTHON,
        Language::Bash => &*BLOCK_BASH,
        Language::Go => &*BLOCK_GO,
        Language::Rust => &*BLOCK_RUST,
        Language::Json => &*BLOCK_JSON,
        _ => return None,
    };
    Some(table.as_slice())
}

fn line_table(lang: Language) -> Option<&'static [Rule]> {
    let table: &'static Vec<Rule> = match lang {
        Language::JavaScript => &*LINE_JAVASCRIPT,
        Language::Json => &*LINE_JSON,
        Language::Yaml => &*LINE_YAML,
        Language::Dockerfile => &*LINE_DOCKERFILE,
        Language::Python => &*LINE_PYTHON,
        Language::Bash => &*LINE_BASH,
        Language::Css => &*LINE_CSS,
        Language::Markup => &*LINE_MARKUP,
        Language::Sql => &*LINE_SQL,
        _ => return None,
    };
    Some(table.as_slice())
}

/// The table for `lang`, preferring the one written for `flavor` and
/// falling back to the other flavor's table.
pub fn table(lang: Language, flavor: Flavor) -> &'static [Rule] {
    let (preferred, fallback) = match flavor {
        Flavor::Block => (block_table(lang), line_table(lang)),
        Flavor::Line => (line_table(lang), block_table(lang)),
    };
    preferred.or(fallback).unwrap_or(&[])
}
