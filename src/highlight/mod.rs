//! Regex-driven syntax highlighting.
//!
//! Each language is a fixed, ordered list of passes (comments, strings,
//! keywords, numbers, ...). A pass may only claim text that no earlier pass
//! claimed, so a keyword inside a string or a number inside a comment is
//! never wrapped twice. Claimed ranges are kept as a list of non-overlapping
//! byte intervals and turned into markup in a single final walk, which is
//! also where HTML escaping happens.

mod language;
mod rules;

pub use language::{Language, FENCE_TAGS};

use std::{collections::BTreeMap, ops::Range};

use crate::escape::{escape_html, push_escaped};
use rules::Rule;

/// Lexical category of a highlighted range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Keyword,
    String,
    Comment,
    Number,
    /// Object keys and markup attributes.
    Attribute,
    /// Selectors and other named definitions.
    Function,
}

/// Which class vocabulary the markup uses: fenced code blocks inside
/// markdown use `hljs-*` classes, the line-numbered raw view uses `tok-*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flavor {
    Block,
    Line,
}

impl Category {
    pub fn class(self, flavor: Flavor) -> &'static str {
        match (flavor, self) {
            (Flavor::Block, Category::Keyword) => "hljs-keyword",
            (Flavor::Block, Category::String) => "hljs-string",
            (Flavor::Block, Category::Comment) => "hljs-comment",
            (Flavor::Block, Category::Number) => "hljs-number",
            (Flavor::Block, Category::Attribute) => "hljs-attr",
            (Flavor::Block, Category::Function) => "hljs-title",
            (Flavor::Line, Category::Keyword) => "tok-kw",
            (Flavor::Line, Category::String) => "tok-str",
            (Flavor::Line, Category::Comment) => "tok-cm",
            (Flavor::Line, Category::Number) => "tok-num",
            (Flavor::Line, Category::Attribute) => "tok-key",
            (Flavor::Line, Category::Function) => "tok-fn",
        }
    }
}

/// A claimed byte range of the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub start: usize,
    pub end: usize,
    pub category: Category,
}

/// Highlights `code` for a fence tag, producing escaped markup.
///
/// Unknown tags are not an error: the code comes back escaped and
/// otherwise untouched.
pub fn highlight(code: &str, tag: &str) -> String {
    match Language::from_tag(tag) {
        Some(lang) => highlight_as(code, lang, Flavor::Block),
        None => escape_html(code),
    }
}

pub fn highlight_as(code: &str, lang: Language, flavor: Flavor) -> String {
    let tokens = tokenize(code, rules::table(lang, flavor));
    render(code, &tokens, flavor)
}

/// Runs the passes in order and returns the claimed ranges, sorted by
/// start offset.
pub fn tokenize(code: &str, rules: &[Rule]) -> Vec<Token> {
    // Claimed bytes are overwritten with NUL so later patterns cannot see
    // them. Offsets stay identical to `code` and every replaced char becomes
    // ASCII, so the mask is always valid UTF-8.
    let mut masked = code.to_string();
    // keyed by start offset
    let mut tokens: BTreeMap<usize, Token> = BTreeMap::new();

    for rule in rules {
        let mut pos = 0;
        while pos <= masked.len() {
            let (whole, target) = {
                let Some(caps) = rule.pattern.captures_at(&masked, pos) else {
                    break;
                };
                let Some(whole) = caps.get(0).map(|m| m.range()) else {
                    break;
                };
                (whole, caps.get(rule.group).map(|m| m.range()))
            };

            let Some(target) = target.filter(|t| !t.is_empty() && !overlaps(&tokens, t)) else {
                pos = next_char(&masked, whole.start);
                continue;
            };

            masked.replace_range(target.clone(), &"\0".repeat(target.len()));
            tokens.insert(
                target.start,
                Token {
                    start: target.start,
                    end: target.end,
                    category: rule.category,
                },
            );
            pos = if whole.end > whole.start {
                whole.end
            } else {
                next_char(&masked, whole.start)
            };
        }
    }

    tokens.into_values().collect()
}

/// Tokens are disjoint, so ends rise with starts and only the last token
/// starting before `range.end` can reach into it.
fn overlaps(tokens: &BTreeMap<usize, Token>, range: &Range<usize>) -> bool {
    tokens
        .range(..range.end)
        .next_back()
        .is_some_and(|(_, t)| t.end > range.start)
}

/// Offset just past the char starting at `at`.
fn next_char(text: &str, at: usize) -> usize {
    text[at..]
        .chars()
        .next()
        .map_or(text.len() + 1, |c| at + c.len_utf8())
}

/// Walks `code` once, escaping the gaps and wrapping each token.
/// `tokens` must be sorted and non-overlapping.
fn render(code: &str, tokens: &[Token], flavor: Flavor) -> String {
    let mut out = String::with_capacity(code.len() * 2);
    let mut cursor = 0;
    for token in tokens {
        push_escaped(&mut out, &code[cursor..token.start]);
        out.push_str("<span class=\"");
        out.push_str(token.category.class(flavor));
        out.push_str("\">");
        push_escaped(&mut out, &code[token.start..token.end]);
        out.push_str("</span>");
        cursor = token.end;
    }
    push_escaped(&mut out, &code[cursor..]);
    out
}
