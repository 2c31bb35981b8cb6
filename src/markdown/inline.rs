//! Inline tokenizer.
//!
//! Two stages. A left-to-right scan first takes the literal spans (image,
//! link, autolink, code, footnote reference) whole; their text is never
//! formatted. Emphasis then runs as one pass per form in a fixed order
//! (bold-italic, bold, italic, strikethrough, highlight). Each pass pairs
//! an opener with the nearest closer on the same line, and later passes
//! also reach into the bodies of earlier ones, so `*a **b** c*` nests the
//! bold inside the italic.

use regex::Regex;
use std::sync::LazyLock;

use super::ast::Inline;

static IMAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^!\[([^\]]*)\]\(([^)]+)\)").expect("valid regex"));
static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[([^\]]+)\]\(([^)]+)\)").expect("valid regex"));
static AUTOLINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^https?://[^\s<]+").expect("valid regex"));
static CODE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^`([^`]+)`").expect("valid regex"));
static FOOTNOTE_REF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[\^(\d+)\]").expect("valid regex"));

type Wrap = fn(Vec<Inline>) -> Inline;

const EMPHASIS: [(&str, Wrap); 5] = [
    ("***", Inline::BoldItalic),
    ("**", Inline::Bold),
    ("*", Inline::Italic),
    ("~~", Inline::Strike),
    ("==", Inline::Mark),
];

/// Text between passes. Literal spans are final; an emphasis span keeps
/// its body open to later passes.
enum Atom {
    Char(char),
    Node(Inline),
    Span(Wrap, Vec<Atom>),
}

pub fn parse_inline(text: &str) -> Vec<Inline> {
    let atoms = EMPHASIS
        .iter()
        .fold(scan_literals(text), |atoms, &(delim, wrap)| {
            emphasize(atoms, delim, wrap)
        });
    into_inlines(atoms)
}

fn scan_literals(text: &str) -> Vec<Atom> {
    let mut atoms = Vec::with_capacity(text.len());
    let mut rest = text;
    let mut prev: Option<char> = None;

    while let Some(c) = rest.chars().next() {
        if let Some((node, used)) = literal_span(rest, prev) {
            atoms.push(Atom::Node(node));
            prev = rest[..used].chars().next_back();
            rest = &rest[used..];
            continue;
        }
        atoms.push(Atom::Char(c));
        prev = Some(c);
        rest = &rest[c.len_utf8()..];
    }
    atoms
}

/// Tries the literal span forms at the start of `rest`. Returns the node
/// and the number of bytes it consumed.
fn literal_span(rest: &str, prev: Option<char>) -> Option<(Inline, usize)> {
    match rest.as_bytes()[0] {
        b'!' => image(rest),
        b'[' => link(rest).or_else(|| footnote_ref(rest)),
        b'h' => autolink(rest, prev),
        b'`' => code(rest),
        _ => None,
    }
}

fn image(rest: &str) -> Option<(Inline, usize)> {
    let caps = IMAGE_RE.captures(rest)?;
    let node = Inline::Image {
        alt: caps[1].to_string(),
        src: caps[2].to_string(),
    };
    Some((node, caps[0].len()))
}

fn link(rest: &str) -> Option<(Inline, usize)> {
    let caps = LINK_RE.captures(rest)?;
    let node = Inline::Link {
        text: caps[1].to_string(),
        href: caps[2].to_string(),
    };
    Some((node, caps[0].len()))
}

fn autolink(rest: &str, prev: Option<char>) -> Option<(Inline, usize)> {
    // A URL right after `"` or `=` is an attribute value, not prose
    if matches!(prev, Some('"') | Some('=')) {
        return None;
    }
    let m = AUTOLINK_RE.find(rest)?;
    Some((Inline::Autolink(m.as_str().to_string()), m.len()))
}

fn code(rest: &str) -> Option<(Inline, usize)> {
    let caps = CODE_RE.captures(rest)?;
    Some((Inline::Code(caps[1].to_string()), caps[0].len()))
}

fn footnote_ref(rest: &str) -> Option<(Inline, usize)> {
    let caps = FOOTNOTE_REF_RE.captures(rest)?;
    Some((Inline::FootnoteRef(caps[1].to_string()), caps[0].len()))
}

/// One emphasis pass over `atoms`, then over every span body below it.
fn emphasize(atoms: Vec<Atom>, delim: &str, wrap: Wrap) -> Vec<Atom> {
    let width = delim.chars().count();
    let pairs = pair_delimiters(&atoms, delim, width);

    let mut out = Vec::with_capacity(atoms.len());
    let mut rest = atoms.into_iter();
    let mut at = 0;
    for (open, close) in pairs {
        out.extend(rest.by_ref().take(open - at));
        let body: Vec<Atom> = rest
            .by_ref()
            .skip(width)
            .take(close - open - width)
            .collect();
        rest.by_ref().take(width).for_each(drop);
        out.push(Atom::Span(wrap, body));
        at = close + width;
    }
    out.extend(rest);

    for atom in &mut out {
        if let Atom::Span(_, body) = atom {
            *body = emphasize(std::mem::take(body), delim, wrap);
        }
    }
    out
}

/// Opener/closer index pairs, scanning left to right. Each opener needs a
/// non-empty body and takes the nearest closer before the next newline.
fn pair_delimiters(atoms: &[Atom], delim: &str, width: usize) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    let mut i = 0;
    while i < atoms.len() {
        if !delim_at(atoms, i, delim) {
            i += 1;
            continue;
        }
        match find_closer(atoms, i + width, delim) {
            Ok(close) => {
                pairs.push((i, close));
                i = close + width;
            }
            // no opener before `stop` can close either
            Err(stop) => i = stop.max(i + 1),
        }
    }
    pairs
}

/// The nearest closer after a non-empty body starting at `body`, or the
/// index (newline or end) where the search gave up.
fn find_closer(atoms: &[Atom], body: usize, delim: &str) -> Result<usize, usize> {
    match atoms.get(body) {
        None => return Err(atoms.len()),
        Some(Atom::Char('\n')) => return Err(body),
        Some(_) => {}
    }
    for j in body + 1..atoms.len() {
        if delim_at(atoms, j, delim) {
            return Ok(j);
        }
        if matches!(atoms[j], Atom::Char('\n')) {
            return Err(j);
        }
    }
    Err(atoms.len())
}

fn delim_at(atoms: &[Atom], at: usize, delim: &str) -> bool {
    delim
        .chars()
        .enumerate()
        .all(|(k, d)| matches!(atoms.get(at + k), Some(Atom::Char(c)) if *c == d))
}

fn into_inlines(atoms: Vec<Atom>) -> Vec<Inline> {
    let mut nodes = Vec::new();
    let mut plain = String::new();
    for atom in atoms {
        let node = match atom {
            Atom::Char(c) => {
                plain.push(c);
                continue;
            }
            Atom::Node(node) => node,
            Atom::Span(wrap, body) => wrap(into_inlines(body)),
        };
        if !plain.is_empty() {
            nodes.push(Inline::Text(std::mem::take(&mut plain)));
        }
        nodes.push(node);
    }
    if !plain.is_empty() {
        nodes.push(Inline::Text(plain));
    }
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Inline {
        Inline::Text(s.to_string())
    }

    #[test]
    fn plain_text_is_one_node() {
        assert_eq!(parse_inline("just words"), vec![text("just words")]);
        assert!(parse_inline("").is_empty());
    }

    #[test]
    fn emphasis_forms() {
        assert_eq!(
            parse_inline("a ***b*** **c** *d* ~~e~~ ==f=="),
            vec![
                text("a "),
                Inline::BoldItalic(vec![text("b")]),
                text(" "),
                Inline::Bold(vec![text("c")]),
                text(" "),
                Inline::Italic(vec![text("d")]),
                text(" "),
                Inline::Strike(vec![text("e")]),
                text(" "),
                Inline::Mark(vec![text("f")]),
            ]
        );
    }

    #[test]
    fn emphasis_nests_inside_emphasis() {
        assert_eq!(
            parse_inline("**bold ~~gone~~**"),
            vec![Inline::Bold(vec![
                text("bold "),
                Inline::Strike(vec![text("gone")])
            ])]
        );
    }

    #[test]
    fn links_and_images() {
        assert_eq!(
            parse_inline("![logo](a.png) [**site**](https://x.io)"),
            vec![
                Inline::Image {
                    alt: "logo".into(),
                    src: "a.png".into()
                },
                text(" "),
                Inline::Link {
                    text: "**site**".into(),
                    href: "https://x.io".into()
                },
            ]
        );
    }

    #[test]
    fn bare_urls_become_autolinks() {
        assert_eq!(
            parse_inline("see https://example.com/a?b=1 now"),
            vec![
                text("see "),
                Inline::Autolink("https://example.com/a?b=1".into()),
                text(" now"),
            ]
        );
        assert_eq!(
            parse_inline("href=http://x"),
            vec![text("href=http://x")]
        );
    }

    #[test]
    fn code_is_literal() {
        assert_eq!(
            parse_inline("`a **b**`"),
            vec![Inline::Code("a **b**".into())]
        );
    }

    #[test]
    fn footnote_references() {
        assert_eq!(
            parse_inline("fact[^12]"),
            vec![text("fact"), Inline::FootnoteRef("12".into())]
        );
        assert_eq!(parse_inline("[^x]"), vec![text("[^x]")]);
    }

    #[test]
    fn unmatched_markers_stay_text() {
        assert_eq!(parse_inline("2 * 3 = 6"), vec![text("2 * 3 = 6")]);
        assert_eq!(parse_inline("**"), vec![text("**")]);
    }

    #[test]
    fn bold_nests_inside_italic() {
        assert_eq!(
            parse_inline("*a **b** c*"),
            vec![Inline::Italic(vec![
                text("a "),
                Inline::Bold(vec![text("b")]),
                text(" c"),
            ])]
        );
    }

    #[test]
    fn italic_nests_inside_bold() {
        assert_eq!(
            parse_inline("**a *b* c**"),
            vec![Inline::Bold(vec![
                text("a "),
                Inline::Italic(vec![text("b")]),
                text(" c"),
            ])]
        );
    }

    #[test]
    fn emphasis_does_not_cross_lines() {
        assert_eq!(
            parse_inline("*a\nb*"),
            vec![text("*a\nb*")]
        );
        assert_eq!(
            parse_inline("==a\n=="),
            vec![text("==a\n==")]
        );
    }

    #[test]
    fn overlapping_markers_pair_bold_first() {
        assert_eq!(
            parse_inline("*a**b*c**d*"),
            vec![Inline::Italic(vec![
                text("a"),
                Inline::Bold(vec![text("b*c")]),
                text("d"),
            ])]
        );
    }

    #[test]
    fn code_and_links_are_not_formatted() {
        assert_eq!(
            parse_inline("*x `*y*` [*z*](u)*"),
            vec![Inline::Italic(vec![
                text("x "),
                Inline::Code("*y*".into()),
                text(" "),
                Inline::Link {
                    text: "*z*".into(),
                    href: "u".into()
                },
            ])]
        );
    }
}
