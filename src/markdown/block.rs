//! Line-cursor block scanner.
//!
//! At each line the block forms are tried in a fixed order and the first
//! match consumes as many lines as it needs. Anything unterminated (a code
//! fence, a math block, a quote) simply runs to the end of the input.

use regex::Regex;
use std::sync::LazyLock;

use super::ast::{Align, Block, Inline, Table};
use super::inline::parse_inline;
use super::list::{build_lists, is_list_line};

/// Blockquotes nested deeper than this are read as plain paragraphs.
pub const MAX_QUOTE_DEPTH: usize = 64;

static FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^```([A-Za-z0-9_]*)").expect("valid regex"));
static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.+)").expect("valid regex"));
static RULE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:\*{3,}|-{3,}|_{3,})\s*$").expect("valid regex"));
static TABLE_SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\|?\s*:?-+:?\s*\|").expect("valid regex"));
static TABLE_BREAK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\*{3,}|-{3,})").expect("valid regex"));
static FOOTNOTE_DEF_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[\^(\d+)\]:\s+(.+)").expect("valid regex"));
static HTML_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^<(?:details|summary|/details|/summary)").expect("valid regex")
});
static DEFINITION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^:\s+(.*)").expect("valid regex"));

/// Splits `source` into lines, dropping the `\r` of CRLF endings.
pub fn split_lines(source: &str) -> Vec<&str> {
    source
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}

pub fn parse_blocks(source: &str) -> Vec<Block> {
    parse_lines(&split_lines(source), 0)
}

fn parse_lines(lines: &[&str], depth: usize) -> Vec<Block> {
    let mut blocks: Vec<Block> = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let line = lines[i];

        // --- Fenced code ---
        if let Some(caps) = FENCE_RE.captures(line) {
            let lang = Some(caps[1].to_string()).filter(|l| !l.is_empty());
            let start = i + 1;
            i = start;
            while i < lines.len() && !lines[i].starts_with("```") {
                i += 1;
            }
            let body = lines[start..i].join("\n");
            i += 1; // closing fence
            blocks.push(Block::Code { lang, body });
            continue;
        }

        // --- Math ---
        if line.trim() == "$$" {
            let start = i + 1;
            i = start;
            while i < lines.len() && lines[i].trim() != "$$" {
                i += 1;
            }
            blocks.push(Block::Math(lines[start..i].join("\n")));
            i += 1;
            continue;
        }

        // --- Heading ---
        if let Some(caps) = HEADING_RE.captures(line) {
            blocks.push(Block::Heading {
                level: caps[1].len() as u8,
                content: parse_inline(&caps[2]),
            });
            i += 1;
            continue;
        }

        if RULE_RE.is_match(line) {
            blocks.push(Block::Rule);
            i += 1;
            continue;
        }

        // --- Table ---
        if starts_table(lines, i) {
            let header: Vec<&str> = split_cells(line);
            let aligns = split_cells(lines[i + 1])
                .into_iter()
                .map(column_align)
                .collect();
            i += 2;
            let mut rows = Vec::new();
            while i < lines.len() && lines[i].contains('|') && !TABLE_BREAK_RE.is_match(lines[i]) {
                rows.push(split_cells(lines[i]).into_iter().map(parse_inline).collect());
                i += 1;
            }
            blocks.push(Block::Table(Table {
                header: header.into_iter().map(parse_inline).collect(),
                aligns,
                rows,
            }));
            continue;
        }

        // --- Blockquote ---
        if starts_quote(line, depth) {
            let mut inner = Vec::new();
            while i < lines.len()
                && (lines[i].starts_with('>')
                    || (lines[i].trim().is_empty()
                        && lines.get(i + 1).is_some_and(|next| next.starts_with('>'))))
            {
                inner.push(strip_quote(lines[i]));
                i += 1;
            }
            blocks.push(Block::Quote(parse_lines(&inner, depth + 1)));
            continue;
        }

        // --- Lists ---
        if is_list_line(line) {
            let mut items = Vec::new();
            while i < lines.len() {
                if is_list_line(lines[i]) {
                    items.push(lines[i]);
                    i += 1;
                } else if lines[i].trim().is_empty()
                    && lines.get(i + 1).is_some_and(|next| is_list_line(next))
                {
                    i += 1;
                } else {
                    break;
                }
            }
            let lists = build_lists(&items);
            if !lists.is_empty() {
                blocks.push(Block::Lists(lists));
            }
            continue;
        }

        if let Some(caps) = FOOTNOTE_DEF_RE.captures(line) {
            blocks.push(Block::Footnote {
                id: caps[1].to_string(),
                content: parse_inline(&caps[2]),
            });
            i += 1;
            continue;
        }

        if HTML_RE.is_match(line) {
            blocks.push(Block::Html(line.to_string()));
            i += 1;
            continue;
        }

        // --- Definition ---
        // Only a paragraph of plain text directly before can become a term.
        if let Some(caps) = DEFINITION_RE.captures(line) {
            if let Some(Block::Paragraph(term)) = blocks.last() {
                if term.iter().all(|node| matches!(node, Inline::Text(_))) {
                    let term = term.clone();
                    blocks.pop();
                    blocks.push(Block::Definition {
                        term,
                        definition: parse_inline(&caps[1]),
                    });
                    i += 1;
                    continue;
                }
            }
        }

        if line.trim().is_empty() {
            i += 1;
            continue;
        }

        // --- Paragraph ---
        let mut text = line.to_string();
        i += 1;
        while i < lines.len() && !lines[i].trim().is_empty() && !starts_block(lines, i, depth) {
            text.push(' ');
            text.push_str(lines[i]);
            i += 1;
        }
        blocks.push(Block::Paragraph(parse_inline(&text)));
    }

    blocks
}

/// Whether line `i` would start any non-paragraph block.
fn starts_block(lines: &[&str], i: usize, depth: usize) -> bool {
    let line = lines[i];
    line.starts_with("```")
        || line.trim() == "$$"
        || HEADING_RE.is_match(line)
        || RULE_RE.is_match(line)
        || starts_table(lines, i)
        || starts_quote(line, depth)
        || is_list_line(line)
        || FOOTNOTE_DEF_RE.is_match(line)
        || HTML_RE.is_match(line)
        || DEFINITION_RE.is_match(line)
}

fn starts_table(lines: &[&str], i: usize) -> bool {
    lines[i].contains('|')
        && lines
            .get(i + 1)
            .is_some_and(|next| TABLE_SEPARATOR_RE.is_match(next))
}

fn starts_quote(line: &str, depth: usize) -> bool {
    depth < MAX_QUOTE_DEPTH && line.starts_with('>')
}

/// Drops the `>` marker and one following whitespace character.
fn strip_quote(line: &str) -> &str {
    match line.strip_prefix('>') {
        Some(rest) => match rest.chars().next() {
            Some(c) if c.is_whitespace() => &rest[c.len_utf8()..],
            _ => rest,
        },
        None => line,
    }
}

/// Cells of a table row. One outer pipe on each side is optional.
fn split_cells(line: &str) -> Vec<&str> {
    let trimmed = line.trim();
    let trimmed = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix('|').unwrap_or(trimmed);
    trimmed.split('|').map(str::trim).collect()
}

fn column_align(cell: &str) -> Align {
    match (cell.starts_with(':'), cell.ends_with(':')) {
        (true, true) => Align::Center,
        (false, true) => Align::Right,
        _ => Align::Left,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::ast::List;

    fn text(s: &str) -> Inline {
        Inline::Text(s.to_string())
    }

    fn para(s: &str) -> Block {
        Block::Paragraph(vec![text(s)])
    }

    #[test]
    fn paragraphs_join_lines_and_split_on_blanks() {
        assert_eq!(
            parse_blocks("one\ntwo\n\nthree"),
            vec![para("one two"), para("three")]
        );
    }

    #[test]
    fn headings_by_level() {
        let blocks = parse_blocks("# A\n###### F\n####### seven");
        assert_eq!(
            blocks[0],
            Block::Heading {
                level: 1,
                content: vec![text("A")]
            }
        );
        assert!(matches!(blocks[1], Block::Heading { level: 6, .. }));
        assert_eq!(blocks[2], para("####### seven"));
    }

    #[test]
    fn fenced_code_keeps_body_verbatim() {
        assert_eq!(
            parse_blocks("```py\n# c\n\n  x = 1\n```\nafter"),
            vec![
                Block::Code {
                    lang: Some("py".into()),
                    body: "# c\n\n  x = 1".into()
                },
                para("after"),
            ]
        );
    }

    #[test]
    fn unterminated_fence_runs_to_end() {
        assert_eq!(
            parse_blocks("```\nno end\n# not heading"),
            vec![Block::Code {
                lang: None,
                body: "no end\n# not heading".into()
            }]
        );
    }

    #[test]
    fn math_blocks() {
        assert_eq!(
            parse_blocks("$$\na^2\n$$"),
            vec![Block::Math("a^2".into())]
        );
    }

    #[test]
    fn rules() {
        assert_eq!(
            parse_blocks("***\n---\n___ "),
            vec![Block::Rule, Block::Rule, Block::Rule]
        );
    }

    #[test]
    fn table_with_alignment() {
        let blocks =
            parse_blocks("| a | b | c |\n|:--|:-:|--:|\n| 1 | 2 | 3 |\n| 4 |  | 6 |\nafter");
        let Block::Table(table) = &blocks[0] else {
            panic!("expected table, got {blocks:?}");
        };
        assert_eq!(table.header.len(), 3);
        assert_eq!(table.aligns, vec![Align::Left, Align::Center, Align::Right]);
        assert_eq!(table.rows.len(), 2);
        assert!(table.rows[1][1].is_empty());
        assert_eq!(blocks[1], para("after"));
    }

    #[test]
    fn pipe_without_separator_is_a_paragraph() {
        assert_eq!(parse_blocks("a | b\nc"), vec![para("a | b c")]);
    }

    #[test]
    fn quotes_nest_and_continue_over_one_blank_line() {
        let blocks = parse_blocks("> outer\n>\n> > inner\n\n> still\nout");
        assert_eq!(blocks.len(), 2);
        let Block::Quote(inner) = &blocks[0] else {
            panic!("expected quote");
        };
        assert_eq!(inner[0], para("outer"));
        assert_eq!(inner[1], Block::Quote(vec![para("inner")]));
        assert_eq!(inner[2], para("still"));
        assert_eq!(blocks[1], para("out"));
    }

    #[test]
    fn quote_depth_is_capped() {
        let deep = ">".repeat(MAX_QUOTE_DEPTH + 5) + " x";
        let mut blocks = parse_blocks(&deep);
        let mut depth = 0;
        while let Some(Block::Quote(inner)) = blocks.pop() {
            depth += 1;
            blocks = inner;
        }
        assert_eq!(depth, MAX_QUOTE_DEPTH);
    }

    #[test]
    fn lists_merge_across_single_blank_lines() {
        let blocks = parse_blocks("- a\n\n- b\n\nplain");
        let Block::Lists(lists) = &blocks[0] else {
            panic!("expected list");
        };
        assert_eq!(
            lists,
            &vec![List {
                ordered: false,
                items: vec![
                    crate::markdown::ast::ListItem {
                        task: None,
                        content: vec![text("a")],
                        children: vec![]
                    },
                    crate::markdown::ast::ListItem {
                        task: None,
                        content: vec![text("b")],
                        children: vec![]
                    },
                ]
            }]
        );
        assert_eq!(blocks[1], para("plain"));
    }

    #[test]
    fn footnotes_html_and_definitions() {
        let blocks = parse_blocks("[^1]: note\n<details>\n<SUMMARY>s</SUMMARY>\nTerm\n: meaning");
        assert_eq!(
            blocks,
            vec![
                Block::Footnote {
                    id: "1".into(),
                    content: vec![text("note")]
                },
                Block::Html("<details>".into()),
                Block::Html("<SUMMARY>s</SUMMARY>".into()),
                Block::Definition {
                    term: vec![text("Term")],
                    definition: vec![text("meaning")]
                },
            ]
        );
    }

    #[test]
    fn definition_needs_a_plain_paragraph() {
        let blocks = parse_blocks("**Term**\n: meaning");
        assert!(matches!(blocks[0], Block::Paragraph(_)));
        assert_eq!(blocks[1], para(": meaning"));
    }

    #[test]
    fn paragraphs_stop_at_block_starts() {
        let blocks = parse_blocks("text\n- item\nmore\n# head");
        assert_eq!(blocks[0], para("text"));
        assert!(matches!(blocks[1], Block::Lists(_)));
        assert_eq!(blocks[2], para("more"));
        assert!(matches!(blocks[3], Block::Heading { .. }));
    }

    #[test]
    fn crlf_input() {
        assert_eq!(
            parse_blocks("# T\r\nbody\r\n"),
            vec![
                Block::Heading {
                    level: 1,
                    content: vec![text("T")]
                },
                para("body")
            ]
        );
    }
}
