//! AST to HTML serialization.

use crate::escape::{escape_html, push_escaped};
use crate::highlight::{highlight_as, Flavor, Language};

use super::ast::{Block, Inline, List, Table};

pub fn render_blocks(blocks: &[Block]) -> String {
    let mut out = String::new();
    for block in blocks {
        render_block(&mut out, block);
    }
    out
}

fn render_block(out: &mut String, block: &Block) {
    match block {
        Block::Heading { level, content } => {
            out.push_str(&format!("<h{level}>"));
            render_inlines(out, content);
            out.push_str(&format!("</h{level}>"));
        }
        Block::Paragraph(content) => {
            out.push_str("<p>");
            render_inlines(out, content);
            out.push_str("</p>");
        }
        Block::Code { lang, body } => render_code(out, lang.as_deref(), body),
        Block::Math(body) => {
            out.push_str("<div class=\"math-block\"><code>");
            push_escaped(out, body);
            out.push_str("</code></div>");
        }
        Block::Quote(inner) => {
            out.push_str("<blockquote>");
            for block in inner {
                render_block(out, block);
            }
            out.push_str("</blockquote>");
        }
        Block::Lists(lists) => {
            for list in lists {
                render_list(out, list);
            }
        }
        Block::Table(table) => render_table(out, table),
        Block::Rule => out.push_str("<hr>"),
        Block::Footnote { id, content } => {
            let id = escape_html(id);
            out.push_str(&format!(
                "<div class=\"footnotes\"><p id=\"fn{id}\"><sup>{id}</sup> "
            ));
            render_inlines(out, content);
            out.push_str(&format!(" <a href=\"#fnref{id}\">\u{21a9}</a></p></div>"));
        }
        Block::Html(line) => out.push_str(line),
        Block::Definition { term, definition } => {
            out.push_str("<dl><dt>");
            render_inlines(out, term);
            out.push_str("</dt><dd>");
            render_inlines(out, definition);
            out.push_str("</dd></dl>");
        }
    }
}

fn render_code(out: &mut String, lang: Option<&str>, body: &str) {
    match lang {
        Some(tag) => {
            out.push_str("<pre data-lang=\"");
            push_escaped(out, tag);
            out.push_str("\"><code>");
        }
        None => out.push_str("<pre><code>"),
    }
    match lang.and_then(Language::from_fence_tag) {
        Some(language) => out.push_str(&highlight_as(body, language, Flavor::Block)),
        None => push_escaped(out, body),
    }
    out.push_str("</code></pre>");
}

fn render_list(out: &mut String, list: &List) {
    let tag = if list.ordered { "ol" } else { "ul" };
    out.push_str(&format!("<{tag}>"));
    for item in &list.items {
        match item.task {
            Some(true) => out.push_str(
                "<li class=\"task-list-item\"><input type=\"checkbox\" checked disabled>",
            ),
            Some(false) => {
                out.push_str("<li class=\"task-list-item\"><input type=\"checkbox\" disabled>")
            }
            None => out.push_str("<li>"),
        }
        render_inlines(out, &item.content);
        for child in &item.children {
            render_list(out, child);
        }
        out.push_str("</li>");
    }
    out.push_str(&format!("</{tag}>"));
}

fn render_table(out: &mut String, table: &Table) {
    out.push_str("<table><thead><tr>");
    for (idx, cell) in table.header.iter().enumerate() {
        out.push_str(&format!("<th style=\"text-align:{}\">", table.align(idx).as_str()));
        render_inlines(out, cell);
        out.push_str("</th>");
    }
    out.push_str("</tr></thead><tbody>");
    for row in &table.rows {
        out.push_str("<tr>");
        for (idx, cell) in row.iter().enumerate() {
            out.push_str(&format!("<td style=\"text-align:{}\">", table.align(idx).as_str()));
            render_inlines(out, cell);
            out.push_str("</td>");
        }
        out.push_str("</tr>");
    }
    out.push_str("</tbody></table>");
}

fn render_inlines(out: &mut String, nodes: &[Inline]) {
    for node in nodes {
        render_inline(out, node);
    }
}

fn render_inline(out: &mut String, node: &Inline) {
    match node {
        Inline::Text(text) => push_escaped(out, text),
        Inline::Image { alt, src } => {
            out.push_str("<img src=\"");
            push_escaped(out, src);
            out.push_str("\" alt=\"");
            push_escaped(out, alt);
            out.push_str("\" loading=\"lazy\">");
        }
        Inline::Link { text, href } => push_link(out, href, text),
        Inline::Autolink(url) => push_link(out, url, url),
        Inline::BoldItalic(inner) => wrap(out, "<strong><em>", inner, "</em></strong>"),
        Inline::Bold(inner) => wrap(out, "<strong>", inner, "</strong>"),
        Inline::Italic(inner) => wrap(out, "<em>", inner, "</em>"),
        Inline::Strike(inner) => wrap(out, "<del>", inner, "</del>"),
        Inline::Mark(inner) => wrap(out, "<mark>", inner, "</mark>"),
        Inline::Code(code) => {
            out.push_str("<code>");
            push_escaped(out, code);
            out.push_str("</code>");
        }
        Inline::FootnoteRef(id) => {
            let id = escape_html(id);
            out.push_str(&format!(
                "<sup class=\"footnote-ref\"><a href=\"#fn{id}\" id=\"fnref{id}\">[{id}]</a></sup>"
            ));
        }
    }
}

fn wrap(out: &mut String, open: &str, inner: &[Inline], close: &str) {
    out.push_str(open);
    render_inlines(out, inner);
    out.push_str(close);
}

fn push_link(out: &mut String, href: &str, text: &str) {
    out.push_str("<a href=\"");
    push_escaped(out, href);
    out.push_str("\" target=\"_blank\" rel=\"noopener\">");
    push_escaped(out, text);
    out.push_str("</a>");
}
