//! A small markdown dialect: fenced code, math blocks, headings, rules,
//! pipe tables, nested quotes, task lists, footnotes, `<details>` lines and
//! one-line definition lists.
//!
//! Parsing builds a [`Block`] tree that [`render_blocks`] serializes to
//! HTML. Neither step can fail; odd input degrades to paragraphs.

pub mod ast;
mod block;
mod inline;
mod list;
mod render;

pub use ast::{Align, Block, Inline, List, ListItem, Table};
pub use block::{parse_blocks, split_lines, MAX_QUOTE_DEPTH};
pub use inline::parse_inline;
pub use render::render_blocks;

/// Parses `source` and renders it to HTML.
pub fn parse(source: &str) -> String {
    render_blocks(&parse_blocks(source))
}
