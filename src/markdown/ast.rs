/// A block-level node of a parsed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, content: Vec<Inline> },
    Paragraph(Vec<Inline>),
    /// Fenced code. `lang` is the raw tag as written after the fence.
    Code { lang: Option<String>, body: String },
    Math(String),
    Quote(Vec<Block>),
    /// One list block may hold several sibling lists when indentation
    /// drops below the level the block started at.
    Lists(Vec<List>),
    Table(Table),
    Rule,
    Footnote { id: String, content: Vec<Inline> },
    /// A `<details>`/`<summary>` line passed through untouched.
    Html(String),
    Definition { term: Vec<Inline>, definition: Vec<Inline> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct List {
    pub ordered: bool,
    pub items: Vec<ListItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    /// `Some(checked)` for task items.
    pub task: Option<bool>,
    pub content: Vec<Inline>,
    pub children: Vec<List>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

impl Align {
    pub fn as_str(self) -> &'static str {
        match self {
            Align::Left => "left",
            Align::Center => "center",
            Align::Right => "right",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub header: Vec<Vec<Inline>>,
    pub aligns: Vec<Align>,
    pub rows: Vec<Vec<Vec<Inline>>>,
}

impl Table {
    /// Alignment of column `idx`; columns past the separator row are left
    /// aligned.
    pub fn align(&self, idx: usize) -> Align {
        self.aligns.get(idx).copied().unwrap_or(Align::Left)
    }
}

/// An inline span inside paragraph, heading, list item or table cell text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Image { alt: String, src: String },
    Link { text: String, href: String },
    Autolink(String),
    BoldItalic(Vec<Inline>),
    Bold(Vec<Inline>),
    Italic(Vec<Inline>),
    Strike(Vec<Inline>),
    Mark(Vec<Inline>),
    Code(String),
    FootnoteRef(String),
}
