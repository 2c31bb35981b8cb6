//! List builder.
//!
//! List lines are nested by their leading whitespace. A deeper line opens
//! a child list under the previous item, a shallower one closes lists until
//! it reaches a level at or above its own, and equal indentation adds a
//! sibling item.

use regex::Regex;
use std::sync::LazyLock;

use super::ast::{List, ListItem};
use super::inline::parse_inline;

static LIST_START_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:[-*+]|\d+\.)\s+").expect("valid regex"));
static TASK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)[-*+]\s+\[([ xX])\]\s+(.+)").expect("valid regex"));
static BULLET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)[-*+]\s+(.+)").expect("valid regex"));
static ORDERED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\s*)\d+\.\s+(.+)").expect("valid regex"));

/// Whether `line` starts a list item.
pub fn is_list_line(line: &str) -> bool {
    LIST_START_RE.is_match(line)
}

struct Entry {
    indent: usize,
    ordered: bool,
    item: ListItem,
}

fn parse_entry(line: &str) -> Option<Entry> {
    let (indent, ordered, task, content) = if let Some(caps) = TASK_RE.captures(line) {
        (caps[1].len(), false, Some(&caps[2] != " "), caps.get(3)?.as_str())
    } else if let Some(caps) = BULLET_RE.captures(line) {
        (caps[1].len(), false, None, caps.get(2)?.as_str())
    } else {
        let caps = ORDERED_RE.captures(line)?;
        (caps[1].len(), true, None, caps.get(2)?.as_str())
    };

    Some(Entry {
        indent,
        ordered,
        item: ListItem {
            task,
            content: parse_inline(content),
            children: Vec::new(),
        },
    })
}

struct Frame {
    indent: usize,
    list: List,
}

/// Builds the lists described by `lines`. Lines that are not list items
/// are skipped.
pub fn build_lists(lines: &[&str]) -> Vec<List> {
    let mut done = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();

    for line in lines {
        let Some(entry) = parse_entry(line) else {
            continue;
        };

        while stack.last().is_some_and(|top| entry.indent < top.indent) {
            close_top(&mut stack, &mut done);
        }

        match stack.last_mut() {
            Some(top) if entry.indent <= top.indent => top.list.items.push(entry.item),
            _ => stack.push(Frame {
                indent: entry.indent,
                list: List {
                    ordered: entry.ordered,
                    items: vec![entry.item],
                },
            }),
        }
    }

    while !stack.is_empty() {
        close_top(&mut stack, &mut done);
    }
    done
}

/// Pops the innermost list and hangs it under its parent's last item, or
/// emits it when it was outermost.
fn close_top(stack: &mut Vec<Frame>, done: &mut Vec<List>) {
    let Some(frame) = stack.pop() else {
        return;
    };
    match stack
        .last_mut()
        .and_then(|parent| parent.list.items.last_mut())
    {
        Some(item) => item.children.push(frame.list),
        None => done.push(frame.list),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::ast::Inline;

    fn words(item: &ListItem) -> String {
        item.content
            .iter()
            .map(|node| match node {
                Inline::Text(t) => t.as_str(),
                _ => "?",
            })
            .collect()
    }

    #[test]
    fn detects_list_starts() {
        assert!(is_list_line("- a"));
        assert!(is_list_line("  * a"));
        assert!(is_list_line("12. a"));
        assert!(!is_list_line("-a"));
        assert!(!is_list_line("1) a"));
        assert!(!is_list_line("---"));
    }

    #[test]
    fn flat_list() {
        let lists = build_lists(&["- a", "- b", "- c"]);
        assert_eq!(lists.len(), 1);
        assert!(!lists[0].ordered);
        assert_eq!(lists[0].items.len(), 3);
    }

    #[test]
    fn nesting_follows_indentation() {
        let lists = build_lists(&["1. one", "   - inner", "     - deeper", "2. two"]);
        assert_eq!(lists.len(), 1);
        let outer = &lists[0];
        assert!(outer.ordered);
        assert_eq!(outer.items.len(), 2);
        let inner = &outer.items[0].children[0];
        assert!(!inner.ordered);
        assert_eq!(words(&inner.items[0]), "inner");
        assert_eq!(words(&inner.items[0].children[0].items[0]), "deeper");
        assert!(outer.items[1].children.is_empty());
    }

    #[test]
    fn dedent_past_the_start_opens_a_sibling_list() {
        let lists = build_lists(&["  - a", "- b"]);
        assert_eq!(lists.len(), 2);
        assert_eq!(words(&lists[1].items[0]), "b");
    }

    #[test]
    fn task_items_carry_their_state() {
        let lists = build_lists(&["- [x] done", "- [ ] todo", "- [X] also"]);
        let states: Vec<_> = lists[0].items.iter().map(|i| i.task).collect();
        assert_eq!(states, vec![Some(true), Some(false), Some(true)]);
        assert_eq!(words(&lists[0].items[0]), "done");
    }

    #[test]
    fn items_without_content_are_skipped() {
        assert!(build_lists(&["- "]).is_empty());
    }
}
