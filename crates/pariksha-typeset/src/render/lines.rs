// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Plain-text line layout of rendered blocks, shared by the metric measurer
// and the PDF proof sink so both see the same geometry.

use crate::fraction::{StackedFraction, StackedLine, segments_to_plain};

use super::{BlockBody, ItemContent, ItemList, RenderedBlock, RenderedItem};

/// Printed in place of an empty stacked-fraction slot.
const SLOT_TEXT: &str = "____";

/// Answer box appended to true/false items.
const ANSWER_BOX: &str = "[    ]";

/// One printed line of a block.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutLine {
    pub text: String,
    /// Text pinned to the end edge (quantity and marks).
    pub trailing: Option<String>,
    /// Nesting depth, one step per level.
    pub indent: u8,
    /// Vertical rows the line occupies before wrapping.
    pub rows: usize,
}

impl LayoutLine {
    fn new(text: impl Into<String>, indent: u8) -> Self {
        Self {
            text: text.into(),
            trailing: None,
            indent,
            rows: 1,
        }
    }

    /// Text rows after wrapping at `max_chars`; trailing text reserves room
    /// on every row so the end column stays clear.
    pub fn wrapped(&self, max_chars: usize) -> Vec<String> {
        let reserve = self.trailing.as_ref().map_or(0, |t| t.chars().count() + 2);
        wrap_text(&self.text, max_chars.saturating_sub(reserve).max(1))
    }

    /// Rows including the extra height of multi-row lines such as tables.
    pub fn row_count(&self, max_chars: usize) -> usize {
        self.wrapped(max_chars).len() + self.rows.saturating_sub(1)
    }
}

/// Greedy word wrap counted in characters, not bytes. Words longer than a
/// row are broken; an empty input still occupies one row.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut rows = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let mut chars: Vec<char> = word.chars().collect();

        while chars.len() > max_chars {
            if current_len > 0 {
                rows.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = chars.split_off(max_chars);
            rows.push(chars.into_iter().collect());
            chars = rest;
        }

        let len = chars.len();
        if len == 0 {
            continue;
        }
        if current_len > 0 && current_len + 1 + len > max_chars {
            rows.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.extend(chars);
        current_len += len;
    }

    if current_len > 0 || rows.is_empty() {
        rows.push(current);
    }
    rows
}

fn stacked_lines(label: &str, stacked: &StackedFraction, indent: u8, out: &mut Vec<LayoutLine>) {
    let render = |line: StackedLine<'_>| match line {
        StackedLine::Text(text) => text.to_owned(),
        StackedLine::Slot => SLOT_TEXT.to_owned(),
    };
    let numerator: Vec<_> = stacked.numerator_lines().map(render).collect();
    let denominator: Vec<_> = stacked.denominator_lines().map(render).collect();
    let width = numerator
        .iter()
        .chain(&denominator)
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(1);

    out.push(LayoutLine::new(label, indent));
    out.extend(numerator.into_iter().map(|l| LayoutLine::new(l, indent + 1)));
    out.push(LayoutLine::new("-".repeat(width), indent + 1));
    out.extend(denominator.into_iter().map(|l| LayoutLine::new(l, indent + 1)));
}

fn item_lines(item: &RenderedItem, indent: u8, out: &mut Vec<LayoutLine>) {
    match &item.content {
        ItemContent::Stacked(stacked) => stacked_lines(&item.label, stacked, indent, out),
        ItemContent::Inline(segments) => {
            let text = format!("{} {}", item.label, segments_to_plain(segments));
            let mut line = LayoutLine::new(text, indent);
            if item.answer_slot {
                line.trailing = Some(ANSWER_BOX.to_owned());
            }
            out.push(line);
        }
    }

    if let Some(table) = &item.table_markup {
        let rows = table.matches("<tr").count().max(1);
        out.push(LayoutLine {
            rows,
            ..LayoutLine::new("[table]", indent + 1)
        });
    }

    for option in &item.options {
        out.push(LayoutLine::new(
            format!("{} {}", option.label, segments_to_plain(&option.text)),
            indent + 1,
        ));
    }
}

fn list_lines(list: &ItemList, indent: u8, out: &mut Vec<LayoutLine>) {
    for item in &list.items {
        item_lines(item, indent, out);
    }
}

impl RenderedBlock {
    /// Header first, then the body in reading order.
    pub fn layout_lines(&self) -> Vec<LayoutLine> {
        let mut out = vec![LayoutLine {
            trailing: self.header.trailing_text(),
            ..LayoutLine::new(self.header.title_text(), 0)
        }];

        match &self.body {
            BlockBody::Break => {}
            BlockBody::Items(list) => list_lines(list, 1, &mut out),
            BlockBody::Passage { passage, contexts } => {
                if let Some(passage) = passage {
                    let text = segments_to_plain(passage);
                    out.extend(text.lines().map(|l| LayoutLine::new(l.trim(), 1)));
                }
                for context in contexts {
                    out.push(LayoutLine::new(format!("{} {}", context.ordinal, context.title), 1));
                    list_lines(&context.list, 2, &mut out);
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use pariksha_core::model::{Document, Group, Item};
    use pariksha_core::types::{GroupKind, QuantitySelector};

    use crate::render::render_document;

    #[test]
    fn header_carries_trailing_marks() {
        let mut group = Group::new("g", "Answer", GroupKind::TrueFalse)
            .with_items(vec![Item::new("a", "Sky is blue"), Item::new("b", "Fire is cold")]);
        group.quantity_selector = Some(QuantitySelector::All);
        group.mark_per_item = Some("1".into());
        let doc = Document {
            groups: vec![group],
            ..Document::new()
        };

        let lines = render_document(&doc).blocks[0].layout_lines();
        assert_eq!(lines[0].text, "1. Answer");
        assert_eq!(lines[0].trailing.as_deref(), Some("All  2 × 1 = 2"));
        assert_eq!(lines[1].text, "1. Sky is blue");
        assert!(lines[1].trailing.is_some());
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn stacked_item_lines_include_rule_and_slot() {
        let group = Group::new("s", "Fill", GroupKind::StackedFraction)
            .with_items(vec![Item::new("f", "5\n3;;2\n[]")]);
        let doc = Document {
            groups: vec![group],
            ..Document::new()
        };
        let lines = render_document(&doc).blocks[0].layout_lines();
        let texts: Vec<_> = lines.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["1. Fill", "1.", "5", "3", "----", "2", "____"]);
    }

    #[test]
    fn wrap_counts_characters() {
        assert_eq!(super::wrap_text("", 10), vec![String::new()]);
        assert_eq!(super::wrap_text("aa bb cc", 5), vec!["aa bb", "cc"]);
        // Multi-byte script wraps by character count.
        assert_eq!(super::wrap_text("কখগঘ ঙচ", 4), vec!["কখগঘ", "ঙচ"]);
        assert_eq!(super::wrap_text("abcdefgh", 3), vec!["abc", "def", "gh"]);
    }

    #[test]
    fn trailing_text_reserves_room() {
        let line = super::LayoutLine {
            trailing: Some("5 × 2 = 10".into()),
            ..super::LayoutLine::new("one two three four", 0)
        };
        // 20 - (10 + 2) leaves 8 characters per row.
        assert_eq!(line.wrapped(20), vec!["one two", "three", "four"]);
        assert_eq!(line.row_count(20), 3);
    }
}
