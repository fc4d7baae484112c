// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Direct edit operations.
//
// Each function takes the current document and returns the edited copy.
// Invalid values are rejected before anything changes.

use std::str::FromStr;

use pariksha_core::error::{ParikshaError, Result};
use pariksha_core::model::{Context, Document, Group, Item, Payload};
use pariksha_core::types::{GroupKind, QuantityMode, QuantitySelector, parse_mark};
use pariksha_typeset::NumberingStyle;
use pariksha_typeset::fraction::replace_numeric_token;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

fn group_mut<'a>(doc: &'a mut Document, group_id: &str) -> Result<&'a mut Group> {
    doc.group_mut(group_id)
        .ok_or_else(|| ParikshaError::UnknownGroup(group_id.to_owned()))
}

fn context_mut<'a>(group: &'a mut Group, context_id: &str) -> Result<&'a mut Context> {
    let group_id = group.id.clone();
    match &mut group.payload {
        Payload::Nested(contexts) => contexts.iter_mut().find(|c| c.id == context_id),
        _ => None,
    }
    .ok_or_else(|| ParikshaError::UnknownContext {
        group: group_id,
        context: context_id.to_owned(),
    })
}

fn move_within<T>(list: &mut Vec<T>, from: usize, to: usize) -> Result<()> {
    let len = list.len();
    for index in [from, to] {
        if index >= len {
            return Err(ParikshaError::OutOfRange { index, len });
        }
    }
    let moved = list.remove(from);
    list.insert(to, moved);
    Ok(())
}

/// Validate an optional numbering token. `None` or blank clears the style.
fn numbering_token(token: Option<&str>) -> Result<Option<String>> {
    match token.map(str::trim).filter(|t| !t.is_empty()) {
        Some(token) => {
            NumberingStyle::from_str(token)?;
            Ok(Some(token.to_owned()))
        }
        None => Ok(None),
    }
}

pub fn rename_group(doc: &Document, group_id: &str, name: &str) -> Result<Document> {
    let mut doc = doc.clone();
    group_mut(&mut doc, group_id)?.display_name = name.to_owned();
    Ok(doc)
}

pub fn rename_context(
    doc: &Document,
    group_id: &str,
    context_id: &str,
    name: &str,
) -> Result<Document> {
    let mut doc = doc.clone();
    let group = group_mut(&mut doc, group_id)?;
    context_mut(group, context_id)?.display_name = name.to_owned();
    Ok(doc)
}

/// Move the group at `from` to position `to`.
pub fn move_group(doc: &Document, from: usize, to: usize) -> Result<Document> {
    let mut doc = doc.clone();
    move_within(&mut doc.groups, from, to)?;
    Ok(doc)
}

/// Move an item within its container: the group's flat list, or one context
/// of a passage group.
pub fn move_item(
    doc: &Document,
    group_id: &str,
    context_id: Option<&str>,
    from: usize,
    to: usize,
) -> Result<Document> {
    let mut doc = doc.clone();
    let group = group_mut(&mut doc, group_id)?;
    match context_id {
        Some(context_id) => move_within(&mut context_mut(group, context_id)?.items, from, to)?,
        None => match &mut group.payload {
            Payload::Flat(items) => move_within(items, from, to)?,
            _ => {
                return Err(ParikshaError::PayloadShape {
                    group: group.id.clone(),
                    detail: "items of a passage group move within their context".into(),
                });
            }
        },
    }
    Ok(doc)
}

pub fn delete_group(doc: &Document, group_id: &str) -> Result<Document> {
    let mut doc = doc.clone();
    let position = doc
        .group_position(group_id)
        .ok_or_else(|| ParikshaError::UnknownGroup(group_id.to_owned()))?;
    doc.groups.remove(position);
    Ok(doc)
}

/// Remove one item wherever it is. Its group and context are kept even when
/// they become empty, so the author can refill them.
pub fn delete_item(doc: &Document, item_id: &str) -> Result<Document> {
    let mut doc = doc.clone();
    let mut found = false;
    let mut strip = |items: &mut Vec<Item>| {
        let before = items.len();
        items.retain(|item| item.id != item_id);
        found |= items.len() != before;
    };
    for group in &mut doc.groups {
        match &mut group.payload {
            Payload::Flat(items) => strip(items),
            Payload::Nested(contexts) => contexts.iter_mut().for_each(|c| strip(&mut c.items)),
            Payload::Empty => {}
        }
    }
    if !found {
        return Err(ParikshaError::UnknownItem(item_id.to_owned()));
    }
    Ok(doc)
}

/// Flip the paper direction; every group follows it.
pub fn toggle_document_direction(doc: &Document) -> Document {
    let mut doc = doc.clone();
    let rtl = !doc.settings.right_to_left;
    doc.settings.right_to_left = rtl;
    for group in &mut doc.groups {
        group.is_right_to_left = rtl;
    }
    doc
}

pub fn toggle_group_direction(doc: &Document, group_id: &str) -> Result<Document> {
    let mut doc = doc.clone();
    let group = group_mut(&mut doc, group_id)?;
    group.is_right_to_left = !group.is_right_to_left;
    Ok(doc)
}

/// Set the mark per item. An empty string clears it.
pub fn set_mark(doc: &Document, group_id: &str, mark: &str) -> Result<Document> {
    let parsed = parse_mark(mark)?;
    let mut doc = doc.clone();
    group_mut(&mut doc, group_id)?.mark_per_item = parsed.map(|_| mark.trim().to_owned());
    Ok(doc)
}

/// Set the quantity mode token (`all_bn`, `custom_en`, ...) and selector
/// (`All` or a positive count).
pub fn set_quantity(
    doc: &Document,
    group_id: &str,
    mode: &str,
    selector: &str,
) -> Result<Document> {
    let mode: QuantityMode = mode.parse()?;
    let selector: QuantitySelector = selector.parse()?;
    let mut doc = doc.clone();
    let group = group_mut(&mut doc, group_id)?;
    group.quantity_mode = Some(mode);
    group.quantity_selector = Some(selector);
    Ok(doc)
}

pub fn set_numbering_style(
    doc: &Document,
    group_id: &str,
    token: Option<&str>,
) -> Result<Document> {
    let token = numbering_token(token)?;
    let mut doc = doc.clone();
    group_mut(&mut doc, group_id)?.numbering_style = token;
    Ok(doc)
}

pub fn set_option_numbering_style(
    doc: &Document,
    group_id: &str,
    token: Option<&str>,
) -> Result<Document> {
    let token = numbering_token(token)?;
    let mut doc = doc.clone();
    group_mut(&mut doc, group_id)?.option_numbering_style = token;
    Ok(doc)
}

pub fn set_context_numbering_style(
    doc: &Document,
    group_id: &str,
    context_id: &str,
    token: Option<&str>,
) -> Result<Document> {
    let token = numbering_token(token)?;
    let mut doc = doc.clone();
    let group = group_mut(&mut doc, group_id)?;
    context_mut(group, context_id)?.numbering_style = token;
    Ok(doc)
}

/// Set or clear the shared passage of a passage group.
pub fn set_passage(doc: &Document, group_id: &str, passage: Option<&str>) -> Result<Document> {
    let mut doc = doc.clone();
    let group = group_mut(&mut doc, group_id)?;
    if group.kind != GroupKind::PassageBased {
        return Err(ParikshaError::PayloadShape {
            group: group.id.clone(),
            detail: "only passage-based groups carry a passage".into(),
        });
    }
    group.passage = passage.filter(|p| !p.trim().is_empty()).map(str::to_owned);
    Ok(doc)
}

/// Replace the `index`-th numeral of an item's body, leaving the rest of the
/// text untouched.
#[instrument(skip(doc))]
pub fn edit_fraction_token(
    doc: &Document,
    item_id: &str,
    index: usize,
    replacement: &str,
) -> Result<Document> {
    let mut doc = doc.clone();
    let item = doc
        .groups
        .iter_mut()
        .find_map(|group| match &mut group.payload {
            Payload::Flat(items) => items.iter_mut().find(|i| i.id == item_id),
            Payload::Nested(contexts) => contexts
                .iter_mut()
                .flat_map(|c| c.items.iter_mut())
                .find(|i| i.id == item_id),
            Payload::Empty => None,
        })
        .ok_or_else(|| ParikshaError::UnknownItem(item_id.to_owned()))?;

    item.question_text = replace_numeric_token(&item.question_text, index, replacement)?;
    debug!(item_id, "item body edited");
    Ok(doc)
}

/// A direct edit as data, so it can be queued, logged, or read from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Edit {
    RenameGroup { group: String, name: String },
    RenameContext { group: String, context: String, name: String },
    MoveGroup { from: usize, to: usize },
    MoveItem {
        group: String,
        #[serde(default)]
        context: Option<String>,
        from: usize,
        to: usize,
    },
    DeleteGroup { group: String },
    DeleteItem { item: String },
    ToggleDocumentDirection,
    ToggleGroupDirection { group: String },
    SetMark { group: String, mark: String },
    SetQuantity { group: String, mode: String, selector: String },
    SetNumberingStyle {
        group: String,
        #[serde(default)]
        style: Option<String>,
    },
    SetOptionNumberingStyle {
        group: String,
        #[serde(default)]
        style: Option<String>,
    },
    SetContextNumberingStyle {
        group: String,
        context: String,
        #[serde(default)]
        style: Option<String>,
    },
    SetPassage {
        group: String,
        #[serde(default)]
        passage: Option<String>,
    },
    EditFractionToken { item: String, index: usize, value: String },
}

impl Edit {
    pub fn apply(&self, doc: &Document) -> Result<Document> {
        match self {
            Self::RenameGroup { group, name } => rename_group(doc, group, name),
            Self::RenameContext {
                group,
                context,
                name,
            } => rename_context(doc, group, context, name),
            Self::MoveGroup { from, to } => move_group(doc, *from, *to),
            Self::MoveItem {
                group,
                context,
                from,
                to,
            } => move_item(doc, group, context.as_deref(), *from, *to),
            Self::DeleteGroup { group } => delete_group(doc, group),
            Self::DeleteItem { item } => delete_item(doc, item),
            Self::ToggleDocumentDirection => Ok(toggle_document_direction(doc)),
            Self::ToggleGroupDirection { group } => toggle_group_direction(doc, group),
            Self::SetMark { group, mark } => set_mark(doc, group, mark),
            Self::SetQuantity { group, mode, selector } => set_quantity(doc, group, mode, selector),
            Self::SetNumberingStyle { group, style } => {
                set_numbering_style(doc, group, style.as_deref())
            }
            Self::SetOptionNumberingStyle { group, style } => {
                set_option_numbering_style(doc, group, style.as_deref())
            }
            Self::SetContextNumberingStyle { group, context, style } => {
                set_context_numbering_style(doc, group, context, style.as_deref())
            }
            Self::SetPassage { group, passage } => set_passage(doc, group, passage.as_deref()),
            Self::EditFractionToken { item, index, value } => {
                edit_fraction_token(doc, item, *index, value)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pariksha_core::types::{CategoryType, Script};

    fn sample() -> Document {
        let passage =
            Group::new("p", "Passage", GroupKind::PassageBased).with_contexts(vec![Context::new(
                "c1",
                "Story",
                CategoryType::FreeText,
                vec![Item::new("x", "first"), Item::new("y", "second")],
            )]);
        Document {
            groups: vec![
                Group::new("a", "A", GroupKind::FreeText)
                    .with_items(vec![Item::new("q1", "3//4 + 1//2"), Item::new("q2", "why?")]),
                Group::new("b", "B", GroupKind::Objective),
                passage,
            ],
            ..Document::with_script(Script::Bengali)
        }
    }

    #[test]
    fn edits_never_touch_the_input() {
        let doc = sample();
        let renamed = rename_group(&doc, "a", "Short answers").unwrap();
        assert_eq!(doc.groups[0].display_name, "A");
        assert_eq!(renamed.groups[0].display_name, "Short answers");
    }

    #[test]
    fn unknown_ids_are_reported() {
        let doc = sample();
        assert!(matches!(rename_group(&doc, "zz", "x"), Err(ParikshaError::UnknownGroup(_))));
        assert!(matches!(
            rename_context(&doc, "p", "nope", "x"),
            Err(ParikshaError::UnknownContext { .. })
        ));
        assert!(matches!(delete_item(&doc, "nope"), Err(ParikshaError::UnknownItem(_))));
    }

    #[test]
    fn move_group_and_items() {
        let doc = move_group(&sample(), 2, 0).unwrap();
        assert_eq!(doc.groups[0].id, "p");

        let doc = move_item(&doc, "a", None, 1, 0).unwrap();
        assert_eq!(doc.group("a").unwrap().payload.leaves().next().unwrap().id, "q2");

        let doc = move_item(&doc, "p", Some("c1"), 0, 1).unwrap();
        assert_eq!(doc.group("p").unwrap().payload.leaves().next().unwrap().id, "y");

        assert!(matches!(
            move_group(&doc, 0, 9),
            Err(ParikshaError::OutOfRange { index: 9, len: 3 })
        ));
        assert!(move_item(&doc, "p", None, 0, 1).is_err());
    }

    #[test]
    fn delete_item_keeps_emptied_group() {
        let doc = delete_item(&sample(), "q1").unwrap();
        let doc = delete_item(&doc, "q2").unwrap();
        assert_eq!(doc.group("a").map(Group::leaf_count), Some(0));

        let doc = delete_group(&doc, "a").unwrap();
        assert!(doc.group("a").is_none());
    }

    #[test]
    fn document_direction_cascades() {
        let doc = toggle_document_direction(&sample());
        assert!(doc.settings.right_to_left);
        assert!(doc.groups.iter().all(|g| g.is_right_to_left));

        let doc = toggle_group_direction(&doc, "b").unwrap();
        assert!(!doc.group("b").unwrap().is_right_to_left);
    }

    #[test]
    fn mark_and_quantity_are_validated() {
        let doc = set_mark(&sample(), "a", " 2 ").unwrap();
        assert_eq!(doc.group("a").unwrap().mark_per_item.as_deref(), Some("2"));
        let doc = set_mark(&doc, "a", "").unwrap();
        assert_eq!(doc.group("a").unwrap().mark_per_item, None);
        assert!(matches!(set_mark(&doc, "a", "-1"), Err(ParikshaError::InvalidMark(_))));

        let doc = set_quantity(&doc, "a", "custom_bn", "5").unwrap();
        let group = doc.group("a").unwrap();
        assert_eq!(group.quantity_mode, Some(QuantityMode::Custom(Script::Bengali)));
        assert_eq!(group.quantity_selector, Some(QuantitySelector::Count(5)));
        assert!(set_quantity(&doc, "a", "custom_bn", "0").is_err());
        assert!(set_quantity(&doc, "a", "some_xx", "All").is_err());
    }

    #[test]
    fn numbering_tokens_are_validated() {
        let doc = set_numbering_style(&sample(), "a", Some("roman-paren")).unwrap();
        assert_eq!(doc.group("a").unwrap().numbering_style.as_deref(), Some("roman-paren"));
        assert!(set_option_numbering_style(&doc, "a", Some("klingon")).is_err());

        let doc = set_context_numbering_style(&doc, "p", "c1", Some("en-alpha-paren")).unwrap();
        let doc = set_numbering_style(&doc, "a", None).unwrap();
        assert_eq!(doc.group("a").unwrap().numbering_style, None);
        let Payload::Nested(contexts) = &doc.group("p").unwrap().payload else {
            panic!("nested payload expected");
        };
        assert_eq!(contexts[0].numbering_style.as_deref(), Some("en-alpha-paren"));
    }

    #[test]
    fn passage_only_on_passage_groups() {
        let doc = set_passage(&sample(), "p", Some("Once upon a time")).unwrap();
        assert_eq!(doc.group("p").unwrap().passage.as_deref(), Some("Once upon a time"));
        assert!(matches!(
            set_passage(&doc, "a", Some("x")),
            Err(ParikshaError::PayloadShape { .. })
        ));
    }

    #[test]
    fn fraction_token_edit_splices_one_numeral() {
        let doc = edit_fraction_token(&sample(), "q1", 2, "7").unwrap();
        let edited = doc.group("a").unwrap().payload.leaves().next().unwrap();
        assert_eq!(edited.question_text, "3//4 + 7//2");
        assert!(matches!(
            edit_fraction_token(&doc, "q1", 9, "1"),
            Err(ParikshaError::TokenOutOfRange { .. })
        ));
    }

    #[test]
    fn edit_enum_reads_from_json() {
        let edit: Edit =
            serde_json::from_str(r#"{"op":"set_mark","group":"a","mark":"1.5"}"#).unwrap();
        let doc = edit.apply(&sample()).unwrap();
        assert_eq!(doc.group("a").unwrap().mark_per_item.as_deref(), Some("1.5"));

        let toggle: Edit = serde_json::from_str(r#"{"op":"toggle_document_direction"}"#).unwrap();
        assert_eq!(toggle, Edit::ToggleDocumentDirection);
    }
}
