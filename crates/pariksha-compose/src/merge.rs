// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Merge/toggle engine.
//
// `apply` decides, for one pool category, whether to toggle its items off,
// create a new group, or merge into an existing one. It never mutates its
// inputs and never produces duplicate leaf ids.

use std::collections::HashSet;

use pariksha_bridge::Category;
use pariksha_core::model::{Context, Document, Group, Item, Payload, SourceCollection};
use pariksha_core::types::{GroupKind, QuantityMode, QuantitySelector};
use pariksha_typeset::NumberingStyle;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Joins a category id and a secondary source id into a group id.
pub const COMPOSITE_SEPARATOR: &str = "::";

/// What `apply` did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum MergeAction {
    /// The candidate had no leaf items.
    Noop,
    /// Every incoming id was present; they were removed.
    Removed { items: usize, groups_dropped: usize },
    Created {
        group_id: String,
        items: usize,
        section_break: bool,
    },
    Merged { group_id: String, items: usize },
}

/// Group id a candidate lands in: its own id for the primary source, or a
/// composite id per secondary source.
pub fn target_group_id(candidate_id: &str, source: Option<&SourceCollection>) -> String {
    match source {
        Some(source) => format!("{candidate_id}{COMPOSITE_SEPARATOR}{}", source.id),
        None => candidate_id.to_owned(),
    }
}

/// `apply(document, candidate) -> document'`.
pub fn apply(
    document: &Document,
    candidate: &Category,
    source: Option<&SourceCollection>,
) -> Document {
    apply_candidate(document, candidate, source).0
}

/// Like [`apply`], also reporting what happened.
#[instrument(skip_all, fields(candidate = %candidate.id, source = source.map(|s| s.id.as_str())))]
pub fn apply_candidate(
    document: &Document,
    candidate: &Category,
    source: Option<&SourceCollection>,
) -> (Document, MergeAction) {
    let incoming: HashSet<&str> = candidate.leaf_ids().collect();
    if incoming.is_empty() {
        debug!("candidate has no leaf items");
        return (document.clone(), MergeAction::Noop);
    }

    let existing = document.leaf_ids();
    if incoming.iter().all(|id| existing.contains(*id)) {
        return toggle_off(document, &incoming);
    }

    let target = target_group_id(&candidate.id, source);
    let mut seen = existing;
    match document.group_position(&target) {
        Some(position) => merge_into(document, position, candidate, &mut seen),
        None => create_group(document, candidate, target, source, &mut seen),
    }
}

// ---------------------------------------------------------------------------
// Toggle-off
// ---------------------------------------------------------------------------

/// Remove `ids` from a payload. Returns whether anything was removed;
/// contexts emptied by the removal are dropped.
fn remove_leaves(payload: &mut Payload, ids: &HashSet<&str>, removed: &mut usize) -> bool {
    let mut strip = |items: &mut Vec<Item>| {
        let before = items.len();
        items.retain(|item| !ids.contains(item.id.as_str()));
        *removed += before - items.len();
        before != items.len()
    };

    match payload {
        Payload::Flat(items) => strip(items),
        Payload::Nested(contexts) => {
            let mut touched = false;
            contexts.retain_mut(|context| {
                let hit = strip(&mut context.items);
                touched |= hit;
                !(hit && context.items.is_empty())
            });
            touched
        }
        Payload::Empty => false,
    }
}

fn toggle_off(document: &Document, ids: &HashSet<&str>) -> (Document, MergeAction) {
    let mut doc = document.clone();
    let mut removed = 0usize;
    let before = doc.groups.len();

    doc.groups.retain_mut(|group| {
        let touched = remove_leaves(&mut group.payload, ids, &mut removed);
        !(touched && group.payload.is_empty() && !group.kind.retained_when_empty())
    });

    let groups_dropped = before - doc.groups.len();
    info!(items = removed, groups_dropped, "candidate toggled off");
    (
        doc,
        MergeAction::Removed {
            items: removed,
            groups_dropped,
        },
    )
}

// ---------------------------------------------------------------------------
// Insert / merge
// ---------------------------------------------------------------------------

/// Items whose ids are not in `seen`, recording the ones taken.
fn fresh_items(items: &[Item], seen: &mut HashSet<String>) -> Vec<Item> {
    items
        .iter()
        .filter(|item| seen.insert(item.id.clone()))
        .cloned()
        .collect()
}

/// Kind of a new group: nested payloads are passage groups; otherwise the
/// candidate's kind, else its first leaf's type, else free text.
fn infer_kind(candidate: &Category) -> GroupKind {
    if candidate.payload.is_nested() {
        return GroupKind::PassageBased;
    }
    candidate
        .kind
        .filter(|kind| *kind != GroupKind::SectionBreak)
        .or_else(|| {
            candidate
                .payload
                .leaves()
                .next()
                .and_then(|item| item.item_type)
                .map(GroupKind::from_category)
        })
        .unwrap_or(GroupKind::FreeText)
}

/// A flat list presented as one context keyed by `id`.
fn synthetic_context(id: &str, name: &str, kind: GroupKind, items: Vec<Item>) -> Context {
    Context::new(id, name, kind.category_type().unwrap_or_default(), items)
}

fn create_group(
    document: &Document,
    candidate: &Category,
    target: String,
    source: Option<&SourceCollection>,
    seen: &mut HashSet<String>,
) -> (Document, MergeAction) {
    let kind = infer_kind(candidate);
    let payload = match &candidate.payload {
        Payload::Nested(contexts) => Payload::Nested(
            contexts
                .iter()
                .filter_map(|context| {
                    let items = fresh_items(&context.items, seen);
                    (!items.is_empty()).then(|| Context {
                        items,
                        ..context.clone()
                    })
                })
                .collect(),
        ),
        Payload::Flat(items) if kind.is_nested() => Payload::Nested(vec![synthetic_context(
            &target,
            &candidate.name,
            GroupKind::FreeText,
            fresh_items(items, seen),
        )]),
        Payload::Flat(items) => Payload::Flat(fresh_items(items, seen)),
        Payload::Empty => Payload::empty_for(kind),
    };
    let items = payload.leaf_count();
    if items == 0 {
        return (document.clone(), MergeAction::Noop);
    }

    let script = document.settings.script;
    let mut group = Group::new(target.clone(), candidate.name.clone(), kind);
    group.numbering_style = Some(NumberingStyle::items_for(script).to_string());
    group.option_numbering_style = Some(NumberingStyle::options_for(script).to_string());
    group.quantity_mode = Some(QuantityMode::All(script));
    group.quantity_selector = Some(QuantitySelector::All);
    group.is_right_to_left = candidate.is_right_to_left;
    group.payload = payload;

    let mut doc = document.clone();
    let mut section_break = false;
    if let Some(source) = source {
        let already_marked = doc.groups.last().is_some_and(|last| {
            last.kind == GroupKind::SectionBreak && last.display_name == source.name
        });
        if !already_marked {
            doc.groups
                .push(Group::section_break(Uuid::new_v4().to_string(), source.name.clone()));
            section_break = true;
        }
    }
    doc.groups.push(group);

    info!(group = %target, ?kind, items, section_break, "group created");
    (
        doc,
        MergeAction::Created {
            group_id: target,
            items,
            section_break,
        },
    )
}

/// Existing context matching `incoming`: by id, else by display name.
fn find_context(contexts: &[Context], incoming: &Context) -> Option<usize> {
    if let Some(index) = contexts.iter().position(|c| c.id == incoming.id) {
        return Some(index);
    }
    let index = contexts
        .iter()
        .position(|c| c.display_name == incoming.display_name)?;
    warn!(
        incoming = %incoming.id,
        existing = %contexts[index].id,
        name = %incoming.display_name,
        "context matched by name; ids differ"
    );
    Some(index)
}

fn merge_into(
    document: &Document,
    position: usize,
    candidate: &Category,
    seen: &mut HashSet<String>,
) -> (Document, MergeAction) {
    let mut doc = document.clone();
    let group = &mut doc.groups[position];
    if group.kind == GroupKind::SectionBreak {
        warn!(group = %group.id, "candidate targets a section break; ignored");
        return (document.clone(), MergeAction::Noop);
    }

    let nested =
        group.payload.is_nested() || group.kind.is_nested() || candidate.payload.is_nested();
    let mut added = 0usize;

    if nested {
        let existing = match std::mem::take(&mut group.payload) {
            Payload::Nested(contexts) => contexts,
            Payload::Flat(items) => {
                debug!(group = %group.id, "wrapping flat group as a context");
                vec![synthetic_context(&group.id, &group.display_name, group.kind, items)]
            }
            Payload::Empty => Vec::new(),
        };
        let incoming = match &candidate.payload {
            Payload::Nested(contexts) => contexts.clone(),
            Payload::Flat(items) => vec![synthetic_context(
                &group.id,
                &candidate.name,
                infer_kind(candidate),
                items.clone(),
            )],
            Payload::Empty => Vec::new(),
        };

        let mut contexts = existing;
        for context in incoming {
            let items = fresh_items(&context.items, seen);
            if items.is_empty() {
                continue;
            }
            added += items.len();
            match find_context(&contexts, &context) {
                Some(index) => contexts[index].items.extend(items),
                None => contexts.push(Context { items, ..context }),
            }
        }
        group.kind = GroupKind::PassageBased;
        group.payload = Payload::Nested(contexts);
    } else if let (Payload::Flat(items), Payload::Flat(incoming)) =
        (&mut group.payload, &candidate.payload)
    {
        let fresh = fresh_items(incoming, seen);
        added = fresh.len();
        items.extend(fresh);
    } else if let Payload::Flat(incoming) = &candidate.payload {
        let fresh = fresh_items(incoming, seen);
        added = fresh.len();
        group.payload = Payload::Flat(fresh);
    }

    let group_id = group.id.clone();
    info!(group = %group_id, items = added, "candidate merged");
    (doc, MergeAction::Merged { group_id, items: added })
}
