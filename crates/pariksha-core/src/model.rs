// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// The assembled paper: Groups → (optional) Contexts → Items.
//
// Serde attributes follow the persisted camelCase wire names. Loading a full
// document goes through `crate::wire`, which also lifts the legacy `settings`
// pseudo-group onto `Document::settings`.

use std::collections::HashSet;

use serde::de::Deserializer;
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};

use crate::error::{ParikshaError, Result};
use crate::types::{CategoryType, Direction, GroupKind, QuantityMode, QuantitySelector, Script};

/// One answer option of an objective item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionChoice {
    pub id: String,
    pub label: String,
}

/// A leaf question copied from the pool. Never mutated after it is fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub question_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_markup: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<OptionChoice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer_key: Option<String>,
    /// Leaf layout type, used to infer a group kind when the candidate has none.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub item_type: Option<CategoryType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lesson_id: Option<String>,
}

impl Item {
    pub fn new(id: impl Into<String>, question_text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            question_text: question_text.into(),
            table_markup: None,
            options: Vec::new(),
            answer_key: None,
            item_type: None,
            chapter_id: None,
            lesson_id: None,
        }
    }
}

/// A sub-section of a passage-based group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Context {
    pub id: String,
    #[serde(rename = "name")]
    pub display_name: String,
    #[serde(rename = "type", default)]
    pub category_type: CategoryType,
    /// Falls back to the enclosing group's direction when absent.
    #[serde(rename = "isRTL", default, skip_serializing_if = "Option::is_none")]
    pub is_right_to_left: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numbering_style: Option<String>,
    #[serde(rename = "questions")]
    pub items: Vec<Item>,
}

impl Context {
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        category_type: CategoryType,
        items: Vec<Item>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            category_type,
            is_right_to_left: None,
            numbering_style: None,
            items,
        }
    }

    pub fn direction(&self, group_rtl: bool) -> Direction {
        Direction::from_rtl(self.is_right_to_left.unwrap_or(group_rtl))
    }
}

/// What a group holds. The shape is fixed when the group is created.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Payload {
    Flat(Vec<Item>),
    Nested(Vec<Context>),
    #[default]
    Empty,
}

impl Payload {
    /// Empty payload of the shape a kind requires.
    pub fn empty_for(kind: GroupKind) -> Self {
        match kind {
            GroupKind::PassageBased => Self::Nested(Vec::new()),
            GroupKind::SectionBreak => Self::Empty,
            _ => Self::Flat(Vec::new()),
        }
    }

    pub fn is_nested(&self) -> bool {
        matches!(self, Self::Nested(_))
    }

    /// Every leaf item, recursing through contexts.
    pub fn leaves(&self) -> Box<dyn Iterator<Item = &Item> + '_> {
        match self {
            Self::Flat(items) => Box::new(items.iter()),
            Self::Nested(contexts) => Box::new(contexts.iter().flat_map(|c| c.items.iter())),
            Self::Empty => Box::new(std::iter::empty()),
        }
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves().count()
    }

    pub fn is_empty(&self) -> bool {
        self.leaf_count() == 0
    }
}

impl Serialize for Payload {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Flat(items) => items.serialize(serializer),
            Self::Nested(contexts) => contexts.serialize(serializer),
            Self::Empty => serializer.serialize_seq(Some(0))?.end(),
        }
    }
}

/// Entries that carry their own `questions` array are contexts.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawPayload {
    Nested(Vec<Context>),
    Flat(Vec<Item>),
}

impl<'de> Deserialize<'de> for Payload {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Ok(match RawPayload::deserialize(deserializer)? {
            RawPayload::Nested(contexts) if contexts.is_empty() => Self::Empty,
            RawPayload::Nested(contexts) => Self::Nested(contexts),
            RawPayload::Flat(items) => Self::Flat(items),
        })
    }
}

/// A top-level numbered section of the paper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    #[serde(rename = "name")]
    pub display_name: String,
    #[serde(rename = "type")]
    pub kind: GroupKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numbering_style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option_numbering_style: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity_mode: Option<QuantityMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity_selector: Option<QuantitySelector>,
    /// String-encoded number, e.g. `"2"` or `"0.5"`.
    #[serde(rename = "mark", default, skip_serializing_if = "Option::is_none")]
    pub mark_per_item: Option<String>,
    #[serde(rename = "isRTL", default)]
    pub is_right_to_left: bool,
    /// Shared passage body of a passage-based group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passage: Option<String>,
    #[serde(rename = "questions", default)]
    pub payload: Payload,
}

impl Group {
    /// New empty group with the payload shape its kind requires.
    pub fn new(id: impl Into<String>, display_name: impl Into<String>, kind: GroupKind) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            kind,
            numbering_style: None,
            option_numbering_style: None,
            quantity_mode: None,
            quantity_selector: None,
            mark_per_item: None,
            is_right_to_left: false,
            passage: None,
            payload: Payload::empty_for(kind),
        }
    }

    /// New section-break group carrying only a title.
    pub fn section_break(id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self::new(id, display_name, GroupKind::SectionBreak)
    }

    pub fn with_items(mut self, items: Vec<Item>) -> Self {
        self.payload = Payload::Flat(items);
        self
    }

    pub fn with_contexts(mut self, contexts: Vec<Context>) -> Self {
        self.payload = Payload::Nested(contexts);
        self
    }

    pub fn direction(&self) -> Direction {
        Direction::from_rtl(self.is_right_to_left)
    }

    pub fn leaf_count(&self) -> usize {
        self.payload.leaf_count()
    }

    /// Reconcile a deserialised payload with the kind: an empty array says
    /// nothing about shape, so it takes the shape the kind requires.
    pub fn normalize_payload(&mut self) -> Result<()> {
        match (&self.payload, self.kind) {
            (Payload::Empty, kind) => self.payload = Payload::empty_for(kind),
            (Payload::Flat(_) | Payload::Nested(_), GroupKind::SectionBreak) => {
                return Err(ParikshaError::PayloadShape {
                    group: self.id.clone(),
                    detail: "section-break groups carry no items".into(),
                });
            }
            (Payload::Flat(_), GroupKind::PassageBased) => {
                return Err(ParikshaError::PayloadShape {
                    group: self.id.clone(),
                    detail: "passage-based groups hold contexts, not items".into(),
                });
            }
            _ => {}
        }
        Ok(())
    }
}

/// A named external collection the author may draw items from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCollection {
    pub id: String,
    pub name: String,
}

/// Document-wide toggles.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSettings {
    #[serde(rename = "isRTL", default)]
    pub right_to_left: bool,
    #[serde(default)]
    pub script: Script,
    #[serde(default)]
    pub secondary_sources: Vec<SourceCollection>,
}

impl DocumentSettings {
    pub fn direction(&self) -> Direction {
        Direction::from_rtl(self.right_to_left)
    }
}

/// The assembled paper owned by an authoring session.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub settings: DocumentSettings,
    pub groups: Vec<Group>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_script(script: Script) -> Self {
        Self {
            settings: DocumentSettings {
                right_to_left: script.natural_direction().is_rtl(),
                script,
                secondary_sources: Vec::new(),
            },
            groups: Vec::new(),
        }
    }

    pub fn group(&self, id: &str) -> Option<&Group> {
        self.groups.iter().find(|g| g.id == id)
    }

    pub fn group_mut(&mut self, id: &str) -> Option<&mut Group> {
        self.groups.iter_mut().find(|g| g.id == id)
    }

    pub fn group_position(&self, id: &str) -> Option<usize> {
        self.groups.iter().position(|g| g.id == id)
    }

    /// Every leaf item id anywhere in the document.
    pub fn leaf_ids(&self) -> HashSet<String> {
        self.groups
            .iter()
            .flat_map(|g| g.payload.leaves())
            .map(|item| item.id.clone())
            .collect()
    }

    pub fn leaf_count(&self) -> usize {
        self.groups.iter().map(Group::leaf_count).sum()
    }

    /// Check the structural invariants: unique group ids, unique item ids,
    /// unique context ids per group, and payload shape per kind.
    pub fn validate(&self) -> Result<()> {
        let mut group_ids = HashSet::new();
        let mut item_ids = HashSet::new();

        for group in &self.groups {
            if !group_ids.insert(group.id.as_str()) {
                return Err(ParikshaError::DuplicateId(group.id.clone()));
            }

            let shape_ok = match (&group.payload, group.kind) {
                (Payload::Empty, GroupKind::SectionBreak) => true,
                (_, GroupKind::SectionBreak) => false,
                (Payload::Nested(_), GroupKind::PassageBased) => true,
                (_, GroupKind::PassageBased) => false,
                (Payload::Flat(_), _) => true,
                _ => false,
            };
            if !shape_ok {
                return Err(ParikshaError::PayloadShape {
                    group: group.id.clone(),
                    detail: format!("payload does not match kind {:?}", group.kind),
                });
            }

            if let Payload::Nested(contexts) = &group.payload {
                let mut context_ids = HashSet::new();
                for context in contexts {
                    if !context_ids.insert(context.id.as_str()) {
                        return Err(ParikshaError::DuplicateId(context.id.clone()));
                    }
                }
            }

            for item in group.payload.leaves() {
                if !item_ids.insert(item.id.as_str()) {
                    return Err(ParikshaError::DuplicateId(item.id.clone()));
                }
            }
        }
        Ok(())
    }
}
