// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Capability traits for the collaborators the composer talks to.
//
// The pool is read-only; the save endpoint is a black box with last-write-wins
// semantics. Both are synchronous and `Send + Sync` so async callers can hand
// them to `spawn_blocking`.

use pariksha_core::error::Result;
use pariksha_core::model::{Document, Item, Payload};
use pariksha_core::types::GroupKind;
use serde::{Deserialize, Serialize};

/// Filter parameters for a pool query. `None` means "any".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolFilter {
    pub search: Option<String>,
    pub chapter_id: Option<String>,
    pub lesson_id: Option<String>,
    pub source_id: Option<String>,
}

impl PoolFilter {
    /// Whether a leaf item passes the chapter, lesson and search filters.
    pub fn admits(&self, item: &Item) -> bool {
        let chapter_ok = self
            .chapter_id
            .as_deref()
            .is_none_or(|c| item.chapter_id.as_deref() == Some(c));
        let lesson_ok = self
            .lesson_id
            .as_deref()
            .is_none_or(|l| item.lesson_id.as_deref() == Some(l));
        let search_ok = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .is_none_or(|s| item.question_text.to_lowercase().contains(&s.to_lowercase()));
        chapter_ok && lesson_ok && search_ok
    }
}

/// A pool category: the candidate unit the merge engine adds or toggles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    /// Absent kinds are inferred from the first leaf's type.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<GroupKind>,
    #[serde(rename = "isRTL", default)]
    pub is_right_to_left: bool,
    #[serde(rename = "questions", default)]
    pub payload: Payload,
    /// Secondary source collection the category was fetched from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_id: Option<String>,
}

impl Category {
    pub fn new(id: impl Into<String>, name: impl Into<String>, payload: Payload) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: None,
            is_right_to_left: false,
            payload,
            source_id: None,
        }
    }

    pub fn with_kind(mut self, kind: GroupKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn leaf_ids(&self) -> impl Iterator<Item = &str> {
        self.payload.leaves().map(|item| item.id.as_str())
    }
}

/// A lesson inside a chapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: String,
    pub name: String,
}

/// A chapter and its lessons, used to bucket pool items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

/// Read-only question pool.
pub trait PoolQuery: Send + Sync {
    /// Categories whose leaves pass `filter`; non-matching leaves are dropped
    /// and categories left empty are omitted.
    fn query(&self, filter: &PoolFilter) -> Result<Vec<Category>>;

    /// Known chapters (with lessons) for bucketing.
    fn chapters(&self) -> Result<Vec<Chapter>>;
}

/// External persistence for assembled papers.
pub trait SaveEndpoint: Send + Sync {
    /// Store `document` under `document_id`, replacing any earlier save.
    fn save(&self, document_id: &str, document: &Document) -> Result<()>;

    /// The last saved state, if any, for hydrating a session.
    fn load(&self, document_id: &str) -> Result<Option<Document>>;
}
