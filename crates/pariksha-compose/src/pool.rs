// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Chapter/lesson bucketing of pool items for the picker.

use pariksha_bridge::Chapter;
use pariksha_core::model::Item;
use serde::Serialize;
use tracing::debug;

/// Bucket name for items whose chapter or lesson cannot be resolved.
pub const OTHER_BUCKET: &str = "Other";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LessonBucket {
    /// `None` for the `Other` bucket.
    pub lesson_id: Option<String>,
    pub name: String,
    pub items: Vec<Item>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChapterBucket {
    pub chapter_id: Option<String>,
    pub name: String,
    pub lessons: Vec<LessonBucket>,
}

impl ChapterBucket {
    pub fn item_count(&self) -> usize {
        self.lessons.iter().map(|l| l.items.len()).sum()
    }
}

fn other_lesson() -> LessonBucket {
    LessonBucket {
        lesson_id: None,
        name: OTHER_BUCKET.to_owned(),
        items: Vec::new(),
    }
}

/// Group items under the known chapters and lessons, in the order the
/// chapters are given.
///
/// An item with an unknown chapter goes to the top-level `Other` chapter; an
/// item with a known chapter but unknown lesson goes to that chapter's
/// `Other` lesson. Empty buckets are omitted.
pub fn bucket_items(items: &[Item], chapters: &[Chapter]) -> Vec<ChapterBucket> {
    let mut buckets: Vec<ChapterBucket> = chapters
        .iter()
        .map(|chapter| ChapterBucket {
            chapter_id: Some(chapter.id.clone()),
            name: chapter.name.clone(),
            lessons: chapter
                .lessons
                .iter()
                .map(|lesson| LessonBucket {
                    lesson_id: Some(lesson.id.clone()),
                    name: lesson.name.clone(),
                    items: Vec::new(),
                })
                .chain(std::iter::once(other_lesson()))
                .collect(),
        })
        .collect();
    let mut other = ChapterBucket {
        chapter_id: None,
        name: OTHER_BUCKET.to_owned(),
        lessons: vec![other_lesson()],
    };
    let mut unresolved = 0usize;

    for item in items {
        let chapter = item
            .chapter_id
            .as_deref()
            .and_then(|id| buckets.iter_mut().find(|b| b.chapter_id.as_deref() == Some(id)));
        let Some(chapter) = chapter else {
            unresolved += 1;
            other.lessons[0].items.push(item.clone());
            continue;
        };

        let known = item.lesson_id.as_deref().and_then(|id| {
            chapter
                .lessons
                .iter()
                .position(|l| l.lesson_id.as_deref() == Some(id))
        });
        // The chapter's `Other` lesson is always last.
        let slot = known.unwrap_or(chapter.lessons.len() - 1);
        if known.is_none() {
            unresolved += 1;
        }
        chapter.lessons[slot].items.push(item.clone());
    }

    buckets.push(other);
    for bucket in &mut buckets {
        bucket.lessons.retain(|l| !l.items.is_empty());
    }
    buckets.retain(|b| !b.lessons.is_empty());

    debug!(chapters = buckets.len(), unresolved, "pool items bucketed");
    buckets
}
