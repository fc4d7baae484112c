// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory and JSON-file question pools.

use std::path::Path;

use pariksha_core::error::{ParikshaError, Result};
use pariksha_core::model::{Context, Payload};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::traits::{Category, Chapter, PoolFilter, PoolQuery};

/// Keep only the leaves `filter` admits; contexts left empty are dropped.
fn filter_payload(payload: &Payload, filter: &PoolFilter) -> Payload {
    match payload {
        Payload::Flat(items) => {
            Payload::Flat(items.iter().filter(|i| filter.admits(i)).cloned().collect())
        }
        Payload::Nested(contexts) => Payload::Nested(
            contexts
                .iter()
                .filter_map(|context| {
                    let items: Vec<_> = context
                        .items
                        .iter()
                        .filter(|i| filter.admits(i))
                        .cloned()
                        .collect();
                    (!items.is_empty()).then(|| Context {
                        items,
                        ..context.clone()
                    })
                })
                .collect(),
        ),
        Payload::Empty => Payload::Empty,
    }
}

/// Categories held in memory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryPool {
    pub categories: Vec<Category>,
    #[serde(default)]
    pub chapters: Vec<Chapter>,
}

impl MemoryPool {
    pub fn new(categories: Vec<Category>) -> Self {
        Self {
            categories,
            chapters: Vec::new(),
        }
    }

    pub fn with_chapters(mut self, chapters: Vec<Chapter>) -> Self {
        self.chapters = chapters;
        self
    }
}

impl PoolQuery for MemoryPool {
    #[instrument(skip(self), fields(categories = self.categories.len()))]
    fn query(&self, filter: &PoolFilter) -> Result<Vec<Category>> {
        let matched: Vec<Category> = self
            .categories
            .iter()
            .filter(|c| {
                filter
                    .source_id
                    .as_deref()
                    .is_none_or(|s| c.source_id.as_deref() == Some(s))
            })
            .filter_map(|category| {
                let payload = filter_payload(&category.payload, filter);
                (!payload.is_empty()).then(|| Category {
                    payload,
                    ..category.clone()
                })
            })
            .collect();
        debug!(matched = matched.len(), "pool query");
        Ok(matched)
    }

    fn chapters(&self) -> Result<Vec<Chapter>> {
        Ok(self.chapters.clone())
    }
}

/// A pool read once from a JSON file shaped like [`MemoryPool`].
#[derive(Debug, Clone)]
pub struct JsonFilePool {
    inner: MemoryPool,
}

impl JsonFilePool {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)
            .map_err(|e| ParikshaError::Pool(format!("{}: {e}", path.display())))?;
        let inner: MemoryPool = serde_json::from_str(&data)?;
        info!(
            path = %path.display(),
            categories = inner.categories.len(),
            "pool file loaded"
        );
        Ok(Self { inner })
    }
}

impl PoolQuery for JsonFilePool {
    fn query(&self, filter: &PoolFilter) -> Result<Vec<Category>> {
        self.inner.query(filter)
    }

    fn chapters(&self) -> Result<Vec<Chapter>> {
        self.inner.chapters()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pariksha_core::model::Item;
    use pariksha_core::types::{CategoryType, GroupKind};

    fn item(id: &str, text: &str, chapter: &str) -> Item {
        Item {
            chapter_id: Some(chapter.into()),
            ..Item::new(id, text)
        }
    }

    fn pool() -> MemoryPool {
        let flat = Category::new(
            "mcq",
            "Objective",
            Payload::Flat(vec![item("q1", "Photosynthesis", "ch1"), item("q2", "Osmosis", "ch2")]),
        )
        .with_kind(GroupKind::Objective);
        let mut nested = Category::new(
            "passage",
            "Reading",
            Payload::Nested(vec![
                Context::new("c1", "Story", CategoryType::FillGap, vec![item("q3", "Gap", "ch1")]),
                Context::new("c2", "Poem", CategoryType::FillGap, vec![item("q4", "Rhyme", "ch2")]),
            ]),
        )
        .with_kind(GroupKind::PassageBased);
        nested.source_id = Some("board".into());
        MemoryPool::new(vec![flat, nested]).with_chapters(vec![Chapter {
            id: "ch1".into(),
            name: "Plants".into(),
            lessons: Vec::new(),
        }])
    }

    #[test]
    fn chapter_filter_trims_leaves_and_contexts() {
        let filter = PoolFilter {
            chapter_id: Some("ch1".into()),
            ..PoolFilter::default()
        };
        let result = pool().query(&filter).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].leaf_ids().collect::<Vec<_>>(), vec!["q1"]);
        let Payload::Nested(contexts) = &result[1].payload else {
            panic!("nested category expected");
        };
        assert_eq!(contexts.len(), 1);
        assert_eq!(contexts[0].id, "c1");
    }

    #[test]
    fn search_is_case_insensitive_and_drops_empty_categories() {
        let filter = PoolFilter {
            search: Some("OSMO".into()),
            ..PoolFilter::default()
        };
        let result = pool().query(&filter).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "mcq");
    }

    #[test]
    fn source_filter() {
        let filter = PoolFilter {
            source_id: Some("board".into()),
            ..PoolFilter::default()
        };
        let result = pool().query(&filter).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "passage");
    }

    #[test]
    fn memory_pool_reports_its_chapters() {
        let chapters = pool().chapters().unwrap();
        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].name, "Plants");
    }

    #[test]
    fn json_file_pool_reads_wire_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pool.json");
        std::fs::write(
            &path,
            r#"{"categories":[{"id":"tf","name":"True or false","type":"true-false","isRTL":false,
                "questions":[{"id":"t1","questionText":"Water boils at 100C","chapterId":"ch1"}]}],
               "chapters":[{"id":"ch1","name":"Heat","lessons":[{"id":"l1","name":"Boiling"}]}]}"#,
        )
        .unwrap();

        let pool = JsonFilePool::open(&path).unwrap();
        let all = pool.query(&PoolFilter::default()).unwrap();
        assert_eq!(all[0].kind, Some(GroupKind::TrueFalse));
        assert_eq!(pool.chapters().unwrap()[0].lessons.len(), 1);
    }

    #[test]
    fn missing_pool_file_is_a_pool_error() {
        let err = JsonFilePool::open("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ParikshaError::Pool(_)));
    }
}
