// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Save endpoints: in-memory (tests, embedding) and one JSON file per document.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError};

use pariksha_core::error::{ParikshaError, Result};
use pariksha_core::model::Document;
use tracing::{debug, info, instrument, warn};

use crate::traits::SaveEndpoint;

/// Keeps the wire JSON of every saved document in memory.
#[derive(Debug, Default)]
pub struct MemorySaveEndpoint {
    saved: Mutex<HashMap<String, String>>,
    saves: AtomicUsize,
    fail_next: AtomicUsize,
}

impl MemorySaveEndpoint {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `count` saves fail, as a flaky network would.
    pub fn fail_next(&self, count: usize) {
        self.fail_next.store(count, Ordering::SeqCst);
    }

    /// Successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    pub fn saved_json(&self, document_id: &str) -> Option<String> {
        self.saved
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(document_id)
            .cloned()
    }

    pub fn document_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self
            .saved
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        ids.sort();
        ids
    }
}

impl SaveEndpoint for MemorySaveEndpoint {
    fn save(&self, document_id: &str, document: &Document) -> Result<()> {
        let failing = self
            .fail_next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            warn!(document_id, "simulated save failure");
            return Err(ParikshaError::Save {
                document_id: document_id.to_owned(),
                detail: "endpoint unavailable".into(),
            });
        }

        let json = document.to_wire_json()?;
        self.saved
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(document_id.to_owned(), json);
        self.saves.fetch_add(1, Ordering::SeqCst);
        debug!(document_id, "saved in memory");
        Ok(())
    }

    fn load(&self, document_id: &str) -> Result<Option<Document>> {
        self.saved_json(document_id)
            .map(|json| Document::from_wire_json(&json))
            .transpose()
    }
}

/// One `<document-id>.json` file per document under a directory.
#[derive(Debug, Clone)]
pub struct DirSaveEndpoint {
    dir: PathBuf,
}

impl DirSaveEndpoint {
    /// Create the directory if needed.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// File path for a document id. Ids that could escape the directory are
    /// rejected.
    pub fn path_for(&self, document_id: &str) -> Result<PathBuf> {
        let unsafe_id = document_id.is_empty()
            || document_id.starts_with('.')
            || document_id.contains(['/', '\\', '\0']);
        if unsafe_id {
            return Err(ParikshaError::Save {
                document_id: document_id.to_owned(),
                detail: "document id is not a valid file name".into(),
            });
        }
        Ok(self.dir.join(format!("{document_id}.json")))
    }
}

impl SaveEndpoint for DirSaveEndpoint {
    #[instrument(skip(self, document), fields(groups = document.groups.len()))]
    fn save(&self, document_id: &str, document: &Document) -> Result<()> {
        let path = self.path_for(document_id)?;
        let json = document.to_wire_json_pretty()?;

        // Write beside the target, then rename over it.
        let staging = path.with_extension("json.tmp");
        let write = std::fs::write(&staging, json).and_then(|()| std::fs::rename(&staging, &path));
        write.map_err(|e| ParikshaError::Save {
            document_id: document_id.to_owned(),
            detail: e.to_string(),
        })?;

        info!(path = %path.display(), "document saved");
        Ok(())
    }

    fn load(&self, document_id: &str) -> Result<Option<Document>> {
        let path = self.path_for(document_id)?;
        if !path.exists() {
            return Ok(None);
        }
        let json = std::fs::read_to_string(&path)?;
        Document::from_wire_json(&json).map(Some)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pariksha_core::model::{Group, Item};
    use pariksha_core::types::GroupKind;

    fn doc() -> Document {
        Document {
            groups: vec![
                Group::new("g", "G", GroupKind::FreeText).with_items(vec![Item::new("q", "Why?")]),
            ],
            ..Document::new()
        }
    }

    #[test]
    fn memory_endpoint_round_trip_and_failures() {
        let endpoint = MemorySaveEndpoint::new();
        endpoint.fail_next(1);
        assert!(matches!(endpoint.save("d1", &doc()), Err(ParikshaError::Save { .. })));
        assert_eq!(endpoint.save_count(), 0);

        endpoint.save("d1", &doc()).unwrap();
        assert_eq!(endpoint.save_count(), 1);
        assert_eq!(endpoint.load("d1").unwrap(), Some(doc()));
        assert_eq!(endpoint.load("d2").unwrap(), None);
    }

    #[test]
    fn dir_endpoint_last_write_wins() {
        let dir = tempfile::tempdir().unwrap();
        let endpoint = DirSaveEndpoint::open(dir.path().join("papers")).unwrap();

        endpoint.save("paper-1", &Document::new()).unwrap();
        endpoint.save("paper-1", &doc()).unwrap();

        assert_eq!(endpoint.load("paper-1").unwrap(), Some(doc()));
        assert!(dir.path().join("papers/paper-1.json").exists());
        assert!(!dir.path().join("papers/paper-1.json.tmp").exists());
    }

    #[test]
    fn dir_endpoint_rejects_path_like_ids() {
        let dir = tempfile::tempdir().unwrap();
        let endpoint = DirSaveEndpoint::open(dir.path()).unwrap();
        assert!(endpoint.save("../escape", &doc()).is_err());
        assert!(endpoint.path_for("").is_err());
        assert!(endpoint.path_for("ok-id").is_ok());
    }
}
