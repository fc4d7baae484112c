// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Persisted document shape: a JSON array of group objects, optionally
// containing one `settings` pseudo-group.
//
// On load the settings entry is lifted onto `Document::settings`; on save it
// is written back as the first array element so older readers keep working.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::error::{ParikshaError, Result};
use crate::model::{Document, DocumentSettings, Group, SourceCollection};
use crate::types::Script;

/// `type` tag of the settings pseudo-group.
pub const SETTINGS_KIND: &str = "settings";

/// Id given to the settings pseudo-group when it is written out.
pub const SETTINGS_ID: &str = "settings";

/// Settings pseudo-group as it appears inside the persisted array.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsRecord {
    #[serde(default = "settings_id")]
    id: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    name: String,
    #[serde(rename = "isRTL", default)]
    is_rtl: bool,
    #[serde(default)]
    script: Script,
    #[serde(default)]
    secondary_sources: Vec<SourceCollection>,
}

fn settings_id() -> String {
    SETTINGS_ID.to_owned()
}

impl From<SettingsRecord> for DocumentSettings {
    fn from(record: SettingsRecord) -> Self {
        Self {
            right_to_left: record.is_rtl,
            script: record.script,
            secondary_sources: record.secondary_sources,
        }
    }
}

impl From<&DocumentSettings> for SettingsRecord {
    fn from(settings: &DocumentSettings) -> Self {
        Self {
            id: settings_id(),
            kind: SETTINGS_KIND.to_owned(),
            name: "Settings".to_owned(),
            is_rtl: settings.right_to_left,
            script: settings.script,
            secondary_sources: settings.secondary_sources.clone(),
        }
    }
}

fn is_settings_entry(value: &Value) -> bool {
    value.get("type").and_then(Value::as_str) == Some(SETTINGS_KIND)
}

impl Document {
    /// Build a document from the persisted array, migrating the legacy
    /// settings pseudo-group and normalising empty payloads.
    #[instrument(skip_all, fields(entries = entries.len()))]
    pub fn from_wire(entries: Vec<Value>) -> Result<Self> {
        let mut settings: Option<DocumentSettings> = None;
        let mut groups = Vec::with_capacity(entries.len());

        for entry in entries {
            if is_settings_entry(&entry) {
                if settings.is_some() {
                    return Err(ParikshaError::DuplicateSettings);
                }
                let record: SettingsRecord = serde_json::from_value(entry)?;
                settings = Some(record.into());
                continue;
            }
            let mut group: Group = serde_json::from_value(entry)?;
            group.normalize_payload()?;
            groups.push(group);
        }

        let document = Self {
            settings: settings.unwrap_or_default(),
            groups,
        };
        document.validate()?;

        debug!(
            groups = document.groups.len(),
            leaves = document.leaf_count(),
            "document hydrated from wire format"
        );
        Ok(document)
    }

    /// Parse the persisted JSON text.
    pub fn from_wire_json(json: &str) -> Result<Self> {
        let entries: Vec<Value> = serde_json::from_str(json)?;
        Self::from_wire(entries)
    }

    /// Persisted array form: settings first, then every group in order.
    pub fn to_wire(&self) -> Result<Vec<Value>> {
        let mut entries = Vec::with_capacity(self.groups.len() + 1);
        entries.push(serde_json::to_value(SettingsRecord::from(&self.settings))?);
        for group in &self.groups {
            entries.push(serde_json::to_value(group)?);
        }
        Ok(entries)
    }

    pub fn to_wire_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_wire()?)?)
    }

    pub fn to_wire_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_wire()?)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GroupKind, QuantityMode, QuantitySelector};
    use crate::{Item, Payload};

    const LEGACY: &str = r#"[
        {"id":"g1","name":"Short answers","type":"single-line","numberingStyle":"bn-num-dot",
         "quantityMode":"custom_bn","quantitySelector":"5","mark":"2","isRTL":false,
         "questions":[{"id":"q1","questionText":"প্রশ্ন এক"},
                      {"id":"q2","questionText":"প্রশ্ন দুই"}]},
        {"id":"settings","type":"settings","isRTL":true,"script":"ar",
         "secondarySources":[{"id":"src-9","name":"Board 2023"}]},
        {"id":"brk","name":"Board 2023","type":"section-break","questions":[]},
        {"id":"p1","name":"Read the passage","type":"passage-based","questions":[]}
    ]"#;

    #[test]
    fn settings_group_is_lifted_onto_document() {
        let doc = Document::from_wire_json(LEGACY).unwrap();
        assert!(doc.settings.right_to_left);
        assert_eq!(doc.settings.script, Script::Arabic);
        assert_eq!(doc.settings.secondary_sources.len(), 1);
        assert_eq!(doc.groups.len(), 3);
        assert!(doc.groups.iter().all(|g| g.id != SETTINGS_ID));
    }

    #[test]
    fn group_fields_survive_loading() {
        let doc = Document::from_wire_json(LEGACY).unwrap();
        let g1 = doc.group("g1").unwrap();
        assert_eq!(g1.kind, GroupKind::SingleLine);
        assert_eq!(g1.quantity_mode, Some(QuantityMode::Custom(Script::Bengali)));
        assert_eq!(g1.quantity_selector, Some(QuantitySelector::Count(5)));
        assert_eq!(g1.mark_per_item.as_deref(), Some("2"));
        assert_eq!(g1.leaf_count(), 2);

        assert_eq!(doc.group("brk").unwrap().payload, Payload::Empty);
        assert_eq!(doc.group("p1").unwrap().payload, Payload::Nested(Vec::new()));
    }

    #[test]
    fn wire_output_puts_settings_first_and_reloads() {
        let doc = Document::from_wire_json(LEGACY).unwrap();
        let wire = doc.to_wire().unwrap();
        assert_eq!(wire[0]["type"], SETTINGS_KIND);
        assert_eq!(wire.len(), 4);

        let reloaded = Document::from_wire(wire).unwrap();
        assert_eq!(reloaded, doc);
    }

    #[test]
    fn second_settings_group_is_rejected() {
        let json = r#"[{"type":"settings"},{"type":"settings","isRTL":true}]"#;
        assert!(matches!(
            Document::from_wire_json(json),
            Err(ParikshaError::DuplicateSettings)
        ));
    }

    #[test]
    fn missing_settings_gives_defaults() {
        let json = r#"[{"id":"g","name":"G","type":"free-text","questions":[]}]"#;
        let doc = Document::from_wire_json(json).unwrap();
        assert_eq!(doc.settings, DocumentSettings::default());
        assert_eq!(doc.groups[0].payload, Payload::Flat(Vec::new()));
    }

    #[test]
    fn duplicate_item_ids_fail_validation() {
        let mut doc = Document::new();
        doc.groups.push(
            Group::new("a", "A", GroupKind::FreeText).with_items(vec![Item::new("q", "q")]),
        );
        doc.groups.push(
            Group::new("b", "B", GroupKind::FreeText).with_items(vec![Item::new("q", "q")]),
        );
        let wire = doc.to_wire().unwrap();
        assert!(matches!(
            Document::from_wire(wire),
            Err(ParikshaError::DuplicateId(_))
        ));
    }
}
