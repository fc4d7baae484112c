// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Saved papers on disk: cloning, fingerprints, and author-facing errors.

use pariksha_core::fingerprint::document_fingerprint;
use pariksha_core::human_errors::{Severity, humanize_error};
use pariksha_core::{AppConfig, Document, ParikshaError, Payload, Script};

const SAVED: &str = r#"[
    {"id":"settings","type":"settings","isRTL":false,"script":"en","secondarySources":[]},
    {"id":"g1","name":"Fractions","type":"stacked-fraction","questions":[
        {"id":"q1","questionText":"5\n3;;2\n[]"}]},
    {"id":"p1","name":"Comprehension","type":"passage-based","passage":"A short story.",
     "questions":[
        {"id":"c1","name":"Questions","type":"single-line","questions":[
            {"id":"q2","questionText":"Who?"},{"id":"q3","questionText":"Where?"}]}]}
]"#;

#[test]
fn cloned_paper_is_identical_to_its_source() {
    let dir = tempfile::tempdir().unwrap();
    let original = Document::from_wire_json(SAVED).unwrap();

    let path = dir.path().join("clone.json");
    std::fs::write(&path, original.to_wire_json_pretty().unwrap()).unwrap();
    let clone = Document::from_wire_json(&std::fs::read_to_string(&path).unwrap()).unwrap();

    assert_eq!(clone, original);
    assert_eq!(
        document_fingerprint(&clone).unwrap(),
        document_fingerprint(&original).unwrap()
    );
    assert!(matches!(clone.group("p1").unwrap().payload, Payload::Nested(ref c) if c.len() == 1));
}

#[test]
fn config_script_seeds_new_papers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pariksha.json");
    let config = AppConfig {
        default_script: Script::Arabic,
        ..AppConfig::default()
    };
    config.save(&path).unwrap();

    let doc = Document::with_script(AppConfig::load(&path).unwrap().default_script);
    assert!(doc.settings.right_to_left);
}

#[test]
fn malformed_papers_map_to_readable_errors() {
    let err = Document::from_wire_json("{not json").unwrap_err();
    assert!(matches!(err, ParikshaError::Serialization(_)));
    let human = humanize_error(&err);
    assert!(!human.message.is_empty());
    assert_eq!(human.severity, Severity::Permanent);

    let dup = r#"[{"id":"a","name":"A","type":"free-text",
                  "questions":[{"id":"q","questionText":"x"}]},
                 {"id":"a","name":"B","type":"free-text","questions":[]}]"#;
    assert!(matches!(
        Document::from_wire_json(dup),
        Err(ParikshaError::DuplicateId(id)) if id == "a"
    ));
}
