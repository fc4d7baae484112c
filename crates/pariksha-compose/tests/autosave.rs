// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Debounced autosave against an in-memory endpoint, on real timers.

use std::sync::Arc;
use std::time::Duration;

use pariksha_bridge::{Category, MemorySaveEndpoint, SaveEndpoint};
use pariksha_compose::{AuthoringSession, Edit};
use pariksha_core::AppConfig;
use pariksha_core::model::{Document, Group, Item, Payload};
use pariksha_core::types::GroupKind;

fn config(quiet_ms: u64, hydration_ms: u64) -> AppConfig {
    AppConfig {
        autosave_quiet_ms: quiet_ms,
        hydration_window_ms: hydration_ms,
        ..AppConfig::default()
    }
}

fn candidate(id: &str, item: &str) -> Category {
    Category::new(id, id, Payload::Flat(vec![Item::new(item, item)])).with_kind(GroupKind::FreeText)
}

#[tokio::test(flavor = "multi_thread")]
async fn burst_of_edits_saves_once() {
    let endpoint = Arc::new(MemorySaveEndpoint::new());
    let session = AuthoringSession::new(endpoint.clone(), &config(50, 0));
    let _autosave = session.spawn_autosave();

    session.toggle(&candidate("a", "q1"));
    session.toggle(&candidate("b", "q2"));
    session
        .edit(&Edit::RenameGroup {
            group: "a".into(),
            name: "Short answers".into(),
        })
        .unwrap();

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(endpoint.save_count(), 1);
    assert_eq!(endpoint.load(&session.document_id()).unwrap(), Some(session.document()));
    assert_eq!(endpoint.document_ids(), vec![session.document_id()]);
    assert!(!session.status().dirty);
}

#[tokio::test(flavor = "multi_thread")]
async fn hydration_does_not_trigger_a_save() {
    let endpoint = Arc::new(MemorySaveEndpoint::new());
    let stored = Document {
        groups: vec![
            Group::new("g", "G", GroupKind::FreeText).with_items(vec![Item::new("q", "why?")]),
        ],
        ..Document::new()
    };
    endpoint.save("paper-7", &stored).unwrap();

    let session = AuthoringSession::new(endpoint.clone(), &config(20, 200));
    let _autosave = session.spawn_autosave();
    assert!(session.open("paper-7").await.unwrap());
    assert!(!session.open("missing").await.unwrap());
    assert_eq!(session.document_id(), "paper-7");

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert_eq!(endpoint.save_count(), 1);

    // Past the window, a real change is saved.
    session.toggle(&candidate("h", "q9"));
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(endpoint.save_count(), 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn edit_inside_hydration_window_is_saved_after_it() {
    let endpoint = Arc::new(MemorySaveEndpoint::new());
    let stored = Document {
        groups: vec![
            Group::new("g", "G", GroupKind::FreeText).with_items(vec![Item::new("q", "why?")]),
        ],
        ..Document::new()
    };
    endpoint.save("paper-8", &stored).unwrap();

    let session = AuthoringSession::new(endpoint.clone(), &config(30, 300));
    let _autosave = session.spawn_autosave();
    assert!(session.open("paper-8").await.unwrap());

    tokio::time::sleep(Duration::from_millis(100)).await;
    session
        .edit(&Edit::RenameGroup {
            group: "g".into(),
            name: "Short answers".into(),
        })
        .unwrap();

    tokio::time::sleep(Duration::from_millis(1000)).await;
    assert_eq!(endpoint.save_count(), 2);
    let saved = endpoint.load("paper-8").unwrap().expect("paper saved");
    assert_eq!(saved.groups[0].display_name, "Short answers");
    assert!(!session.status().dirty);
}

#[tokio::test(flavor = "multi_thread")]
async fn failed_autosave_is_retried_by_the_next_change() {
    let endpoint = Arc::new(MemorySaveEndpoint::new());
    let session = AuthoringSession::new(endpoint.clone(), &config(30, 0));
    let _autosave = session.spawn_autosave();

    endpoint.fail_next(1);
    session.toggle(&candidate("a", "q1"));
    tokio::time::sleep(Duration::from_millis(250)).await;
    let status = session.status();
    assert!(status.last_error.is_some());
    assert!(status.dirty);
    assert_eq!(session.document().leaf_count(), 1);

    session.toggle(&candidate("b", "q2"));
    tokio::time::sleep(Duration::from_millis(250)).await;
    assert_eq!(endpoint.save_count(), 1);
    assert!(session.status().last_error.is_none());
}

#[tokio::test(flavor = "multi_thread")]
async fn autosave_stops_with_the_session() {
    let session = AuthoringSession::new(Arc::new(MemorySaveEndpoint::new()), &config(10, 0));
    let handle = session.spawn_autosave();
    drop(session);
    tokio::time::timeout(Duration::from_secs(1), handle)
        .await
        .expect("autosave task ends")
        .unwrap();
}
