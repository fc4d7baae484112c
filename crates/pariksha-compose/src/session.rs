// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Authoring session: owns the active document, applies toggles and edits,
// and autosaves after a quiet interval.
//
// Mutations are synchronous and return immediately. Every change bumps a
// revision published on a `watch` channel; the autosave task debounces on it
// and hands the snapshot to the save endpoint on the blocking pool, since
// endpoints are synchronous.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use pariksha_bridge::{Category, SaveEndpoint};
use pariksha_core::AppConfig;
use pariksha_core::error::{ParikshaError, Result};
use pariksha_core::fingerprint::document_fingerprint;
use pariksha_core::human_errors::{HumanError, humanize_error};
use pariksha_core::model::{Document, SourceCollection};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::edit::Edit;
use crate::merge::{MergeAction, apply_candidate};

/// Autosave timing, taken from [`AppConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutosaveTiming {
    /// No further changes for this long triggers a save.
    pub quiet: Duration,
    /// Edits made this soon after hydration are saved when it has passed.
    pub hydration_window: Duration,
}

impl AutosaveTiming {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            quiet: config.autosave_quiet(),
            hydration_window: config.hydration_window(),
        }
    }
}

/// Result of a save attempt that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    /// Content matches the last successful save.
    Unchanged,
    /// Edited inside the hydration window; the autosave task retries once
    /// the window closes.
    Suppressed,
}

/// Snapshot of the session for the authoring surface.
#[derive(Debug, Clone)]
pub struct SessionStatus {
    pub document_id: String,
    pub revision: u64,
    /// Content differs from the last successful save.
    pub dirty: bool,
    pub last_saved_at: Option<DateTime<Utc>>,
    pub last_error: Option<HumanError>,
    pub active_source: Option<SourceCollection>,
}

struct SessionState {
    document_id: String,
    document: Document,
    revision: u64,
    /// Set only when the document came from storage.
    hydrated_at: Option<Instant>,
    last_saved_fingerprint: Option<String>,
    last_saved_at: Option<DateTime<Utc>>,
    last_error: Option<HumanError>,
    active_source: Option<SourceCollection>,
}

impl SessionState {
    fn fresh(document_id: String, document: Document) -> Self {
        Self {
            document_id,
            document,
            revision: 0,
            hydrated_at: None,
            last_saved_fingerprint: None,
            last_saved_at: None,
            last_error: None,
            active_source: None,
        }
    }

    fn fingerprint(&self) -> Result<String> {
        document_fingerprint(&self.document)
    }
}

/// What the save task writes.
struct Snapshot {
    document_id: String,
    document: Document,
    fingerprint: String,
}

/// A single author's working session.
///
/// Cheap to clone; clones share the same state. The autosave task stops once
/// every clone has been dropped.
#[derive(Clone)]
pub struct AuthoringSession {
    state: Arc<Mutex<SessionState>>,
    endpoint: Arc<dyn SaveEndpoint>,
    changes: Arc<watch::Sender<u64>>,
    timing: AutosaveTiming,
}

impl AuthoringSession {
    /// Start a session on a new, empty, unsaved document.
    pub fn new(endpoint: Arc<dyn SaveEndpoint>, config: &AppConfig) -> Self {
        let document = Document::with_script(config.default_script);
        let state = SessionState::fresh(Uuid::new_v4().to_string(), document);
        let (changes, _) = watch::channel(0);
        info!(document_id = %state.document_id, "authoring session started");
        Self {
            state: Arc::new(Mutex::new(state)),
            endpoint,
            changes: Arc::new(changes),
            timing: AutosaveTiming::from_config(config),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, SessionState> {
        self.state.lock().expect("session lock poisoned")
    }

    /// Publish a new revision to the autosave task and layout watchers.
    fn notify(&self, revision: u64) {
        self.changes.send_replace(revision);
    }

    // -- Lifecycle -----------------------------------------------------------

    /// Make `document` the active document, as loaded from storage.
    ///
    /// Its content becomes the saved baseline and autosave stays quiet for
    /// the hydration window, so loading never triggers a save by itself.
    #[instrument(skip(self, document), fields(groups = document.groups.len()))]
    pub fn hydrate(&self, document_id: &str, document: Document) -> Result<()> {
        document.validate()?;
        let fingerprint = document_fingerprint(&document)?;
        let revision = {
            let mut state = self.lock();
            let revision = state.revision + 1;
            *state = SessionState {
                revision,
                hydrated_at: Some(Instant::now()),
                last_saved_fingerprint: Some(fingerprint),
                ..SessionState::fresh(document_id.to_owned(), document)
            };
            revision
        };
        info!("document hydrated");
        self.notify(revision);
        Ok(())
    }

    /// Load a document from the endpoint and hydrate it. Returns `false`
    /// when the endpoint has no such document.
    pub async fn open(&self, document_id: &str) -> Result<bool> {
        let endpoint = Arc::clone(&self.endpoint);
        let id = document_id.to_owned();
        let loaded = tokio::task::spawn_blocking(move || endpoint.load(&id))
            .await
            .map_err(|e| ParikshaError::Save {
                document_id: document_id.to_owned(),
                detail: e.to_string(),
            })??;
        match loaded {
            Some(document) => self.hydrate(document_id, document).map(|()| true),
            None => Ok(false),
        }
    }

    /// Copy the active content into a new, unsaved document and make it
    /// active. Returns the new id.
    pub fn fork(&self) -> String {
        let (document_id, revision) = {
            let mut state = self.lock();
            let document = state.document.clone();
            let revision = state.revision + 1;
            let active_source = state.active_source.take();
            *state = SessionState {
                revision,
                active_source,
                ..SessionState::fresh(Uuid::new_v4().to_string(), document)
            };
            (state.document_id.clone(), revision)
        };
        info!(%document_id, "document forked");
        self.notify(revision);
        document_id
    }

    // -- Mutation ------------------------------------------------------------

    /// Apply a pool category through the merge/toggle engine, under the
    /// active source if one is selected.
    pub fn toggle(&self, candidate: &Category) -> MergeAction {
        let (action, revision) = {
            let mut state = self.lock();
            let (document, action) =
                apply_candidate(&state.document, candidate, state.active_source.as_ref());
            if action == MergeAction::Noop {
                return action;
            }
            state.document = document;
            state.revision += 1;
            (action, state.revision)
        };
        self.notify(revision);
        action
    }

    /// Apply a direct edit. A rejected edit leaves the document untouched.
    pub fn edit(&self, edit: &Edit) -> Result<()> {
        let revision = {
            let mut state = self.lock();
            state.document = edit.apply(&state.document)?;
            state.revision += 1;
            state.revision
        };
        debug!(?edit, revision, "edit applied");
        self.notify(revision);
        Ok(())
    }

    /// Select the secondary source new candidates are drawn from, or `None`
    /// for the primary pool. A new source is recorded in the document
    /// settings.
    pub fn set_active_source(&self, source: Option<SourceCollection>) {
        let revision = {
            let mut state = self.lock();
            let mut changed = false;
            if let Some(source) = &source {
                let sources = &state.document.settings.secondary_sources;
                if !sources.iter().any(|s| s.id == source.id) {
                    state.document.settings.secondary_sources.push(source.clone());
                    state.revision += 1;
                    changed = true;
                }
            }
            state.active_source = source;
            changed.then_some(state.revision)
        };
        if let Some(revision) = revision {
            self.notify(revision);
        }
    }

    // -- Queries -------------------------------------------------------------

    pub fn document(&self) -> Document {
        self.lock().document.clone()
    }

    pub fn document_id(&self) -> String {
        self.lock().document_id.clone()
    }

    pub fn status(&self) -> SessionStatus {
        let state = self.lock();
        let dirty = match (&state.last_saved_fingerprint, state.fingerprint()) {
            (Some(saved), Ok(current)) => *saved != current,
            _ => true,
        };
        SessionStatus {
            document_id: state.document_id.clone(),
            revision: state.revision,
            dirty,
            last_saved_at: state.last_saved_at,
            last_error: state.last_error.clone(),
            active_source: state.active_source.clone(),
        }
    }

    /// Revision stream; changes on every mutation and hydration.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }

    /// Current document, readable from a background task without holding a
    /// session clone.
    pub(crate) fn document_source(&self) -> impl Fn() -> Document + Send + Sync + 'static {
        let state = Arc::downgrade(&self.state);
        move || {
            state
                .upgrade()
                .map(|state| state.lock().expect("session lock poisoned").document.clone())
                .unwrap_or_default()
        }
    }

    // -- Saving --------------------------------------------------------------

    /// Save the active document now, regardless of the quiet interval or the
    /// hydration window.
    pub async fn save_now(&self) -> Result<SaveOutcome> {
        let snapshot = snapshot(&self.state)?;
        save_snapshot(Arc::clone(&self.state), Arc::clone(&self.endpoint), snapshot).await
    }

    /// Start the background autosave task.
    pub fn spawn_autosave(&self) -> JoinHandle<()> {
        let state = Arc::clone(&self.state);
        let endpoint = Arc::clone(&self.endpoint);
        let mut changes = self.changes.subscribe();
        let timing = self.timing;

        tokio::spawn(async move {
            info!(quiet_ms = timing.quiet.as_millis() as u64, "autosave started");
            loop {
                if changes.changed().await.is_err() {
                    break;
                }
                let mut closed = settle(&mut changes, timing.quiet).await;

                loop {
                    match autosave(&state, &endpoint, timing).await {
                        Ok(SaveOutcome::Suppressed) => {
                            let remaining = hydration_remaining(&state, timing);
                            debug!(
                                remaining_ms = remaining.as_millis() as u64,
                                "edit inside hydration window, autosave deferred"
                            );
                            if closed {
                                tokio::time::sleep(remaining).await;
                            } else {
                                match tokio::time::timeout(remaining, changes.changed()).await {
                                    Ok(Ok(())) => closed = settle(&mut changes, timing.quiet).await,
                                    Ok(Err(_)) => closed = true,
                                    Err(_) => {}
                                }
                            }
                            continue;
                        }
                        Ok(outcome) => debug!(?outcome, "autosave pass"),
                        Err(e) => warn!(error = %e, "autosave failed"),
                    }
                    break;
                }
                if closed {
                    break;
                }
            }
            info!("autosave stopped");
        })
    }
}

/// Wait until no change has arrived for `quiet`. Returns `true` once the
/// session is gone.
async fn settle(changes: &mut watch::Receiver<u64>, quiet: Duration) -> bool {
    loop {
        match tokio::time::timeout(quiet, changes.changed()).await {
            Ok(Ok(())) => continue,
            Ok(Err(_)) => return true,
            Err(_) => return false,
        }
    }
}

fn hydration_remaining(state: &Mutex<SessionState>, timing: AutosaveTiming) -> Duration {
    state
        .lock()
        .expect("session lock poisoned")
        .hydrated_at
        .map(|at| timing.hydration_window.saturating_sub(at.elapsed()))
        .unwrap_or_default()
}

fn snapshot(state: &Mutex<SessionState>) -> Result<Snapshot> {
    let state = state.lock().expect("session lock poisoned");
    Ok(Snapshot {
        document_id: state.document_id.clone(),
        document: state.document.clone(),
        fingerprint: state.fingerprint()?,
    })
}

async fn autosave(
    state: &Arc<Mutex<SessionState>>,
    endpoint: &Arc<dyn SaveEndpoint>,
    timing: AutosaveTiming,
) -> Result<SaveOutcome> {
    let snapshot = {
        let guard = state.lock().expect("session lock poisoned");
        let fingerprint = guard.fingerprint()?;
        // A freshly hydrated document is its own baseline.
        if guard.last_saved_fingerprint.as_deref() == Some(fingerprint.as_str()) {
            return Ok(SaveOutcome::Unchanged);
        }
        if guard.hydrated_at.is_some_and(|at| at.elapsed() < timing.hydration_window) {
            return Ok(SaveOutcome::Suppressed);
        }
        Snapshot {
            document_id: guard.document_id.clone(),
            document: guard.document.clone(),
            fingerprint,
        }
    };
    save_snapshot(Arc::clone(state), Arc::clone(endpoint), snapshot).await
}

/// Hand a snapshot to the endpoint on the blocking pool and record the
/// outcome. A snapshot whose document is no longer active is discarded.
async fn save_snapshot(
    state: Arc<Mutex<SessionState>>,
    endpoint: Arc<dyn SaveEndpoint>,
    snapshot: Snapshot,
) -> Result<SaveOutcome> {
    let target = snapshot.document_id.clone();
    let blocking_state = Arc::clone(&state);
    let document = snapshot.document;
    let id = target.clone();

    let result = tokio::task::spawn_blocking(move || {
        let active = blocking_state
            .lock()
            .expect("session lock poisoned")
            .document_id
            .clone();
        if active != id {
            return Err(ParikshaError::StaleSave { target: id, active });
        }
        endpoint.save(&id, &document)
    })
    .await
    .map_err(|e| ParikshaError::Save {
        document_id: target.clone(),
        detail: e.to_string(),
    })
    .and_then(|r| r);

    let mut state = state.lock().expect("session lock poisoned");
    match result {
        Ok(()) => {
            if state.document_id == target {
                state.last_saved_fingerprint = Some(snapshot.fingerprint);
                state.last_saved_at = Some(Utc::now());
                state.last_error = None;
            }
            info!(document_id = %target, "document saved");
            Ok(SaveOutcome::Saved)
        }
        Err(e @ ParikshaError::StaleSave { .. }) => {
            warn!(error = %e, "stale save discarded");
            Err(e)
        }
        Err(e) => {
            error!(document_id = %target, error = %e, "save failed, document kept in memory");
            if state.document_id == target {
                state.last_error = Some(humanize_error(&e));
            }
            Err(e)
        }
    }
}
