// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pariksha Compose: merge/toggle engine, direct edits, pool bucketing, and
// the authoring session with autosave and background pagination.

pub mod edit;
pub mod layout;
pub mod merge;
pub mod pool;
pub mod session;

pub use edit::Edit;
pub use layout::{LayoutTiming, LayoutWatcher};
pub use merge::{MergeAction, apply, apply_candidate, target_group_id};
pub use pool::{ChapterBucket, LessonBucket, OTHER_BUCKET, bucket_items};
pub use session::{AuthoringSession, AutosaveTiming, SaveOutcome, SessionStatus};
