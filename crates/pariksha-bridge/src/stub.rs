// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stubs for installations without a pool or save endpoint.
//
// Every method returns `Unavailable`; the composer keeps working in memory.

use pariksha_core::error::{ParikshaError, Result};
use pariksha_core::model::Document;

use crate::traits::*;

/// Save endpoint that is never configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableSave;

impl SaveEndpoint for UnavailableSave {
    fn save(&self, document_id: &str, _document: &Document) -> Result<()> {
        tracing::warn!(document_id, "SaveEndpoint::save called on stub endpoint");
        Err(ParikshaError::Unavailable("save endpoint"))
    }

    fn load(&self, _document_id: &str) -> Result<Option<Document>> {
        Err(ParikshaError::Unavailable("save endpoint"))
    }
}

/// Pool that is never configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailablePool;

impl PoolQuery for UnavailablePool {
    fn query(&self, _filter: &PoolFilter) -> Result<Vec<Category>> {
        tracing::warn!("PoolQuery::query called on stub pool");
        Err(ParikshaError::Unavailable("question pool"))
    }

    fn chapters(&self) -> Result<Vec<Chapter>> {
        Err(ParikshaError::Unavailable("question pool"))
    }
}
