// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Content fingerprints: SHA-256 over the persisted wire form.

use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::model::Document;

/// Compute the SHA-256 hash of `data` and return it as a lowercase hex string.
pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Fingerprint of a document's persisted form.
///
/// Two documents with the same fingerprint produce byte-identical saves, so
/// the autosave path uses it to skip redundant writes.
pub fn document_fingerprint(document: &Document) -> Result<String> {
    let json = document.to_wire_json()?;
    Ok(hash_bytes(json.as_bytes()))
}
