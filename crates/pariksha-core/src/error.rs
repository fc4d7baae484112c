// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Pariksha.

use thiserror::Error;

/// Top-level error type for all Pariksha operations.
#[derive(Debug, Error)]
pub enum ParikshaError {
    // -- Document model --
    #[error("no group with id `{0}`")]
    UnknownGroup(String),

    #[error("no context `{context}` in group `{group}`")]
    UnknownContext { group: String, context: String },

    #[error("no item with id `{0}`")]
    UnknownItem(String),

    #[error("duplicate id `{0}` in document")]
    DuplicateId(String),

    #[error("group `{group}` payload shape violated: {detail}")]
    PayloadShape { group: String, detail: String },

    #[error("more than one settings group in persisted document")]
    DuplicateSettings,

    #[error("position {index} out of range (len {len})")]
    OutOfRange { index: usize, len: usize },

    // -- Edits --
    #[error("invalid mark value `{0}`: expected a non-negative number")]
    InvalidMark(String),

    #[error("invalid quantity selector `{0}`: expected `All` or a positive integer")]
    InvalidSelector(String),

    #[error("invalid quantity mode `{0}`")]
    InvalidQuantityMode(String),

    #[error("invalid numbering style `{0}`")]
    InvalidNumberingStyle(String),

    // -- Fraction editing --
    #[error("numeric token {index} out of range ({count} tokens)")]
    TokenOutOfRange { index: usize, count: usize },

    #[error("replacement `{0}` is not a numeral")]
    InvalidNumeral(String),

    // -- External collaborators --
    #[error("save failed for document `{document_id}`: {detail}")]
    Save { document_id: String, detail: String },

    #[error("save for `{target}` discarded: active document is `{active}`")]
    StaleSave { target: String, active: String },

    #[error("pool query failed: {0}")]
    Pool(String),

    #[error("print sink failed: {0}")]
    Sink(String),

    #[error("capability not available: {0}")]
    Unavailable(&'static str),

    // -- Storage / serialisation --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, ParikshaError>;
