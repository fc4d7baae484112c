// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pariksha Core: document model, wire format, and error definitions shared
// across all crates.

pub mod config;
pub mod error;
pub mod fingerprint;
pub mod human_errors;
pub mod model;
pub mod types;
pub mod wire;

pub use config::AppConfig;
pub use error::ParikshaError;
pub use model::*;
pub use types::*;
