// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pariksha Bridge: capability traits for the question pool and the save
// endpoint, with in-memory, file-backed and unavailable implementations.

pub mod pool;
pub mod save;
pub mod stub;
pub mod traits;

pub use pool::{JsonFilePool, MemoryPool};
pub use save::{DirSaveEndpoint, MemorySaveEndpoint};
pub use stub::{UnavailablePool, UnavailableSave};
pub use traits::{Category, Chapter, Lesson, PoolFilter, PoolQuery, SaveEndpoint};
