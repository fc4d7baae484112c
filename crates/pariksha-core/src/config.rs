// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::Result;
use crate::types::{PageSetup, Script};

/// Persistent application settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Physical page used by both the measurer and the print sink.
    pub page: PageSetup,
    /// Script given to newly created documents.
    pub default_script: Script,
    /// Quiet interval after the last mutation before an autosave is issued.
    pub autosave_quiet_ms: u64,
    /// Autosave is suppressed for this long after a document is hydrated.
    pub hydration_window_ms: u64,
    /// Delay between a layout pass and measuring block heights.
    pub layout_settle_ms: u64,
    /// Debounce applied to host width changes before re-paginating.
    pub resize_debounce_ms: u64,
    /// Directory used by the file-backed save endpoint.
    pub save_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            page: PageSetup::default(),
            default_script: Script::English,
            autosave_quiet_ms: 1000,
            hydration_window_ms: 1500,
            layout_settle_ms: 150,
            resize_debounce_ms: 200,
            save_dir: PathBuf::from("papers"),
        }
    }
}

impl AppConfig {
    /// Load from a JSON file, falling back to defaults when it does not exist.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&data)?;
        info!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }

    pub fn autosave_quiet(&self) -> Duration {
        Duration::from_millis(self.autosave_quiet_ms)
    }

    pub fn hydration_window(&self) -> Duration {
        Duration::from_millis(self.hydration_window_ms)
    }

    pub fn layout_settle(&self) -> Duration {
        Duration::from_millis(self.layout_settle_ms)
    }

    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }
}
