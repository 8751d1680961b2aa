// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;

/// Default raw TCP port (JetDirect).
pub const RAW_PORT: u16 = 9100;

/// Persistent counter settings.
///
/// Every field has a default, so a partial `config.json` only overrides what
/// it names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterConfig {
    /// Hostname or IP address of the label printer.
    pub printer_host: String,
    /// Raw print port (default 9100).
    pub raw_port: u16,
    /// Path of the embedded web status page.
    pub status_path: String,
    /// Text the status page shows while the print head is open.
    pub head_open_marker: String,
    /// Text the status page shows once the printer is out of media.
    pub media_out_marker: String,
    /// Timeout for the head-closed status request.
    pub head_check_timeout_ms: u64,
    /// Timeout for the media-out status request.
    pub media_check_timeout_ms: u64,
    /// Timeout for connecting to and writing on the raw port.
    pub raw_timeout_ms: u64,
    /// Delay between feed ticks.
    pub tick_interval_ms: u64,
    /// Delay between pause-flag checks while paused.
    pub pause_poll_ms: u64,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            printer_host: "10.10.10.221".into(),
            raw_port: RAW_PORT,
            status_path: "/index.html".into(),
            head_open_marker: "Fehler: DRUCKKOPF OFFEN".into(),
            media_out_marker: "Fehler: KEIN PAPIER".into(),
            head_check_timeout_ms: 5_000,
            media_check_timeout_ms: 2_000,
            raw_timeout_ms: 5_000,
            tick_interval_ms: 500,
            pause_poll_ms: 100,
        }
    }
}

impl CounterConfig {
    /// Full URL of the printer's status page.
    pub fn status_url(&self) -> String {
        format!("http://{}{}", self.printer_host, self.status_path)
    }

    pub fn head_check_timeout(&self) -> Duration {
        Duration::from_millis(self.head_check_timeout_ms)
    }

    pub fn media_check_timeout(&self) -> Duration {
        Duration::from_millis(self.media_check_timeout_ms)
    }

    pub fn raw_timeout(&self) -> Duration {
        Duration::from_millis(self.raw_timeout_ms)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn pause_poll(&self) -> Duration {
        Duration::from_millis(self.pause_poll_ms)
    }

    /// Load a config file, returning `None` if it is missing or unreadable.
    pub fn load(path: &Path) -> Option<Self> {
        let data = std::fs::read_to_string(path).ok()?;
        match serde_json::from_str(&data) {
            Ok(config) => {
                debug!(path = %path.display(), "config loaded");
                Some(config)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring malformed config");
                None
            }
        }
    }

    /// Write the config as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
