// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Job history — an append-only list of finished and canceled jobs, stored as
// a pretty-printed JSON array and rewritten in full on every save.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;
use crate::types::Job;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History {
    jobs: Vec<Job>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load history from disk.
    ///
    /// A missing or corrupt file yields an empty history; the problem is
    /// logged and never reported to the operator.
    pub fn load(path: &Path) -> Self {
        let data = match std::fs::read_to_string(path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::new(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read history");
                return Self::new();
            }
        };

        match serde_json::from_str::<Self>(&data) {
            Ok(history) => {
                info!(path = %path.display(), jobs = history.len(), "history loaded");
                history
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "history file is corrupt, starting empty");
                Self::new()
            }
        }
    }

    /// Rewrite the whole history file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn push(&mut self, job: Job) {
        self.jobs.push(job);
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finished(name: &str, count: u64) -> Job {
        let mut job = Job::new(name);
        job.count = count;
        job.close();
        job
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let history = History::load(&dir.path().join("history.json"));
        assert!(history.is_empty());
    }

    #[test]
    fn corrupt_file_is_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("history.json");
        std::fs::write(&path, "[{ broken").expect("write");
        assert!(History::load(&path).is_empty());
    }

    #[test]
    fn save_writes_pretty_json_array() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("history.json");

        let mut history = History::new();
        history.push(finished("A", 10));
        history.save(&path).expect("save");

        let text = std::fs::read_to_string(&path).expect("read");
        assert!(text.starts_with("[\n"));
        assert!(text.contains("\"name\": \"A\""));
    }

    #[test]
    fn save_keeps_append_order() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("history.json");

        let mut history = History::new();
        history.push(finished("first", 1));
        history.push(finished("second", 2));
        history.save(&path).expect("save");

        let loaded = History::load(&path);
        assert_eq!(loaded, history);
        assert_eq!(loaded.jobs()[0].name, "first");
        assert_eq!(loaded.jobs()[1].name, "second");
    }

    #[test]
    fn save_into_missing_directory_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nope").join("history.json");
        assert!(History::new().save(&path).is_err());
    }
}
