// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Global application state — a render snapshot of the job controller, held
// in a Dioxus signal and only ever replaced on the UI context.

use labelcount_core::{Job, WorkerStatus};
use labelcount_print::JobController;

/// Shared state accessible to all components via `use_context`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    /// The running job, if any.
    pub current: Option<Job>,
    /// Whether the running job is paused.
    pub paused: bool,
    /// Whether the worker has stopped on its own (media out or connection
    /// error) and the job is waiting to be finished.
    pub worker_stopped: bool,
    /// Last status reported by the worker.
    pub status: WorkerStatus,
    /// Finished and canceled jobs, oldest first.
    pub history: Vec<Job>,
}

impl AppState {
    pub fn from_controller(controller: &JobController) -> Self {
        Self {
            current: controller.current_job().cloned(),
            paused: controller.is_paused(),
            worker_stopped: controller.worker_finished(),
            status: controller.status(),
            history: controller.history().jobs().to_vec(),
        }
    }

    pub fn is_running(&self) -> bool {
        self.current.is_some()
    }
}
