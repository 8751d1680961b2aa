// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Job controller — the current job, its feed worker, and the job history.
//
// The controller lives on the foreground. Worker events reach it through
// `apply`, so job state is only ever written from one context. At most one
// worker exists at a time; each started job gets a new session number and
// events tagged with any other session are dropped.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use labelcount_core::error::{LabelCountError, Result};
use labelcount_core::{CounterConfig, EventKind, History, Job, WorkerEvent, WorkerStatus};

use crate::status::PrinterStatus;
use crate::worker::{EventSink, FeedWorker, WorkerHandle};

struct ActiveJob {
    job: Job,
    worker: WorkerHandle,
}

pub struct JobController {
    config: CounterConfig,
    status: Arc<dyn PrinterStatus>,
    sink: Arc<dyn EventSink>,
    history: History,
    history_path: PathBuf,
    active: Option<ActiveJob>,
    status_line: WorkerStatus,
    next_session: u64,
}

impl JobController {
    /// Create a controller and load the history stored at `history_path`.
    pub fn new(
        config: CounterConfig,
        status: Arc<dyn PrinterStatus>,
        sink: Arc<dyn EventSink>,
        history_path: impl Into<PathBuf>,
    ) -> Self {
        let history_path = history_path.into();
        let history = History::load(&history_path);
        Self {
            config,
            status,
            sink,
            history,
            history_path,
            active: None,
            status_line: WorkerStatus::Clear,
            next_session: 0,
        }
    }

    /// Start counting a new job.
    ///
    /// Refuses blank names and a second concurrent job. The print head is
    /// checked once before the worker is launched; an open head or an
    /// unreachable status page leaves no job behind.
    pub async fn start_job(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(LabelCountError::InvalidJobName);
        }
        if self.active.is_some() {
            return Err(LabelCountError::JobAlreadyActive);
        }

        match self.status.is_head_closed().await {
            Ok(true) => {}
            Ok(false) => {
                warn!(job = name, "print head open, job not started");
                self.status_line = WorkerStatus::HeadOpen;
                return Err(LabelCountError::HeadOpen);
            }
            Err(e) => {
                error!(job = name, error = %e, "printer status unavailable, job not started");
                self.status_line = WorkerStatus::ConnectionError;
                return Err(e);
            }
        }

        self.next_session += 1;
        let session = self.next_session;
        let job = Job::new(name);
        let worker = FeedWorker::new(
            self.config.clone(),
            Arc::clone(&self.status),
            Arc::clone(&self.sink),
            session,
        )
        .spawn();

        info!(job = %job.name, session, "job started");
        self.status_line = WorkerStatus::Clear;
        self.active = Some(ActiveJob { job, worker });
        Ok(())
    }

    /// Apply one worker event. Returns `false` if it was dropped.
    pub fn apply(&mut self, event: WorkerEvent) -> bool {
        let current = self.active.as_ref().map(|a| a.worker.session());
        if current != Some(event.session) {
            debug!(session = event.session, ?current, "dropping event from another session");
            return false;
        }

        match event.kind {
            EventKind::Count(n) => self.update_count(n),
            EventKind::Status(status) => self.status_line = status,
        }
        true
    }

    /// Set the current job's count. Steps other than +1 are logged but
    /// accepted.
    pub fn update_count(&mut self, count: u64) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        if count != active.job.count + 1 {
            warn!(
                job = %active.job.name,
                previous = active.job.count,
                count,
                "label count did not advance by one"
            );
        }
        active.job.count = count;
    }

    pub fn pause(&self) {
        if let Some(active) = &self.active {
            active.worker.pause();
            info!(job = %active.job.name, "job paused");
        }
    }

    pub fn resume(&self) {
        if let Some(active) = &self.active {
            active.worker.resume();
            info!(job = %active.job.name, "job resumed");
        }
    }

    /// Flip pause/resume. Returns whether the job is now paused.
    pub fn toggle_pause(&self) -> bool {
        if self.is_paused() {
            self.resume();
        } else {
            self.pause();
        }
        self.is_paused()
    }

    /// Stop the worker, stamp the end time and append the job to the history.
    ///
    /// Waits for the worker to exit, which can take up to one status-page
    /// timeout. A history write failure is logged and otherwise ignored.
    pub async fn finish_job(&mut self) -> Option<Job> {
        let ActiveJob { mut job, worker } = self.active.take()?;

        // The worker's own total also covers count events still queued for
        // the foreground.
        match worker.stop_and_join().await {
            Some(final_count) if final_count != job.count => {
                debug!(job = %job.name, applied = job.count, final_count, "taking worker total");
                job.count = final_count;
            }
            _ => {}
        }

        job.close();
        info!(job = %job.name, count = job.count, canceled = job.canceled, "job ended");

        self.history.push(job.clone());
        if let Err(e) = self.history.save(&self.history_path) {
            error!(path = %self.history_path.display(), error = %e, "could not save history");
        }

        self.status_line = WorkerStatus::Clear;
        Some(job)
    }

    /// Mark the current job canceled, then finish it.
    pub async fn cancel_job(&mut self) -> Option<Job> {
        if let Some(active) = self.active.as_mut() {
            active.job.canceled = true;
        }
        self.finish_job().await
    }

    pub fn current_job(&self) -> Option<&Job> {
        self.active.as_ref().map(|a| &a.job)
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn is_paused(&self) -> bool {
        self.active.as_ref().is_some_and(|a| a.worker.is_paused())
    }

    /// Whether the current worker has already stopped on its own.
    pub fn worker_finished(&self) -> bool {
        self.active.as_ref().is_some_and(|a| a.worker.is_finished())
    }

    pub fn status(&self) -> WorkerStatus {
        self.status_line
    }

    pub fn history(&self) -> &History {
        &self.history
    }
}
