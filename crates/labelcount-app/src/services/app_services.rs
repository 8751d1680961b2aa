// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Central service layer — owns the job controller and the receiving end of
// the worker event channel, and gives the Dioxus UI async-friendly methods.
//
// The controller is wrapped in a tokio `Mutex` because `finish_job` holds it
// across the wait for the worker to exit. Event handling queues behind that
// wait, which is what keeps stale counts away from the next job.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Mutex;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info, warn};

use labelcount_core::error::{LabelCountError, Result};
use labelcount_core::{CounterConfig, Job, WorkerEvent};
use labelcount_print::{ChannelSink, JobController, StatusClient};

use super::data_dir;
use crate::state::AppState;

const CONFIG_FILE: &str = "config.json";
const HISTORY_FILE: &str = "history.json";

/// Shared application services, provided to every component as context.
///
/// Cheap to clone; all fields are `Arc`-wrapped.
#[derive(Clone)]
pub struct AppServices {
    controller: Arc<Mutex<JobController>>,
    events: Arc<Mutex<Option<UnboundedReceiver<WorkerEvent>>>>,
    data_dir: PathBuf,
}

impl AppServices {
    /// Initialise all services. Call once at app startup.
    ///
    /// Loads (or seeds) the config, loads the job history and prepares the
    /// status-page client. Nothing touches the printer until a job starts.
    pub fn init() -> Result<Self> {
        let dir = data_dir::data_dir();
        info!(path = %dir.display(), "initialising app services");

        let config = load_or_seed_config(&dir);
        let status = StatusClient::new(&config)?;
        info!(printer = %config.printer_host, status_url = %status.url(), "printer configured");

        let (sink, events) = ChannelSink::channel();
        let controller =
            JobController::new(config, Arc::new(status), Arc::new(sink), dir.join(HISTORY_FILE));

        Ok(Self {
            controller: Arc::new(Mutex::new(controller)),
            events: Arc::new(Mutex::new(Some(events))),
            data_dir: dir,
        })
    }

    // -- Worker events ------------------------------------------------------

    /// Hand out the event receiver. Only the first caller gets it.
    pub async fn take_events(&self) -> Option<UnboundedReceiver<WorkerEvent>> {
        self.events.lock().await.take()
    }

    /// Apply a worker event and return the refreshed UI state.
    pub async fn apply(&self, event: WorkerEvent) -> AppState {
        let mut controller = self.controller.lock().await;
        controller.apply(event);
        AppState::from_controller(&controller)
    }

    // -- Job control --------------------------------------------------------

    /// Start a job. Blank names and a second concurrent job are ignored;
    /// printer faults show up in the returned state's status line.
    pub async fn start_job(&self, name: &str) -> AppState {
        let mut controller = self.controller.lock().await;
        match controller.start_job(name).await {
            Ok(()) => {}
            Err(LabelCountError::InvalidJobName | LabelCountError::JobAlreadyActive) => {
                debug!(name, "start ignored");
            }
            Err(e) => warn!(error = %e, "job not started"),
        }
        AppState::from_controller(&controller)
    }

    pub async fn toggle_pause(&self) -> AppState {
        let controller = self.controller.lock().await;
        controller.toggle_pause();
        AppState::from_controller(&controller)
    }

    pub async fn finish_job(&self) -> (Option<Job>, AppState) {
        let mut controller = self.controller.lock().await;
        let job = controller.finish_job().await;
        (job, AppState::from_controller(&controller))
    }

    pub async fn cancel_job(&self) -> (Option<Job>, AppState) {
        let mut controller = self.controller.lock().await;
        let job = controller.cancel_job().await;
        (job, AppState::from_controller(&controller))
    }

    /// Snapshot of the controller for rendering.
    pub async fn state(&self) -> AppState {
        AppState::from_controller(&*self.controller.lock().await)
    }

    /// Path to the data directory.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

// -- Config file persistence -------------------------------------------------

/// Load `config.json`, writing the defaults on first run so the operator has a
/// file to edit.
fn load_or_seed_config(data_dir: &Path) -> CounterConfig {
    let path = data_dir.join(CONFIG_FILE);
    if let Some(config) = CounterConfig::load(&path) {
        return config;
    }

    let config = CounterConfig::default();
    if !path.exists() {
        match config.save(&path) {
            Ok(()) => info!(path = %path.display(), "wrote default config"),
            Err(e) => warn!(path = %path.display(), error = %e, "could not write default config"),
        }
    }
    config
}
