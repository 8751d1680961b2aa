// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Headless label counter.
//
// Starts one job, counts until the printer reports media out (or the
// connection fails), then finishes the job and prints its history line.
// Ctrl-C cancels the job instead.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, warn};

use labelcount_core::{CounterConfig, EventKind, WorkerStatus};
use labelcount_print::{ChannelSink, JobController, StatusClient};

#[derive(Debug, Parser)]
#[command(name = "labelcount-headless", about = "Count the labels on a roll without the desktop UI")]
struct Args {
    /// Name recorded in the history for this run.
    #[arg(long)]
    job: String,

    /// Printer hostname or IP, overriding the config file.
    #[arg(long)]
    host: Option<String>,

    /// History file to append the finished job to.
    #[arg(long, default_value = "history.json")]
    history: PathBuf,

    /// JSON config file; defaults are used if missing.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = args
        .config
        .as_deref()
        .and_then(CounterConfig::load)
        .unwrap_or_default();
    if let Some(host) = args.host {
        config.printer_host = host;
    }

    let status = match StatusClient::new(&config) {
        Ok(status) => status,
        Err(e) => {
            error!(error = %e, "could not create status client");
            return ExitCode::FAILURE;
        }
    };

    let (sink, mut events) = ChannelSink::channel();
    let mut controller = JobController::new(config, Arc::new(status), Arc::new(sink), args.history);

    if let Err(e) = controller.start_job(&args.job).await {
        error!(error = %e, status = controller.status().message(), "job not started");
        return ExitCode::FAILURE;
    }

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut last_status = WorkerStatus::Clear;
    let job = loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else {
                    break controller.finish_job().await;
                };
                if !controller.apply(event) {
                    continue;
                }
                match event.kind {
                    EventKind::Count(count) => info!(count, "label fed"),
                    EventKind::Status(status) => {
                        if status != last_status && status != WorkerStatus::Clear {
                            warn!(status = status.message(), "printer reported");
                        }
                        last_status = status;
                        if status.is_terminal() {
                            break controller.finish_job().await;
                        }
                    }
                }
            }
            _ = &mut ctrl_c => {
                info!("interrupted, canceling job");
                break controller.cancel_job().await;
            }
        }
    };

    let Some(job) = job else {
        return ExitCode::FAILURE;
    };
    println!("{}", job.summary_line());

    if job.canceled {
        ExitCode::from(130)
    } else if last_status == WorkerStatus::ConnectionError {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
