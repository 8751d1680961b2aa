// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Counter panel — job name entry, live count, status line and the
// pause / finish / cancel controls.

use dioxus::prelude::*;

use labelcount_core::WorkerStatus;

use crate::services::app_services::AppServices;
use crate::state::AppState;

#[component]
pub fn Counter() -> Element {
    let mut state = use_context::<Signal<AppState>>();
    let svc = use_context::<AppServices>();
    let mut job_name = use_signal(String::new);
    // Set while a control call is in flight; finishing waits for the worker.
    let mut busy = use_signal(|| false);

    let running = state.read().is_running();
    let status = state.read().status;
    let paused = state.read().paused;
    let worker_stopped = state.read().worker_stopped;
    let in_flight = *busy.read();

    rsx! {
        div {
            // Job entry
            div { style: "display: flex; gap: 8px;",
                input {
                    style: "flex: 1; padding: 8px; border: 1px solid #ccc; border-radius: 6px; font-size: 15px;",
                    placeholder: "Job name",
                    value: "{job_name}",
                    disabled: running,
                    oninput: move |evt| job_name.set(evt.value()),
                }
                button {
                    style: "padding: 8px 20px; border-radius: 6px; border: none; background: {start_color(running || in_flight)}; color: white; font-size: 15px;",
                    disabled: running || in_flight,
                    onclick: {
                        let svc = svc.clone();
                        move |_| {
                            let name = job_name.read().clone();
                            let svc = svc.clone();
                            busy.set(true);
                            spawn(async move {
                                let next = svc.start_job(&name).await;
                                state.set(next);
                                busy.set(false);
                            });
                        }
                    },
                    "Start"
                }
            }

            // Status line
            p { style: "color: {status_color(status)}; font-size: 14px; min-height: 20px; margin: 8px 0;",
                "{status.message()}"
            }

            if let Some(ref job) = state.read().current {
                div { style: "display: flex; align-items: center; gap: 8px; padding: 12px; border: 1px solid #e0e0e0; border-radius: 8px;",
                    span { style: "min-width: 80px; font-size: 28px; font-weight: bold; text-align: center;",
                        "{job.count}"
                    }
                    span { style: "flex: 1; color: #666;",
                        "{job.name}"
                        if paused { " (paused)" }
                    }
                    button {
                        style: "padding: 6px 12px; border-radius: 6px; border: 1px solid #ccc; background: white;",
                        disabled: in_flight || worker_stopped,
                        onclick: {
                            let svc = svc.clone();
                            move |_| {
                                let svc = svc.clone();
                                spawn(async move {
                                    let next = svc.toggle_pause().await;
                                    state.set(next);
                                });
                            }
                        },
                        if paused { "Resume" } else { "Pause" }
                    }
                    button {
                        style: "padding: 6px 12px; border-radius: 6px; border: none; background: #34c759; color: white;",
                        disabled: in_flight,
                        onclick: {
                            let svc = svc.clone();
                            move |_| {
                                let svc = svc.clone();
                                busy.set(true);
                                spawn(async move {
                                    let (job, next) = svc.finish_job().await;
                                    if let Some(job) = job {
                                        tracing::info!(job = %job.name, count = job.count, "job finished");
                                    }
                                    state.set(next);
                                    job_name.set(String::new());
                                    busy.set(false);
                                });
                            }
                        },
                        "Finish"
                    }
                    button {
                        style: "padding: 6px 12px; border-radius: 6px; border: 1px solid #ff3b30; color: #ff3b30; background: white;",
                        disabled: in_flight,
                        onclick: {
                            let svc = svc.clone();
                            move |_| {
                                let svc = svc.clone();
                                busy.set(true);
                                spawn(async move {
                                    let (job, next) = svc.cancel_job().await;
                                    if let Some(job) = job {
                                        tracing::info!(job = %job.name, count = job.count, "job canceled");
                                    }
                                    state.set(next);
                                    job_name.set(String::new());
                                    busy.set(false);
                                });
                            }
                        },
                        "Cancel"
                    }
                }
            }
        }
    }
}

fn start_color(disabled: bool) -> &'static str {
    if disabled { "#a0c4ff" } else { "#007aff" }
}

fn status_color(status: WorkerStatus) -> &'static str {
    match status {
        WorkerStatus::AllLabelsCounted => "#155724",
        WorkerStatus::Clear | WorkerStatus::HeadOpen | WorkerStatus::ConnectionError => "#ff3b30",
    }
}
