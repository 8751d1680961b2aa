// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// History panel — finished and canceled jobs, oldest first.

use dioxus::prelude::*;

use crate::services::app_services::AppServices;
use crate::state::AppState;

#[component]
pub fn HistoryList() -> Element {
    let state = use_context::<Signal<AppState>>();
    let svc = use_context::<AppServices>();
    let location = svc.data_dir().display().to_string();

    rsx! {
        div { style: "flex: 1; display: flex; flex-direction: column; margin-top: 16px; min-height: 0;",
            h2 { style: "margin: 0 0 8px 0;", "History" }
            div { style: "flex: 1; overflow-y: auto; padding: 8px; border: 1px solid #e0e0e0; border-radius: 8px; font-family: monospace; font-size: 13px;",
                if state.read().history.is_empty() {
                    p { style: "color: #aaa; text-align: center;", "No jobs yet." }
                } else {
                    for (i, job) in state.read().history.iter().enumerate() {
                        div { key: "{i}",
                            style: line_style(job.canceled),
                            "{job.summary_line()}"
                        }
                    }
                }
            }
            p { style: "color: #999; font-size: 12px; margin: 4px 0 0 0;", "Stored in {location}" }
        }
    }
}

fn line_style(canceled: bool) -> &'static str {
    if canceled { "color: #999;" } else { "color: #333;" }
}
