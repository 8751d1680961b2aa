// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Label counter — desktop UI.
//
// Entry point. Initialises logging and backend services, then launches the
// Dioxus UI. Worker events are drained by a future on the UI context, which
// is the only place the shared state signal is written.

mod pages;
mod services;
mod state;

use dioxus::prelude::*;

use pages::counter::Counter;
use pages::history::HistoryList;

use services::app_services::AppServices;
use state::AppState;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    tracing::info!("label counter starting");

    let svc = match AppServices::init() {
        Ok(svc) => svc,
        Err(e) => {
            tracing::error!(error = %e, "backend services failed to initialise");
            std::process::exit(1);
        }
    };

    dioxus::LaunchBuilder::new().with_context(svc).launch(app);
}

/// Root component.
fn app() -> Element {
    let svc = use_context::<AppServices>();
    let mut state = use_context_provider(|| Signal::new(AppState::default()));

    // Event pump: worker events are applied here, on the UI context.
    use_future(move || {
        let svc = svc.clone();
        async move {
            state.set(svc.state().await);

            let Some(mut events) = svc.take_events().await else {
                tracing::warn!("worker event receiver already taken");
                return;
            };
            while let Some(event) = events.recv().await {
                let next = svc.apply(event).await;
                state.set(next);
            }
        }
    });

    rsx! {
        div { class: "app-container",
            style: "display: flex; flex-direction: column; height: 100vh; padding: 16px; box-sizing: border-box; font-family: system-ui, -apple-system, sans-serif;",
            h1 { style: "margin: 0 0 16px 0;", "Label Counter" }
            Counter {}
            HistoryList {}
        }
    }
}
