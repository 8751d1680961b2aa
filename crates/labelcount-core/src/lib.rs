// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Label counter — core types, configuration, history and error definitions
// shared across all crates.

pub mod config;
pub mod error;
pub mod history;
pub mod types;

pub use config::CounterConfig;
pub use error::LabelCountError;
pub use history::History;
pub use types::*;
