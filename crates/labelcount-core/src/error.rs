// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for the label counter.

use thiserror::Error;

/// Top-level error type for all label counter operations.
#[derive(Debug, Error)]
pub enum LabelCountError {
    // -- Printer errors --
    #[error("status page request failed: {0}")]
    StatusRequest(String),

    #[error("printer connection failed: {0}")]
    Connection(String),

    // -- Job control --
    #[error("job name must not be empty")]
    InvalidJobName,

    #[error("a job is already running")]
    JobAlreadyActive,

    #[error("print head is open")]
    HeadOpen,

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, LabelCountError>;
