// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the label counter.

use chrono::{Local, NaiveDateTime, SubsecRound};
use serde::{Deserialize, Serialize};

/// Timestamp format used for display (matches the persisted form).
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Current local wall-clock time, truncated to whole seconds.
pub fn local_now() -> NaiveDateTime {
    Local::now().naive_local().trunc_subsecs(0)
}

/// One counting run, from start to finish or cancel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub name: String,
    pub start: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveDateTime>,
    pub count: u64,
    #[serde(default)]
    pub canceled: bool,
}

impl Job {
    /// A fresh job starting now. The caller is responsible for trimming and
    /// validating the name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            start: local_now(),
            end: None,
            count: 0,
            canceled: false,
        }
    }

    /// Stamp the end time.
    pub fn close(&mut self) {
        self.end = Some(local_now());
    }

    /// One-line rendering used by the history views.
    pub fn summary_line(&self) -> String {
        let mut line = format!(
            "{} - {} : {} labels",
            self.start.format(TIMESTAMP_FORMAT),
            self.name,
            self.count
        );
        if self.canceled {
            line.push_str(" (canceled)");
        } else if let Some(end) = self.end {
            line.push_str(&format!(" ended {}", end.format(TIMESTAMP_FORMAT)));
        }
        line
    }
}

/// Operator-facing status reported by the feed worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WorkerStatus {
    /// Head closed and paper present; nothing to report.
    #[default]
    Clear,
    /// The print head is open. Feeding resumes once it is closed.
    HeadOpen,
    /// The printer reports media out — the roll has been counted.
    AllLabelsCounted,
    /// The raw connection failed. The job must be ended by the operator.
    ConnectionError,
}

impl WorkerStatus {
    /// Text shown in the status line.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Clear => "",
            Self::HeadOpen => "Print head open - please close it",
            Self::AllLabelsCounted => "All labels counted",
            Self::ConnectionError => "Printer connection error",
        }
    }

    /// Whether the worker stops after reporting this status.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::AllLabelsCounted | Self::ConnectionError)
    }
}

/// Payload of a worker event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// Total number of labels fed so far.
    Count(u64),
    Status(WorkerStatus),
}

/// Something the feed worker wants the foreground to know.
///
/// `session` identifies the job run that produced the event so that events
/// still queued from a finished worker cannot touch a newer job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerEvent {
    pub session: u64,
    pub kind: EventKind,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 6, 1)
            .and_then(|d| d.and_hms_opt(h, m, s))
            .expect("valid timestamp")
    }

    #[test]
    fn new_job_starts_empty() {
        let job = Job::new("Roll 42");
        assert_eq!(job.name, "Roll 42");
        assert_eq!(job.count, 0);
        assert!(!job.canceled);
        assert!(job.end.is_none());
        assert_eq!(job.start.nanosecond(), 0);
    }

    #[test]
    fn serializes_without_fractional_seconds() {
        let job = Job {
            name: "Roll".into(),
            start: at(14, 3, 22),
            end: None,
            count: 7,
            canceled: false,
        };
        let json = serde_json::to_string(&job).expect("serialize");
        assert!(json.contains(r#""start":"2025-06-01T14:03:22""#));
        assert!(!json.contains("end"));
    }

    #[test]
    fn reads_records_without_canceled_field() {
        let json = r#"{"name":"Old","start":"2025-06-01T08:00:00","count":3,"end":"2025-06-01T08:10:00"}"#;
        let job: Job = serde_json::from_str(json).expect("deserialize");
        assert!(!job.canceled);
        assert_eq!(job.end, Some(at(8, 10, 0)));
    }

    #[test]
    fn summary_line_for_finished_job() {
        let job = Job {
            name: "Roll".into(),
            start: at(9, 0, 0),
            end: Some(at(9, 30, 5)),
            count: 120,
            canceled: false,
        };
        assert_eq!(
            job.summary_line(),
            "2025-06-01T09:00:00 - Roll : 120 labels ended 2025-06-01T09:30:05"
        );
    }

    #[test]
    fn summary_line_for_canceled_job() {
        let job = Job {
            name: "Roll".into(),
            start: at(9, 0, 0),
            end: Some(at(9, 1, 0)),
            count: 4,
            canceled: true,
        };
        assert_eq!(job.summary_line(), "2025-06-01T09:00:00 - Roll : 4 labels (canceled)");
    }

    #[test]
    fn terminal_statuses() {
        assert!(WorkerStatus::AllLabelsCounted.is_terminal());
        assert!(WorkerStatus::ConnectionError.is_terminal());
        assert!(!WorkerStatus::HeadOpen.is_terminal());
        assert!(!WorkerStatus::Clear.is_terminal());
        assert_eq!(WorkerStatus::Clear.message(), "");
    }
}
