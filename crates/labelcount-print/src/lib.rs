// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Label counter printing — status-page polling, the raw TCP connection, the
// feed worker, and the job controller that ties them to the job history.

pub mod controller;
pub mod raw_client;
pub mod status;
pub mod worker;

pub use controller::JobController;
pub use raw_client::{PrinterCommand, RawConnection};
pub use status::{PrinterStatus, StatusClient};
pub use worker::{ChannelSink, EventSink, FeedWorker, WorkerHandle};
