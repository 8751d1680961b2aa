// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Feed worker — the background loop that feeds and counts labels.
//
// Each tick: check for media out (done), check the head (blocked while
// open), otherwise feed one label and bump the count. The worker owns the raw
// connection for its whole run and talks to the foreground only through an
// `EventSink`. Stop and pause are plain atomic flags checked once per tick.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use labelcount_core::error::Result;
use labelcount_core::{CounterConfig, EventKind, WorkerEvent, WorkerStatus};

use crate::raw_client::{PrinterCommand, RawConnection};
use crate::status::PrinterStatus;

/// Receives worker events. Implementations must hand the event over to the
/// foreground rather than act on it in place.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: WorkerEvent);
}

/// Forwards events over an unbounded channel drained by the foreground loop.
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<WorkerEvent>,
}

impl ChannelSink {
    pub fn new(tx: mpsc::UnboundedSender<WorkerEvent>) -> Self {
        Self { tx }
    }

    /// A sink together with the receiving end for the foreground.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<WorkerEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }
}

impl EventSink for ChannelSink {
    fn emit(&self, event: WorkerEvent) {
        // The receiver only goes away on shutdown.
        let _ = self.tx.send(event);
    }
}

/// Control flags shared between the foreground and one worker.
#[derive(Debug, Default)]
pub struct WorkerFlags {
    stop: AtomicBool,
    pause: AtomicBool,
}

impl WorkerFlags {
    /// One-way: a stopped worker is never restarted.
    pub fn request_stop(&self) {
        self.stop.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }

    pub fn set_paused(&self, paused: bool) {
        self.pause.store(paused, Ordering::SeqCst);
    }

    pub fn is_paused(&self) -> bool {
        self.pause.load(Ordering::SeqCst)
    }
}

/// One feed run. Build with [`FeedWorker::new`], then [`FeedWorker::spawn`].
pub struct FeedWorker {
    config: CounterConfig,
    status: Arc<dyn PrinterStatus>,
    sink: Arc<dyn EventSink>,
    flags: Arc<WorkerFlags>,
    session: u64,
    count: u64,
}

impl FeedWorker {
    pub fn new(
        config: CounterConfig,
        status: Arc<dyn PrinterStatus>,
        sink: Arc<dyn EventSink>,
        session: u64,
    ) -> Self {
        Self {
            config,
            status,
            sink,
            flags: Arc::new(WorkerFlags::default()),
            session,
            count: 0,
        }
    }

    /// Run on a tokio task and return a handle for pause/stop.
    pub fn spawn(self) -> WorkerHandle {
        let flags = Arc::clone(&self.flags);
        let session = self.session;
        let task = tokio::spawn(self.run());
        WorkerHandle {
            flags,
            task,
            session,
        }
    }

    /// Run until stopped, out of media, or the connection fails. Returns the
    /// number of labels fed.
    pub async fn run(mut self) -> u64 {
        info!(session = self.session, "feed worker started");

        if let Err(e) = self.feed_loop().await {
            error!(session = self.session, error = %e, "printer connection error");
            self.emit(EventKind::Status(WorkerStatus::ConnectionError));
        }

        info!(session = self.session, count = self.count, "feed worker stopped");
        self.count
    }

    async fn feed_loop(&mut self) -> Result<()> {
        let mut conn = RawConnection::connect(
            &self.config.printer_host,
            self.config.raw_port,
            self.config.raw_timeout(),
        )
        .await?;

        // Clear anything still queued on the printer before counting.
        if let Err(e) = conn.send(PrinterCommand::CancelAll).await {
            warn!(error = %e, "failed to cancel queued jobs");
        }

        while !self.flags.is_stopped() {
            if self.flags.is_paused() {
                tokio::time::sleep(self.config.pause_poll()).await;
                continue;
            }

            if self.status.is_media_out().await {
                info!(count = self.count, "all labels counted");
                conn.send(PrinterCommand::CancelAll).await?;
                self.emit(EventKind::Status(WorkerStatus::AllLabelsCounted));
                break;
            }

            if !self.status.is_head_closed().await? {
                warn!("print head open, feeding blocked");
                self.emit(EventKind::Status(WorkerStatus::HeadOpen));
                conn.send(PrinterCommand::CancelAll).await?;
                tokio::time::sleep(self.config.tick_interval()).await;
                continue;
            }

            self.emit(EventKind::Status(WorkerStatus::Clear));
            conn.send(PrinterCommand::FeedLabel).await?;
            self.count += 1;
            self.emit(EventKind::Count(self.count));
            tokio::time::sleep(self.config.tick_interval()).await;
        }

        Ok(())
    }

    fn emit(&self, kind: EventKind) {
        self.sink.emit(WorkerEvent {
            session: self.session,
            kind,
        });
    }
}

/// Foreground handle on a spawned worker.
pub struct WorkerHandle {
    flags: Arc<WorkerFlags>,
    task: JoinHandle<u64>,
    session: u64,
}

impl WorkerHandle {
    pub fn session(&self) -> u64 {
        self.session
    }

    pub fn pause(&self) {
        self.flags.set_paused(true);
    }

    pub fn resume(&self) {
        self.flags.set_paused(false);
    }

    pub fn is_paused(&self) -> bool {
        self.flags.is_paused()
    }

    /// Whether the run has ended on its own (media out or connection error).
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Signal stop and wait for the run to end. Returns the worker's count,
    /// or `None` if the task panicked.
    pub async fn stop_and_join(self) -> Option<u64> {
        self.flags.request_stop();
        match self.task.await {
            Ok(count) => Some(count),
            Err(e) => {
                error!(session = self.session, error = %e, "feed worker task failed");
                None
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    use labelcount_core::error::{LabelCountError, Result};
    use labelcount_core::{CounterConfig, EventKind, WorkerEvent, WorkerStatus};

    use super::EventSink;
    use crate::status::PrinterStatus;

    /// What the status page shows on one tick.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum Tick {
        Ready,
        HeadOpen,
        MediaOut,
        Unreachable,
    }

    /// Status page that plays back a fixed tick sequence, then reports media
    /// out forever.
    pub struct ScriptedStatus {
        ticks: Mutex<VecDeque<Tick>>,
        endless: bool,
    }

    impl ScriptedStatus {
        pub fn new(ticks: &[Tick]) -> Self {
            Self {
                ticks: Mutex::new(ticks.iter().copied().collect()),
                endless: false,
            }
        }

        /// Head closed and paper present on every tick.
        pub fn always_ready() -> Self {
            Self {
                ticks: Mutex::new(VecDeque::new()),
                endless: true,
            }
        }

        fn front(&self) -> Tick {
            match self.ticks.lock().unwrap().front() {
                Some(tick) => *tick,
                None if self.endless => Tick::Ready,
                None => Tick::MediaOut,
            }
        }

        fn advance(&self) {
            self.ticks.lock().unwrap().pop_front();
        }
    }

    #[async_trait]
    impl PrinterStatus for ScriptedStatus {
        async fn is_head_closed(&self) -> Result<bool> {
            let tick = self.front();
            self.advance();
            match tick {
                Tick::Ready => Ok(true),
                Tick::HeadOpen => Ok(false),
                Tick::MediaOut => Ok(true),
                Tick::Unreachable => Err(LabelCountError::StatusRequest("unreachable".into())),
            }
        }

        async fn is_media_out(&self) -> bool {
            if self.front() == Tick::MediaOut {
                self.advance();
                return true;
            }
            false
        }
    }

    #[derive(Default)]
    pub struct RecordingSink {
        events: Mutex<Vec<WorkerEvent>>,
    }

    impl RecordingSink {
        pub fn events(&self) -> Vec<WorkerEvent> {
            self.events.lock().unwrap().clone()
        }

        pub fn counts(&self) -> Vec<u64> {
            self.events()
                .into_iter()
                .filter_map(|e| match e.kind {
                    EventKind::Count(n) => Some(n),
                    EventKind::Status(_) => None,
                })
                .collect()
        }

        pub fn statuses(&self) -> Vec<WorkerStatus> {
            self.events()
                .into_iter()
                .filter_map(|e| match e.kind {
                    EventKind::Status(s) => Some(s),
                    EventKind::Count(_) => None,
                })
                .collect()
        }
    }

    impl EventSink for RecordingSink {
        fn emit(&self, event: WorkerEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    /// A raw port that records every byte until the worker disconnects.
    pub struct FakePrinter {
        pub port: u16,
        task: JoinHandle<Vec<u8>>,
    }

    impl FakePrinter {
        pub async fn start() -> Self {
            let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
            let port = listener.local_addr().expect("addr").port();
            let task = tokio::spawn(async move {
                let (mut socket, _) = listener.accept().await.expect("accept");
                let mut received = Vec::new();
                socket.read_to_end(&mut received).await.expect("read");
                received
            });
            Self { port, task }
        }

        pub async fn received(self) -> Vec<u8> {
            self.task.await.expect("printer task")
        }
    }

    pub fn fast_config(port: u16) -> CounterConfig {
        CounterConfig {
            printer_host: "127.0.0.1".into(),
            raw_port: port,
            raw_timeout_ms: 1_000,
            tick_interval_ms: 5,
            pause_poll_ms: 5,
            ..CounterConfig::default()
        }
    }
}
