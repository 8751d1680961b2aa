// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raw TCP printer connection (JetDirect, port 9100).
//
// The label printer interprets ZPL natively, so a command is just its bytes
// written to the socket. There is no acknowledgement; a successful write only
// means the bytes left this machine.

use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tracing::{debug, info};

use labelcount_core::error::{LabelCountError, Result};

/// ZPL: cancel every queued format on the printer.
pub const ZPL_CANCEL_ALL: &[u8] = b"~JA\n";

/// ZPL: a one-dot label, which makes the printer feed exactly one label.
pub const ZPL_FEED_LABEL: &[u8] = b"^XA^FO0,0^GB1,1,1^FS^XZ\n";

/// The fixed commands the counter sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrinterCommand {
    CancelAll,
    FeedLabel,
}

impl PrinterCommand {
    pub fn payload(&self) -> &'static [u8] {
        match self {
            Self::CancelAll => ZPL_CANCEL_ALL,
            Self::FeedLabel => ZPL_FEED_LABEL,
        }
    }
}

/// A persistent raw connection. Dropping it closes the socket.
pub struct RawConnection {
    stream: TcpStream,
    addr: String,
    timeout: Duration,
}

impl RawConnection {
    /// Connect to `host:port`, giving up after `timeout`.
    pub async fn connect(host: &str, port: u16, timeout: Duration) -> Result<Self> {
        let addr = format!("{}:{}", host, port);
        info!(addr = %addr, "connecting via raw TCP");

        let stream = tokio::time::timeout(timeout, TcpStream::connect(&addr))
            .await
            .map_err(|_| {
                LabelCountError::Connection(format!(
                    "raw TCP connection to {} timed out after {}ms",
                    addr,
                    timeout.as_millis()
                ))
            })?
            .map_err(|e| LabelCountError::Connection(format!("raw TCP connect to {}: {}", addr, e)))?;

        info!(addr = %addr, "connected to printer");
        Ok(Self {
            stream,
            addr,
            timeout,
        })
    }

    /// Write one command and flush it.
    pub async fn send(&mut self, command: PrinterCommand) -> Result<()> {
        let payload = command.payload();
        let addr = &self.addr;
        let stream = &mut self.stream;
        let write = async move {
            stream.write_all(payload).await?;
            stream.flush().await
        };

        tokio::time::timeout(self.timeout, write)
            .await
            .map_err(|_| LabelCountError::Connection(format!("raw TCP send to {} timed out", addr)))?
            .map_err(|e| LabelCountError::Connection(format!("raw TCP send to {}: {}", addr, e)))?;

        debug!(addr = %addr, ?command, bytes = payload.len(), "command sent");
        Ok(())
    }
}
