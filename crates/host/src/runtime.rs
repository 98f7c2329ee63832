//! Host runtime integration.
//!
//! Bridges the sync frame loop with an async line reader: a tokio task reads
//! newline-delimited input and hands each line over a bounded channel, which
//! the frame loop drains without blocking.

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TryRecvError;
use tracing::{debug, warn};

/// Outcome of polling for an inbound line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinePoll {
    Line(String),
    Empty,
    Closed,
}

/// Running reader instance.
pub struct LineReader {
    _rt: Runtime,
    rx: mpsc::Receiver<String>,
}

impl LineReader {
    /// Start reading lines from stdin.
    pub fn start_stdin(max_pending: usize) -> Result<Self> {
        Self::start_with(max_pending, || BufReader::new(tokio::io::stdin()))
    }

    /// Start reading lines from the reader `make` builds inside the runtime.
    pub fn start_with<R, F>(max_pending: usize, make: F) -> Result<Self>
    where
        R: AsyncBufRead + Unpin + Send + 'static,
        F: FnOnce() -> R + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<String>(max_pending.max(1));
        let rt = Runtime::new().context("creating tokio runtime")?;
        rt.spawn(async move {
            let mut lines = make().lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        if tx.send(line).await.is_err() {
                            break;
                        }
                    }
                    Ok(None) => {
                        debug!("input closed");
                        break;
                    }
                    Err(e) => {
                        warn!(error = %e, "input read failed");
                        break;
                    }
                }
            }
        });

        Ok(Self { _rt: rt, rx })
    }

    pub fn poll(&mut self) -> LinePoll {
        match self.rx.try_recv() {
            Ok(line) => LinePoll::Line(line),
            Err(TryRecvError::Empty) => LinePoll::Empty,
            Err(TryRecvError::Disconnected) => LinePoll::Closed,
        }
    }
}
