//! Output marshalling between evaluator threads and the console owner.
//!
//! The console document is single-owner: only the thread that owns it may
//! mutate it. Evaluators run elsewhere (a worker thread or a tokio task) and
//! report results by posting [`ConsoleOutput`] values through an
//! [`OutputSender`]. The owner drains the matching [`OutputReceiver`] and
//! applies each message to the document in arrival order.
//!
//! The channel is unbounded: output is produced at human/interpreter pace and
//! dropping a transcript line would be worse than buffering it. Sending never
//! blocks, so evaluators can post from synchronous code as well as from async
//! tasks.

use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender, error::TryRecvError};
use tracing::trace;

// Telemetry counters (relaxed; inspected by tests and logged by the binary at shutdown).
pub static OUTPUTS_POSTED: AtomicU64 = AtomicU64::new(0);
pub static OUTPUT_SEND_FAILURES: AtomicU64 = AtomicU64::new(0);

/// A request to change the console transcript, posted from off the owning thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleOutput {
    /// Echo line spliced in above the prompt.
    Echo(String),
    /// Status line spliced in above the prompt.
    Status(String),
    /// Error line spliced in above the prompt.
    Error(String),
    /// Error line appended after the command line (synchronous foreground path).
    ErrorForeground(String),
    /// Wipe the transcript and open a fresh prompt.
    Clear,
}

impl ConsoleOutput {
    pub fn kind(&self) -> &'static str {
        match self {
            ConsoleOutput::Echo(_) => "echo",
            ConsoleOutput::Status(_) => "status",
            ConsoleOutput::Error(_) => "error",
            ConsoleOutput::ErrorForeground(_) => "error_foreground",
            ConsoleOutput::Clear => "clear",
        }
    }
}

/// Create a connected sender/receiver pair.
pub fn output_channel() -> (OutputSender, OutputReceiver) {
    let (tx, rx) = mpsc::unbounded_channel();
    (OutputSender { tx }, OutputReceiver { rx })
}

/// Cloneable, `Send` handle evaluators use to post output.
#[derive(Debug, Clone)]
pub struct OutputSender {
    tx: UnboundedSender<ConsoleOutput>,
}

impl OutputSender {
    /// Post a message. Returns false once the receiving console is gone.
    pub fn post(&self, output: ConsoleOutput) -> bool {
        let kind = output.kind();
        match self.tx.send(output) {
            Ok(()) => {
                OUTPUTS_POSTED.fetch_add(1, Ordering::Relaxed);
                trace!(target: "console.events", kind, "output_posted");
                true
            }
            Err(_) => {
                OUTPUT_SEND_FAILURES.fetch_add(1, Ordering::Relaxed);
                trace!(target: "console.events", kind, "output_send_failed");
                false
            }
        }
    }

    pub fn echo(&self, text: impl Into<String>) -> bool {
        self.post(ConsoleOutput::Echo(text.into()))
    }

    pub fn status(&self, text: impl Into<String>) -> bool {
        self.post(ConsoleOutput::Status(text.into()))
    }

    pub fn error(&self, text: impl Into<String>) -> bool {
        self.post(ConsoleOutput::Error(text.into()))
    }

    pub fn error_foreground(&self, text: impl Into<String>) -> bool {
        self.post(ConsoleOutput::ErrorForeground(text.into()))
    }

    pub fn clear(&self) -> bool {
        self.post(ConsoleOutput::Clear)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Owner-side end of the output channel.
#[derive(Debug)]
pub struct OutputReceiver {
    rx: UnboundedReceiver<ConsoleOutput>,
}

impl OutputReceiver {
    /// Next pending message without waiting.
    pub fn try_next(&mut self) -> Option<ConsoleOutput> {
        match self.rx.try_recv() {
            Ok(output) => Some(output),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Wait for the next message; `None` once every sender is dropped and the queue is empty.
    pub async fn recv(&mut self) -> Option<ConsoleOutput> {
        self.rx.recv().await
    }

    /// Number of messages currently queued.
    pub fn pending(&self) -> usize {
        self.rx.len()
    }
}
