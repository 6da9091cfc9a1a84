//! Demo evaluator: commands are forwarded to a tokio task which answers
//! through the console output channel.

use console_events::OutputSender;
use console_state::Evaluator;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Evaluator half handed to the console; forwards each command to the worker.
pub struct ForwardingEvaluator {
    jobs: UnboundedSender<String>,
    pending: PendingJobs,
}

impl Evaluator for ForwardingEvaluator {
    fn eval_command(&mut self, command: String) {
        self.pending.started();
        if self.jobs.send(command).is_err() {
            self.pending.finished();
            warn!(target: "runtime.eval", "worker_gone");
        }
    }
}

#[derive(Default)]
struct Pending {
    count: AtomicUsize,
    idle: Notify,
}

/// Shared count of submitted commands the worker has not finished.
#[derive(Clone, Default)]
pub struct PendingJobs(Arc<Pending>);

impl PendingJobs {
    pub fn count(&self) -> usize {
        self.0.count.load(Ordering::SeqCst)
    }

    fn started(&self) {
        self.0.count.fetch_add(1, Ordering::SeqCst);
    }

    fn finished(&self) {
        if self.0.count.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.0.idle.notify_waiters();
        }
    }

    /// Resolve once every submitted command has been run.
    pub async fn idle(&self) {
        loop {
            // Registered before the check so a concurrent `finished` is not missed.
            let notified = self.0.idle.notified();
            if self.count() == 0 {
                return;
            }
            notified.await;
        }
    }
}

/// Interpreter state kept by the worker between commands.
#[derive(Debug, Default)]
pub struct DemoInterpreter {
    snapshots: usize,
}

impl DemoInterpreter {
    /// Run one command, posting its output.
    pub fn run(&mut self, command: &str, out: &OutputSender) {
        let (verb, rest) = match command.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (command, ""),
        };
        debug!(target: "runtime.eval", verb, "eval");
        match verb {
            "" => {}
            "snapshot" => {
                self.snapshots += 1;
                out.status(format!("snapshot {} saved", self.snapshots));
            }
            "echo" => {
                out.echo(rest);
            }
            "reset" => {
                self.snapshots = 0;
                out.clear();
            }
            "help" => {
                out.status("commands: snapshot, echo <text>, reset, help");
            }
            other => {
                out.error(format!("unknown command: {other}"));
            }
        }
    }
}

/// Spawn the worker task. Must be called inside a tokio runtime.
pub fn spawn_worker(out: OutputSender) -> (ForwardingEvaluator, PendingJobs, JoinHandle<()>) {
    let (jobs, rx) = mpsc::unbounded_channel();
    let pending = PendingJobs::default();
    let handle = tokio::spawn(worker_loop(rx, out, pending.clone()));
    (
        ForwardingEvaluator {
            jobs,
            pending: pending.clone(),
        },
        pending,
        handle,
    )
}

async fn worker_loop(
    mut rx: UnboundedReceiver<String>,
    out: OutputSender,
    pending: PendingJobs,
) {
    let mut interpreter = DemoInterpreter::default();
    while let Some(command) = rx.recv().await {
        interpreter.run(&command, &out);
        pending.finished();
    }
}
