//! Console session: the document plus the queue of output posted from other threads.

use console_events::{ConsoleOutput, OutputReceiver};
use tracing::trace;

use crate::{CaretSink, ConsoleDocument, ConsoleSettings, Evaluator};

#[derive(Debug)]
pub struct Console {
    document: ConsoleDocument,
    outputs: OutputReceiver,
}

impl Console {
    pub fn new(
        settings: ConsoleSettings,
        evaluator: impl Evaluator + 'static,
        caret_sink: impl CaretSink + 'static,
        outputs: OutputReceiver,
    ) -> Self {
        Self {
            document: ConsoleDocument::new(settings, evaluator, caret_sink),
            outputs,
        }
    }

    pub fn document(&self) -> &ConsoleDocument {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut ConsoleDocument {
        &mut self.document
    }

    pub fn receiver_mut(&mut self) -> &mut OutputReceiver {
        &mut self.outputs
    }

    /// Apply one posted output on the owning thread.
    pub fn apply(&mut self, output: ConsoleOutput) {
        trace!(target: "console.events", kind = output.kind(), "output_applied");
        match output {
            ConsoleOutput::Echo(text) => self.document.inject_echo(&text),
            ConsoleOutput::Status(text) => self.document.inject_status(&text),
            ConsoleOutput::Error(text) => self.document.inject_error(&text),
            // Posted output arrives after the evaluating command's prompt was
            // replaced, so with a prompt open it belongs above the marker.
            ConsoleOutput::ErrorForeground(text) if self.document.is_prompt_active() => {
                self.document.inject_error(&text)
            }
            ConsoleOutput::ErrorForeground(text) => self.document.inject_error_foreground(&text),
            ConsoleOutput::Clear => self.document.clear(),
        }
    }

    /// Drain and apply everything queued so far. Returns the number applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Some(output) = self.outputs.try_next() {
            self.apply(output);
            applied += 1;
        }
        applied
    }
}
