//! Console document: the live transcript + command line behind a scripting console.
//!
//! Layout of the buffer at any time:
//!
//! ```text
//! <transcript lines ...>\n<marker><command line>
//!                         ^       ^
//!                         |       editable_start
//!                         preprompt
//! ```
//!
//! Everything before `editable_start` is transcript and is only ever changed
//! by the injector (which splices lines in *above* the marker) or by
//! `clear`. User edits go through the edit gate (`gate.rs`), which clips or
//! redirects any request that would reach into the transcript instead of
//! rejecting it. Submitting a command (`command.rs`) freezes the command
//! line into the transcript and installs a fresh prompt at the end.
//!
//! The document is single-owner and takes `&mut self` everywhere. Evaluators
//! running on other threads post output through `console_events` and the
//! owner applies it via [`session::Console::pump`].

pub mod boundary;
mod command;
mod gate;
pub mod history;
mod inject;
pub mod session;

pub use boundary::{BoundaryState, BoundaryTracker};
pub use console_config::ConsoleSettings;
pub use console_text::{Segment, StoreError, Style};
pub use history::CommandHistory;
pub use session::Console;

use console_text::{AnchorId, Change, SegmentStore, Stickiness};
use tracing::{debug, error};

/// Collaborator that executes submitted commands.
///
/// Invoked once per submission on the owning thread. Output must come back
/// through an `OutputSender`, never by touching the document directly.
pub trait Evaluator {
    fn eval_command(&mut self, command: String);
}

impl<F: FnMut(String)> Evaluator for F {
    fn eval_command(&mut self, command: String) {
        self(command)
    }
}

/// Host view that displays the caret.
pub trait CaretSink {
    fn set_caret(&mut self, offset: usize);
}

impl<F: FnMut(usize)> CaretSink for F {
    fn set_caret(&mut self, offset: usize) {
        self(offset)
    }
}

/// Caret sink for headless use.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCaretSink;

impl CaretSink for NoopCaretSink {
    fn set_caret(&mut self, _offset: usize) {}
}

pub struct ConsoleDocument {
    store: SegmentStore,
    boundary: BoundaryTracker,
    caret: AnchorId,
    history: CommandHistory,
    settings: ConsoleSettings,
    evaluator: Box<dyn Evaluator>,
    caret_sink: Box<dyn CaretSink>,
}

impl std::fmt::Debug for ConsoleDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleDocument")
            .field("length", &self.length())
            .field("editable_start", &self.editable_start())
            .field("caret", &self.caret())
            .field("history", &self.history.len())
            .finish()
    }
}

impl ConsoleDocument {
    /// Build a document and install the first prompt.
    pub fn new(
        settings: ConsoleSettings,
        evaluator: impl Evaluator + 'static,
        caret_sink: impl CaretSink + 'static,
    ) -> Self {
        let mut store = SegmentStore::new();
        let caret = store.create_anchor(0, Stickiness::Left);
        let mut doc = Self {
            boundary: BoundaryTracker::new(settings.prompt_marker()),
            history: CommandHistory::new(settings.history_max()),
            store,
            caret,
            settings,
            evaluator: Box::new(evaluator),
            caret_sink: Box::new(caret_sink),
        };
        doc.install_prompt();
        doc
    }

    /// Document with default settings, no evaluator and no caret sink.
    pub fn headless() -> Self {
        Self::new(ConsoleSettings::default(), |_: String| {}, NoopCaretSink)
    }

    pub fn length(&self) -> usize {
        self.store.length()
    }

    pub fn text(&self) -> String {
        self.store.text()
    }

    /// Read-only transcript access.
    pub fn text_in(&self, offset: usize, len: usize) -> Result<String, StoreError> {
        self.store.text_in(offset, len)
    }

    pub fn segments(&self) -> Vec<Segment> {
        self.store.segments()
    }

    pub fn style_at(&self, offset: usize) -> Option<Style> {
        self.store.style_at(offset)
    }

    /// First offset ordinary edits may touch.
    pub fn editable_start(&self) -> usize {
        self.boundary.editable_start()
    }

    pub fn is_prompt_active(&self) -> bool {
        self.boundary.is_active()
    }

    /// `(preprompt, editable_start)` of the installed marker.
    pub fn prompt_span(&self) -> Option<(usize, usize)> {
        self.boundary
            .preprompt_offset(&self.store)
            .map(|pre| (pre, self.editable_start()))
    }

    pub fn history(&self) -> &CommandHistory {
        &self.history
    }

    pub fn caret(&self) -> usize {
        self.store.resolve(self.caret).unwrap_or(0)
    }

    /// Host-driven caret move (click, arrow keys). Clamped to the buffer.
    pub fn move_caret(&mut self, offset: usize) {
        self.store.move_anchor(self.caret, offset);
    }

    /// Append the prompt marker and open a new editable region at the end.
    pub fn install_prompt(&mut self) {
        self.boundary.install(&mut self.store);
        self.place_caret(self.length());
    }

    /// Remove all content and install a fresh prompt.
    pub fn clear(&mut self) {
        self.boundary.reset(&mut self.store);
        let change = self.store.clear();
        debug!(target: "console.boundary", removed = change.removed, "console_cleared");
        self.history.reset_navigation();
        self.install_prompt();
    }

    /// Feed a store change to the boundary tracker.
    fn observe(&mut self, change: Change) {
        self.boundary.observe(&mut self.store, &change);
    }

    /// Apply a store result that the gate/injector already clamped. Errors
    /// here mean a clamping bug; they are logged and dropped.
    fn observe_result(&mut self, op: &'static str, result: Result<Change, StoreError>) -> bool {
        match result {
            Ok(change) => {
                self.observe(change);
                true
            }
            Err(e) => {
                error!(target: "console.gate", op, error = %e, "store_rejected_clamped_edit");
                debug_assert!(false, "{op}: {e}");
                false
            }
        }
    }

    fn place_caret(&mut self, offset: usize) {
        self.store.move_anchor(self.caret, offset);
        let at = self.caret();
        self.caret_sink.set_caret(at);
    }

    fn notify_caret(&mut self) {
        let at = self.caret();
        self.caret_sink.set_caret(at);
    }
}
