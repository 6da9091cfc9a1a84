//! Injector: transcript lines from the evaluator side.
//!
//! `inject` splices a line in directly above the prompt marker. The command
//! line and the caret keep their place relative to the text the user is
//! editing, so output arriving mid-edit never disturbs typing.

use console_text::Style;
use tracing::debug;

use crate::ConsoleDocument;

impl ConsoleDocument {
    /// Insert `text + "\n"` above the prompt.
    ///
    /// A caret at or after the editable boundary moves with the command line
    /// (`caret + len(text) + 1`); a caret inside the transcript stays put.
    /// Without an installed prompt this degrades to [`Self::inject_at_tail`].
    pub fn inject(&mut self, text: &str, style: Style) {
        let Some(at) = self.boundary.preprompt_offset(&self.store) else {
            self.inject_at_tail(text, style);
            return;
        };
        let caret = self.caret();
        let boundary = self.editable_start();
        let line = format!("{text}\n");
        let change = self.store.insert(at, &line, style);
        self.observe(change);
        let restored = if caret >= boundary {
            caret + change.inserted
        } else {
            caret
        };
        debug!(target: "console.inject", style = style.as_str(), len = change.inserted, at, editable_start = self.editable_start(), "inject_above_prompt");
        self.place_caret(restored);
        debug_assert!(self.boundary.marker_intact(&self.store));
    }

    pub fn inject_error(&mut self, text: &str) {
        self.inject(text, Style::Error);
    }

    pub fn inject_echo(&mut self, text: &str) {
        self.inject(text, Style::Echo);
    }

    pub fn inject_status(&mut self, text: &str) {
        self.inject(text, Style::Status);
    }

    /// Append `text + "\n"` on its own line after the command line and move the
    /// caret to the end. An unterminated command line is closed with a newline first.
    pub fn inject_at_tail(&mut self, text: &str, style: Style) {
        let length = self.length();
        if length > 0 && self.store.text_in(length - 1, 1).is_ok_and(|last| last != "\n") {
            self.append_newline();
        }
        let line = format!("{text}\n");
        let change = self.store.insert(self.length(), &line, style);
        self.observe(change);
        debug!(target: "console.inject", style = style.as_str(), len = change.inserted, "inject_at_tail");
        self.place_caret(self.length());
    }

    /// Foreground error: appended at the tail instead of above the prompt.
    pub fn inject_error_foreground(&mut self, text: &str) {
        self.inject_at_tail(text, Style::Error);
    }

    /// Append a bare newline styled as user input.
    pub fn append_newline(&mut self) {
        let change = self.store.insert(self.length(), "\n", Style::UserInput);
        self.observe(change);
        self.place_caret(self.length());
    }
}
