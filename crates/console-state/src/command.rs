//! Command line extraction, replacement, submission and history recall.

use tracing::{debug, info};

use crate::ConsoleDocument;

impl ConsoleDocument {
    /// Raw command line: everything from `editable_start` to the end.
    pub fn command_text(&self) -> String {
        let start = self.editable_start().min(self.length());
        self.store
            .text_in(start, self.length() - start)
            .unwrap_or_default()
    }

    /// Command line with surrounding whitespace trimmed.
    pub fn current_command(&self) -> String {
        self.command_text().trim().to_string()
    }

    /// Overwrite the whole command line (history recall). Goes through the
    /// edit gate so the transcript and marker stay untouched. Terminators in
    /// `new_text` are dropped: replacing the command line never submits it.
    pub fn replace_command(&mut self, new_text: &str) {
        let line: String = new_text
            .chars()
            .filter(|c| !self.settings.is_terminator(*c))
            .collect();
        if line.len() != new_text.len() {
            debug!(target: "console.gate", len = new_text.len(), kept = line.len(), "replace_command_terminators_dropped");
        }
        let start = self.editable_start();
        let len = self.length().saturating_sub(start);
        self.replace_editable(start, len, &line);
    }

    /// Freeze the command line into the transcript, hand it to the evaluator
    /// and open a fresh prompt. The evaluator also sees empty commands.
    pub fn submit(&mut self) {
        let command = self.current_command();
        self.append_newline();
        self.history.record(&command);
        info!(target: "console.submit", len = command.len(), revision = self.store.revision(), "command_submitted");
        self.evaluator.eval_command(command);
        self.install_prompt();
    }

    /// Recall the previous (older) history entry. Returns whether the command line changed.
    pub fn history_previous(&mut self) -> bool {
        let current = self.command_text();
        let Some(entry) = self.history.older(&current).map(str::to_string) else {
            return false;
        };
        debug!(target: "console.history", len = entry.len(), "recall_previous");
        self.replace_command(&entry);
        true
    }

    /// Recall the next (newer) entry, or the saved draft past the newest one.
    pub fn history_next(&mut self) -> bool {
        let Some(entry) = self.history.newer() else {
            return false;
        };
        debug!(target: "console.history", len = entry.len(), "recall_next");
        self.replace_command(&entry);
        true
    }
}
