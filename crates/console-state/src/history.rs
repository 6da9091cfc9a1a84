use std::collections::VecDeque;
use tracing::trace;

/// Bounded list of submitted commands with arrow-key style navigation.
///
/// Navigation keeps a cursor into the list (`None` = editing a fresh line).
/// The line the user was typing when navigation started is kept as a draft so
/// walking back past the newest entry restores it.
#[derive(Debug, Clone)]
pub struct CommandHistory {
    entries: VecDeque<String>,
    max_entries: usize,
    cursor: Option<usize>,
    draft: Option<String>,
}

impl CommandHistory {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            max_entries,
            cursor: None,
            draft: None,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn is_navigating(&self) -> bool {
        self.cursor.is_some()
    }

    /// Record a submitted command and end any navigation.
    pub fn record(&mut self, command: &str) {
        self.reset_navigation();
        if command.is_empty() || self.max_entries == 0 {
            return;
        }
        if self.entries.back().map(String::as_str) == Some(command) {
            trace!(target: "console.history", len = self.entries.len(), "history_duplicate_skip");
            return;
        }
        self.entries.push_back(command.to_string());
        if self.entries.len() > self.max_entries {
            self.entries.pop_front();
            trace!(target: "console.history", "history_trimmed");
        }
        trace!(target: "console.history", len = self.entries.len(), "history_record");
    }

    /// Step to the next older entry. `current` is the live command line, saved
    /// as the draft when navigation starts. Returns `None` when there is
    /// nothing older.
    pub fn older(&mut self, current: &str) -> Option<&str> {
        let next = match self.cursor {
            None if self.entries.is_empty() => return None,
            None => {
                self.draft = Some(current.to_string());
                self.entries.len() - 1
            }
            Some(0) => return None,
            Some(i) => i - 1,
        };
        self.cursor = Some(next);
        trace!(target: "console.history", cursor = next, "history_older");
        self.entries.get(next).map(String::as_str)
    }

    /// Step to the next newer entry; past the newest, the saved draft comes
    /// back and navigation ends. `None` when not navigating.
    pub fn newer(&mut self) -> Option<String> {
        let i = self.cursor?;
        if i + 1 < self.entries.len() {
            self.cursor = Some(i + 1);
            trace!(target: "console.history", cursor = i + 1, "history_newer");
            return self.entries.get(i + 1).cloned();
        }
        self.cursor = None;
        trace!(target: "console.history", "history_draft_restored");
        Some(self.draft.take().unwrap_or_default())
    }

    pub fn reset_navigation(&mut self) {
        self.cursor = None;
        self.draft = None;
    }
}
