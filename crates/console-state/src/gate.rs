//! Edit gate: the user-facing mutation surface.
//!
//! Requests are clipped into `[editable_start, length]` rather than rejected:
//! a keystroke aimed at the transcript lands on the command line, a deletion
//! that overlaps the transcript only removes its editable part. None of these
//! operations fail.

use console_text::Style;
use tracing::debug;

use crate::ConsoleDocument;

/// Where a clipped delete/replace ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Clipped {
    pub offset: usize,
    pub len: usize,
}

/// Clip `[offset, offset + len)` so it starts no earlier than `boundary` and
/// ends no later than `length`. `None` when nothing editable remains.
pub(crate) fn clip_range(offset: usize, len: usize, boundary: usize, length: usize) -> Option<Clipped> {
    let end = offset.saturating_add(len).min(length);
    let start = offset.max(boundary);
    if end <= start {
        return None;
    }
    Some(Clipped {
        offset: start,
        len: end - start,
    })
}

/// Target range for a replace: entirely-transcript ranges are redirected to a
/// zero-length range at the tail, others are clipped to the editable region.
pub(crate) fn replace_target(offset: usize, len: usize, boundary: usize, length: usize) -> Clipped {
    let end = offset.saturating_add(len);
    if offset < boundary && end < boundary {
        return Clipped {
            offset: length,
            len: 0,
        };
    }
    let start = offset.max(boundary).min(length);
    Clipped {
        offset: start,
        len: end.min(length).saturating_sub(start),
    }
}

impl ConsoleDocument {
    /// Split `text` at the first terminator: `(line, terminated)`.
    pub(crate) fn split_terminated<'t>(&self, text: &'t str) -> (&'t str, bool) {
        match text.find(|c: char| self.settings.is_terminator(c)) {
            Some(i) => (&text[..i], true),
            None => (text, false),
        }
    }

    /// Insert typed/pasted text. Text aimed below the boundary is moved to the
    /// end of the buffer; a terminator submits the command line.
    pub fn user_insert(&mut self, offset: usize, text: &str) {
        let (line, terminated) = self.split_terminated(text);
        if !line.is_empty() {
            let length = self.length();
            let at = if offset < self.editable_start() {
                debug!(target: "console.gate", offset, editable_start = self.editable_start(), "insert_redirected_to_tail");
                length
            } else {
                offset.min(length)
            };
            let change = self.store.insert(at, line, Style::UserInput);
            self.observe(change);
            self.place_caret(at + change.inserted);
        }
        if terminated {
            self.submit();
        }
    }

    /// Delete the editable part of `[offset, offset + len)`.
    pub fn user_delete(&mut self, offset: usize, len: usize) {
        let Some(clip) = clip_range(offset, len, self.editable_start(), self.length()) else {
            debug!(target: "console.gate", offset, len, editable_start = self.editable_start(), "delete_discarded");
            return;
        };
        if clip.offset != offset || clip.len != len {
            debug!(target: "console.gate", offset, len, to_offset = clip.offset, to_len = clip.len, "delete_clipped");
        }
        let result = self.store.delete(clip.offset, clip.len);
        if self.observe_result("user_delete", result) {
            self.notify_caret();
        }
    }

    /// Replace a range with user text. The replacement is always styled
    /// `UserInput`; a terminator in `text` submits after the replace.
    pub fn user_replace(&mut self, offset: usize, len: usize, text: &str) {
        let (line, terminated) = self.split_terminated(text);
        self.replace_editable(offset, len, line);
        if terminated {
            self.submit();
        }
    }

    /// Clip `[offset, offset + len)` to the command line and replace it with
    /// `line`, which must not contain a terminator.
    pub(crate) fn replace_editable(&mut self, offset: usize, len: usize, line: &str) {
        let target = replace_target(offset, len, self.editable_start(), self.length());
        if target.offset != offset || target.len != len {
            debug!(target: "console.gate", offset, len, to_offset = target.offset, to_len = target.len, "replace_clipped");
        }
        if target.len == 0 && line.is_empty() {
            return;
        }
        let result = self
            .store
            .replace(target.offset, target.len, line, Style::UserInput);
        let inserted = result.as_ref().map(|c| c.inserted).unwrap_or(0);
        if self.observe_result("user_replace", result) {
            self.place_caret(target.offset + inserted);
        }
    }
}
