//! Rope-backed styled segment store.

use ropey::Rope;
use tracing::trace;

use crate::anchor::{AnchorArena, AnchorId, Stickiness};
use crate::{Change, ChangeKind, StoreError, Style};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Run {
    len: usize,
    style: Style,
}

/// A `(text, style)` run as exposed to readers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub text: String,
    pub style: Style,
}

/// Ordered sequence of styled runs with anchor tracking.
///
/// Invariants:
/// - the sum of run lengths equals `rope.len_chars()`;
/// - no run is empty and no two adjacent runs share a style.
#[derive(Debug, Clone, Default)]
pub struct SegmentStore {
    rope: Rope,
    runs: Vec<Run>,
    anchors: AnchorArena,
    revision: u64,
}

impl SegmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total length in chars.
    pub fn length(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn is_empty(&self) -> bool {
        self.length() == 0
    }

    /// Mutation counter; bumped by every non-empty edit.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Whole buffer content.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Text in `[offset, offset + len)`.
    pub fn text_in(&self, offset: usize, len: usize) -> Result<String, StoreError> {
        let end = self.checked_end(offset, len)?;
        Ok(self.rope.slice(offset..end).to_string())
    }

    /// Styled runs in buffer order.
    pub fn segments(&self) -> Vec<Segment> {
        let mut start = 0;
        self.runs
            .iter()
            .map(|run| {
                let end = start + run.len;
                let seg = Segment {
                    text: self.rope.slice(start..end).to_string(),
                    style: run.style,
                };
                start = end;
                seg
            })
            .collect()
    }

    /// Style of the char at `offset`, `None` past the end.
    pub fn style_at(&self, offset: usize) -> Option<Style> {
        let mut start = 0;
        for run in &self.runs {
            if offset < start + run.len {
                return Some(run.style);
            }
            start += run.len;
        }
        None
    }

    /// Insert `text` styled `style` at `offset` (clamped to `[0, length]`).
    pub fn insert(&mut self, offset: usize, text: &str, style: Style) -> Change {
        let at = offset.min(self.length());
        let inserted = self.insert_raw(at, text, style);
        self.finish(ChangeKind::Insert, at, 0, inserted)
    }

    /// Remove `len` chars starting at `offset`.
    pub fn delete(&mut self, offset: usize, len: usize) -> Result<Change, StoreError> {
        self.checked_end(offset, len)?;
        self.delete_raw(offset, len);
        Ok(self.finish(ChangeKind::Delete, offset, len, 0))
    }

    /// Replace `[offset, offset + len)` with `text` styled `style`.
    ///
    /// Anchors observe the removal first, then the insertion at `offset`, so a
    /// left-sticky anchor inside the range ends up in front of the new text and
    /// a right-sticky one behind it.
    pub fn replace(
        &mut self,
        offset: usize,
        len: usize,
        text: &str,
        style: Style,
    ) -> Result<Change, StoreError> {
        self.checked_end(offset, len)?;
        self.delete_raw(offset, len);
        let inserted = self.insert_raw(offset, text, style);
        Ok(self.finish(ChangeKind::Replace, offset, len, inserted))
    }

    /// Remove all content. Live anchors collapse onto offset 0.
    pub fn clear(&mut self) -> Change {
        let removed = self.length();
        self.delete_raw(0, removed);
        self.finish(ChangeKind::Clear, 0, removed, 0)
    }

    pub fn create_anchor(&mut self, offset: usize, stickiness: Stickiness) -> AnchorId {
        self.anchors.create(offset.min(self.length()), stickiness)
    }

    pub fn resolve(&self, id: AnchorId) -> Option<usize> {
        self.anchors.resolve(id)
    }

    /// Re-seat a live anchor (offset clamped). Returns false for stale handles.
    pub fn move_anchor(&mut self, id: AnchorId, offset: usize) -> bool {
        let offset = offset.min(self.length());
        self.anchors.set(id, offset)
    }

    pub fn release_anchor(&mut self, id: AnchorId) -> bool {
        self.anchors.release(id)
    }

    pub fn live_anchors(&self) -> usize {
        self.anchors.live()
    }

    fn checked_end(&self, offset: usize, len: usize) -> Result<usize, StoreError> {
        let length = self.length();
        match offset.checked_add(len) {
            Some(end) if offset <= length && end <= length => Ok(end),
            _ => Err(StoreError::OutOfRange {
                offset,
                len,
                length,
            }),
        }
    }

    fn insert_raw(&mut self, at: usize, text: &str, style: Style) -> usize {
        let len = text.chars().count();
        if len == 0 {
            return 0;
        }
        self.rope.insert(at, text);
        let idx = self.split_runs_at(at);
        self.runs.insert(idx, Run { len, style });
        self.coalesce();
        self.anchors.on_insert(at, len);
        len
    }

    fn delete_raw(&mut self, at: usize, len: usize) {
        if len == 0 {
            return;
        }
        self.rope.remove(at..at + len);
        let first = self.split_runs_at(at);
        let last = self.split_runs_at(at + len);
        self.runs.drain(first..last);
        self.coalesce();
        self.anchors.on_delete(at, len);
    }

    /// Split the run straddling `offset` so a run boundary sits exactly there.
    /// Returns the index of the first run starting at or after `offset`.
    fn split_runs_at(&mut self, offset: usize) -> usize {
        let mut start = 0;
        for i in 0..self.runs.len() {
            if offset == start {
                return i;
            }
            let run = self.runs[i];
            if offset < start + run.len {
                let head = offset - start;
                self.runs[i].len = head;
                self.runs.insert(
                    i + 1,
                    Run {
                        len: run.len - head,
                        style: run.style,
                    },
                );
                return i + 1;
            }
            start += run.len;
        }
        self.runs.len()
    }

    fn coalesce(&mut self) {
        let mut merged: Vec<Run> = Vec::with_capacity(self.runs.len());
        for run in self.runs.drain(..).filter(|r| r.len > 0) {
            match merged.last_mut() {
                Some(prev) if prev.style == run.style => prev.len += run.len,
                _ => merged.push(run),
            }
        }
        self.runs = merged;
        debug_assert_eq!(
            self.runs.iter().map(|r| r.len).sum::<usize>(),
            self.rope.len_chars()
        );
    }

    fn finish(&mut self, kind: ChangeKind, offset: usize, removed: usize, inserted: usize) -> Change {
        if removed > 0 || inserted > 0 {
            self.revision += 1;
        }
        trace!(target: "console.store", ?kind, offset, removed, inserted, length = self.length(), revision = self.revision, "mutation");
        Change {
            kind,
            offset,
            removed,
            inserted,
            revision: self.revision,
        }
    }
}
