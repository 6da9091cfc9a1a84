//! Prompt boundary tracking.
//!
//! The tracker owns two anchors into the store:
//! - `preprompt`: left-sticky, on the first char of the prompt marker;
//! - `postprompt`: right-sticky, on the last char of the marker.
//!
//! `editable_start` (one past the marker) is derived from `postprompt` after
//! every structural change and is the only value the edit gate consults.
//! Text inserted at `preprompt`'s own offset (injected transcript lines) leaves
//! the left-sticky anchor in front of the new text, so `observe` re-seats it
//! onto the marker it describes.

use console_config::DEFAULT_PROMPT_MARKER;
use console_text::{AnchorId, Change, SegmentStore, Stickiness, Style};
use tracing::{debug, error};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryState {
    NoPrompt,
    PromptActive {
        preprompt: AnchorId,
        postprompt: AnchorId,
    },
}

#[derive(Debug, Clone)]
pub struct BoundaryTracker {
    state: BoundaryState,
    marker: String,
    marker_len: usize,
    editable_start: usize,
}

impl BoundaryTracker {
    /// An empty marker cannot carry the boundary anchors; it is replaced by
    /// the default one.
    pub fn new(marker: impl Into<String>) -> Self {
        let mut marker = marker.into();
        if marker.is_empty() {
            error!(target: "console.boundary", "empty_marker_using_default");
            marker = DEFAULT_PROMPT_MARKER.to_string();
        }
        let marker_len = marker.chars().count();
        Self {
            state: BoundaryState::NoPrompt,
            marker,
            marker_len,
            editable_start: 0,
        }
    }

    pub fn state(&self) -> BoundaryState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, BoundaryState::PromptActive { .. })
    }

    pub fn editable_start(&self) -> usize {
        self.editable_start
    }

    pub fn preprompt_offset(&self, store: &SegmentStore) -> Option<usize> {
        match self.state {
            BoundaryState::PromptActive { preprompt, .. } => store.resolve(preprompt),
            BoundaryState::NoPrompt => None,
        }
    }

    pub fn postprompt_offset(&self, store: &SegmentStore) -> Option<usize> {
        match self.state {
            BoundaryState::PromptActive { postprompt, .. } => store.resolve(postprompt),
            BoundaryState::NoPrompt => None,
        }
    }

    /// Append the marker at the end of the buffer and anchor a new boundary on it.
    pub fn install(&mut self, store: &mut SegmentStore) -> Change {
        self.release(store);
        let change = store.insert(store.length(), &self.marker, Style::Prompt);
        let end = store.length();
        let preprompt = store.create_anchor(end - self.marker_len, Stickiness::Left);
        let postprompt = store.create_anchor(end - 1, Stickiness::Right);
        self.state = BoundaryState::PromptActive {
            preprompt,
            postprompt,
        };
        self.editable_start = end;
        debug!(target: "console.boundary", editable_start = end, revision = change.revision, "prompt_installed");
        change
    }

    /// Drop the boundary (used by `clear`).
    pub fn reset(&mut self, store: &mut SegmentStore) {
        self.release(store);
        self.editable_start = 0;
    }

    fn release(&mut self, store: &mut SegmentStore) {
        if let BoundaryState::PromptActive {
            preprompt,
            postprompt,
        } = self.state
        {
            store.release_anchor(preprompt);
            store.release_anchor(postprompt);
        }
        self.state = BoundaryState::NoPrompt;
    }

    /// Recompute `editable_start` after a structural change.
    pub fn observe(&mut self, store: &mut SegmentStore, change: &Change) {
        let BoundaryState::PromptActive {
            preprompt,
            postprompt,
        } = self.state
        else {
            return;
        };
        let (Some(pre), Some(post)) = (store.resolve(preprompt), store.resolve(postprompt)) else {
            error!(target: "console.boundary", revision = change.revision, "boundary_anchor_stale");
            debug_assert!(false, "boundary anchors released while prompt active");
            return;
        };
        if pre > post {
            error!(target: "console.boundary", pre, post, revision = change.revision, "boundary_violation");
            debug_assert!(pre <= post, "boundary violation: preprompt {pre} > postprompt {post}");
        }
        let marker_start = (post + 1).saturating_sub(self.marker_len);
        if pre != marker_start {
            store.move_anchor(preprompt, marker_start);
        }
        self.editable_start = post + 1;
    }

    /// True when `[preprompt, editable_start)` still spells the marker.
    pub fn marker_intact(&self, store: &SegmentStore) -> bool {
        match self.preprompt_offset(store) {
            Some(pre) => store
                .text_in(pre, self.marker_len)
                .map(|t| t == self.marker && pre + self.marker_len == self.editable_start)
                .unwrap_or(false),
            None => false,
        }
    }
}
