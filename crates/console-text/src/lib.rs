//! Styled, anchor-tracking text storage for the scripting console.
//!
//! The buffer is a `ropey::Rope` holding the characters plus a run-length list
//! of [`Style`] tags describing them. Offsets everywhere in this crate are
//! counted in chars (Unicode scalar values), matching the rope's native index.
//!
//! Positions that must survive structural edits are expressed as anchors
//! ([`AnchorId`]) living in a generation-tagged arena owned by the store. Every
//! mutation rewrites all live anchors inside the same call so no observer can
//! ever resolve an anchor against a half-applied edit.

pub mod anchor;
pub mod store;

pub use anchor::{AnchorArena, AnchorId, Stickiness};
pub use store::{Segment, SegmentStore};

use thiserror::Error;

/// Presentation class of a run of console text.
///
/// Styling itself (colors, fonts) belongs to the host view; the buffer only
/// remembers which class every character belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Style {
    Error,
    Echo,
    Prompt,
    UserInput,
    Status,
}

impl Style {
    pub fn as_str(self) -> &'static str {
        match self {
            Style::Error => "error",
            Style::Echo => "echo",
            Style::Prompt => "prompt",
            Style::UserInput => "input",
            Style::Status => "status",
        }
    }
}

/// Errors raised by the low-level store API.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// `offset`/`len` reach outside `[0, length]`.
    #[error("range {offset}+{len} outside buffer of length {length}")]
    OutOfRange {
        offset: usize,
        len: usize,
        length: usize,
    },
}

/// Kind of structural mutation reported by a [`Change`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Insert,
    Delete,
    Replace,
    Clear,
}

/// Structural-change event returned by every store mutation.
///
/// `removed` chars were taken out at `offset`, then `inserted` chars were put
/// in at the same offset. `revision` is the store revision after the edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Change {
    pub kind: ChangeKind,
    pub offset: usize,
    pub removed: usize,
    pub inserted: usize,
    pub revision: u64,
}

impl Change {
    /// True when the edit left the content untouched (empty insert / zero-length delete).
    pub fn is_noop(&self) -> bool {
        self.removed == 0 && self.inserted == 0
    }

    /// Net change of the buffer length.
    pub fn delta(&self) -> isize {
        self.inserted as isize - self.removed as isize
    }
}
