//! Generation-tagged anchor arena.
//!
//! An anchor is stored as an absolute char offset that is rewritten on every
//! structural edit (see [`AnchorArena::on_insert`] / [`AnchorArena::on_delete`]).
//! Handles carry the slot generation they were issued for; once a slot is
//! released or the arena is cleared, stale handles resolve to `None` instead of
//! silently aliasing a newer anchor that reused the slot.

/// How an anchor reacts to text inserted exactly at its own offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stickiness {
    /// Stays in front of the inserted text (offset unchanged).
    Left,
    /// Moves past the inserted text (offset advances by the inserted length).
    Right,
}

/// Stable handle to an anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnchorId {
    index: u32,
    generation: u32,
}

#[derive(Debug, Clone, Copy)]
struct AnchorEntry {
    offset: usize,
    stickiness: Stickiness,
}

#[derive(Debug, Clone, Default)]
struct Slot {
    generation: u32,
    entry: Option<AnchorEntry>,
}

#[derive(Debug, Clone, Default)]
pub struct AnchorArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
}

impl AnchorArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live anchors.
    pub fn live(&self) -> usize {
        self.slots.iter().filter(|s| s.entry.is_some()).count()
    }

    pub fn create(&mut self, offset: usize, stickiness: Stickiness) -> AnchorId {
        let entry = Some(AnchorEntry { offset, stickiness });
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.entry = entry;
            return AnchorId {
                index,
                generation: slot.generation,
            };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            entry,
        });
        AnchorId {
            index,
            generation: 0,
        }
    }

    fn entry(&self, id: AnchorId) -> Option<&AnchorEntry> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.entry.as_ref()
    }

    fn entry_mut(&mut self, id: AnchorId) -> Option<&mut AnchorEntry> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.entry.as_mut()
    }

    /// Current offset of the anchor, or `None` for a released/stale handle.
    pub fn resolve(&self, id: AnchorId) -> Option<usize> {
        self.entry(id).map(|e| e.offset)
    }

    /// Re-seat a live anchor. Returns false for stale handles.
    pub fn set(&mut self, id: AnchorId, offset: usize) -> bool {
        match self.entry_mut(id) {
            Some(e) => {
                e.offset = offset;
                true
            }
            None => false,
        }
    }

    /// Release an anchor; its slot is recycled under a new generation.
    pub fn release(&mut self, id: AnchorId) -> bool {
        let Some(slot) = self.slots.get_mut(id.index as usize) else {
            return false;
        };
        if slot.generation != id.generation || slot.entry.is_none() {
            return false;
        }
        slot.entry = None;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(id.index);
        true
    }

    /// Shift anchors for `len` chars inserted at `at`.
    pub fn on_insert(&mut self, at: usize, len: usize) {
        if len == 0 {
            return;
        }
        for e in self.slots.iter_mut().filter_map(|s| s.entry.as_mut()) {
            let moves = match e.stickiness {
                Stickiness::Left => at < e.offset,
                Stickiness::Right => at <= e.offset,
            };
            if moves {
                e.offset += len;
            }
        }
    }

    /// Shift anchors for `len` chars removed starting at `at`. Anchors inside
    /// the removed range collapse onto `at`.
    pub fn on_delete(&mut self, at: usize, len: usize) {
        if len == 0 {
            return;
        }
        let end = at + len;
        for e in self.slots.iter_mut().filter_map(|s| s.entry.as_mut()) {
            if e.offset >= end {
                e.offset -= len;
            } else if e.offset > at {
                e.offset = at;
            }
        }
    }
}
