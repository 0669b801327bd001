use std::collections::VecDeque;

use crate::raster::RasterSnapshot;

/// Default number of snapshots kept per frame
pub const DEFAULT_HISTORY_DEPTH: usize = 50;

/// Bounded undo/redo history of raster snapshots for one frame.
///
/// The top of the undo stack is always the raster state currently visible. The bottom
/// entry is the baseline and is never undone away.
pub struct FrameHistory {
    /// Oldest first; bounded to `capacity`
    undo_stack: VecDeque<RasterSnapshot>,
    /// Most recently undone last
    redo_stack: Vec<RasterSnapshot>,
    capacity: usize,
}

impl Default for FrameHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_DEPTH)
    }
}

impl std::fmt::Debug for FrameHistory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameHistory")
            .field("undo", &self.undo_stack.len())
            .field("redo", &self.redo_stack.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}

impl FrameHistory {
    /// Creates an empty history keeping at most `capacity` snapshots (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            undo_stack: VecDeque::with_capacity(capacity),
            redo_stack: Vec::new(),
            capacity,
        }
    }

    /// Push a new visible state. Evicts the oldest snapshot when full and drops the redo branch.
    pub fn commit(&mut self, snapshot: RasterSnapshot) {
        if self.undo_stack.len() >= self.capacity {
            if let Some(evicted) = self.undo_stack.pop_front() {
                log::debug!("History full, evicting snapshot {}", evicted.id());
            }
        }
        self.undo_stack.push_back(snapshot);
        self.redo_stack.clear();
    }

    /// Step back one state. Returns the snapshot that is now visible, or `None` if only
    /// the baseline is left.
    pub fn undo(&mut self) -> Option<&RasterSnapshot> {
        if self.undo_stack.len() < 2 {
            return None;
        }
        let undone = self.undo_stack.pop_back()?;
        self.redo_stack.push(undone);
        self.undo_stack.back()
    }

    /// Re-apply the most recently undone state and return it
    pub fn redo(&mut self) -> Option<&RasterSnapshot> {
        let redone = self.redo_stack.pop()?;
        self.undo_stack.push_back(redone);
        self.undo_stack.back()
    }

    /// The currently visible committed state
    pub fn peek(&self) -> Option<&RasterSnapshot> {
        self.undo_stack.back()
    }

    pub fn is_empty(&self) -> bool {
        self.undo_stack.is_empty()
    }

    /// Number of snapshots on the undo stack, baseline included
    pub fn len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn can_undo(&self) -> bool {
        self.undo_stack.len() >= 2
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Iterate the undo stack oldest first
    pub fn snapshots(&self) -> impl Iterator<Item = &RasterSnapshot> {
        self.undo_stack.iter()
    }
}
