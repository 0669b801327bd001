use egui::{Pos2, Rect};
use serde::{Deserialize, Serialize};

/// Dash pattern of the selection outline, `[on, off]` pixels
pub const SELECTION_DASH: [u32; 2] = [5, 3];

/// Rectangular selection of one frame, stored as the drag anchor and the current corner
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SelectionRect {
    pub active: bool,
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl SelectionRect {
    pub fn spanning(anchor: Pos2, current: Pos2) -> Self {
        Self {
            active: true,
            x1: anchor.x,
            y1: anchor.y,
            x2: current.x,
            y2: current.y,
        }
    }

    pub fn anchor(&self) -> Pos2 {
        Pos2::new(self.x1, self.y1)
    }

    pub fn corner(&self) -> Pos2 {
        Pos2::new(self.x2, self.y2)
    }

    /// Normalised rectangle, or `None` when nothing is selected
    pub fn rect(&self) -> Option<Rect> {
        self.active
            .then(|| Rect::from_two_pos(self.anchor(), self.corner()))
    }
}
