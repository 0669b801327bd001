use std::str::FromStr;

use egui::{Pos2, Rect};
use serde::{Deserialize, Serialize};

use crate::error::FlipbookError;

mod state_machine;
pub use state_machine::{GestureContext, ToolState, ToolStateMachine};

/// Drawing tools available on every frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Tool {
    #[default]
    Pen,
    Eraser,
    Line,
    Square,
    Circle,
    Select,
}

impl Tool {
    pub const ALL: [Tool; 6] = [
        Tool::Pen,
        Tool::Eraser,
        Tool::Line,
        Tool::Square,
        Tool::Circle,
        Tool::Select,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Pen => "PEN",
            Self::Eraser => "ERASER",
            Self::Line => "LINE",
            Self::Square => "SQUARE",
            Self::Circle => "CIRCLE",
            Self::Select => "SELECT",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::Pen => "🖊",
            Self::Eraser => "⌫",
            Self::Line => "╱",
            Self::Square => "□",
            Self::Circle => "○",
            Self::Select => "⬚",
        }
    }

    /// Whether finishing a gesture with this tool creates an undo entry
    pub fn commits_history(&self) -> bool {
        !matches!(self, Self::Select)
    }

    /// How far outside the canvas a sample may land and still count as inside
    pub(crate) fn margin(&self) -> f32 {
        match self {
            Self::Pen | Self::Eraser => 15.0,
            Self::Line => 5.0,
            Self::Square | Self::Circle | Self::Select => 0.0,
        }
    }
}

impl std::fmt::Display for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Tool {
    type Err = FlipbookError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tool::ALL
            .into_iter()
            .find(|tool| tool.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| FlipbookError::UnknownTool(s.to_owned()))
    }
}

/// Shape drawn by a preview tool over the last committed snapshot
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapePreview {
    Line { from: Pos2, to: Pos2 },
    Rect { rect: Rect, filled: bool },
    Circle { center: Pos2, radius: f32, filled: bool },
}

/// A single raster mutation requested by the tool state machine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RasterOp {
    /// Paint a segment with the frame's stroke style
    Stroke { from: Pos2, to: Pos2 },
    /// Remove pixels along a segment with the frame's stroke width
    Erase { from: Pos2, to: Pos2 },
    /// Restore the committed snapshot, then draw the shape
    Preview(ShapePreview),
    /// Redraw the selection outline on the overlay and update the selection
    Select { anchor: Pos2, current: Pos2 },
}

/// Outcome of feeding one pointer sample to the state machine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    /// Nothing to do
    None,
    /// A gesture started; the frame captures a baseline if it has no history yet
    Begin,
    Paint(RasterOp),
    /// The gesture finished; `commit` tells whether the visible raster enters history
    End { commit: bool },
}
