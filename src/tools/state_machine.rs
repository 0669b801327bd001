use egui::{Pos2, Rect};

use super::{RasterOp, ShapePreview, Tool, Transition};
use crate::input::PointerSample;

/// Frame-side inputs read when a sample is interpreted
#[derive(Debug, Clone, Copy)]
pub struct GestureContext {
    /// Tool selected on the frame; latched when a gesture starts
    pub tool: Tool,
    /// Shift modifier; latched when a gesture starts
    pub shift: bool,
    /// Canvas rectangle in surface coordinates
    pub canvas: Rect,
}

/// Per-gesture state of the tool state machine.
///
/// `last` is the previous pen position for freehand tools and the drag anchor for preview
/// and selection tools.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolState {
    pub is_drawing: bool,
    pub last: Pos2,
    pub was_inside_canvas: bool,
    pub shift_modifier: bool,
    pub active_tool: Tool,
}

impl Default for ToolState {
    fn default() -> Self {
        Self {
            is_drawing: false,
            last: Pos2::ZERO,
            was_inside_canvas: true,
            shift_modifier: false,
            active_tool: Tool::default(),
        }
    }
}

impl ToolState {
    /// Interpret one pointer sample. Pure: the caller applies the returned transition.
    pub fn transition(self, sample: PointerSample, ctx: GestureContext) -> (Self, Transition) {
        let mut next = self;
        let transition = match (self.is_drawing, sample.pressed) {
            (false, true) => {
                next = Self {
                    is_drawing: true,
                    last: sample.pos,
                    was_inside_canvas: true,
                    shift_modifier: ctx.shift,
                    active_tool: ctx.tool,
                };
                Transition::Begin
            }
            (false, false) => Transition::None,
            (true, true) => next.drag(sample.pos, ctx.canvas),
            (true, false) => {
                next.is_drawing = false;
                Transition::End {
                    commit: self.active_tool.commits_history(),
                }
            }
        };
        (next, transition)
    }

    /// Tool that actually handles drag samples; shift turns the pen into a line
    pub fn effective_tool(&self) -> Tool {
        if self.active_tool == Tool::Pen && self.shift_modifier {
            Tool::Line
        } else {
            self.active_tool
        }
    }

    fn drag(&mut self, pos: Pos2, canvas: Rect) -> Transition {
        let tool = self.effective_tool();
        let inside = canvas.expand(tool.margin()).contains(pos);

        // Line keeps its gesture alive outside the canvas without tracking re-entry.
        if !inside {
            if tool != Tool::Line {
                self.was_inside_canvas = false;
            }
            return Transition::None;
        }

        let anchor = self.last;
        let op = match tool {
            Tool::Pen | Tool::Eraser => {
                if !self.was_inside_canvas {
                    // Re-entry: jump to the new point instead of drawing across the canvas.
                    self.last = pos;
                    self.was_inside_canvas = true;
                    return Transition::None;
                }
                self.last = pos;
                if tool == Tool::Pen {
                    RasterOp::Stroke { from: anchor, to: pos }
                } else {
                    RasterOp::Erase { from: anchor, to: pos }
                }
            }
            Tool::Line => RasterOp::Preview(ShapePreview::Line { from: anchor, to: pos }),
            Tool::Square => RasterOp::Preview(ShapePreview::Rect {
                rect: Rect::from_two_pos(anchor, pos),
                filled: self.shift_modifier,
            }),
            Tool::Circle => RasterOp::Preview(ShapePreview::Circle {
                center: anchor,
                radius: anchor.distance(pos),
                filled: self.shift_modifier,
            }),
            Tool::Select => RasterOp::Select { anchor, current: pos },
        };
        Transition::Paint(op)
    }
}

/// Owns the [`ToolState`] of one frame and steps it sample by sample
#[derive(Debug, Clone, Default)]
pub struct ToolStateMachine {
    state: ToolState,
}

impl ToolStateMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn feed(&mut self, sample: PointerSample, ctx: GestureContext) -> Transition {
        let (next, transition) = self.state.transition(sample, ctx);
        if next.is_drawing != self.state.is_drawing {
            log::debug!(
                "{} gesture {} at ({:.1}, {:.1})",
                next.active_tool,
                if next.is_drawing { "started" } else { "ended" },
                sample.pos.x,
                sample.pos.y
            );
        }
        self.state = next;
        transition
    }

    /// End an in-flight gesture as if the pointer had been released where it last was
    pub fn release(&mut self, ctx: GestureContext) -> Transition {
        if !self.state.is_drawing {
            return Transition::None;
        }
        self.feed(PointerSample::new(self.state.last, false), ctx)
    }

    pub fn is_drawing(&self) -> bool {
        self.state.is_drawing
    }

    /// Name of the current state, for display
    pub fn current_state_name(&self) -> &'static str {
        if self.state.is_drawing {
            "Drawing"
        } else {
            "Idle"
        }
    }
}
