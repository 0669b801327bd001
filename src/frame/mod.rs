mod history;

pub use history::{DEFAULT_HISTORY_DEPTH, FrameHistory};

use egui::{Color32, Pos2, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SurfaceError;
use crate::input::PointerSample;
use crate::raster::{RasterRegion, RasterSnapshot, RasterSurface, StrokeStyle};
use crate::selection::{SELECTION_DASH, SelectionRect};
use crate::tools::{GestureContext, RasterOp, ShapePreview, Tool, ToolStateMachine, Transition};

/// Unique identifier for a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameId(Uuid);

impl FrameId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_u128(&self) -> u128 {
        self.0.as_u128()
    }
}

impl Default for FrameId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for FrameId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Frame-local tool settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToolSettings {
    pub stroke_color: Color32,
    pub stroke_width: f32,
    pub tool: Tool,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            stroke_color: Color32::BLACK,
            stroke_width: 8.0,
            tool: Tool::Pen,
        }
    }
}

impl ToolSettings {
    pub fn style(&self) -> StrokeStyle {
        StrokeStyle::new(self.stroke_color, self.stroke_width)
    }
}

/// One animation frame: its drawing surface, selection overlay, undo history and tool state
pub struct Frame<S> {
    id: FrameId,
    surface: S,
    overlay: S,
    history: FrameHistory,
    settings: ToolSettings,
    selection: SelectionRect,
    tools: ToolStateMachine,
}

impl<S> std::fmt::Debug for Frame<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("id", &self.id)
            .field("history", &self.history)
            .field("settings", &self.settings)
            .field("selection", &self.selection)
            .field("tools", &self.tools)
            .finish_non_exhaustive()
    }
}

impl<S: RasterSurface> Frame<S> {
    pub fn new(surface: S, overlay: S, settings: ToolSettings, history_depth: usize) -> Self {
        Self {
            id: FrameId::new(),
            surface,
            overlay,
            history: FrameHistory::new(history_depth),
            settings,
            selection: SelectionRect::default(),
            tools: ToolStateMachine::new(),
        }
    }

    /// A frame with fresh transparent surfaces
    pub fn blank(
        width: u32,
        height: u32,
        settings: ToolSettings,
        history_depth: usize,
    ) -> Result<Self, SurfaceError> {
        Ok(Self::new(
            S::blank(width, height)?,
            S::blank(width, height)?,
            settings,
            history_depth,
        ))
    }

    pub fn id(&self) -> FrameId {
        self.id
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Selection outline layer
    pub fn overlay(&self) -> &S {
        &self.overlay
    }

    pub fn history(&self) -> &FrameHistory {
        &self.history
    }

    pub fn settings(&self) -> &ToolSettings {
        &self.settings
    }

    pub fn selection(&self) -> &SelectionRect {
        &self.selection
    }

    /// "Idle" or "Drawing"
    pub fn tool_state_name(&self) -> &'static str {
        self.tools.current_state_name()
    }

    pub fn is_drawing(&self) -> bool {
        self.tools.is_drawing()
    }

    /// Last committed snapshot, which is also what is visible outside of gestures
    pub fn latest_snapshot(&self) -> Option<&RasterSnapshot> {
        self.history.peek()
    }

    fn gesture_context(&self, shift: bool) -> GestureContext {
        GestureContext {
            tool: self.settings.tool,
            shift,
            canvas: self.surface.bounds(),
        }
    }

    /// Feed one pointer sample through the tool state machine and apply the result
    pub fn handle_sample(&mut self, sample: PointerSample, shift: bool) {
        let transition = self.tools.feed(sample, self.gesture_context(shift));
        self.apply_transition(transition);
    }

    /// Finish an in-flight gesture as a pointer release would
    pub fn release_gesture(&mut self) {
        let transition = self.tools.release(self.gesture_context(false));
        self.apply_transition(transition);
    }

    fn apply_transition(&mut self, transition: Transition) {
        match transition {
            Transition::None => {}
            Transition::Begin => self.ensure_baseline(),
            Transition::Paint(op) => self.apply(op),
            Transition::End { commit } => {
                if commit {
                    self.commit();
                }
            }
        }
    }

    fn apply(&mut self, op: RasterOp) {
        let style = self.settings.style();
        match op {
            RasterOp::Stroke { from, to } => self.surface.draw_segment(from, to, &style),
            RasterOp::Erase { from, to } => self.surface.erase(from, to, style.width),
            RasterOp::Preview(shape) => {
                // Always redraw over the committed state so previews never accumulate.
                if let Some(committed) = self.history.peek() {
                    self.surface.restore(committed);
                }
                match shape {
                    ShapePreview::Line { from, to } => self.surface.draw_segment(from, to, &style),
                    ShapePreview::Rect { rect, filled } => self.surface.draw_rect(rect, &style, filled),
                    ShapePreview::Circle { center, radius, filled } => {
                        self.surface.draw_ellipse(center, radius, &style, filled)
                    }
                }
            }
            RasterOp::Select { anchor, current } => {
                self.overlay.clear();
                self.overlay
                    .draw_dashed_rect(Rect::from_two_pos(anchor, current), Color32::BLACK, SELECTION_DASH);
                self.selection = SelectionRect::spanning(anchor, current);
            }
        }
    }

    /// Capture the blank starting state if nothing has been committed yet
    pub fn ensure_baseline(&mut self) {
        if self.history.is_empty() {
            log::debug!("Capturing baseline for frame {}", self.id);
            self.commit();
        }
    }

    /// Push the visible raster onto the undo stack
    pub fn commit(&mut self) {
        self.history.commit(self.surface.snapshot());
        log::debug!("Frame {} committed, {} undo states", self.id, self.history.len());
    }

    /// Returns false if there was nothing to undo
    pub fn undo(&mut self) -> bool {
        if self.is_drawing() {
            log::debug!("Ignoring undo during a gesture");
            return false;
        }
        match self.history.undo() {
            Some(snapshot) => {
                self.surface.restore(snapshot);
                true
            }
            None => false,
        }
    }

    /// Returns false if there was nothing to redo
    pub fn redo(&mut self) -> bool {
        if self.is_drawing() {
            log::debug!("Ignoring redo during a gesture");
            return false;
        }
        match self.history.redo() {
            Some(snapshot) => {
                self.surface.restore(snapshot);
                true
            }
            None => false,
        }
    }

    /// Make the surface show the latest committed state again
    pub fn restore_latest(&mut self) {
        match self.history.peek() {
            Some(snapshot) => self.surface.restore(snapshot),
            None => self.surface.clear(),
        }
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.release_gesture();
        if self.settings.tool != tool {
            log::info!("Frame {} tool: {} -> {}", self.id, self.settings.tool, tool);
        }
        self.settings.tool = tool;
        self.deselect();
    }

    pub fn set_stroke_color(&mut self, color: Color32) {
        self.settings.stroke_color = color;
    }

    pub fn set_stroke_width(&mut self, width: f32) {
        if width.is_finite() && width > 0.0 {
            self.settings.stroke_width = width;
        }
    }

    pub fn deselect(&mut self) {
        self.overlay.clear();
        self.selection = SelectionRect::default();
    }

    /// Pixels under the active selection
    pub fn copy_selection(&self) -> Option<RasterRegion> {
        let rect = self.selection.rect()?;
        self.surface.read_region(rect)
    }

    /// Clear the selected area and commit. Returns false without an active selection.
    pub fn delete_selection(&mut self) -> bool {
        self.release_gesture();
        let Some(rect) = self.selection.rect() else {
            return false;
        };
        self.ensure_baseline();
        self.surface.clear_rect(rect);
        self.commit();
        true
    }

    /// Composite `region` at `at` and commit
    pub fn paste(&mut self, region: &RasterRegion, at: Pos2) {
        self.release_gesture();
        self.ensure_baseline();
        self.surface.put_region(region, at);
        self.commit();
    }
}
