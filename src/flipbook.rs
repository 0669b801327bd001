use egui::{Color32, Pos2};

use crate::config::{EditorConfig, OnionSkin};
use crate::error::SurfaceError;
use crate::frame::{Frame, ToolSettings};
use crate::input::PointerSample;
use crate::raster::{RasterRegion, RasterSurface};
use crate::tools::Tool;

/// Ordered, append-only sequence of frames with the current-frame pointer, the onion-skin
/// overlay and the session clipboard.
///
/// All navigation goes through this type so the current frame, its settings and its
/// selection can never drift apart.
pub struct Flipbook<S> {
    frames: Vec<Frame<S>>,
    current: usize,
    onion_skin: OnionSkin,
    onion_overlay: S,
    clipboard: Option<RasterRegion>,
    width: u32,
    height: u32,
    history_depth: usize,
}

impl<S> std::fmt::Debug for Flipbook<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Flipbook")
            .field("frames", &self.frames.len())
            .field("current", &self.current)
            .field("onion_skin", &self.onion_skin)
            .field("clipboard", &self.clipboard)
            .finish_non_exhaustive()
    }
}

impl<S: RasterSurface> Flipbook<S> {
    /// Creates a flipbook holding one blank frame
    pub fn new(config: &EditorConfig) -> Result<Self, SurfaceError> {
        let settings = ToolSettings {
            stroke_color: config.stroke_color,
            stroke_width: config.stroke_width,
            tool: Tool::default(),
        };
        let (width, height) = (config.canvas_width, config.canvas_height);
        let first = Frame::blank(width, height, settings, config.history_depth)?;
        Ok(Self {
            frames: vec![first],
            current: 0,
            onion_skin: config.onion_skin,
            onion_overlay: S::blank(width, height)?,
            clipboard: None,
            width,
            height,
            history_depth: config.history_depth,
        })
    }

    pub fn frames(&self) -> &[Frame<S>] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always false; a flipbook holds at least one frame
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> &Frame<S> {
        &self.frames[self.current]
    }

    fn current_mut(&mut self) -> &mut Frame<S> {
        &mut self.frames[self.current]
    }

    /// "current / total", 1-based
    pub fn position_label(&self) -> String {
        format!("{} / {}", self.current + 1, self.frames.len())
    }

    pub fn onion_skin(&self) -> OnionSkin {
        self.onion_skin
    }

    pub fn onion_overlay(&self) -> &S {
        &self.onion_overlay
    }

    pub fn clipboard(&self) -> Option<&RasterRegion> {
        self.clipboard.as_ref()
    }

    pub fn is_drawing(&self) -> bool {
        self.current().is_drawing()
    }

    pub fn handle_sample(&mut self, sample: PointerSample, shift: bool) {
        self.current_mut().handle_sample(sample, shift);
    }

    /// Move to the next frame, appending a blank one when already at the end
    pub fn advance(&mut self) {
        if self.current + 1 < self.frames.len() {
            self.switch_to(self.current + 1);
        } else if let Err(err) = self.append_frame() {
            log::warn!("Could not create a new frame: {err}");
        }
        self.recompute_onion_skin();
    }

    /// Move to the previous frame; no-op on the first one
    pub fn retreat(&mut self) {
        if self.current == 0 {
            log::debug!("Already at the first frame");
            return;
        }
        self.switch_to(self.current - 1);
        self.recompute_onion_skin();
    }

    /// Playback step: next frame, wrapping to the first. Never creates frames and leaves the
    /// onion overlay alone.
    pub fn advance_cyclic(&mut self) {
        let next = (self.current + 1) % self.frames.len();
        self.switch_to(next);
    }

    fn switch_to(&mut self, index: usize) {
        if index == self.current {
            self.current_mut().restore_latest();
            return;
        }
        self.current_mut().release_gesture();
        self.current = index;
        self.current_mut().restore_latest();
        log::info!("Switched to frame {}", self.position_label());
    }

    fn append_frame(&mut self) -> Result<(), SurfaceError> {
        self.current_mut().release_gesture();
        let settings = *self.current().settings();
        let frame = Frame::blank(self.width, self.height, settings, self.history_depth)?;
        self.frames.push(frame);
        self.current = self.frames.len() - 1;
        log::info!("Created frame {}", self.position_label());
        Ok(())
    }

    pub fn set_onion_skin(&mut self, enabled: bool, opacity: f32) {
        self.onion_skin = OnionSkin::new(enabled, opacity);
        self.recompute_onion_skin();
    }

    /// Redraw the onion overlay from the previous frame's latest committed snapshot
    pub fn recompute_onion_skin(&mut self) {
        self.onion_overlay.clear();
        if !self.onion_skin.enabled || self.current == 0 {
            return;
        }
        if let Some(snapshot) = self.frames[self.current - 1].latest_snapshot() {
            self.onion_overlay
                .composite_snapshot(snapshot, self.onion_skin.opacity);
        }
    }

    pub fn clear_onion_skin(&mut self) {
        self.onion_overlay.clear();
    }

    pub fn undo(&mut self) {
        if !self.current_mut().undo() {
            log::debug!("Nothing to undo");
        }
    }

    pub fn redo(&mut self) {
        if !self.current_mut().redo() {
            log::debug!("Nothing to redo");
        }
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.current_mut().set_tool(tool);
    }

    pub fn set_stroke_color(&mut self, color: Color32) {
        self.current_mut().set_stroke_color(color);
    }

    pub fn set_stroke_width(&mut self, width: f32) {
        self.current_mut().set_stroke_width(width);
    }

    /// Copy the current frame's selection into the clipboard, replacing its contents
    pub fn copy_selection(&mut self) {
        match self.current().copy_selection() {
            Some(region) => {
                log::debug!("Copied {}x{} region", region.width(), region.height());
                self.clipboard = Some(region);
            }
            None => log::debug!("Nothing selected to copy"),
        }
    }

    /// Copy, then clear the selected area and commit
    pub fn cut_selection(&mut self) {
        let Some(region) = self.current().copy_selection() else {
            log::debug!("Nothing selected to cut");
            return;
        };
        self.clipboard = Some(region);
        self.current_mut().delete_selection();
    }

    /// Composite the clipboard at `at` and commit; no-op with an empty clipboard
    pub fn paste_selection(&mut self, at: Pos2) {
        let Some(region) = self.clipboard.as_ref() else {
            log::debug!("Clipboard is empty");
            return;
        };
        self.frames[self.current].paste(region, at);
    }

    pub fn delete_selection(&mut self) {
        if !self.current_mut().delete_selection() {
            log::debug!("No active selection to delete");
        }
    }

    pub fn deselect(&mut self) {
        self.current_mut().deselect();
    }

    /// End any gesture on the current frame
    pub fn release_gesture(&mut self) {
        self.current_mut().release_gesture();
    }
}
