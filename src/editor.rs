use std::time::Duration;

use egui::{Color32, Pos2};

use crate::command::Command;
use crate::config::EditorConfig;
use crate::error::FlipbookError;
use crate::flipbook::Flipbook;
use crate::input::{PointerSample, PointerTracker};
use crate::playback::{PlaybackMode, PlaybackScheduler, Tick};
use crate::raster::RasterSurface;
use crate::tools::Tool;

/// Editing session: the flipbook plus the input and scheduling around it.
///
/// This is the surface the UI glue talks to. Every operation is a silent no-op when it
/// does not apply.
pub struct Editor<S> {
    flipbook: Flipbook<S>,
    scheduler: PlaybackScheduler,
    pointer: PointerTracker,
    shift: bool,
    /// Last sample handed to the flipbook, so idle ticks do not repeat it
    last_fed: Option<PointerSample>,
}

impl<S> std::fmt::Debug for Editor<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("flipbook", &self.flipbook)
            .field("scheduler", &self.scheduler)
            .field("shift", &self.shift)
            .finish_non_exhaustive()
    }
}

impl<S: RasterSurface> Editor<S> {
    pub fn new(config: &EditorConfig) -> Result<Self, FlipbookError> {
        config.validate()?;
        Ok(Self {
            flipbook: Flipbook::new(config)?,
            scheduler: PlaybackScheduler::new(config.drawing_interval(), config.playback_interval()),
            pointer: PointerTracker::new(config.input_throttle()),
            shift: false,
            last_fed: None,
        })
    }

    pub fn flipbook(&self) -> &Flipbook<S> {
        &self.flipbook
    }

    pub fn scheduler(&self) -> &PlaybackScheduler {
        &self.scheduler
    }

    pub fn mode(&self) -> PlaybackMode {
        self.scheduler.mode()
    }

    pub fn is_playing(&self) -> bool {
        self.scheduler.mode() == PlaybackMode::Playing
    }

    pub fn start(&mut self, now: Duration) {
        self.scheduler.start(now);
    }

    pub fn stop(&mut self) {
        self.scheduler.stop();
    }

    pub fn execute(&mut self, command: Command) {
        command.execute(self);
    }

    pub fn set_shift(&mut self, shift: bool) {
        self.shift = shift;
    }

    /// Raw pointer reading in canvas coordinates
    pub fn pointer(&mut self, pos: Pos2, pressed: bool, now: Duration) {
        let Some(sample) = self.pointer.track(pos, pressed, now) else {
            return;
        };
        if self.is_playing() {
            return;
        }
        self.feed(sample);
    }

    fn feed(&mut self, sample: PointerSample) {
        self.last_fed = Some(sample);
        self.flipbook.handle_sample(sample, self.shift);
    }

    /// Advance the scheduler clock. Returns true if a tick fired.
    pub fn update(&mut self, now: Duration) -> bool {
        match self.scheduler.poll(now) {
            Some(Tick::SamplePointer) => {
                if self.flipbook.is_drawing() {
                    let sample = self.pointer.live_sample();
                    if self.last_fed != Some(sample) {
                        self.feed(sample);
                    }
                }
                true
            }
            Some(Tick::AdvanceFrame) => {
                self.flipbook.advance_cyclic();
                true
            }
            None => false,
        }
    }

    pub fn toggle_playback(&mut self) {
        match self.scheduler.mode() {
            PlaybackMode::Drawing => {
                self.flipbook.release_gesture();
                self.flipbook.clear_onion_skin();
                self.scheduler.set_mode(PlaybackMode::Playing);
            }
            PlaybackMode::Playing => {
                self.scheduler.set_mode(PlaybackMode::Drawing);
                self.flipbook.recompute_onion_skin();
            }
        }
    }

    pub fn advance_frame(&mut self) {
        self.flipbook.advance();
        self.hide_onion_while_playing();
    }

    pub fn retreat_frame(&mut self) {
        self.flipbook.retreat();
        self.hide_onion_while_playing();
    }

    pub fn undo(&mut self) {
        self.flipbook.undo();
    }

    pub fn redo(&mut self) {
        self.flipbook.redo();
    }

    pub fn set_tool(&mut self, tool: Tool) {
        self.flipbook.set_tool(tool);
    }

    /// Unknown names are ignored
    pub fn set_tool_by_name(&mut self, name: &str) {
        match name.parse::<Tool>() {
            Ok(tool) => self.set_tool(tool),
            Err(err) => log::warn!("{err}"),
        }
    }

    pub fn set_stroke_color(&mut self, color: Color32) {
        self.flipbook.set_stroke_color(color);
    }

    pub fn set_stroke_width(&mut self, width: f32) {
        self.flipbook.set_stroke_width(width);
    }

    pub fn set_onion_skin(&mut self, enabled: bool, opacity: f32) {
        self.flipbook.set_onion_skin(enabled, opacity);
        self.hide_onion_while_playing();
    }

    /// Flipbook operations recompute the onion overlay; playback keeps it empty
    fn hide_onion_while_playing(&mut self) {
        if self.is_playing() {
            self.flipbook.clear_onion_skin();
        }
    }

    pub fn copy(&mut self) {
        self.flipbook.copy_selection();
    }

    pub fn cut(&mut self) {
        self.flipbook.cut_selection();
    }

    /// Paste at the last known pointer position
    pub fn paste(&mut self) {
        let at = self.pointer.position();
        self.flipbook.paste_selection(at);
    }

    pub fn paste_at(&mut self, at: Pos2) {
        self.flipbook.paste_selection(at);
    }

    pub fn delete_selection(&mut self) {
        self.flipbook.delete_selection();
    }

    pub fn deselect(&mut self) {
        self.flipbook.deselect();
    }
}
