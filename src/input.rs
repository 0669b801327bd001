use std::time::Duration;

use egui::{Key, Modifiers, Pos2};

use crate::command::Command;
use crate::tools::Tool;

/// One normalised pointer reading in canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub pos: Pos2,
    pub pressed: bool,
}

impl PointerSample {
    pub fn new(pos: Pos2, pressed: bool) -> Self {
        Self { pos, pressed }
    }
}

/// Lets an event through at most once per interval
#[derive(Debug, Clone)]
pub struct Throttle {
    interval: Duration,
    last: Option<Duration>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self { interval, last: None }
    }

    /// Returns true and restarts the interval if enough time has passed since the last pass
    pub fn ready(&mut self, now: Duration) -> bool {
        let ready = match self.last {
            Some(last) => now.saturating_sub(last) >= self.interval,
            None => true,
        };
        if ready {
            self.last = Some(now);
        }
        ready
    }

    /// Restart the interval at `now` without asking
    pub fn reset(&mut self, now: Duration) {
        self.last = Some(now);
    }
}

/// Turns raw pointer readings into a throttled stream of [`PointerSample`]s.
///
/// Press and release edges always come through. Moves with the button held are forwarded at
/// most once per throttle interval, hover moves never.
#[derive(Debug, Clone)]
pub struct PointerTracker {
    throttle: Throttle,
    position: Pos2,
    pressed: bool,
}

impl PointerTracker {
    pub fn new(throttle: Duration) -> Self {
        Self {
            throttle: Throttle::new(throttle),
            position: Pos2::ZERO,
            pressed: false,
        }
    }

    pub fn track(&mut self, pos: Pos2, pressed: bool, now: Duration) -> Option<PointerSample> {
        self.position = pos;
        if pressed != self.pressed {
            self.pressed = pressed;
            self.throttle.reset(now);
            return Some(self.live_sample());
        }
        (pressed && self.throttle.ready(now)).then(|| self.live_sample())
    }

    /// The most recent reading, whether or not it was forwarded
    pub fn live_sample(&self) -> PointerSample {
        PointerSample::new(self.position, self.pressed)
    }

    pub fn position(&self) -> Pos2 {
        self.position
    }
}

/// Default key bindings
pub fn command_for_key(key: Key, modifiers: Modifiers) -> Option<Command> {
    let command = modifiers.command || modifiers.ctrl || modifiers.mac_cmd;
    match key {
        Key::ArrowLeft => Some(Command::RetreatFrame),
        Key::ArrowRight => Some(Command::AdvanceFrame),
        Key::Z if command && modifiers.shift => Some(Command::Redo),
        Key::Z if command => Some(Command::Undo),
        Key::Y if command => Some(Command::Redo),
        Key::C if command => Some(Command::Copy),
        Key::X if command => Some(Command::Cut),
        Key::V if command => Some(Command::Paste),
        Key::Delete | Key::Backspace => Some(Command::DeleteSelection),
        Key::Escape => Some(Command::Deselect),
        Key::Space => Some(Command::TogglePlayback),
        Key::Num1 => Some(Command::SetTool(Tool::Pen)),
        Key::Num2 => Some(Command::SetTool(Tool::Eraser)),
        Key::Num3 => Some(Command::SetTool(Tool::Line)),
        Key::Num4 => Some(Command::SetTool(Tool::Square)),
        Key::Num5 => Some(Command::SetTool(Tool::Circle)),
        Key::Num6 => Some(Command::SetTool(Tool::Select)),
        _ => None,
    }
}
