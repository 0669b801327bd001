use std::path::Path;
use std::time::Duration;

use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Onion-skin overlay settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OnionSkin {
    pub enabled: bool,
    /// Opacity of the previous frame's content, in `0.0..=1.0`
    pub opacity: f32,
}

impl Default for OnionSkin {
    fn default() -> Self {
        Self {
            enabled: true,
            opacity: 0.3,
        }
    }
}

impl OnionSkin {
    pub fn new(enabled: bool, opacity: f32) -> Self {
        Self {
            enabled,
            opacity: opacity.clamp(0.0, 1.0),
        }
    }
}

/// Session configuration. Missing fields fall back to their defaults when deserializing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub canvas_width: u32,
    pub canvas_height: u32,
    /// Maximum number of snapshots kept in each frame's undo stack
    pub history_depth: usize,
    /// Minimum spacing between forwarded pointer moves
    pub input_throttle_ms: u64,
    /// Scheduler rate while drawing
    pub drawing_fps: u32,
    /// Scheduler rate while playing the animation back
    pub playback_fps: u32,
    pub onion_skin: OnionSkin,
    pub stroke_color: Color32,
    pub stroke_width: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas_width: 800,
            canvas_height: 600,
            history_depth: 50,
            input_throttle_ms: 16,
            drawing_fps: 60,
            playback_fps: 10,
            onion_skin: OnionSkin::default(),
            stroke_color: Color32::BLACK,
            stroke_width: 8.0,
        }
    }
}

impl EditorConfig {
    /// Parse and validate a config from JSON
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(ConfigError::Invalid {
                field: "canvas_width/canvas_height",
                reason: format!("{}x{} is empty", self.canvas_width, self.canvas_height),
            });
        }
        if self.history_depth < 2 {
            return Err(ConfigError::Invalid {
                field: "history_depth",
                reason: "must keep at least the baseline and one edit".to_owned(),
            });
        }
        if self.drawing_fps == 0 {
            return Err(ConfigError::Invalid {
                field: "drawing_fps",
                reason: "must be positive".to_owned(),
            });
        }
        if self.playback_fps == 0 {
            return Err(ConfigError::Invalid {
                field: "playback_fps",
                reason: "must be positive".to_owned(),
            });
        }
        if !self.stroke_width.is_finite() || self.stroke_width <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "stroke_width",
                reason: format!("{} is not a positive width", self.stroke_width),
            });
        }
        Ok(())
    }

    pub fn input_throttle(&self) -> Duration {
        Duration::from_millis(self.input_throttle_ms)
    }

    pub fn drawing_interval(&self) -> Duration {
        interval_for_fps(self.drawing_fps)
    }

    pub fn playback_interval(&self) -> Duration {
        interval_for_fps(self.playback_fps)
    }
}

fn interval_for_fps(fps: u32) -> Duration {
    Duration::from_secs_f64(1.0 / f64::from(fps.max(1)))
}
