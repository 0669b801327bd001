#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod command;
pub mod components;
pub mod config;
pub mod editor;
pub mod error;
pub mod flipbook;
pub mod frame;
pub mod input;
pub mod panels;
pub mod playback;
pub mod raster;
pub mod selection;
pub mod texture_manager;
pub mod tools;

pub use app::FlipbookApp;
pub use command::Command;
pub use config::{EditorConfig, OnionSkin};
pub use editor::Editor;
pub use error::{ConfigError, FlipbookError, SurfaceError};
pub use flipbook::Flipbook;
pub use frame::{Frame, FrameHistory, FrameId, ToolSettings};
pub use input::{PointerSample, PointerTracker};
pub use playback::{PlaybackMode, PlaybackScheduler, Tick};
pub use raster::{PixelCanvas, RasterRegion, RasterSnapshot, RasterSurface, StrokeStyle};
pub use selection::SelectionRect;
pub use tools::{Tool, ToolStateMachine};
