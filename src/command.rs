use egui::{Color32, Pos2};

use crate::editor::Editor;
use crate::raster::RasterSurface;
use crate::tools::Tool;

/// User-level operations exposed to the UI glue and key bindings
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    AdvanceFrame,
    RetreatFrame,
    Undo,
    Redo,
    SetTool(Tool),
    SetStrokeColor(Color32),
    SetStrokeWidth(f32),
    SetOnionSkin { enabled: bool, opacity: f32 },
    Copy,
    Cut,
    /// Paste at the last pointer position
    Paste,
    PasteAt(Pos2),
    DeleteSelection,
    Deselect,
    TogglePlayback,
}

impl Command {
    pub fn execute<S: RasterSurface>(self, editor: &mut Editor<S>) {
        log::debug!("Executing {:?}", self);
        match self {
            Command::AdvanceFrame => editor.advance_frame(),
            Command::RetreatFrame => editor.retreat_frame(),
            Command::Undo => editor.undo(),
            Command::Redo => editor.redo(),
            Command::SetTool(tool) => editor.set_tool(tool),
            Command::SetStrokeColor(color) => editor.set_stroke_color(color),
            Command::SetStrokeWidth(width) => editor.set_stroke_width(width),
            Command::SetOnionSkin { enabled, opacity } => editor.set_onion_skin(enabled, opacity),
            Command::Copy => editor.copy(),
            Command::Cut => editor.cut(),
            Command::Paste => editor.paste(),
            Command::PasteAt(pos) => editor.paste_at(pos),
            Command::DeleteSelection => editor.delete_selection(),
            Command::Deselect => editor.deselect(),
            Command::TogglePlayback => editor.toggle_playback(),
        }
    }
}
