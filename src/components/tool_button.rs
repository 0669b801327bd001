use eframe::egui;

use crate::tools::Tool;

/// Square toolbar button showing a tool's icon and its number-key shortcut
pub struct ToolButton {
    tool: Tool,
    selected: bool,
}

impl ToolButton {
    const SIZE: f32 = 36.0;

    pub fn new(tool: Tool, selected: bool) -> Self {
        Self { tool, selected }
    }

    /// Number key bound to this tool in the default keymap
    fn shortcut(&self) -> usize {
        Tool::ALL.iter().position(|t| *t == self.tool).unwrap_or(0) + 1
    }

    pub fn show(self, ui: &mut egui::Ui) -> egui::Response {
        let (rect, response) =
            ui.allocate_exact_size(egui::vec2(Self::SIZE, Self::SIZE), egui::Sense::click());

        if ui.is_rect_visible(rect) {
            let visuals = ui.style().interact_selectable(&response, self.selected);
            let painter = ui.painter();
            painter.rect(rect, 4.0, visuals.weak_bg_fill, visuals.bg_stroke);
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                self.tool.icon(),
                egui::FontId::proportional(20.0),
                visuals.text_color(),
            );
            painter.text(
                rect.right_bottom() - egui::vec2(3.0, 2.0),
                egui::Align2::RIGHT_BOTTOM,
                self.shortcut().to_string(),
                egui::FontId::monospace(9.0),
                visuals.text_color().gamma_multiply(0.6),
            );
        }

        let hint = format!("{} ({})", self.tool.name(), self.shortcut());
        response.on_hover_text(hint)
    }
}
