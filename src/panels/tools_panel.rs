use egui::Slider;

use crate::FlipbookApp;
use crate::command::Command;
use crate::components::ToolButton;
use crate::tools::Tool;

pub fn tools_panel(app: &mut FlipbookApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(200.0)
        .show(ctx, |ui| {
            let editor = app.editor();
            let frame = editor.flipbook().current();
            let settings = *frame.settings();
            let history = frame.history();
            let (can_undo, can_redo) = (history.can_undo(), history.can_redo());
            let (undo_len, redo_len, capacity) = (history.len(), history.redo_len(), history.capacity());
            let has_selection = frame.selection().active;
            let has_clipboard = editor.flipbook().clipboard().is_some();
            let onion = editor.flipbook().onion_skin();
            let position = editor.flipbook().position_label();
            let playing = editor.is_playing();
            let gesture_state = frame.tool_state_name();

            let mut commands = Vec::new();

            ui.heading("Tools");
            ui.horizontal_wrapped(|ui| {
                for tool in Tool::ALL {
                    if ToolButton::new(tool, settings.tool == tool).show(ui).clicked() {
                        log::info!("Tool selected from UI: {}", tool);
                        commands.push(Command::SetTool(tool));
                    }
                }
            });
            ui.label(format!("{} (State: {})", settings.tool, gesture_state));
            ui.separator();

            let mut color = settings.stroke_color;
            ui.horizontal(|ui| {
                ui.label("Color:");
                if egui::color_picker::color_edit_button_srgba(
                    ui,
                    &mut color,
                    egui::color_picker::Alpha::Opaque,
                )
                .changed()
                {
                    commands.push(Command::SetStrokeColor(color));
                }
            });

            let mut width = settings.stroke_width;
            ui.horizontal(|ui| {
                ui.label("Width:");
                if ui.add(Slider::new(&mut width, 1.0..=64.0)).changed() {
                    commands.push(Command::SetStrokeWidth(width));
                }
            });
            ui.separator();

            let mut enabled = onion.enabled;
            let mut opacity = onion.opacity;
            let toggled = ui.checkbox(&mut enabled, "Onion skin").changed();
            let slid = ui
                .add_enabled(enabled, Slider::new(&mut opacity, 0.0..=1.0).text("opacity"))
                .changed();
            if toggled || slid {
                commands.push(Command::SetOnionSkin { enabled, opacity });
            }
            ui.separator();

            ui.horizontal(|ui| {
                if ui.add_enabled(can_undo, egui::Button::new("Undo")).clicked() {
                    commands.push(Command::Undo);
                }
                if ui.add_enabled(can_redo, egui::Button::new("Redo")).clicked() {
                    commands.push(Command::Redo);
                }
            });
            ui.label(format!("Undo stack size: {undo_len} / {capacity}"));
            ui.label(format!("Redo stack size: {redo_len}"));
            ui.separator();

            ui.horizontal(|ui| {
                if ui.add_enabled(has_selection, egui::Button::new("Copy")).clicked() {
                    commands.push(Command::Copy);
                }
                if ui.add_enabled(has_selection, egui::Button::new("Cut")).clicked() {
                    commands.push(Command::Cut);
                }
                if ui.add_enabled(has_clipboard, egui::Button::new("Paste")).clicked() {
                    commands.push(Command::Paste);
                }
            });
            ui.horizontal(|ui| {
                if ui.add_enabled(has_selection, egui::Button::new("Delete")).clicked() {
                    commands.push(Command::DeleteSelection);
                }
                if ui.add_enabled(has_selection, egui::Button::new("Deselect")).clicked() {
                    commands.push(Command::Deselect);
                }
            });
            ui.separator();

            ui.horizontal(|ui| {
                if ui.button("◀").clicked() {
                    commands.push(Command::RetreatFrame);
                }
                ui.label(position);
                if ui.button("▶").clicked() {
                    commands.push(Command::AdvanceFrame);
                }
            });
            let play_label = if playing { "⏸ Pause" } else { "▶ Play" };
            if ui.button(play_label).clicked() {
                commands.push(Command::TogglePlayback);
            }

            for command in commands {
                app.editor_mut().execute(command);
            }
        });
}
