use std::time::Duration;

use egui::{Color32, Rect, Sense, pos2, vec2};

use crate::FlipbookApp;
use crate::raster::RasterSurface;
use crate::texture_manager::CanvasLayer;

const FULL_UV: Rect = Rect::from_min_max(pos2(0.0, 0.0), pos2(1.0, 1.0));

/// Onion overlays belong to the flipbook rather than a frame
const ONION_OWNER: u128 = 0;

pub fn central_panel(app: &mut FlipbookApp, ctx: &egui::Context, now: Duration) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let frame = app.editor().flipbook().current();
        let size = vec2(frame.surface().width() as f32, frame.surface().height() as f32);

        egui::ScrollArea::both().show(ui, |ui| {
            let (response, painter) = ui.allocate_painter(size, Sense::drag());
            let canvas_rect = response.rect;
            painter.rect_filled(canvas_rect, 0.0, Color32::WHITE);

            let (editor, textures) = app.canvas_parts();
            let flipbook = editor.flipbook();
            let frame = flipbook.current();
            let frame_id = frame.id().as_u128();

            let onion = flipbook.onion_overlay();
            let onion_texture = textures.texture_for(
                ctx,
                CanvasLayer::OnionSkin,
                (ONION_OWNER, onion.revision()),
                onion.image(),
            );
            painter.image(onion_texture, canvas_rect, FULL_UV, Color32::WHITE);

            let surface = frame.surface();
            let drawing_texture = textures.texture_for(
                ctx,
                CanvasLayer::Drawing,
                (frame_id, surface.revision()),
                surface.image(),
            );
            painter.image(drawing_texture, canvas_rect, FULL_UV, Color32::WHITE);

            let overlay = frame.overlay();
            let selection_texture = textures.texture_for(
                ctx,
                CanvasLayer::Selection,
                (frame_id, overlay.revision()),
                overlay.image(),
            );
            painter.image(selection_texture, canvas_rect, FULL_UV, Color32::WHITE);

            painter.rect_stroke(canvas_rect, 0.0, (1.0, Color32::GRAY));

            app.handle_pointer(ctx, canvas_rect, now);
        });
    });
}
