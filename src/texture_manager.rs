use std::collections::HashMap;

use egui::{ColorImage, Context, TextureHandle, TextureId, TextureOptions};
use image::RgbaImage;

/// Which stacked canvas layer a texture shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanvasLayer {
    OnionSkin,
    Drawing,
    Selection,
}

/// Version of the pixels a texture was uploaded from: the owning surface and its revision
pub type PixelVersion = (u128, u64);

/// Keeps one GPU texture per canvas layer and re-uploads it only when its pixels changed
#[derive(Default)]
pub struct TextureManager {
    textures: HashMap<CanvasLayer, (PixelVersion, TextureHandle)>,
    uploads: u64,
}

impl TextureManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the texture for `layer`, uploading `image` if `version` differs from the cached one
    pub fn texture_for(
        &mut self,
        ctx: &Context,
        layer: CanvasLayer,
        version: PixelVersion,
        image: &RgbaImage,
    ) -> TextureId {
        if let Some((cached, handle)) = self.textures.get(&layer) {
            if *cached == version {
                return handle.id();
            }
        }

        let color_image = to_color_image(image);
        self.uploads += 1;
        match self.textures.get_mut(&layer) {
            Some((cached, handle)) => {
                handle.set(color_image, TextureOptions::NEAREST);
                *cached = version;
                handle.id()
            }
            None => {
                let name = format!("canvas_{layer:?}");
                let handle = ctx.load_texture(name, color_image, TextureOptions::NEAREST);
                let id = handle.id();
                self.textures.insert(layer, (version, handle));
                id
            }
        }
    }

    /// Number of uploads performed so far
    pub fn upload_count(&self) -> u64 {
        self.uploads
    }
}

fn to_color_image(image: &RgbaImage) -> ColorImage {
    ColorImage::from_rgba_unmultiplied(
        [image.width() as usize, image.height() as usize],
        image.as_raw(),
    )
}
