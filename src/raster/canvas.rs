use std::sync::Arc;

use egui::{Color32, Pos2, Rect, Vec2};
use image::{Rgba, RgbaImage};

use super::{RasterRegion, RasterSnapshot, RasterSurface, StrokeStyle};
use crate::error::SurfaceError;

/// Largest surface we are willing to allocate (256 megapixels)
const MAX_PIXELS: u64 = 1 << 28;

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// In-memory raster surface backed by a straight-alpha RGBA buffer.
///
/// Pixels live behind an `Arc` and are copied on write, so taking a snapshot or restoring
/// one never copies the buffer; the first mutation after a snapshot does.
#[derive(Clone)]
pub struct PixelCanvas {
    pixels: Arc<RgbaImage>,
    revision: u64,
}

impl std::fmt::Debug for PixelCanvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelCanvas")
            .field("size", &[self.pixels.width(), self.pixels.height()])
            .field("revision", &self.revision)
            .finish()
    }
}

impl PixelCanvas {
    pub fn new(width: u32, height: u32) -> Result<Self, SurfaceError> {
        if width == 0 || height == 0 {
            return Err(SurfaceError::InvalidDimensions { width, height });
        }
        if u64::from(width) * u64::from(height) > MAX_PIXELS {
            return Err(SurfaceError::TooLarge { width, height });
        }
        Ok(Self {
            pixels: Arc::new(RgbaImage::new(width, height)),
            revision: 0,
        })
    }

    pub fn image(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.pixels.get_pixel(x, y)
    }

    /// True if every pixel is fully transparent
    pub fn is_blank(&self) -> bool {
        self.pixels.pixels().all(|p| p[3] == 0)
    }

    fn pixels_mut(&mut self) -> &mut RgbaImage {
        self.revision += 1;
        Arc::make_mut(&mut self.pixels)
    }

    /// Pixel index ranges `(x0, y0, x1, y1)` (end exclusive) covered by `rect`, clipped to the surface
    fn pixel_bounds(&self, rect: Rect) -> Option<(u32, u32, u32, u32)> {
        if !(rect.min.is_finite() && rect.max.is_finite()) {
            return None;
        }
        let x0 = rect.min.x.floor().max(0.0) as u32;
        let y0 = rect.min.y.floor().max(0.0) as u32;
        let x1 = (rect.max.x.ceil().max(0.0) as u32).min(self.pixels.width());
        let y1 = (rect.max.y.ceil().max(0.0) as u32).min(self.pixels.height());
        (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
    }

    /// Visit every pixel whose bounding box touches `area`, passing the pixel center
    fn for_each_pixel(&mut self, area: Rect, mut f: impl FnMut(Pos2, &mut Rgba<u8>)) {
        let Some((x0, y0, x1, y1)) = self.pixel_bounds(area) else {
            return;
        };
        let pixels = self.pixels_mut();
        for y in y0..y1 {
            for x in x0..x1 {
                let center = Pos2::new(x as f32 + 0.5, y as f32 + 0.5);
                f(center, pixels.get_pixel_mut(x, y));
            }
        }
    }

    fn stroke_segment(&mut self, from: Pos2, to: Pos2, width: f32, mut apply: impl FnMut(&mut Rgba<u8>, f32)) {
        let radius = (width * 0.5).max(0.5);
        let area = Rect::from_two_pos(from, to).expand(radius + 1.0);
        self.for_each_pixel(area, |center, px| {
            let coverage = edge_coverage(radius - distance_to_segment(center, from, to));
            if coverage > 0.0 {
                apply(px, coverage);
            }
        });
    }
}

impl RasterSurface for PixelCanvas {
    fn blank(width: u32, height: u32) -> Result<Self, SurfaceError> {
        Self::new(width, height)
    }

    fn width(&self) -> u32 {
        self.pixels.width()
    }

    fn height(&self) -> u32 {
        self.pixels.height()
    }

    fn draw_segment(&mut self, from: Pos2, to: Pos2, style: &StrokeStyle) {
        let color = style.color.to_srgba_unmultiplied();
        self.stroke_segment(from, to, style.width, |px, coverage| {
            blend_over(px, color, coverage);
        });
    }

    fn draw_rect(&mut self, rect: Rect, style: &StrokeStyle, filled: bool) {
        if filled {
            let color = style.color.to_srgba_unmultiplied();
            self.for_each_pixel(rect, |center, px| {
                if rect.contains(center) {
                    blend_over(px, color, 1.0);
                }
            });
            return;
        }
        let corners = [
            rect.left_top(),
            rect.right_top(),
            rect.right_bottom(),
            rect.left_bottom(),
        ];
        for i in 0..corners.len() {
            self.draw_segment(corners[i], corners[(i + 1) % corners.len()], style);
        }
    }

    fn draw_ellipse(&mut self, center: Pos2, radius: f32, style: &StrokeStyle, filled: bool) {
        let color = style.color.to_srgba_unmultiplied();
        let half_width = style.width * 0.5;
        let area = Rect::from_center_size(center, Vec2::splat(2.0 * (radius + half_width + 1.0)));
        self.for_each_pixel(area, |p, px| {
            let distance = p.distance(center);
            let coverage = if filled {
                edge_coverage(radius - distance)
            } else {
                edge_coverage(half_width - (distance - radius).abs())
            };
            if coverage > 0.0 {
                blend_over(px, color, coverage);
            }
        });
    }

    fn erase(&mut self, from: Pos2, to: Pos2, width: f32) {
        self.stroke_segment(from, to, width, |px, coverage| {
            let remaining = f32::from(px[3]) * (1.0 - coverage);
            px[3] = remaining.round() as u8;
        });
    }

    fn draw_dashed_rect(&mut self, rect: Rect, color: Color32, dash: [u32; 2]) {
        if !(rect.min.is_finite() && rect.max.is_finite()) {
            return;
        }
        let [on, off] = dash;
        let period = (on + off).max(1);
        let (x0, y0) = (rect.min.x.round() as i64, rect.min.y.round() as i64);
        let (x1, y1) = (rect.max.x.round() as i64, rect.max.y.round() as i64);

        let mut perimeter = Vec::new();
        perimeter.extend((x0..=x1).map(|x| (x, y0)));
        perimeter.extend((y0 + 1..=y1).map(|y| (x1, y)));
        perimeter.extend((x0..x1).rev().map(|x| (x, y1)));
        perimeter.extend((y0 + 1..y1).rev().map(|y| (x0, y)));

        let (width, height) = (i64::from(self.width()), i64::from(self.height()));
        let rgba = Rgba(color.to_srgba_unmultiplied());
        let pixels = self.pixels_mut();
        for (i, (x, y)) in perimeter.into_iter().enumerate() {
            let in_dash = (i as u32 % period) < on;
            if in_dash && (0..width).contains(&x) && (0..height).contains(&y) {
                pixels.put_pixel(x as u32, y as u32, rgba);
            }
        }
    }

    fn clear(&mut self) {
        let (width, height) = (self.width(), self.height());
        self.revision += 1;
        self.pixels = Arc::new(RgbaImage::new(width, height));
    }

    fn clear_rect(&mut self, rect: Rect) {
        let rect = Rect::from_two_pos(rect.min, rect.max);
        self.for_each_pixel(rect, |center, px| {
            if rect.contains(center) {
                *px = TRANSPARENT;
            }
        });
    }

    fn read_region(&self, rect: Rect) -> Option<RasterRegion> {
        let rect = Rect::from_two_pos(rect.min, rect.max);
        let (x0, y0, x1, y1) = self.pixel_bounds(rect)?;
        let pixels = image::imageops::crop_imm(self.pixels.as_ref(), x0, y0, x1 - x0, y1 - y0).to_image();
        Some(RasterRegion::new(pixels))
    }

    fn put_region(&mut self, region: &RasterRegion, at: Pos2) {
        if !at.is_finite() {
            return;
        }
        let (ox, oy) = (at.x.round() as i64, at.y.round() as i64);
        let (width, height) = (i64::from(self.width()), i64::from(self.height()));
        let pixels = self.pixels_mut();
        for (rx, ry, src) in region.pixels().enumerate_pixels() {
            let (x, y) = (ox + i64::from(rx), oy + i64::from(ry));
            if (0..width).contains(&x) && (0..height).contains(&y) {
                blend_over(pixels.get_pixel_mut(x as u32, y as u32), src.0, 1.0);
            }
        }
    }

    fn snapshot(&self) -> RasterSnapshot {
        RasterSnapshot::new(Arc::clone(&self.pixels))
    }

    fn restore(&mut self, snapshot: &RasterSnapshot) {
        if snapshot.width() != self.width() || snapshot.height() != self.height() {
            log::warn!(
                "Ignoring restore of {}x{} snapshot onto {}x{} surface",
                snapshot.width(),
                snapshot.height(),
                self.width(),
                self.height()
            );
            return;
        }
        self.revision += 1;
        self.pixels = Arc::clone(snapshot.shared_pixels());
    }

    fn composite_snapshot(&mut self, snapshot: &RasterSnapshot, opacity: f32) {
        let opacity = opacity.clamp(0.0, 1.0);
        if opacity == 0.0 {
            return;
        }
        let width = self.width().min(snapshot.width());
        let height = self.height().min(snapshot.height());
        let source = snapshot.pixels();
        let pixels = self.pixels_mut();
        for y in 0..height {
            for x in 0..width {
                blend_over(pixels.get_pixel_mut(x, y), source.get_pixel(x, y).0, opacity);
            }
        }
    }

    fn revision(&self) -> u64 {
        self.revision
    }
}

/// Anti-aliased coverage of a pixel whose center lies `inside` pixels within an edge
fn edge_coverage(inside: f32) -> f32 {
    (inside + 0.5).clamp(0.0, 1.0)
}

fn distance_to_segment(p: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_sq();
    let t = if len_sq > 0.0 {
        ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    p.distance(a + ab * t)
}

/// Source-over compositing of a straight-alpha color, with its alpha scaled by `coverage`
fn blend_over(dst: &mut Rgba<u8>, src: [u8; 4], coverage: f32) {
    let src_a = f32::from(src[3]) / 255.0 * coverage;
    if src_a <= 0.0 {
        return;
    }
    let dst_a = f32::from(dst[3]) / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);
    for c in 0..3 {
        let blended = (f32::from(src[c]) * src_a + f32::from(dst[c]) * dst_a * (1.0 - src_a)) / out_a;
        dst[c] = blended.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}
