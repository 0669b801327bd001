//! Raster surfaces and their immutable snapshots.
//!
//! The editing engine only talks to pixels through [`RasterSurface`]. [`PixelCanvas`] is
//! the in-memory implementation used by the app and the tests.

mod canvas;

pub use canvas::PixelCanvas;

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use egui::{Color32, Pos2, Rect};
use image::RgbaImage;

use crate::error::SurfaceError;

// Static counter for snapshot identity
static NEXT_SNAPSHOT_ID: AtomicU64 = AtomicU64::new(1);

/// Color and width used when stroking or filling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Color32,
    pub width: f32,
}

impl StrokeStyle {
    pub fn new(color: Color32, width: f32) -> Self {
        Self { color, width }
    }
}

/// Immutable pixel buffer of a whole surface at one instant.
///
/// Cloning shares the pixels. Two snapshots are the same snapshot only if their ids match.
#[derive(Clone)]
pub struct RasterSnapshot {
    id: u64,
    pixels: Arc<RgbaImage>,
}

impl RasterSnapshot {
    pub fn new(pixels: Arc<RgbaImage>) -> Self {
        let id = NEXT_SNAPSHOT_ID.fetch_add(1, Ordering::Relaxed);
        Self { id, pixels }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub(crate) fn shared_pixels(&self) -> &Arc<RgbaImage> {
        &self.pixels
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn same_as(&self, other: &RasterSnapshot) -> bool {
        self.id == other.id
    }
}

impl std::fmt::Debug for RasterSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterSnapshot")
            .field("id", &self.id)
            .field("size", &[self.width(), self.height()])
            .finish_non_exhaustive()
    }
}

/// A rectangular block of pixels lifted out of a surface (clipboard contents)
#[derive(Clone, PartialEq)]
pub struct RasterRegion {
    pixels: RgbaImage,
}

impl RasterRegion {
    pub fn new(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }
}

impl std::fmt::Debug for RasterRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterRegion")
            .field("size", &[self.width(), self.height()])
            .finish()
    }
}

/// Drawing capability of a fixed-size raster
pub trait RasterSurface {
    /// Create a fully transparent surface
    fn blank(width: u32, height: u32) -> Result<Self, SurfaceError>
    where
        Self: Sized;

    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Canvas rectangle in surface coordinates
    fn bounds(&self) -> Rect {
        Rect::from_min_max(
            Pos2::ZERO,
            Pos2::new(self.width() as f32, self.height() as f32),
        )
    }

    /// Stroke a round-capped segment
    fn draw_segment(&mut self, from: Pos2, to: Pos2, style: &StrokeStyle);

    /// Stroke the outline of `rect`, or fill it
    fn draw_rect(&mut self, rect: Rect, style: &StrokeStyle, filled: bool);

    /// Stroke the outline of a circle, or fill it
    fn draw_ellipse(&mut self, center: Pos2, radius: f32, style: &StrokeStyle, filled: bool);

    /// Remove pixels under a round-capped segment
    fn erase(&mut self, from: Pos2, to: Pos2, width: f32);

    /// One pixel wide dashed outline, `dash` is `[on, off]` in pixels
    fn draw_dashed_rect(&mut self, rect: Rect, color: Color32, dash: [u32; 2]);

    fn clear(&mut self);

    fn clear_rect(&mut self, rect: Rect);

    /// Copy out the pixels inside `rect`, clipped to the surface.
    /// Returns `None` if nothing of `rect` lies on the surface.
    fn read_region(&self, rect: Rect) -> Option<RasterRegion>;

    /// Composite `region` with its top-left corner at `at`
    fn put_region(&mut self, region: &RasterRegion, at: Pos2);

    fn snapshot(&self) -> RasterSnapshot;

    fn restore(&mut self, snapshot: &RasterSnapshot);

    /// Composite a snapshot over the current pixels with its alpha scaled by `opacity`
    fn composite_snapshot(&mut self, snapshot: &RasterSnapshot, opacity: f32);

    /// Incremented on every mutation
    fn revision(&self) -> u64;
}
