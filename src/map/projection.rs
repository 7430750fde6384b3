use std::sync::OnceLock;

use glam::Vec2;

use crate::geometry::Point;
use crate::map::color::ColorConfig;

/// Outline stroke width grows by one pixel per this much zoom.
const LINE_WIDTH_DIVISOR: f32 = 216.0;

/// Output raster size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputSize {
    pub width: u32,
    pub height: u32,
}

impl OutputSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// 16:9 output of the given height
    pub fn from_height(height: u32) -> Self {
        Self::from_height_aspect(height, (16, 9))
    }

    /// Width = height * ratio, truncated
    pub fn from_height_ratio(height: u32, ratio: f64) -> Self {
        Self::new((height as f64 * ratio) as u32, height)
    }

    /// Width from an integer aspect pair, e.g. `(4, 3)`
    pub fn from_height_aspect(height: u32, (rw, rh): (u32, u32)) -> Self {
        Self::new(height * rw / rh, height)
    }
}

/// Geographic window mapped onto a fixed output size, plus the colors to draw with.
///
/// Bounds and size are fixed at construction because the zoom factors derived
/// from them are cached on first use. To look at a different window, build a
/// new config. `clone()` is the deep copy: hand a clone to a render running
/// elsewhere rather than sharing one you keep editing.
#[derive(Debug, Clone)]
pub struct ViewportConfig {
    lon_sta: f32,
    lon_end: f32,
    lat_sta: f32,
    lat_end: f32,
    size: OutputSize,
    colors: ColorConfig,
    /// (zoom_w, zoom_h) in pixels per degree
    zoom_wh: OnceLock<Vec2>,
}

impl ViewportConfig {
    pub fn new(
        lon_sta: f32,
        lon_end: f32,
        lat_sta: f32,
        lat_end: f32,
        size: OutputSize,
        colors: ColorConfig,
    ) -> Self {
        Self {
            lon_sta,
            lon_end,
            lat_sta,
            lat_end,
            size,
            colors,
            zoom_wh: OnceLock::new(),
        }
    }

    /// Deep copy with a replacement color table.
    pub fn deep_copy_with_colors(&self, colors: ColorConfig) -> Self {
        Self {
            colors,
            ..self.clone()
        }
    }

    pub fn lon_range(&self) -> (f32, f32) {
        (self.lon_sta, self.lon_end)
    }

    pub fn lat_range(&self) -> (f32, f32) {
        (self.lat_sta, self.lat_end)
    }

    pub fn size(&self) -> OutputSize {
        self.size
    }

    pub fn colors(&self) -> &ColorConfig {
        &self.colors
    }

    pub fn colors_mut(&mut self) -> &mut ColorConfig {
        &mut self.colors
    }

    /// Pixels per degree horizontally (x) and vertically (y). Computed once.
    pub fn zoom_wh(&self) -> Vec2 {
        *self.zoom_wh.get_or_init(|| {
            Vec2::new(
                self.size.width as f32 / (self.lon_end - self.lon_sta),
                self.size.height as f32 / (self.lat_end - self.lat_sta),
            )
        })
    }

    /// Single zoom scalar; the vertical factor.
    pub fn zoom(&self) -> f32 {
        self.zoom_wh().y
    }

    /// Outline width shared by every stroke in one render.
    pub fn line_width(&self) -> f32 {
        (self.zoom() / LINE_WIDTH_DIVISOR).max(1.0)
    }

    /// Project a geographic coordinate to pixel coordinates.
    /// Latitude is flipped so north is at the top (y = 0).
    #[inline(always)]
    pub fn project(&self, point: Point) -> Vec2 {
        let zoom = self.zoom_wh();
        Vec2::new(
            (point.lon - self.lon_sta) * zoom.x,
            (self.lat_end - point.lat) * zoom.y,
        )
    }

    pub fn project_ring(&self, points: &[Point]) -> Vec<Vec2> {
        points.iter().map(|&p| self.project(p)).collect()
    }
}
