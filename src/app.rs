use jma_map::braille::BrailleCanvas;
use jma_map::data::{FeatureCollection, JmaProperties};
use jma_map::map::{ColorConfig, MapRenderer, OutputSize, ViewportConfig};
use jma_map::Result;

/// Fraction of the visible span moved per pan step
const PAN_STEP: f32 = 0.1;
const ZOOM_FACTOR: f32 = 1.5;
/// Narrowest window, in degrees, zooming in may reach
const MIN_SPAN: f32 = 0.05;

/// Geographic window in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub lon_sta: f32,
    pub lon_end: f32,
    pub lat_sta: f32,
    pub lat_end: f32,
}

impl Bounds {
    fn center(&self) -> (f32, f32) {
        (
            (self.lon_sta + self.lon_end) / 2.0,
            (self.lat_sta + self.lat_end) / 2.0,
        )
    }

    fn pan(&mut self, dx: f32, dy: f32) {
        let lon_shift = (self.lon_end - self.lon_sta) * dx;
        let lat_shift = (self.lat_end - self.lat_sta) * dy;
        self.lon_sta += lon_shift;
        self.lon_end += lon_shift;
        self.lat_sta += lat_shift;
        self.lat_end += lat_shift;
    }

    /// Scale both spans about the centre. Shrinking stops once the narrower
    /// span reaches [`MIN_SPAN`].
    fn scale(&mut self, mut factor: f32) {
        if factor < 1.0 {
            let span = (self.lon_end - self.lon_sta).min(self.lat_end - self.lat_sta);
            factor = factor.max((MIN_SPAN / span).min(1.0));
        }
        let (lon, lat) = self.center();
        let half_lon = (self.lon_end - self.lon_sta) * factor / 2.0;
        let half_lat = (self.lat_end - self.lat_sta) * factor / 2.0;
        *self = Bounds {
            lon_sta: lon - half_lon,
            lon_end: lon + half_lon,
            lat_sta: lat - half_lat,
            lat_end: lat + half_lat,
        };
    }
}

/// Application state
pub struct App {
    pub areas: FeatureCollection<JmaProperties>,
    pub colors: ColorConfig,
    pub bounds: Bounds,
    initial_bounds: Bounds,
    /// Draw every shape in one translucent color instead of per-code fills
    pub geometry_only: bool,
    pub should_quit: bool,
}

impl App {
    pub fn new(
        areas: FeatureCollection<JmaProperties>,
        bounds: Bounds,
        colors: ColorConfig,
        geometry_only: bool,
    ) -> Self {
        Self {
            areas,
            colors,
            bounds,
            initial_bounds: bounds,
            geometry_only,
            should_quit: false,
        }
    }

    /// A fresh viewport for the current bounds. Every pan or zoom produces a
    /// new one, so zoom factors are always computed for the current window.
    pub fn viewport(&self, (width, height): (u32, u32)) -> ViewportConfig {
        let b = &self.bounds;
        ViewportConfig::new(
            b.lon_sta,
            b.lon_end,
            b.lat_sta,
            b.lat_end,
            OutputSize::new(width, height),
            self.colors.clone(),
        )
    }

    /// Paint the loaded areas onto a canvas
    pub fn draw(&self, canvas: &mut BrailleCanvas, viewport: &ViewportConfig) -> Result<()> {
        let renderer = MapRenderer::new(viewport);
        if self.geometry_only {
            renderer.draw_geometries(canvas, self.areas.geometries());
            Ok(())
        } else {
            renderer.draw_features(canvas, &self.areas.features)
        }
    }

    /// Pan the map; positive `dx` moves east, positive `dy` moves north
    pub fn pan(&mut self, dx: i32, dy: i32) {
        self.bounds.pan(dx as f32 * PAN_STEP, dy as f32 * PAN_STEP);
    }

    /// Zoom in
    pub fn zoom_in(&mut self) {
        self.bounds.scale(1.0 / ZOOM_FACTOR);
    }

    /// Zoom out
    pub fn zoom_out(&mut self) {
        self.bounds.scale(ZOOM_FACTOR);
    }

    pub fn reset(&mut self) {
        self.bounds = self.initial_bounds;
    }

    pub fn toggle_geometry_only(&mut self) {
        self.geometry_only = !self.geometry_only;
    }

    /// Request quit
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Get current center coordinates as a string
    pub fn center_coords(&self) -> String {
        let (lon, lat) = self.bounds.center();
        format!(
            "{:.2}°{}, {:.2}°{}",
            lat.abs(),
            if lat >= 0.0 { "N" } else { "S" },
            lon.abs(),
            if lon >= 0.0 { "E" } else { "W" }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        let bounds = Bounds {
            lon_sta: 130.0,
            lon_end: 140.0,
            lat_sta: 30.0,
            lat_end: 40.0,
        };
        App::new(
            FeatureCollection { features: Vec::new() },
            bounds,
            ColorConfig::default(),
            false,
        )
    }

    #[test]
    fn test_pan_and_reset() {
        let mut app = app();
        app.pan(1, -1);
        assert_eq!(app.bounds.lon_sta, 131.0);
        assert_eq!(app.bounds.lat_end, 39.0);
        app.reset();
        assert_eq!(app.bounds.lon_sta, 130.0);
    }

    #[test]
    fn test_zoom_keeps_center() {
        let mut app = app();
        app.zoom_in();
        let (lon, lat) = app.bounds.center();
        assert!((lon - 135.0).abs() < 1e-4);
        assert!((lat - 35.0).abs() < 1e-4);
        assert!(app.bounds.lon_end - app.bounds.lon_sta < 10.0);
    }

    #[test]
    fn test_zoom_in_stops_at_min_span() {
        let mut app = app();
        for _ in 0..40 {
            app.zoom_in();
        }
        let lon_span = app.bounds.lon_end - app.bounds.lon_sta;
        let lat_span = app.bounds.lat_end - app.bounds.lat_sta;
        assert!((lon_span - MIN_SPAN).abs() < 1e-3, "{lon_span}");
        assert!((lat_span - MIN_SPAN).abs() < 1e-3, "{lat_span}");

        // Stroke width stays bounded on a terminal-sized canvas
        let canvas = BrailleCanvas::new(200, 50);
        let viewport = app.viewport(canvas.pixel_size());
        assert!(viewport.line_width() < 20.0, "{}", viewport.line_width());

        app.zoom_out();
        assert!(app.bounds.lon_end - app.bounds.lon_sta > lon_span);
    }

    #[test]
    fn test_viewport_matches_canvas() {
        let app = app();
        let canvas = BrailleCanvas::new(40, 20);
        let viewport = app.viewport(canvas.pixel_size());
        assert_eq!(viewport.size(), OutputSize::new(80, 80));
        assert_eq!(viewport.zoom(), 8.0);
    }

    #[test]
    fn test_center_coords() {
        assert_eq!(app().center_coords(), "35.00°N, 135.00°E");
    }
}
