use glam::Vec2;
use log::warn;

use crate::data::{Feature, RegionCode};
use crate::error::Result;
use crate::geometry::{Geometry, RingSet};
use crate::map::color::Rgba;
use crate::map::path::{LineJoin, Path, Pen};
use crate::map::projection::ViewportConfig;

/// Fill used when drawing geometries without per-region colors.
pub const GEOMETRY_FILL: Rgba = Rgba::new(100, 100, 150, 0x80);

/// A raster target the renderer paints onto. Coordinates are output pixels.
pub trait Surface {
    /// Fill one closed polygon.
    fn fill_polygon(&mut self, points: &[Vec2], color: Rgba);

    /// Fill every contour of a path together (even-odd).
    fn fill_path(&mut self, path: &Path, color: Rgba);

    /// Stroke every contour of a path, each closed back to its first point.
    fn stroke_path(&mut self, path: &Path, pen: &Pen);
}

/// Paints decoded geometries for one viewport.
///
/// Only the outer ring of each ring set is drawn; hole rings are never cut out
/// of the fill. Ring sets with fewer than three points are skipped.
pub struct MapRenderer<'a> {
    config: &'a ViewportConfig,
}

impl<'a> MapRenderer<'a> {
    pub fn new(config: &'a ViewportConfig) -> Self {
        Self { config }
    }

    /// Draw features colored by their region code.
    ///
    /// Each polygon is filled as soon as it is reached, so later features paint
    /// over earlier ones. All outlines are stroked once at the end, on top of
    /// every fill. A code that is not an integer aborts the draw.
    pub fn draw_features<P, S>(&self, surface: &mut S, features: &[Feature<P>]) -> Result<()>
    where
        P: RegionCode,
        S: Surface + ?Sized,
    {
        let colors = self.config.colors();
        if colors.code_to_color.is_empty() {
            warn!("no per-code fill colors configured, every region gets the default fill");
        }

        let mut path = Path::new();
        for feature in features {
            let Some(geometry) = &feature.geometry else {
                continue;
            };
            for ring_set in geometry.objects() {
                if let Some(points) = self.project_outline(ring_set) {
                    let color = colors.resolve(feature.code())?;
                    surface.fill_polygon(&points, color);
                    path.add_polygon(points);
                }
            }
        }

        surface.stroke_path(&path, &self.pen());
        Ok(())
    }

    /// Draw bare geometries: one translucent fill for everything, then the outlines.
    pub fn draw_geometries<'g, I, S>(&self, surface: &mut S, geometries: I)
    where
        I: IntoIterator<Item = Option<&'g Geometry>>,
        S: Surface + ?Sized,
    {
        if !self.config.colors().code_to_color.is_empty() {
            warn!("per-code fill colors are ignored when drawing geometries only");
        }

        let mut path = Path::new();
        for geometry in geometries.into_iter().flatten() {
            for ring_set in geometry.objects() {
                if let Some(points) = self.project_outline(ring_set) {
                    path.add_polygon(points);
                }
            }
        }

        surface.fill_path(&path, GEOMETRY_FILL);
        surface.stroke_path(&path, &self.pen());
    }

    /// Projected outer ring, or `None` when it cannot enclose an area.
    fn project_outline(&self, ring_set: &RingSet) -> Option<Vec<Vec2>> {
        let points = self.config.project_ring(ring_set.main_points());
        (points.len() > 2).then_some(points)
    }

    fn pen(&self) -> Pen {
        Pen {
            color: self.config.colors().line_color,
            width: self.config.line_width(),
            join: LineJoin::Round,
        }
    }
}
