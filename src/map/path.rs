use glam::Vec2;

use crate::map::color::Rgba;

/// A set of closed contours in pixel space, filled and stroked as one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    contours: Vec<Vec<Vec2>>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a closed polygon as its own figure. The closing edge back to the
    /// first point is implied.
    pub fn add_polygon(&mut self, points: Vec<Vec2>) {
        self.contours.push(points);
    }

    pub fn contours(&self) -> &[Vec<Vec2>] {
        &self.contours
    }

    pub fn is_empty(&self) -> bool {
        self.contours.is_empty()
    }
}

/// How stroked segments meet at a vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineJoin {
    #[default]
    Miter,
    Bevel,
    Round,
}

/// Stroke settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pen {
    pub color: Rgba,
    pub width: f32,
    pub join: LineJoin,
}
