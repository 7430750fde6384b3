use glam::Vec2;

use crate::map::{Path, Pen, Rgba, Surface};

/// One terminal cell read back from the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    /// Braille glyph for the stroked dots (U+2800 when none are set)
    pub ch: char,
    /// Color of the last stroke through this cell
    pub ink: Option<Rgba>,
    /// Accumulated fill color
    pub fill: Option<Rgba>,
}

/// Braille Unicode canvas for high-resolution terminal graphics.
/// Each character cell represents a 2x4 pixel grid (8 dots).
/// Unicode Braille patterns: U+2800 to U+28FF
///
/// Strokes set dots; fills color whole cells, sampled at the cell centre.
pub struct BrailleCanvas {
    width: usize,  // Characters
    height: usize, // Characters
    dots: Vec<u8>, // Bit patterns per char, row-major
    ink: Vec<Option<Rgba>>,
    fill: Vec<Option<Rgba>>,
}

impl BrailleCanvas {
    /// Create a new canvas with the given character dimensions.
    /// Effective pixel resolution: width*2 x height*4
    pub fn new(width: usize, height: usize) -> Self {
        let cells = width * height;
        Self {
            width,
            height,
            dots: vec![0u8; cells],
            ink: vec![None; cells],
            fill: vec![None; cells],
        }
    }

    /// Pixel resolution, matching the output size to project onto.
    pub fn pixel_size(&self) -> (u32, u32) {
        ((self.width * 2) as u32, (self.height * 4) as u32)
    }

    /// Set a dot at the given pixel coordinates.
    /// Braille dot layout per character:
    /// ```text
    /// (0,0) (1,0)   bits: 0x01 0x08
    /// (0,1) (1,1)   bits: 0x02 0x10
    /// (0,2) (1,2)   bits: 0x04 0x20
    /// (0,3) (1,3)   bits: 0x40 0x80
    /// ```
    pub fn set_pixel(&mut self, x: usize, y: usize, ink: Rgba) {
        let cx = x / 2;
        let cy = y / 4;

        if cx >= self.width || cy >= self.height {
            return;
        }

        let idx = cy * self.width + cx;
        self.dots[idx] |= dot_bit(x, y);
        self.ink[idx] = Some(ink);
    }

    /// Set a pixel using signed coordinates (ignores negative values)
    pub fn set_pixel_signed(&mut self, x: i32, y: i32, ink: Rgba) {
        if x >= 0 && y >= 0 {
            self.set_pixel(x as usize, y as usize, ink);
        }
    }

    /// Read one cell. Out-of-range cells are blank.
    pub fn cell(&self, cx: usize, cy: usize) -> Cell {
        if cx >= self.width || cy >= self.height {
            return Cell { ch: '\u{2800}', ink: None, fill: None };
        }
        let idx = cy * self.width + cx;
        Cell {
            ch: char::from_u32(0x2800 + self.dots[idx] as u32).unwrap_or(' '),
            ink: self.ink[idx],
            fill: self.fill[idx],
        }
    }

    /// All rows, top to bottom
    pub fn rows(&self) -> impl Iterator<Item = Vec<Cell>> + '_ {
        (0..self.height).map(move |cy| (0..self.width).map(|cx| self.cell(cx, cy)).collect())
    }

    /// Convert the dots to a string of Braille characters
    #[cfg(test)]
    pub fn to_string(&self) -> String {
        self.rows()
            .map(|row| row.iter().map(|c| c.ch).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Even-odd scanline fill over a set of closed contours, one sample per cell.
    fn fill_contours<'a>(&mut self, contours: impl Iterator<Item = &'a [Vec2]> + Clone, color: Rgba) {
        let mut crossings = Vec::new();

        for cy in 0..self.height {
            let y = cy as f32 * 4.0 + 2.0;
            crossings.clear();

            for contour in contours.clone() {
                if contour.len() < 3 {
                    continue;
                }
                let mut prev = contour[contour.len() - 1];
                for &p in contour {
                    if (p.y > y) != (prev.y > y) {
                        crossings.push(prev.x + (y - prev.y) * (p.x - prev.x) / (p.y - prev.y));
                    }
                    prev = p;
                }
            }

            crossings.sort_by(f32::total_cmp);
            for span in crossings.chunks_exact(2) {
                // Cell cx is inside when its centre x = cx*2+1 lies in [span0, span1)
                let start = ((span[0] - 1.0) / 2.0).ceil().max(0.0);
                let end = ((span[1] - 1.0) / 2.0).ceil().min(self.width as f32);
                if !(start < end) {
                    continue;
                }
                for cx in start as usize..end as usize {
                    let idx = cy * self.width + cx;
                    let below = self.fill[idx].unwrap_or(Rgba::TRANSPARENT);
                    self.fill[idx] = Some(color.over(below));
                }
            }
        }
    }

    /// Draw a line using Bresenham's algorithm
    fn draw_line(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, ink: Rgba) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        let mut x = x0;
        let mut y = y0;

        loop {
            self.set_pixel_signed(x, y, ink);

            if x == x1 && y == y1 {
                break;
            }

            let e2 = 2 * err;

            if e2 >= dy {
                if x == x1 {
                    break;
                }
                err += dy;
                x += sx;
            }

            if e2 <= dx {
                if y == y1 {
                    break;
                }
                err += dx;
                y += sy;
            }
        }
    }

    /// Draw one segment at the pen width, clipped to the canvas first.
    fn draw_segment(&mut self, a: Vec2, b: Vec2, pen: &Pen) {
        let (w, h) = self.pixel_size();
        let Some((a, b)) = clip_segment(a, b, Vec2::splat(-1.0), Vec2::new(w as f32, h as f32)) else {
            return;
        };
        let (x0, y0, x1, y1) = (
            a.x.round() as i32,
            a.y.round() as i32,
            b.x.round() as i32,
            b.y.round() as i32,
        );

        // Brush radius, never wider than the dot grid itself
        let r = (pen.width.round() as i32 / 2).clamp(0, w.max(h) as i32);

        if x0 == x1 && y0 == y1 {
            for oy in -r..=r {
                for ox in -r..=r {
                    self.set_pixel_signed(x0 + ox, y0 + oy, pen.color);
                }
            }
            return;
        }

        // Parallel copies offset along the minor axis, centred on the line
        let shift_y = (x1 - x0).abs() >= (y1 - y0).abs();
        for o in -r..=r {
            let (ox, oy) = if shift_y { (0, o) } else { (o, 0) };
            self.draw_line(x0 + ox, y0 + oy, x1 + ox, y1 + oy, pen.color);
        }
    }

    #[cfg(test)]
    fn dot(&self, x: usize, y: usize) -> bool {
        let (cx, cy) = (x / 2, y / 4);
        cx < self.width && cy < self.height && self.dots[cy * self.width + cx] & dot_bit(x, y) != 0
    }
}

impl Surface for BrailleCanvas {
    fn fill_polygon(&mut self, points: &[Vec2], color: Rgba) {
        self.fill_contours(std::iter::once(points), color);
    }

    fn fill_path(&mut self, path: &Path, color: Rgba) {
        self.fill_contours(path.contours().iter().map(Vec::as_slice), color);
    }

    /// Joins are not distinguishable at dot resolution; `pen.join` is ignored.
    fn stroke_path(&mut self, path: &Path, pen: &Pen) {
        for contour in path.contours() {
            let Some(&last) = contour.last() else {
                continue;
            };
            let mut prev = last;
            for &p in contour {
                self.draw_segment(prev, p, pen);
                prev = p;
            }
        }
    }
}

fn dot_bit(x: usize, y: usize) -> u8 {
    match (x % 2, y % 4) {
        (0, 0) => 0x01,
        (1, 0) => 0x08,
        (0, 1) => 0x02,
        (1, 1) => 0x10,
        (0, 2) => 0x04,
        (1, 2) => 0x20,
        (0, 3) => 0x40,
        (1, 3) => 0x80,
        _ => 0,
    }
}

/// Liang-Barsky clip of segment `a`-`b` to the box `min`..`max`.
fn clip_segment(a: Vec2, b: Vec2, min: Vec2, max: Vec2) -> Option<(Vec2, Vec2)> {
    if !(a.is_finite() && b.is_finite()) {
        return None;
    }
    let d = b - a;
    let mut t0 = 0.0f32;
    let mut t1 = 1.0f32;

    for (p, q) in [
        (-d.x, a.x - min.x),
        (d.x, max.x - a.x),
        (-d.y, a.y - min.y),
        (d.y, max.y - a.y),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            t0 = t0.max(r);
        } else {
            t1 = t1.min(r);
        }
        if t0 > t1 {
            return None;
        }
    }

    Some((a + d * t0, a + d * t1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::LineJoin;

    const INK: Rgba = Rgba::WHITE;

    fn pen(width: f32) -> Pen {
        Pen { color: INK, width, join: LineJoin::Round }
    }

    #[test]
    fn test_single_pixel() {
        let mut canvas = BrailleCanvas::new(1, 1);
        canvas.set_pixel(0, 0, INK);
        assert_eq!(canvas.to_string(), "⠁"); // U+2801
        assert_eq!(canvas.cell(0, 0).ink, Some(INK));
    }

    #[test]
    fn test_all_dots() {
        let mut canvas = BrailleCanvas::new(1, 1);
        // Set all 8 dots
        for x in 0..2 {
            for y in 0..4 {
                canvas.set_pixel(x, y, INK);
            }
        }
        assert_eq!(canvas.to_string(), "⣿"); // U+28FF (all dots)
    }

    #[test]
    fn test_diagonal() {
        let mut canvas = BrailleCanvas::new(2, 1);
        canvas.set_pixel(0, 0, INK);
        canvas.set_pixel(1, 1, INK);
        canvas.set_pixel(2, 2, INK);
        canvas.set_pixel(3, 3, INK);
        // First char: (0,0) and (1,1) = 0x01 | 0x10 = 0x11
        // Second char: (0,2) and (1,3) = 0x04 | 0x80 = 0x84
        assert_eq!(canvas.to_string(), "⠑⢄");
    }

    #[test]
    fn test_horizontal_line() {
        let mut canvas = BrailleCanvas::new(5, 1);
        canvas.draw_line(0, 0, 9, 0, INK);
        // Top dot row of every char
        assert_eq!(canvas.to_string(), "⠉⠉⠉⠉⠉");
    }

    #[test]
    fn test_fill_polygon_cells() {
        let mut canvas = BrailleCanvas::new(4, 2);
        let red = Rgba::rgb(255, 0, 0);
        // Covers the centres of cells (1,0) and (2,0) only: centres at x=3,5 y=2
        let square = [
            Vec2::new(2.0, 0.0),
            Vec2::new(6.0, 0.0),
            Vec2::new(6.0, 4.0),
            Vec2::new(2.0, 4.0),
        ];
        canvas.fill_polygon(&square, red);
        let filled: Vec<(usize, usize)> = (0..2)
            .flat_map(|cy| (0..4).map(move |cx| (cx, cy)))
            .filter(|&(cx, cy)| canvas.cell(cx, cy).fill.is_some())
            .collect();
        assert_eq!(filled, vec![(1, 0), (2, 0)]);
        assert_eq!(canvas.cell(1, 0).fill, Some(red));
    }

    #[test]
    fn test_fill_path_even_odd() {
        let mut canvas = BrailleCanvas::new(5, 1);
        let mut path = Path::new();
        path.add_polygon(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 4.0),
            Vec2::new(0.0, 4.0),
        ]);
        path.add_polygon(vec![
            Vec2::new(4.0, 0.0),
            Vec2::new(6.0, 0.0),
            Vec2::new(6.0, 4.0),
            Vec2::new(4.0, 4.0),
        ]);
        canvas.fill_path(&path, Rgba::rgb(1, 1, 1));
        let filled: Vec<bool> = (0..5).map(|cx| canvas.cell(cx, 0).fill.is_some()).collect();
        // The inner square (centre x=5, cell 2) is a hole under even-odd
        assert_eq!(filled, vec![true, true, false, true, true]);
    }

    #[test]
    fn test_stroke_closes_contour() {
        let mut canvas = BrailleCanvas::new(4, 2);
        let mut path = Path::new();
        path.add_polygon(vec![Vec2::new(0.0, 0.0), Vec2::new(6.0, 0.0), Vec2::new(6.0, 6.0)]);
        canvas.stroke_path(&path, &pen(1.0));
        // Closing edge runs back along the diagonal through (3,3)
        assert_ne!(canvas.cell(1, 0).ch, '\u{2800}');
        assert_ne!(canvas.cell(3, 1).ch, '\u{2800}');
        assert_eq!(canvas.cell(0, 1).ch, '\u{2800}');
    }

    #[test]
    fn test_stroke_far_outside_is_clipped() {
        let mut canvas = BrailleCanvas::new(2, 1);
        let mut path = Path::new();
        path.add_polygon(vec![
            Vec2::new(-1.0e9, -1.0e9),
            Vec2::new(1.0e9, -1.0e9),
            Vec2::new(0.0, f32::INFINITY),
        ]);
        canvas.stroke_path(&path, &pen(2.0));
        assert_eq!(canvas.to_string(), "\u{2800}\u{2800}");
    }

    #[test]
    fn test_wide_point_is_centred() {
        let mut canvas = BrailleCanvas::new(10, 5);
        let mut path = Path::new();
        path.add_polygon(vec![Vec2::new(10.0, 6.0)]);
        canvas.stroke_path(&path, &pen(5.0));
        for y in 0..20 {
            for x in 0..20 {
                let inside = (8..=12).contains(&x) && (4..=8).contains(&y);
                assert_eq!(canvas.dot(x, y), inside, "dot ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_wide_line_grows_both_sides() {
        let mut canvas = BrailleCanvas::new(5, 3);
        canvas.draw_segment(Vec2::new(0.0, 5.0), Vec2::new(9.0, 5.0), &pen(3.0));
        for x in 0..10 {
            assert!(!canvas.dot(x, 3));
            assert!(canvas.dot(x, 4) && canvas.dot(x, 5) && canvas.dot(x, 6));
            assert!(!canvas.dot(x, 7));
        }
    }

    #[test]
    fn test_huge_pen_is_clamped() {
        let mut canvas = BrailleCanvas::new(4, 2);
        let mut path = Path::new();
        path.add_polygon(vec![Vec2::new(0.0, 0.0), Vec2::new(7.0, 0.0), Vec2::new(7.0, 7.0)]);
        canvas.stroke_path(&path, &pen(1.0e6));
        assert_eq!(canvas.to_string(), "⣿⣿⣿⣿\n⣿⣿⣿⣿");
    }

    #[test]
    fn test_clip_segment() {
        let clipped = clip_segment(
            Vec2::new(-10.0, 5.0),
            Vec2::new(30.0, 5.0),
            Vec2::ZERO,
            Vec2::new(20.0, 10.0),
        )
        .unwrap();
        assert_eq!(clipped, (Vec2::new(0.0, 5.0), Vec2::new(20.0, 5.0)));
        assert!(clip_segment(Vec2::new(-5.0, -5.0), Vec2::new(-1.0, -1.0), Vec2::ZERO, Vec2::ONE).is_none());
    }
}
