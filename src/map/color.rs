//! Region fill colors.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Code used when a feature's code string is empty.
pub const EMPTY_CODE: i32 = -1;

/// 8-bit RGBA color, straight (not premultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Composite `self` over `dst` (source-over).
    pub fn over(self, dst: Rgba) -> Rgba {
        if self.a == 255 {
            return self;
        }
        if self.a == 0 {
            return dst;
        }
        let sa = self.a as f32 / 255.0;
        let da = dst.a as f32 / 255.0;
        let out_a = sa + da * (1.0 - sa);
        let blend = |s: u8, d: u8| {
            ((s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a).round() as u8
        };
        Rgba::new(
            blend(self.r, dst.r),
            blend(self.g, dst.g),
            blend(self.b, dst.b),
            (out_a * 255.0).round() as u8,
        )
    }
}

/// Parses `RRGGBB` or `RRGGBBAA`, with an optional leading `#`.
impl FromStr for Rgba {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if !(hex.len() == 6 || hex.len() == 8) || !hex.is_ascii() {
            return Err(format!("`{s}` is not RRGGBB or RRGGBBAA"));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16).map_err(|e| format!("`{s}`: {e}"))
        };
        let a = if hex.len() == 8 { channel(6)? } else { 255 };
        Ok(Rgba::new(channel(0)?, channel(2)?, channel(4)?, a))
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

/// Colors for one map render.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorConfig {
    pub line_color: Rgba,
    pub background_color: Rgba,
    pub default_fill_color: Rgba,
    pub code_to_color: HashMap<i32, Rgba>,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            line_color: Rgba::WHITE,
            background_color: Rgba::rgb(20, 40, 60),
            default_fill_color: Rgba::rgb(100, 100, 150),
            code_to_color: HashMap::new(),
        }
    }
}

impl ColorConfig {
    /// Fill color for a region code.
    ///
    /// An empty code means [`EMPTY_CODE`]. Codes missing from the table get
    /// the default fill; codes that are not integers are an error.
    pub fn resolve(&self, code: &str) -> Result<Rgba> {
        let key = if code.is_empty() {
            EMPTY_CODE
        } else {
            code.trim()
                .parse::<i32>()
                .map_err(|_| Error::NonNumericCode(code.to_string()))?
        };
        Ok(self
            .code_to_color
            .get(&key)
            .copied()
            .unwrap_or(self.default_fill_color))
    }
}
