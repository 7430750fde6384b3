//! Decode JMA GIS boundary GeoJSON into a flat geometry model and paint it,
//! region by region, onto a raster surface.
//!
//! ```no_run
//! use jma_map::braille::BrailleCanvas;
//! use jma_map::data::{load_feature_collection, JmaProperties};
//! use jma_map::map::{ColorConfig, MapRenderer, OutputSize, ViewportConfig};
//!
//! # fn main() -> anyhow::Result<()> {
//! let areas = load_feature_collection::<JmaProperties>("areas.geojson".as_ref())?;
//! let mut canvas = BrailleCanvas::new(80, 40);
//! let (w, h) = canvas.pixel_size();
//! let config = ViewportConfig::new(122.0, 154.0, 20.0, 46.0, OutputSize::new(w, h), ColorConfig::default());
//! MapRenderer::new(&config).draw_features(&mut canvas, &areas.features)?;
//! # Ok(())
//! # }
//! ```

pub mod braille;
pub mod data;
pub mod error;
pub mod geometry;
pub mod map;

pub use error::{Error, Result};
pub use geometry::{decode_geometry, encode_geometry, Geometry, GeometryKind, Point, RingSet};
