mod color;
mod path;
mod projection;
mod renderer;

pub use color::{ColorConfig, Rgba, EMPTY_CODE};
pub use path::{LineJoin, Path, Pen};
pub use projection::{OutputSize, ViewportConfig};
pub use renderer::{MapRenderer, Surface, GEOMETRY_FILL};
