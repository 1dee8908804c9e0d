//! Software rendering for a small 3-bit-per-pixel display: a packed surface, integer
//! rasterization primitives and a column raycaster over a polygonal map.
//!
//! A frame is produced by [`renderer::render_frame`] into a [`surface::Surface`] and handed
//! to a [`display::Display`] implementation.

pub mod camera;
pub mod config;
pub mod display;
pub mod error;
pub mod geometry;
pub mod palette;
pub mod raster;
pub mod renderer;
pub mod scaler;
pub mod surface;
pub mod world;

pub use camera::Camera;
pub use config::RenderConfig;
pub use error::{MapError, SurfaceError};
pub use geometry::Point;
pub use renderer::{FrameStats, Hit, render_frame};
pub use surface::Surface;
pub use world::{Map, Segment};
