use thiserror::Error;

/// Errors raised when adopting or validating packed pixel storage.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    /// The supplied buffer cannot hold `width * height` packed pixels.
    #[error("buffer of {actual} bytes is too small for a {width}x{height} surface ({expected} bytes needed)")]
    BufferTooSmall {
        width: u8,
        height: u8,
        expected: usize,
        actual: usize,
    },
}

/// Errors raised while building a [`Map`](crate::world::Map).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MapError {
    /// A segment refers to a point index that was never added.
    #[error("point index {index} out of range ({len} points)")]
    PointOutOfRange { index: usize, len: usize },

    /// Both endpoints of a segment sit at the same position.
    #[error("zero-length segment at ({x}, {y})")]
    DegenerateSegment { x: f32, y: f32 },

    /// Colors are 3-bit palette indices.
    #[error("color {0} is not a 3-bit palette index")]
    InvalidColor(u8),
}

pub type SurfaceResult<T> = std::result::Result<T, SurfaceError>;
pub type MapResult<T> = std::result::Result<T, MapError>;
