//! Fixed render configuration for the 160x120 device screen.

pub const VIEWPORT_WIDTH: u8 = 160;
pub const VIEWPORT_HEIGHT: u8 = 120;

/// Ray length as a multiple of the camera-to-view-plane vector.
pub const VIEW_DISTANCE: f32 = 100.0;

/// Wall half-height at unit distance, in pixels.
pub const FLOOR_HEIGHT: f32 = 60.0;

/// Hits at or beyond this distance are ignored.
pub const MAX_DEPTH: f32 = 300.0;

/// Pixels per map unit in the debug overlay.
pub const DEBUG_SCALE: f32 = 10.0;

pub const CEILING_COLOR: u8 = 3;
pub const FLOOR_COLOR: u8 = 2;

pub const OVERLAY_LINE_COLOR: u8 = 1;
pub const OVERLAY_MARKER_COLOR: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderConfig {
    /// Number of rays, one per screen column.
    pub viewport_width: u8,
    pub view_distance: f32,
    pub floor_height: f32,
    pub max_depth: f32,
    pub debug_scale: f32,
    /// Draw the top-down map overlay on top of the view.
    pub debug_overlay: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            viewport_width: VIEWPORT_WIDTH,
            view_distance: VIEW_DISTANCE,
            floor_height: FLOOR_HEIGHT,
            max_depth: MAX_DEPTH,
            debug_scale: DEBUG_SCALE,
            debug_overlay: false,
        }
    }
}
