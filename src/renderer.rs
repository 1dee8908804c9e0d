use tracing::trace;

use crate::camera::Camera;
use crate::config::{OVERLAY_LINE_COLOR, OVERLAY_MARKER_COLOR, RenderConfig};
use crate::geometry::{Point, length, segment_intersection};
use crate::raster::{draw_filled_rectangle, draw_line};
use crate::surface::Surface;
use crate::world::Map;

/// Nearest wall struck by one column's ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub segment: usize,
    pub point: Point,
    pub distance: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    pub columns: u8,
    pub hits: u8,
}

/// Far end of the ray through view-plane column `column`.
#[inline]
fn ray_end(camera: &Camera, column: u8, config: &RenderConfig) -> Point {
    let p = camera.view_plane_point(column, config.viewport_width);
    let dx = p.x - camera.position().x;
    let dy = p.y - camera.position().y;
    p.offset(dx * config.view_distance, dy * config.view_distance)
}

/// Casts the ray for one column and returns the closest wall it crosses.
///
/// Walls are tested in map order and only a strictly closer hit replaces the current one,
/// so the first of several equidistant walls wins.
pub fn cast_column(map: &Map, camera: &Camera, column: u8, config: &RenderConfig) -> Option<Hit> {
    let eye = camera.position();
    let end = ray_end(camera, column, config);

    let mut nearest: Option<Hit> = None;
    for (i, seg) in map.segments().iter().enumerate() {
        let (a, b) = map.segment_points(seg);
        let Some(point) = segment_intersection(eye, end, a, b) else {
            continue;
        };
        let distance = length(eye, point);
        if distance >= config.max_depth {
            continue;
        }
        if nearest.is_none_or(|h| distance < h.distance) {
            nearest = Some(Hit {
                segment: i,
                point,
                distance,
            });
        }
    }
    nearest
}

/// Inverse-distance wall half-height in pixels, capped at `limit`.
#[inline]
pub fn projected_half_height(distance: f32, config: &RenderConfig, limit: i32) -> i32 {
    // float-to-int casts saturate; a zero distance gives +inf and clamps to limit
    let h = (config.floor_height / distance).floor() as i32;
    h.clamp(0, limit.max(0))
}

pub fn render_frame(
    surface: &mut Surface,
    map: &Map,
    camera: &Camera,
    config: &RenderConfig,
) -> FrameStats {
    let width = surface.width() as i32;
    let height = surface.height() as i32;
    let horizon = height / 2;

    // Ceiling and floor
    draw_filled_rectangle(surface, 0, 0, width, horizon, map.ceiling_color);
    draw_filled_rectangle(surface, 0, horizon, width, height - horizon, map.floor_color);

    let mut stats = FrameStats {
        columns: config.viewport_width,
        hits: 0,
    };
    let mut rays: Vec<Point> = Vec::new();

    // One strip per column
    for i in 0..config.viewport_width {
        let Some(hit) = cast_column(map, camera, i, config) else {
            continue;
        };
        stats.hits += 1;

        let color = map.segments()[hit.segment].color;
        let half = projected_half_height(hit.distance, config, horizon);
        let x = i as i32;
        draw_line(surface, x, horizon, x, horizon - half, color);
        draw_line(surface, x, horizon, x, horizon + half, color);

        if config.debug_overlay {
            rays.push(hit.point);
        }
    }

    if config.debug_overlay {
        draw_overlay(surface, map, camera, config, &rays);
    }

    trace!(
        columns = stats.columns,
        hits = stats.hits,
        angle = camera.angle(),
        "frame rendered"
    );
    stats
}

/// Map space to overlay pixels: `scale` pixels per unit, origin at the surface center, y up.
#[inline]
pub fn map_to_screen(surface: &Surface, p: Point, scale: f32) -> (i32, i32) {
    let cx = (surface.width() / 2) as f32;
    let cy = (surface.height() / 2) as f32;
    (
        (p.x * scale + cx).floor() as i32,
        (cy - p.y * scale).floor() as i32,
    )
}

fn draw_overlay(
    surface: &mut Surface,
    map: &Map,
    camera: &Camera,
    config: &RenderConfig,
    rays: &[Point],
) {
    let scale = config.debug_scale;
    let (px, py) = map_to_screen(surface, camera.position(), scale);

    for &hit in rays {
        let (hx, hy) = map_to_screen(surface, hit, scale);
        draw_line(surface, px, py, hx, hy, OVERLAY_LINE_COLOR);
    }

    for seg in map.segments() {
        let (a, b) = map.segment_points(seg);
        let (ax, ay) = map_to_screen(surface, a, scale);
        let (bx, by) = map_to_screen(surface, b, scale);
        draw_line(surface, ax, ay, bx, by, OVERLAY_LINE_COLOR);
    }

    let (lx, ly) = map_to_screen(surface, camera.left(), scale);
    let (rx, ry) = map_to_screen(surface, camera.right(), scale);
    draw_line(surface, lx, ly, rx, ry, OVERLAY_LINE_COLOR);
    surface.put_pixel(lx, ly, OVERLAY_MARKER_COLOR);
    surface.put_pixel(rx, ry, OVERLAY_MARKER_COLOR);
    surface.put_pixel(px, py, OVERLAY_MARKER_COLOR);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wall_ahead(x: f32, color: u8) -> Map {
        let mut map = Map::new(3, 2);
        map.add_wall(Point::new(x, -10.0), Point::new(x, 10.0), color)
            .unwrap();
        map
    }

    #[test]
    fn nearest_wall_wins() {
        let mut map = wall_ahead(6.0, 4);
        map.add_wall(Point::new(2.0, -10.0), Point::new(2.0, 10.0), 5)
            .unwrap();
        let cam = Camera::new(Point::default(), 1.0, 0.5, 0);
        let hit = cast_column(&map, &cam, 80, &RenderConfig::default()).unwrap();
        assert_eq!(hit.segment, 1);
        assert!((hit.distance - 2.0).abs() < 1e-3);
    }

    #[test]
    fn first_wall_wins_ties() {
        let mut map = Map::new(3, 2);
        map.add_wall(Point::new(2.0, -10.0), Point::new(2.0, 10.0), 4)
            .unwrap();
        // same endpoints, different color
        map.add_wall(Point::new(2.0, -10.0), Point::new(2.0, 10.0), 5)
            .unwrap();
        let cam = Camera::new(Point::default(), 1.0, 0.5, 0);
        let hit = cast_column(&map, &cam, 80, &RenderConfig::default()).unwrap();
        assert_eq!(hit.segment, 0);
    }

    #[test]
    fn walls_behind_or_out_of_range_are_missed() {
        let cam = Camera::new(Point::default(), 1.0, 0.5, 0);
        let config = RenderConfig::default();
        assert_eq!(cast_column(&wall_ahead(-3.0, 4), &cam, 80, &config), None);
        // ray length is 101 units straight ahead
        assert_eq!(cast_column(&wall_ahead(150.0, 4), &cam, 80, &config), None);
        let short = RenderConfig {
            max_depth: 5.0,
            ..config
        };
        assert_eq!(cast_column(&wall_ahead(6.0, 4), &cam, 80, &short), None);
    }

    #[test]
    fn half_height_is_clamped() {
        let config = RenderConfig::default();
        assert_eq!(projected_half_height(4.0, &config, 60), 15);
        assert_eq!(projected_half_height(0.5, &config, 60), 60);
        assert_eq!(projected_half_height(0.0, &config, 60), 60);
        assert_eq!(projected_half_height(1000.0, &config, 60), 0);
    }

    #[test]
    fn overlay_marks_view_plane_and_walls() {
        let map = wall_ahead(3.0, 4);
        let cam = Camera::new(Point::default(), 1.0, 0.5, 0);
        let config = RenderConfig {
            debug_overlay: true,
            ..RenderConfig::default()
        };
        let mut surface = Surface::new(160, 120);
        render_frame(&mut surface, &map, &cam, &config);
        // view-plane endpoint (1, 0.5) lands on the wall strip of column 90
        assert_eq!(surface.get_pixel(90, 55), OVERLAY_MARKER_COLOR);
        assert_eq!(surface.get_pixel(90, 65), OVERLAY_MARKER_COLOR);
        // wall x = 3 drawn at column 110 in the overlay
        assert_eq!(surface.get_pixel(110, 0), OVERLAY_LINE_COLOR);
    }
}
