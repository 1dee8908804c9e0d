use crate::geometry::{Point, rotate_point};

/// Eye plus view plane. `left`/`right` are derived from the other fields, so all state is
/// private and only changes through `rotate`, `turn`, `move_to` and `step`.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    position: Point, // map-space eye position
    left: Point,     // view-plane endpoints, derived from the fields below
    right: Point,
    width: f32,    // forward distance from eye to view plane
    distance: f32, // half span of the view plane
    angle: u16,    // degrees, [0, 360)
}

impl Camera {
    pub fn new(position: Point, width: f32, distance: f32, angle: u16) -> Self {
        let mut cam = Self {
            position,
            left: position,
            right: position,
            width,
            distance,
            angle: 0,
        };
        cam.rotate(angle);
        cam
    }

    #[inline]
    pub fn position(&self) -> Point {
        self.position
    }

    #[inline]
    pub fn left(&self) -> Point {
        self.left
    }

    #[inline]
    pub fn right(&self) -> Point {
        self.right
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.width
    }

    #[inline]
    pub fn distance(&self) -> f32 {
        self.distance
    }

    #[inline]
    pub fn angle(&self) -> u16 {
        self.angle
    }

    /// Sets the absolute heading and rebuilds the view plane from scratch.
    pub fn rotate(&mut self, angle: u16) {
        let angle = angle % 360;
        // heading 0 looks along +x, left is +y
        let left = self.position.offset(self.width, self.distance);
        let right = self.position.offset(self.width, -self.distance);

        self.left = rotate_point(self.position, left, angle);
        self.right = rotate_point(self.position, right, angle);
        self.angle = angle;
    }

    /// Turns by `delta` degrees, wrapping into [0, 360).
    pub fn turn(&mut self, delta: i32) {
        let angle = (self.angle as i32 + delta).rem_euclid(360);
        self.rotate(angle as u16);
    }

    /// Moves the eye to `to`, carrying the view plane along.
    pub fn move_to(&mut self, to: Point) {
        let dx = to.x - self.position.x;
        let dy = to.y - self.position.y;
        self.position = to;
        self.left = self.left.offset(dx, dy);
        self.right = self.right.offset(dx, dy);
    }

    /// Moves relative to the current heading: `forward` along the view direction,
    /// `strafe` towards the left edge of the view.
    pub fn step(&mut self, forward: f32, strafe: f32) {
        if forward == 0.0 && strafe == 0.0 {
            return;
        }
        let target = self.position.offset(forward, strafe);
        self.move_to(rotate_point(self.position, target, self.angle));
    }

    /// Point on the view plane for column `i` of `columns`.
    #[inline]
    pub fn view_plane_point(&self, i: u8, columns: u8) -> Point {
        let n = columns.max(1) as f32;
        let dx = (self.right.x - self.left.x) / n;
        let dy = (self.right.y - self.left.y) / n;
        Point::new(self.left.x + i as f32 * dx, self.left.y + i as f32 * dy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS
    }

    #[test]
    fn heading_zero_looks_along_x() {
        let cam = Camera::new(Point::new(1.0, 2.0), 1.0, 0.5, 0);
        assert_eq!(cam.left(), Point::new(2.0, 2.5));
        assert_eq!(cam.right(), Point::new(2.0, 1.5));
    }

    #[test]
    fn rotate_matches_fresh_construction() {
        let mut cam = Camera::new(Point::new(0.5, -0.5), 1.0, 0.5, 0);
        cam.rotate(30);
        cam.rotate(135);
        let fresh = Camera::new(Point::new(0.5, -0.5), 1.0, 0.5, 135);
        assert!(close(cam.left(), fresh.left()));
        assert!(close(cam.right(), fresh.right()));
        assert_eq!(cam.angle(), 135);
    }

    #[test]
    fn turn_wraps_both_ways() {
        let mut cam = Camera::new(Point::default(), 1.0, 0.5, 0);
        cam.turn(-1);
        assert_eq!(cam.angle(), 359);
        cam.turn(2);
        assert_eq!(cam.angle(), 1);
    }

    #[test]
    fn move_keeps_view_plane_offsets() {
        let mut cam = Camera::new(Point::default(), 1.0, 0.5, 90);
        cam.move_to(Point::new(3.0, -2.0));
        let fresh = Camera::new(Point::new(3.0, -2.0), 1.0, 0.5, 90);
        assert!(close(cam.left(), fresh.left()));
        assert!(close(cam.right(), fresh.right()));
    }

    #[test]
    fn step_follows_heading() {
        let mut cam = Camera::new(Point::default(), 1.0, 0.5, 90);
        cam.step(2.0, 0.0);
        assert!(close(cam.position(), Point::new(0.0, 2.0)));
    }

    #[test]
    fn view_plane_tracks_every_update() {
        let mut cam = Camera::new(Point::default(), 1.0, 0.5, 0);
        cam.turn(45);
        cam.step(1.5, -0.25);
        cam.rotate(200);
        cam.move_to(Point::new(-2.0, 4.0));
        let fresh = Camera::new(Point::new(-2.0, 4.0), 1.0, 0.5, 200);
        assert_eq!(cam.position(), fresh.position());
        assert_eq!(cam.angle(), 200);
        assert_eq!(cam.width(), 1.0);
        assert_eq!(cam.distance(), 0.5);
        assert!(close(cam.left(), fresh.left()));
        assert!(close(cam.right(), fresh.right()));
        assert!(close(cam.view_plane_point(0, 4), cam.left()));
    }
}
