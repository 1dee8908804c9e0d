//! Plane geometry used by the raycaster: points, segment intersection and rotation.

/// Degrees to radians, as used by the device firmware.
pub const RAD_CONV_FACTOR: f32 = 0.017_453_292_5;

/// A position in map space.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Intersection of segments `a1-a2` and `b1-b2`.
///
/// Returns the crossing point when both segment parameters fall in `[0, 1]`, so touching
/// at an endpoint counts. Parallel, collinear and zero-length inputs have a zero divisor
/// and report no intersection.
pub fn segment_intersection(a1: Point, a2: Point, b1: Point, b2: Point) -> Option<Point> {
    let s1 = [a2.x - a1.x, a2.y - a1.y];
    let s2 = [b2.x - b1.x, b2.y - b1.y];

    let denom = -s2[0] * s1[1] + s1[0] * s2[1];
    if denom == 0.0 || !denom.is_finite() {
        return None;
    }

    let dx = a1.x - b1.x;
    let dy = a1.y - b1.y;
    // s runs along b, t along a
    let s = (-s1[1] * dx + s1[0] * dy) / denom;
    let t = (s2[0] * dy - s2[1] * dx) / denom;

    if (0.0..=1.0).contains(&s) && (0.0..=1.0).contains(&t) {
        Some(Point::new(a1.x + t * s1[0], a1.y + t * s1[1]))
    } else {
        None
    }
}

/// Rotates `point` around `pivot` by `angle` degrees (counter-clockwise, y up).
pub fn rotate_point(pivot: Point, point: Point, angle: u16) -> Point {
    let radians = angle as f32 * RAD_CONV_FACTOR;
    let dx = point.x - pivot.x;
    let dy = point.y - pivot.y;
    let c = radians.cos();
    let s = radians.sin();
    Point::new(dx * c - dy * s + pivot.x, dx * s + dy * c + pivot.y)
}

#[inline]
pub fn length(p1: Point, p2: Point) -> f32 {
    (p2.x - p1.x).hypot(p2.y - p1.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn close(a: Point, b: Point) -> bool {
        (a.x - b.x).abs() < EPS && (a.y - b.y).abs() < EPS
    }

    #[test]
    fn crossing_diagonals_meet_in_the_middle() {
        let hit = segment_intersection(
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
            Point::new(1.0, 0.0),
        );
        assert_eq!(hit, Some(Point::new(0.5, 0.5)));
    }

    #[test]
    fn parallel_segments_do_not_intersect() {
        let hit = segment_intersection(
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(0.0, 1.0),
            Point::new(1.0, 1.0),
        );
        assert_eq!(hit, None);
    }

    #[test]
    fn collinear_and_zero_length_report_nothing() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(2.0, 0.0);
        assert_eq!(
            segment_intersection(a, b, Point::new(1.0, 0.0), Point::new(3.0, 0.0)),
            None
        );
        let p = Point::new(1.0, 0.0);
        assert_eq!(segment_intersection(a, b, p, p), None);
    }

    #[test]
    fn shared_endpoint_counts() {
        let hit = segment_intersection(
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(1.0, 1.0),
            Point::new(2.0, 0.0),
        )
        .expect("endpoint contact");
        assert!(close(hit, Point::new(1.0, 1.0)));
    }

    #[test]
    fn disjoint_segments_miss() {
        let hit = segment_intersection(
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(2.0, -1.0),
            Point::new(2.0, 1.0),
        );
        assert_eq!(hit, None);
    }

    #[test]
    fn full_turn_is_identity() {
        let pivot = Point::new(0.3, -1.2);
        let p = Point::new(4.0, 2.5);
        assert!(close(rotate_point(pivot, p, 360), p));
        assert!(close(rotate_point(pivot, p, 0), p));
    }

    #[test]
    fn quarter_turn_is_counter_clockwise() {
        let r = rotate_point(Point::default(), Point::new(1.0, 0.0), 90);
        assert!(close(r, Point::new(0.0, 1.0)));
    }

    #[test]
    fn length_is_euclidean() {
        assert!((length(Point::new(0.0, 0.0), Point::new(3.0, 4.0)) - 5.0).abs() < EPS);
    }
}
