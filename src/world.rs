use tracing::debug;

use crate::error::{MapError, MapResult};
use crate::geometry::{Point, length};
use crate::surface::PIXEL_MASK;

/// A wall between two shared map points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub p1: usize, // index into Map::points
    pub p2: usize,
    pub color: u8,
}

/// Polygonal level: a point arena, the walls referencing it, and the background colors.
#[derive(Debug, Clone, PartialEq)]
pub struct Map {
    points: Vec<Point>,
    segments: Vec<Segment>,
    pub ceiling_color: u8,
    pub floor_color: u8,
}

impl Map {
    pub fn new(ceiling_color: u8, floor_color: u8) -> Self {
        Self {
            points: Vec::new(),
            segments: Vec::new(),
            ceiling_color: ceiling_color & PIXEL_MASK,
            floor_color: floor_color & PIXEL_MASK,
        }
    }

    /// Adds a point and returns its index, reusing an existing point at the same position.
    pub fn add_point(&mut self, p: Point) -> usize {
        if let Some(i) = self.points.iter().position(|&q| q == p) {
            return i;
        }
        self.points.push(p);
        self.points.len() - 1
    }

    pub fn add_segment(&mut self, p1: usize, p2: usize, color: u8) -> MapResult<usize> {
        let len = self.points.len();
        for index in [p1, p2] {
            if index >= len {
                return Err(MapError::PointOutOfRange { index, len });
            }
        }
        if color > PIXEL_MASK {
            return Err(MapError::InvalidColor(color));
        }
        let (a, b) = (self.points[p1], self.points[p2]);
        if a == b {
            return Err(MapError::DegenerateSegment { x: a.x, y: a.y });
        }
        self.segments.push(Segment { p1, p2, color });
        Ok(self.segments.len() - 1)
    }

    /// Adds a wall between two positions, sharing endpoints with earlier walls.
    pub fn add_wall(&mut self, a: Point, b: Point, color: u8) -> MapResult<usize> {
        let p1 = self.add_point(a);
        let p2 = self.add_point(b);
        self.add_segment(p1, p2, color)
    }

    /// Chains walls through `points`, alternating `colors` per edge.
    pub fn add_polyline(&mut self, points: &[Point], colors: &[u8], closed: bool) -> MapResult<()> {
        if points.len() < 2 || colors.is_empty() {
            return Ok(());
        }
        let edges = if closed { points.len() } else { points.len() - 1 };
        for i in 0..edges {
            let a = points[i];
            let b = points[(i + 1) % points.len()];
            self.add_wall(a, b, colors[i % colors.len()])?;
        }
        Ok(())
    }

    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    #[inline]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    #[inline]
    pub fn segment_points(&self, seg: &Segment) -> (Point, Point) {
        (self.points[seg.p1], self.points[seg.p2])
    }

    pub fn segment_length(&self, seg: &Segment) -> f32 {
        let (a, b) = self.segment_points(seg);
        length(a, b)
    }

    /// The device's sample level: a small room shape inside a 10x6 border.
    pub fn demo() -> MapResult<Self> {
        const WALL_1: u8 = 4;
        const WALL_2: u8 = 5;

        let mut map = Self::new(crate::config::CEILING_COLOR, crate::config::FLOOR_COLOR);
        let walls = [
            ((-1.0, 1.0), (1.0, 1.0), WALL_1),
            ((1.0, 1.0), (1.0, -1.0), WALL_2),
            ((-1.0, 1.0), (-1.0, 2.0), WALL_2),
            ((-1.0, 2.0), (1.5, 2.0), WALL_1),
            ((1.5, 2.0), (1.5, -1.0), WALL_2),
            ((1.5, -1.0), (1.0, -1.0), WALL_1),
        ];
        for ((ax, ay), (bx, by), color) in walls {
            map.add_wall(Point::new(ax, ay), Point::new(bx, by), color)?;
        }
        let border = [
            Point::new(-5.0, 3.0),
            Point::new(5.0, 3.0),
            Point::new(5.0, -3.0),
            Point::new(-5.0, -3.0),
        ];
        map.add_polyline(&border, &[WALL_1, WALL_2], true)?;

        debug!(
            points = map.points.len(),
            segments = map.segments.len(),
            "built demo map"
        );
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walls_share_points() {
        let mut map = Map::new(3, 2);
        map.add_wall(Point::new(0.0, 0.0), Point::new(1.0, 0.0), 1)
            .unwrap();
        map.add_wall(Point::new(1.0, 0.0), Point::new(1.0, 1.0), 2)
            .unwrap();
        assert_eq!(map.points().len(), 3);
        assert_eq!(map.segments()[0].p2, map.segments()[1].p1);
    }

    #[test]
    fn rejects_bad_segments() {
        let mut map = Map::new(0, 0);
        let a = map.add_point(Point::new(2.0, 2.0));
        assert_eq!(
            map.add_segment(a, 5, 1),
            Err(MapError::PointOutOfRange { index: 5, len: 1 })
        );
        assert_eq!(
            map.add_segment(a, a, 1),
            Err(MapError::DegenerateSegment { x: 2.0, y: 2.0 })
        );
        let b = map.add_point(Point::new(3.0, 2.0));
        assert_eq!(map.add_segment(a, b, 8), Err(MapError::InvalidColor(8)));
        assert!(map.segments().is_empty());
    }

    #[test]
    fn demo_has_ten_walls() {
        let map = Map::demo().unwrap();
        assert_eq!(map.segments().len(), 10);
        assert_eq!(map.points().len(), 10);
        let border = &map.segments()[6];
        assert_eq!(map.segment_length(border), 10.0);
    }
}
