use serde::{Deserialize, Serialize};
use sqlx::postgres::types::PgPoint;

/// Geographic coordinate, `x` = longitude, `y` = latitude (EPSG:4326).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl From<PgPoint> for Point {
    fn from(p: PgPoint) -> Self {
        Point { x: p.x, y: p.y }
    }
}

impl From<Point> for PgPoint {
    fn from(p: Point) -> Self {
        PgPoint { x: p.x, y: p.y }
    }
}

/// Axis-aligned bounding box. `min` and `max` are inclusive corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
    pub min: Point,
    pub max: Point,
}

impl BBox {
    pub fn new(min: Point, max: Point) -> Self {
        BBox { min, max }
    }

    pub fn intersects(&self, other: &BBox) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// Road segment geometry as an ordered list of vertices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polyline {
    pub points: Vec<Point>,
}

impl Polyline {
    pub fn new(points: Vec<Point>) -> Self {
        Polyline { points }
    }

    pub fn bbox(&self) -> Option<BBox> {
        let first = self.points.first()?;
        let mut bbox = BBox::new(*first, *first);

        for p in &self.points[1..] {
            bbox.min.x = bbox.min.x.min(p.x);
            bbox.min.y = bbox.min.y.min(p.y);
            bbox.max.x = bbox.max.x.max(p.x);
            bbox.max.y = bbox.max.y.max(p.y);
        }

        Some(bbox)
    }

    /// Length-weighted centroid of the line, matching what PostGIS
    /// `ST_Centroid` returns for a linestring. A degenerate line (single
    /// vertex, or all vertices coincident) falls back to the vertex mean.
    pub fn centroid(&self) -> Option<Point> {
        if self.points.is_empty() {
            return None;
        }

        let mut total_len = 0.0;
        let mut cx = 0.0;
        let mut cy = 0.0;

        for pair in self.points.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            let len = ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt();
            cx += (a.x + b.x) / 2.0 * len;
            cy += (a.y + b.y) / 2.0 * len;
            total_len += len;
        }

        if total_len == 0.0 {
            let n = self.points.len() as f64;
            let sx: f64 = self.points.iter().map(|p| p.x).sum();
            let sy: f64 = self.points.iter().map(|p| p.y).sum();
            return Some(Point { x: sx / n, y: sy / n });
        }

        Some(Point {
            x: cx / total_len,
            y: cy / total_len,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: f64, y: f64) -> Point {
        Point { x, y }
    }

    #[test]
    fn centroid_of_straight_line_is_midpoint() {
        let line = Polyline::new(vec![pt(0.0, 0.0), pt(2.0, 0.0)]);
        assert_eq!(line.centroid(), Some(pt(1.0, 0.0)));
    }

    #[test]
    fn centroid_is_length_weighted() {
        // Two unit-length legs: mids (0.5, 0) and (1, 0.5), equal weight.
        let line = Polyline::new(vec![pt(0.0, 0.0), pt(1.0, 0.0), pt(1.0, 1.0)]);
        assert_eq!(line.centroid(), Some(pt(0.75, 0.25)));
    }

    #[test]
    fn centroid_of_single_vertex_is_that_vertex() {
        let line = Polyline::new(vec![pt(3.0, 4.0)]);
        assert_eq!(line.centroid(), Some(pt(3.0, 4.0)));
    }

    #[test]
    fn centroid_of_empty_line_is_none() {
        assert_eq!(Polyline::new(vec![]).centroid(), None);
        assert_eq!(Polyline::new(vec![]).bbox(), None);
    }

    #[test]
    fn bbox_covers_all_vertices() {
        let line = Polyline::new(vec![pt(2.0, -1.0), pt(0.0, 3.0), pt(1.0, 1.0)]);
        let bbox = line.bbox().unwrap();
        assert_eq!(bbox.min, pt(0.0, -1.0));
        assert_eq!(bbox.max, pt(2.0, 3.0));
    }

    #[test]
    fn bbox_intersection() {
        let a = BBox::new(pt(0.0, 0.0), pt(2.0, 2.0));
        let b = BBox::new(pt(1.0, 1.0), pt(3.0, 3.0));
        let c = BBox::new(pt(2.5, 2.5), pt(4.0, 4.0));

        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
        assert!(!a.intersects(&c));
        // Shared edge counts as intersecting.
        assert!(b.intersects(&c));
    }
}
