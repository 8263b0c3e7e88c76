use geo::{Area, LineString, Polygon};

use crate::geometry::Bounds;

/// Closed site outline in a single linear unit.
///
/// The last point implicitly connects back to the first. A trailing point
/// equal to the first one is dropped on construction, so CAD outlines that
/// repeat the start vertex and hand-written 4-corner rectangles end up the same.
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    pub points: Vec<(f64, f64)>,
}

impl Boundary {
    pub fn new(mut points: Vec<(f64, f64)>) -> Self {
        if points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        Self { points }
    }

    /// Axis-aligned rectangle with its lower-left corner at the origin
    pub fn rectangle(width: f64, height: f64) -> Self {
        Self::new(vec![(0.0, 0.0), (width, 0.0), (width, height), (0.0, height)])
    }

    /// Number of distinct vertices
    pub fn distinct_len(&self) -> usize {
        let mut seen: Vec<(f64, f64)> = Vec::with_capacity(self.points.len());
        for &p in &self.points {
            if !seen.contains(&p) {
                seen.push(p);
            }
        }
        seen.len()
    }

    /// A boundary usable for containment checks needs at least 3 distinct points
    pub fn is_valid(&self) -> bool {
        self.distinct_len() >= 3
    }

    pub fn bounds(&self) -> Option<Bounds> {
        Bounds::from_points(&self.points)
    }

    /// Enclosed area, independent of winding order
    pub fn area(&self) -> f64 {
        if self.points.len() < 3 {
            return 0.0;
        }
        self.to_polygon().unsigned_area()
    }

    pub fn to_polygon(&self) -> Polygon<f64> {
        let ring: LineString<f64> = self
            .points
            .iter()
            .map(|&(x, y)| geo::coord! { x: x, y: y })
            .collect();
        Polygon::new(ring, vec![])
    }
}
