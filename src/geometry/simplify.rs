use geo::{LineString, Simplify};

use crate::domain::Boundary;

pub fn simplify_ring(points: &[(f64, f64)], epsilon: f64) -> Vec<(f64, f64)> {
    if points.len() < 4 {
        return points.to_vec();
    }

    // Closing the ring lets the closing segment take part in the simplification
    let mut ring: LineString<f64> = points
        .iter()
        .map(|&(x, y)| geo::coord! { x: x, y: y })
        .collect();
    ring.close();

    let simplified = ring.simplify(&epsilon);

    simplified.0.into_iter().map(|c| (c.x, c.y)).collect()
}

/// Thin out dense CAD outlines. Falls back to the original boundary when the
/// result would no longer be a polygon.
pub fn simplify_boundary(boundary: &Boundary, epsilon: f64) -> Boundary {
    if epsilon <= 0.0 || boundary.points.len() < 5 {
        return boundary.clone();
    }

    let simplified = Boundary::new(simplify_ring(&boundary.points, epsilon));

    if !simplified.is_valid() {
        return boundary.clone();
    }

    simplified
}
