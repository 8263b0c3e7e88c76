//! Containment and overlap predicates used by the placement engine
//!
//! Containment is corner sampling: a rectangle counts as inside when each of
//! its four corners passes the even-odd test. For concave boundaries an edge
//! can still cut outside while every corner is in; callers rely on exactly
//! this accept set, so it is not replaced by polygon clipping.
//!
//! Overlap is an axis-aligned box test inflated by the buffer. Rotated venues
//! are compared through their unrotated boxes unless the oriented test is
//! selected explicitly.

/// Even-odd ray casting with a horizontal ray towards +x.
///
/// Points lying exactly on the boundary follow the usual crossing-parity
/// quirks (points on a horizontal edge are ambiguous). Fewer than 3 vertices
/// never contain anything.
pub fn point_in_polygon(point: (f64, f64), polygon: &[(f64, f64)]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }

    let (px, py) = point;
    let mut inside = false;
    let mut j = n - 1;

    for i in 0..n {
        let (xi, yi) = polygon[i];
        let (xj, yj) = polygon[j];

        if (yi > py) != (yj > py) {
            let x_cross = (xj - xi) * (py - yi) / (yj - yi) + xi;
            if px < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }

    inside
}

/// All 4 corners of `[x, x+w] × [y, y+h]` inside the polygon
pub fn rect_fully_inside(x: f64, y: f64, w: f64, h: f64, polygon: &[(f64, f64)]) -> bool {
    [(x, y), (x + w, y), (x + w, y + h), (x, y + h)]
        .into_iter()
        .all(|corner| point_in_polygon(corner, polygon))
}

/// Corners of a `w × h` rectangle centered at `(cx, cy)` and rotated by
/// `angle_degrees` (counter-clockwise) about that center.
///
/// Order: lower-left, lower-right, upper-right, upper-left (labels refer to
/// the unrotated rectangle).
pub fn rotated_rect_corners(
    cx: f64,
    cy: f64,
    w: f64,
    h: f64,
    angle_degrees: f64,
) -> [(f64, f64); 4] {
    let (sin, cos) = angle_degrees.to_radians().sin_cos();
    let hw = w / 2.0;
    let hh = h / 2.0;

    [(-hw, -hh), (hw, -hh), (hw, hh), (-hw, hh)]
        .map(|(dx, dy)| (cx + dx * cos - dy * sin, cy + dx * sin + dy * cos))
}

/// All corners of the rotated rectangle inside the polygon
pub fn rotated_rect_inside(
    cx: f64,
    cy: f64,
    w: f64,
    h: f64,
    angle_degrees: f64,
    polygon: &[(f64, f64)],
) -> bool {
    rotated_rect_corners(cx, cy, w, h, angle_degrees)
        .into_iter()
        .all(|corner| point_in_polygon(corner, polygon))
}

/// Buffered axis-aligned overlap of two `(x, y, w, h)` boxes.
///
/// Strict inequalities: with a zero buffer, boxes sharing an edge do not
/// overlap.
pub fn rects_overlap_with_buffer(
    a: (f64, f64, f64, f64),
    b: (f64, f64, f64, f64),
    buffer: f64,
) -> bool {
    let (x1, y1, w1, h1) = a;
    let (x2, y2, w2, h2) = b;

    x1 < x2 + w2 + buffer && x1 + w1 > x2 - buffer && y1 < y2 + h2 + buffer && y1 + h1 > y2 - buffer
}

/// Separating-axis overlap of two rotated `(x, y, w, h)` rectangles.
///
/// `a` is grown by `buffer` on every side in its own frame before testing,
/// so with zero angles this agrees with [`rects_overlap_with_buffer`].
/// Touching rectangles do not overlap.
pub fn oriented_rects_overlap_with_buffer(
    a: (f64, f64, f64, f64),
    a_angle: f64,
    b: (f64, f64, f64, f64),
    b_angle: f64,
    buffer: f64,
) -> bool {
    let (ax, ay, aw, ah) = a;
    let (bx, by, bw, bh) = b;

    let poly_a = rotated_rect_corners(
        ax + aw / 2.0,
        ay + ah / 2.0,
        aw + 2.0 * buffer,
        ah + 2.0 * buffer,
        a_angle,
    );
    let poly_b = rotated_rect_corners(bx + bw / 2.0, by + bh / 2.0, bw, bh, b_angle);

    let axes = [
        edge_normal(poly_a[0], poly_a[1]),
        edge_normal(poly_a[1], poly_a[2]),
        edge_normal(poly_b[0], poly_b[1]),
        edge_normal(poly_b[1], poly_b[2]),
    ];

    for axis in axes {
        let (min_a, max_a) = project(&poly_a, axis);
        let (min_b, max_b) = project(&poly_b, axis);
        if max_a <= min_b || max_b <= min_a {
            return false;
        }
    }

    true
}

fn edge_normal(p: (f64, f64), q: (f64, f64)) -> (f64, f64) {
    let (dx, dy) = (q.0 - p.0, q.1 - p.1);
    let len = (dx * dx + dy * dy).sqrt();
    if len > 0.0 {
        (-dy / len, dx / len)
    } else {
        (1.0, 0.0)
    }
}

fn project(poly: &[(f64, f64); 4], axis: (f64, f64)) -> (f64, f64) {
    poly.iter()
        .map(|&(x, y)| x * axis.0 + y * axis.1)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        })
}
