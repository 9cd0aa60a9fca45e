//! Polygon measurements: bounds, center, signed area, winding, containment.

use super::predicates::{turn, Turn};
use super::Point;
use crate::transform::AABB2D;

/// Computes the axis-aligned bounds of a polygon.
///
/// An empty polygon yields a zero rectangle at the origin.
pub fn bounds(polygon: &[Point]) -> AABB2D {
    let Some(&(x0, y0)) = polygon.first() else {
        return AABB2D::default();
    };

    polygon
        .iter()
        .skip(1)
        .fold(AABB2D::new(x0, y0, x0, y0), |acc, &(x, y)| {
            AABB2D::new(
                acc.min_x.min(x),
                acc.min_y.min(y),
                acc.max_x.max(x),
                acc.max_y.max(y),
            )
        })
}

/// Returns the center of the polygon's bounding box.
///
/// This is not the area centroid; re-centering and the rotation pivot of the
/// unit shape are both defined in terms of this point.
pub fn center(polygon: &[Point]) -> Point {
    if polygon.is_empty() {
        return (0.0, 0.0);
    }
    bounds(polygon).center()
}

/// Shoelace signed area.
///
/// With y pointing down, a polygon listed clockwise on screen has a positive
/// signed area.
pub fn signed_area(polygon: &[Point]) -> f64 {
    let n = polygon.len();
    let mut sum = 0.0;
    for i in 0..n {
        let (ax, ay) = polygon[i];
        let (bx, by) = polygon[(i + 1) % n];
        sum += ax * by - bx * ay;
    }
    sum * 0.5
}

/// Absolute polygon area.
pub fn area(polygon: &[Point]) -> f64 {
    signed_area(polygon).abs()
}

/// Normalizes winding so that the signed area is `<= 0`.
///
/// Polygons with a negative signed area are left as they are; every other
/// polygon (including zero-area ones) is reversed.
pub fn normalize_winding(polygon: &mut [Point]) {
    if signed_area(polygon) < 0.0 {
        return;
    }
    polygon.reverse();
}

/// Returns true if the winding is already normalized.
pub fn is_normalized(polygon: &[Point]) -> bool {
    signed_area(polygon) <= 0.0
}

/// Crossing-number point-in-polygon test.
///
/// Points exactly on the boundary get whatever the crossing rule yields.
pub fn point_in_polygon(point: Point, polygon: &[Point]) -> bool {
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
        if (yi > py) != (yj > py) && px < (xj - xi) * (py - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Returns true if every non-straight turn goes the same way.
///
/// Collinear vertex runs do not break convexity.
pub fn is_convex(polygon: &[Point]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }

    let mut turns = (0..n)
        .map(|i| turn(polygon[i], polygon[(i + 1) % n], polygon[(i + 2) % n]))
        .filter(|&t| t != Turn::Straight);
    match turns.next() {
        Some(first) => turns.all(|t| t == first),
        None => true,
    }
}

/// Returns a copy of the polygon moved by `(dx, dy)`.
pub fn translate(polygon: &[Point], dx: f64, dy: f64) -> Vec<Point> {
    polygon.iter().map(|&(x, y)| (x + dx, y + dy)).collect()
}
