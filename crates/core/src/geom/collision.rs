//! Collision predicates: segment intersection, containment, and the
//! separating axis overlap test.

use super::polygon::{bounds, point_in_polygon};
use super::Point;

/// Tests whether segment `a-b` intersects segment `c-d`.
///
/// Both parametric coefficients must lie in `[0, 1]`, so touching endpoints
/// count as intersecting. Parallel segments (zero determinant) never
/// intersect, including collinear overlapping ones.
pub fn segments_intersect(a: Point, b: Point, c: Point, d: Point) -> bool {
    let (s1x, s1y) = (b.0 - a.0, b.1 - a.1);
    let (s2x, s2y) = (d.0 - c.0, d.1 - c.1);

    let denom = -s2x * s1y + s1x * s2y;
    if denom == 0.0 {
        return false;
    }

    let s = (-s1y * (a.0 - c.0) + s1x * (a.1 - c.1)) / denom;
    let t = (s2x * (a.1 - c.1) - s2y * (a.0 - c.0)) / denom;

    if !s.is_finite() || !t.is_finite() {
        return false;
    }

    (0.0..=1.0).contains(&s) && (0.0..=1.0).contains(&t)
}

/// Returns true if every vertex of `shape` is inside `container` and no edge
/// of `shape` crosses or touches an edge of `container`.
///
/// The edge test is needed on top of the vertex test: a shape whose vertices
/// are all inside can still poke out between two container vertices.
pub fn is_fully_inside(shape: &[Point], container: &[Point]) -> bool {
    if !shape.iter().all(|&v| point_in_polygon(v, container)) {
        return false;
    }

    let n = shape.len();
    let m = container.len();
    for i in 0..n {
        let a = shape[i];
        let b = shape[(i + 1) % n];
        for j in 0..m {
            let c = container[j];
            let d = container[(j + 1) % m];
            if segments_intersect(a, b, c, d) {
                return false;
            }
        }
    }

    true
}

/// Projects a polygon onto `axis`, returning `(min, max)`.
pub fn project(axis: Point, polygon: &[Point]) -> (f64, f64) {
    let mut iter = polygon.iter().map(|&(x, y)| x * axis.0 + y * axis.1);
    let Some(first) = iter.next() else {
        return (0.0, 0.0);
    };
    iter.fold((first, first), |(min, max), p| (min.min(p), max.max(p)))
}

/// Separating axis test over the edge normals of both polygons.
///
/// Exact for convex polygons. For concave input the test can only err
/// towards reporting an overlap that does not exist, never the other way.
/// Touching projections count as overlapping.
pub fn separating_axis_overlap(p1: &[Point], p2: &[Point]) -> bool {
    !has_separating_axis(p1, p1, p2) && !has_separating_axis(p2, p1, p2)
}

fn has_separating_axis(edges_of: &[Point], p1: &[Point], p2: &[Point]) -> bool {
    let n = edges_of.len();
    for i in 0..n {
        let (x0, y0) = edges_of[i];
        let (x1, y1) = edges_of[(i + 1) % n];
        let axis = (-(y1 - y0), x1 - x0);

        let (min1, max1) = project(axis, p1);
        let (min2, max2) = project(axis, p2);
        if max1 < min2 || max2 < min1 {
            return true;
        }
    }
    false
}

/// Pairwise overlap predicate used by the packer.
///
/// A strict bounding-box check runs first, so polygons whose boxes only touch
/// are never overlapping; the separating axis test decides the rest.
pub fn overlaps(p1: &[Point], p2: &[Point]) -> bool {
    bounds(p1).intersects(&bounds(p2)) && separating_axis_overlap(p1, p2)
}
