//! Polygon type used for containers, unit shapes and placed copies.

use scanpack_core::geom::collision;
use scanpack_core::geom::polygon as geom_polygon;
use scanpack_core::{Error, Point, Result, Transform2D, AABB2D};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum number of vertices a container or unit shape may have.
pub const MAX_VERTICES: usize = 32;

/// An implicitly closed polygon (last vertex connects to the first).
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Polygon {
    vertices: Vec<Point>,
}

impl Polygon {
    /// Creates a polygon from its vertices.
    pub fn new(vertices: Vec<Point>) -> Self {
        Self { vertices }
    }

    /// Creates an axis-aligned rectangle with its top-left corner at the origin.
    pub fn rectangle(width: f64, height: f64) -> Self {
        Self::new(vec![
            (0.0, 0.0),
            (width, 0.0),
            (width, height),
            (0.0, height),
        ])
    }

    /// Creates an axis-aligned rectangle from two opposite corners.
    pub fn from_corners(min: Point, max: Point) -> Self {
        Self::new(vec![
            (min.0, min.1),
            (max.0, min.1),
            (max.0, max.1),
            (min.0, max.1),
        ])
    }

    /// Creates a regular n-gon inscribed in a circle centered at `(radius, radius)`.
    pub fn regular(radius: f64, n: usize) -> Self {
        let n = n.clamp(3, MAX_VERTICES);
        let step = std::f64::consts::TAU / n as f64;
        let vertices = (0..n)
            .map(|i| {
                let angle = i as f64 * step;
                (radius * angle.cos() + radius, radius * angle.sin() + radius)
            })
            .collect();
        Self::new(vertices)
    }

    /// Creates an L-shaped polygon with the notch cut from the lower right.
    pub fn l_shape(width: f64, height: f64, notch_width: f64, notch_height: f64) -> Self {
        Self::new(vec![
            (0.0, 0.0),
            (width, 0.0),
            (width, notch_height),
            (notch_width, notch_height),
            (notch_width, height),
            (0.0, height),
        ])
    }

    /// Returns the vertices.
    pub fn vertices(&self) -> &[Point] {
        &self.vertices
    }

    /// Consumes the polygon and returns its vertices.
    pub fn into_vertices(self) -> Vec<Point> {
        self.vertices
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Returns true if the polygon has no vertices.
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Axis-aligned bounding box.
    pub fn bounds(&self) -> AABB2D {
        geom_polygon::bounds(&self.vertices)
    }

    /// Bounding-box center.
    pub fn center(&self) -> Point {
        geom_polygon::center(&self.vertices)
    }

    /// Shoelace signed area (y-down convention).
    pub fn signed_area(&self) -> f64 {
        geom_polygon::signed_area(&self.vertices)
    }

    /// Absolute area.
    pub fn area(&self) -> f64 {
        geom_polygon::area(&self.vertices)
    }

    /// Returns true if the polygon is convex.
    pub fn is_convex(&self) -> bool {
        geom_polygon::is_convex(&self.vertices)
    }

    /// Reverses the vertex order unless the signed area is already negative.
    pub fn normalize_winding(&mut self) {
        geom_polygon::normalize_winding(&mut self.vertices);
    }

    /// Returns the polygon with normalized winding.
    pub fn normalized(mut self) -> Self {
        self.normalize_winding();
        self
    }

    /// Returns a copy moved so that its bounding-box center is the origin.
    pub fn recentered(&self) -> Self {
        let (cx, cy) = self.center();
        self.translated(-cx, -cy)
    }

    /// Returns a copy moved by `(dx, dy)`.
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self::new(geom_polygon::translate(&self.vertices, dx, dy))
    }

    /// Returns a copy with the transform applied to every vertex.
    pub fn transformed(&self, transform: &Transform2D) -> Self {
        Self::new(transform.apply_all(&self.vertices))
    }

    /// Crossing-number containment test for a single point.
    pub fn contains_point(&self, point: Point) -> bool {
        geom_polygon::point_in_polygon(point, &self.vertices)
    }

    /// Returns true if this polygon lies entirely within `container`.
    pub fn is_fully_inside(&self, container: &Polygon) -> bool {
        collision::is_fully_inside(&self.vertices, &container.vertices)
    }

    /// Bounding-box pre-check plus separating axis test.
    pub fn overlaps(&self, other: &Polygon) -> bool {
        collision::overlaps(&self.vertices, &other.vertices)
    }

    /// Checks the vertex count and that all coordinates are finite.
    ///
    /// `role` names the polygon in the error message.
    pub fn validate(&self, role: &str) -> Result<()> {
        let n = self.vertices.len();
        if n < 3 {
            return Err(Error::InvalidPolygon(format!(
                "{} must have at least 3 vertices, got {}",
                role, n
            )));
        }
        if n > MAX_VERTICES {
            return Err(Error::InvalidPolygon(format!(
                "{} must have at most {} vertices, got {}",
                role, MAX_VERTICES, n
            )));
        }
        if let Some(&(x, y)) = self
            .vertices
            .iter()
            .find(|(x, y)| !x.is_finite() || !y.is_finite())
        {
            return Err(Error::InvalidPolygon(format!(
                "{} has a non-finite vertex ({}, {})",
                role, x, y
            )));
        }
        Ok(())
    }
}

impl From<Vec<Point>> for Polygon {
    fn from(vertices: Vec<Point>) -> Self {
        Self::new(vertices)
    }
}
