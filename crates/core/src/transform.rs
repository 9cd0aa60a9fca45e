//! Axis-aligned boxes and rigid 2D transforms.

use nalgebra::{Isometry2, Point2, Vector2};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in world coordinates (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AABB2D {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl AABB2D {
    /// Creates a box from its corners.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Width of the box.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the box.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Center of the box.
    pub fn center(&self) -> (f64, f64) {
        (
            self.min_x + self.width() / 2.0,
            self.min_y + self.height() / 2.0,
        )
    }

    /// Returns the box moved by `(dx, dy)`.
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.min_x + dx, self.min_y + dy, self.max_x + dx, self.max_y + dy)
    }

    /// Strict intersection test: boxes that only share an edge or a corner
    /// do not intersect.
    pub fn intersects(&self, other: &AABB2D) -> bool {
        self.min_x < other.max_x
            && self.max_x > other.min_x
            && self.min_y < other.max_y
            && self.max_y > other.min_y
    }

    /// Returns true if `other` lies entirely within this box (edges inclusive).
    pub fn contains(&self, other: &AABB2D) -> bool {
        other.min_x >= self.min_x
            && other.max_x <= self.max_x
            && other.min_y >= self.min_y
            && other.max_y <= self.max_y
    }
}

/// Rotation about the origin followed by a translation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Transform2D {
    /// Translation along x.
    pub tx: f64,
    /// Translation along y.
    pub ty: f64,
    /// Rotation angle in radians.
    pub angle: f64,
}

impl Transform2D {
    /// Creates a transform from a translation and a rotation in radians.
    pub fn new(tx: f64, ty: f64, angle: f64) -> Self {
        Self { tx, ty, angle }
    }

    /// Pure rotation given in degrees.
    pub fn rotation_deg(degrees: f64) -> Self {
        Self::new(0.0, 0.0, degrees.to_radians())
    }

    /// Pure translation.
    pub fn translation(tx: f64, ty: f64) -> Self {
        Self::new(tx, ty, 0.0)
    }

    fn isometry(&self) -> Isometry2<f64> {
        Isometry2::new(Vector2::new(self.tx, self.ty), self.angle)
    }

    /// Applies the transform to a single point.
    pub fn apply(&self, point: (f64, f64)) -> (f64, f64) {
        let p = self.isometry().transform_point(&Point2::new(point.0, point.1));
        (p.x, p.y)
    }

    /// Applies the transform to every vertex.
    pub fn apply_all(&self, points: &[(f64, f64)]) -> Vec<(f64, f64)> {
        let mut out = Vec::with_capacity(points.len());
        self.apply_into(points, &mut out);
        out
    }

    /// Replaces the contents of `out` with the transformed vertices,
    /// reusing its allocation.
    pub fn apply_into(&self, points: &[(f64, f64)], out: &mut Vec<(f64, f64)>) {
        let iso = self.isometry();
        out.clear();
        out.extend(points.iter().map(|&(x, y)| {
            let p = iso.transform_point(&Point2::new(x, y));
            (p.x, p.y)
        }));
    }
}
