//! Geometry primitives on raw vertex slices.
//!
//! Polygons are implicitly closed sequences of `(x, y)` points in a y-down
//! coordinate system. A polygon with non-positive signed area is considered
//! normalized.

pub mod collision;
pub mod polygon;
pub mod predicates;

/// A 2D point `(x, y)`.
pub type Point = (f64, f64);
