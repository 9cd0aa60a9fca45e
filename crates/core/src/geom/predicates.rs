//! Exact turn-direction predicate.
//!
//! Backed by Shewchuk's adaptive-precision `orient2d`, so nearly collinear
//! vertices are classified correctly instead of by a fixed tolerance.

use super::Point;
use robust::{orient2d, Coord};

/// Direction of the turn `a -> b -> c`, in y-up terms.
///
/// On a y-down screen a `Left` turn is drawn clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Turn {
    Left,
    Right,
    Straight,
}

/// Classifies the turn at `b` when walking `a -> b -> c`.
pub fn turn(a: Point, b: Point, c: Point) -> Turn {
    let det = orient2d(
        Coord { x: a.0, y: a.1 },
        Coord { x: b.0, y: b.1 },
        Coord { x: c.0, y: c.1 },
    );
    if det > 0.0 {
        Turn::Left
    } else if det < 0.0 {
        Turn::Right
    } else {
        Turn::Straight
    }
}
