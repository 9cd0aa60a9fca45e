//! # Scanpack 2D
//!
//! Greedy scan-line packing of one polygon shape into a polygon container.
//!
//! A cursor sweeps the container's bounding box in raster order. At each
//! position the unit shape is tried at increasing rotation angles and the
//! first orientation that lies fully inside the container without
//! overlapping an earlier placement is accepted. Overlap candidates come
//! from a uniform-grid broad phase followed by a separating axis test.
//!
//! ## Features
//!
//! - Arbitrary simple polygons (up to 32 vertices) for container and unit
//! - Resumable packing: bounded work per step, for frame-driven hosts
//! - Session state machine with vertex drafting for interactive editors
//! - Placement and completion events
//!
//! ## Quick Start
//!
//! ```rust
//! use scanpack_d2::{PackConfig, PackingEngine, Polygon};
//!
//! let container = Polygon::rectangle(100.0, 100.0);
//! let unit = Polygon::rectangle(10.0, 10.0);
//!
//! let mut engine =
//!     PackingEngine::configure(container, unit, 10.0, 90.0, &PackConfig::default()).unwrap();
//! let result = engine.run_to_completion(200);
//!
//! println!(
//!     "Placed {} shapes, efficiency: {:.1}%",
//!     result.placed_count(),
//!     result.efficiency_percent
//! );
//! ```
//!
//! ## Interactive Sessions
//!
//! ```rust
//! use scanpack_d2::{Session, SessionState};
//!
//! let mut session = Session::default();
//! for p in [(0.0, 0.0), (120.0, 0.0), (120.0, 80.0), (0.0, 80.0)] {
//!     session.add_vertex(p).unwrap();
//! }
//! session.finish_shape().unwrap();
//! assert_eq!(session.state(), SessionState::DefiningInnerShape);
//!
//! for p in [(0.0, 0.0), (12.0, 0.0), (6.0, 10.0)] {
//!     session.add_vertex(p).unwrap();
//! }
//! session.finish_shape().unwrap();
//!
//! while !session.tick().unwrap().done {}
//! let result = session.result().unwrap();
//! assert!(result.placed_count() > 0);
//! ```

pub mod geometry;
pub mod packer;
pub mod session;
pub mod spatial_index;

// Re-exports
pub use geometry::{Polygon, MAX_VERTICES};
pub use packer::{PackResult, PackingEngine, PlacedShape};
pub use scanpack_core::{
    Error, EventCallback, GridConfig, PackConfig, PackEvent, Point, ProgressReport, Result,
    StopReason, Transform2D, AABB2D,
};
pub use session::{Session, SessionState, DEFAULT_HIT_RADIUS};
pub use spatial_index::{CellRange, SpatialGrid};
