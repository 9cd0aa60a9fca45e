//! # Scanpack Core
//!
//! Shared building blocks for the scanpack polygon packer.
//!
//! ## Core Components
//!
//! - **Geometry**: [`geom::polygon`] (bounds, bounding-box center, shoelace
//!   area, winding, crossing-number containment) and [`geom::collision`]
//!   (segment intersection, full containment, separating axis overlap)
//! - **Transforms**: [`AABB2D`], [`Transform2D`]
//! - **Configuration**: [`PackConfig`], [`GridConfig`]
//! - **Reporting**: [`ProgressReport`], [`PackEvent`], [`StopReason`]
//!
//! ## Coordinate Convention
//!
//! The origin is the top-left corner and y grows downward. A polygon is
//! *normalized* when its shoelace signed area is `<= 0`; containment tests
//! assume normalized input.
//!
//! ```rust
//! use scanpack_core::geom::polygon::{normalize_winding, signed_area};
//!
//! let mut square = vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)];
//! normalize_winding(&mut square);
//! assert!(signed_area(&square) <= 0.0);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization support

pub mod config;
pub mod error;
pub mod geom;
pub mod result;
pub mod transform;

// Re-exports
pub use config::{validate_steps, GridConfig, PackConfig};
pub use error::{Error, Result};
pub use geom::Point;
pub use result::{efficiency_percent, EventCallback, PackEvent, ProgressReport, StopReason};
pub use transform::{Transform2D, AABB2D};
