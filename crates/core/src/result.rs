//! Progress reports and events emitted while packing.

use crate::geom::Point;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Why a packing run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum StopReason {
    /// The scan cursor passed the bottom of the container.
    Completed,
    /// The spatial index hit its trackable-shape limit.
    CapacityExceeded,
}

/// Snapshot returned from every `step` call.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProgressReport {
    /// Total shapes placed so far.
    pub placed_count: usize,
    /// Scan cursor after this step.
    pub cursor: Point,
    /// True once the run is finished.
    pub done: bool,
    /// Shapes accepted during this step.
    pub placed_this_step: usize,
    /// Cursor positions tried during this step.
    pub attempts_this_step: usize,
}

/// Structured notification for hosts that render or play feedback.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PackEvent {
    /// A shape was accepted.
    Placed {
        /// Placement index (0-based, in acceptance order).
        index: usize,
        /// Cursor position the shape is centered on.
        position: Point,
        /// Accepted rotation in degrees.
        angle_deg: f64,
    },
    /// The run finished.
    Finished {
        /// Total shapes placed.
        placed_count: usize,
        /// Placed area over container area, in percent.
        efficiency_percent: f64,
        /// Why the run stopped.
        reason: StopReason,
    },
}

/// Host-side event subscriber.
pub type EventCallback = Box<dyn FnMut(&PackEvent) + Send>;

/// Packing efficiency in percent: placed area over container area.
///
/// A zero-area container yields 0 rather than a division by zero.
pub fn efficiency_percent(placed_count: usize, unit_area: f64, container_area: f64) -> f64 {
    if container_area == 0.0 {
        return 0.0;
    }
    (placed_count as f64 * unit_area) / container_area * 100.0
}
