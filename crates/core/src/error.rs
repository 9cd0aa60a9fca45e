//! Error types.

use thiserror::Error;

/// Errors produced while configuring or driving a packing run.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// A container or unit polygon, or a step size, was rejected.
    #[error("invalid polygon: {0}")]
    InvalidPolygon(String),

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// An operation was called in a session state that does not allow it.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// The spatial index cannot track any more shapes.
    #[error("spatial index capacity of {capacity} shapes exceeded")]
    CapacityExceeded {
        /// Maximum number of trackable shapes.
        capacity: usize,
    },
}

/// Result alias used throughout scanpack.
pub type Result<T> = std::result::Result<T, Error>;
