//! Packing configuration.

use crate::{Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default number of cursor positions tried per host tick.
pub const DEFAULT_ATTEMPTS_PER_STEP: usize = 200;

/// Default trackable-shape limit of the spatial index.
pub const DEFAULT_CAPACITY: usize = 20_000;

/// Largest number of cells a grid layout may allocate.
pub const MAX_GRID_CELLS: usize = 1 << 20;

/// Layout of the uniform broad-phase grid.
///
/// The grid covers a fixed working area anchored at the world origin,
/// independent of the container. Shapes outside that area are bucketed into
/// the nearest edge cells: queries there stay correct but get slower.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GridConfig {
    /// Side length of a square cell.
    pub cell_size: f64,
    /// Width of the covered working area.
    pub width: f64,
    /// Height of the covered working area.
    pub height: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_size: 40.0,
            width: 1300.0,
            height: 800.0,
        }
    }
}

impl GridConfig {
    /// Creates a grid layout.
    pub fn new(cell_size: f64, width: f64, height: f64) -> Self {
        Self {
            cell_size,
            width,
            height,
        }
    }

    /// Number of cell columns.
    pub fn cols(&self) -> usize {
        cells_along(self.width, self.cell_size)
    }

    /// Number of cell rows.
    pub fn rows(&self) -> usize {
        cells_along(self.height, self.cell_size)
    }

    /// Total number of cells, or `None` if it does not fit in `usize`.
    pub fn cell_count(&self) -> Option<usize> {
        self.cols().checked_mul(self.rows())
    }

    /// Validates the layout.
    pub fn validate(&self) -> Result<()> {
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(Error::InvalidConfig(format!(
                "grid cell size must be positive, got {}",
                self.cell_size
            )));
        }
        if !(self.width.is_finite() && self.width >= 0.0)
            || !(self.height.is_finite() && self.height >= 0.0)
        {
            return Err(Error::InvalidConfig(format!(
                "grid extent must be non-negative, got {}x{}",
                self.width, self.height
            )));
        }
        match self.cell_count() {
            Some(cells) if cells <= MAX_GRID_CELLS => Ok(()),
            _ => Err(Error::InvalidConfig(format!(
                "grid of {}x{} with cell size {} exceeds {} cells",
                self.width, self.height, self.cell_size, MAX_GRID_CELLS
            ))),
        }
    }
}

// Float-to-int casts saturate, so oversized extents end up at usize::MAX.
fn cells_along(extent: f64, cell_size: f64) -> usize {
    ((extent / cell_size).floor() as usize).saturating_add(1)
}

/// Configuration shared by the packing engine and the session driving it.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PackConfig {
    /// Initial distance between consecutive cursor positions.
    pub position_step: f64,

    /// Initial rotation sweep increment in degrees.
    pub rotation_step_deg: f64,

    /// Cursor positions tried per `tick`.
    pub attempts_per_step: usize,

    /// Maximum number of placed shapes the spatial index tracks.
    pub capacity: usize,

    /// Broad-phase grid layout.
    pub grid: GridConfig,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            position_step: 3.0,
            rotation_step_deg: 5.0,
            attempts_per_step: DEFAULT_ATTEMPTS_PER_STEP,
            capacity: DEFAULT_CAPACITY,
            grid: GridConfig::default(),
        }
    }
}

impl PackConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the position step.
    pub fn with_position_step(mut self, step: f64) -> Self {
        self.position_step = step;
        self
    }

    /// Sets the rotation step in degrees.
    pub fn with_rotation_step(mut self, degrees: f64) -> Self {
        self.rotation_step_deg = degrees;
        self
    }

    /// Sets the number of attempts per tick.
    pub fn with_attempts_per_step(mut self, attempts: usize) -> Self {
        self.attempts_per_step = attempts;
        self
    }

    /// Sets the trackable-shape limit.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the grid layout.
    pub fn with_grid(mut self, grid: GridConfig) -> Self {
        self.grid = grid;
        self
    }

    /// Validates the configuration.
    ///
    /// Step sizes are checked separately by [`validate_steps`] because hosts
    /// may change them between runs.
    pub fn validate(&self) -> Result<()> {
        validate_steps(self.position_step, self.rotation_step_deg)?;
        if self.attempts_per_step == 0 {
            return Err(Error::InvalidConfig(
                "attempts per step must be at least 1".into(),
            ));
        }
        if self.capacity == 0 {
            return Err(Error::InvalidConfig("capacity must be at least 1".into()));
        }
        self.grid.validate()
    }
}

/// Checks that both scan steps are finite and strictly positive.
pub fn validate_steps(position_step: f64, rotation_step_deg: f64) -> Result<()> {
    if !(position_step.is_finite() && position_step > 0.0) {
        return Err(Error::InvalidPolygon(format!(
            "position step must be positive, got {}",
            position_step
        )));
    }
    if !(rotation_step_deg.is_finite() && rotation_step_deg > 0.0) {
        return Err(Error::InvalidPolygon(format!(
            "rotation step must be positive, got {}",
            rotation_step_deg
        )));
    }
    Ok(())
}
