//! Uniform grid for broad-phase overlap queries.
//!
//! Placed shapes are bucketed by bounding box into fixed-size cells. The grid
//! covers a fixed working area anchored at the world origin; boxes outside it
//! are clamped into the nearest edge cells, so lookups there degrade to a
//! scan of those cells but never miss a candidate.

use scanpack_core::config::MAX_GRID_CELLS;
use scanpack_core::{Error, GridConfig, Result, AABB2D};

/// Range of cells `[min_col, max_col] x [min_row, max_row]` touched by a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    pub min_col: usize,
    pub max_col: usize,
    pub min_row: usize,
    pub max_row: usize,
}

impl CellRange {
    /// Number of cells in the range.
    pub fn cell_count(&self) -> usize {
        (self.max_col - self.min_col + 1) * (self.max_row - self.min_row + 1)
    }
}

/// Uniform grid spatial index over placement indices.
#[derive(Debug)]
pub struct SpatialGrid {
    config: GridConfig,
    cols: usize,
    rows: usize,
    cells: Vec<Vec<usize>>,
    /// Per-shape marker used to deduplicate query results.
    visited: Vec<bool>,
    len: usize,
    capacity: usize,
}

impl SpatialGrid {
    /// Creates an empty grid.
    ///
    /// Fails with [`Error::InvalidConfig`] if the layout is invalid or needs
    /// more than [`MAX_GRID_CELLS`] cells.
    pub fn new(config: GridConfig, capacity: usize) -> Result<Self> {
        config.validate()?;
        let cols = config.cols();
        let rows = config.rows();
        Ok(Self {
            config,
            cols,
            rows,
            cells: vec![Vec::new(); cols * rows],
            visited: Vec::new(),
            len: 0,
            capacity,
        })
    }

    /// Grid layout.
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Number of inserted shapes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if nothing has been inserted.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Maximum number of trackable shapes.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns true once the trackable-shape limit is reached.
    ///
    /// A saturated grid cannot vouch for any candidate; callers must treat
    /// every query as an overlap.
    pub fn is_saturated(&self) -> bool {
        self.len >= self.capacity
    }

    /// Returns true if `bounds` lies within the covered working area.
    pub fn covers(&self, bounds: &AABB2D) -> bool {
        AABB2D::new(0.0, 0.0, self.config.width, self.config.height).contains(bounds)
    }

    /// Computes the clamped cell range for a bounding box.
    pub fn cell_range(&self, bounds: &AABB2D) -> CellRange {
        let (min_col, max_col) = self.clamp_span(bounds.min_x, bounds.max_x, self.cols);
        let (min_row, max_row) = self.clamp_span(bounds.min_y, bounds.max_y, self.rows);
        CellRange {
            min_col,
            max_col,
            min_row,
            max_row,
        }
    }

    fn clamp_span(&self, min: f64, max: f64, count: usize) -> (usize, usize) {
        let last = count.saturating_sub(1) as f64;
        let lo = (min / self.config.cell_size).floor().clamp(0.0, last) as usize;
        let hi = (max / self.config.cell_size).floor().clamp(0.0, last) as usize;
        (lo, hi.max(lo))
    }

    /// Adds `index` to every cell covered by `bounds`.
    ///
    /// The same index ends up in several cells when the box spans them;
    /// [`query_candidates`](Self::query_candidates) deduplicates.
    pub fn insert(&mut self, index: usize, bounds: &AABB2D) -> Result<()> {
        if self.is_saturated() || index >= self.capacity {
            return Err(Error::CapacityExceeded {
                capacity: self.capacity,
            });
        }

        let range = self.cell_range(bounds);
        for row in range.min_row..=range.max_row {
            for col in range.min_col..=range.max_col {
                self.cells[row * self.cols + col].push(index);
            }
        }

        if index >= self.visited.len() {
            self.visited.resize(index + 1, false);
        }
        self.len += 1;
        Ok(())
    }

    /// Collects the indices stored in every cell covered by `bounds`.
    ///
    /// Each index appears once, in first-seen order (row-major over cells).
    pub fn query_candidates(&mut self, bounds: &AABB2D) -> Vec<usize> {
        let range = self.cell_range(bounds);
        let mut found = Vec::new();

        for row in range.min_row..=range.max_row {
            for col in range.min_col..=range.max_col {
                for &index in &self.cells[row * self.cols + col] {
                    if !self.visited[index] {
                        self.visited[index] = true;
                        found.push(index);
                    }
                }
            }
        }

        for &index in &found {
            self.visited[index] = false;
        }
        found
    }

    /// Removes every entry and releases cell storage.
    pub fn clear(&mut self) {
        self.cells = vec![Vec::new(); self.cols * self.rows];
        self.visited = Vec::new();
        self.len = 0;
    }
}
