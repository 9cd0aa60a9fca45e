//! Greedy scan-line packing engine.
//!
//! A cursor walks the container's bounding box in raster order. At every
//! cursor position the unit shape is tried at increasing angles
//! (`0, step, 2*step, ...` below 360 degrees) and the first orientation that
//! fits inside the container without overlapping an earlier placement is
//! accepted. The run is resumable: each [`PackingEngine::step`] call tries a
//! bounded number of cursor positions so a host loop never stalls.

use crate::geometry::{Polygon, MAX_VERTICES};
use crate::spatial_index::SpatialGrid;
use scanpack_core::geom::collision::{is_fully_inside, separating_axis_overlap};
use scanpack_core::geom::polygon::bounds;
use scanpack_core::{
    efficiency_percent, validate_steps, Error, PackConfig, PackEvent, Point, ProgressReport,
    Result, StopReason, Transform2D, AABB2D,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A copy of the unit shape accepted into the container.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlacedShape {
    /// Placement index, increasing in acceptance order.
    pub index: usize,
    /// World-space vertices.
    pub polygon: Polygon,
    /// Cached bounds of `polygon`.
    pub bounds: AABB2D,
    /// Cursor position the unit shape's center was moved to.
    pub position: Point,
    /// Rotation applied to the unit shape, in degrees.
    pub angle_deg: f64,
}

/// Outcome of a finished packing run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PackResult {
    /// Accepted placements in acceptance order.
    pub placements: Vec<PlacedShape>,
    /// Placed area over container area, in percent.
    pub efficiency_percent: f64,
    /// Why the run stopped.
    pub stop_reason: StopReason,
    /// Absolute container area.
    pub container_area: f64,
    /// Absolute unit shape area.
    pub unit_area: f64,
    /// Cursor positions tried over the whole run.
    pub attempts: u64,
}

impl PackResult {
    /// Number of placed shapes.
    pub fn placed_count(&self) -> usize {
        self.placements.len()
    }

    /// Returns true if the run ended because the index was full.
    pub fn capacity_exceeded(&self) -> bool {
        self.stop_reason == StopReason::CapacityExceeded
    }
}

/// Sweep angles `0, step, 2*step, ...` below 360 degrees, computed on demand.
fn sweep_angles(rotation_step_deg: f64) -> impl Iterator<Item = f64> {
    (0u64..)
        .map(move |k| k as f64 * rotation_step_deg)
        .take_while(|&angle_deg| angle_deg < 360.0)
}

fn collides_with_placed(
    index: &mut SpatialGrid,
    placements: &[PlacedShape],
    candidate: &[Point],
    bounds: &AABB2D,
) -> bool {
    if placements.is_empty() {
        return false;
    }
    if index.is_saturated() {
        return true;
    }

    index.query_candidates(bounds).into_iter().any(|i| {
        let placed = &placements[i];
        placed.bounds.intersects(bounds)
            && separating_axis_overlap(candidate, placed.polygon.vertices())
    })
}

/// Packs copies of a unit polygon into a container polygon.
#[derive(Debug)]
pub struct PackingEngine {
    container: Polygon,
    container_bounds: AABB2D,
    container_area: f64,
    unit: Polygon,
    unit_area: f64,
    position_step: f64,
    rotation_step_deg: f64,
    /// Candidate vertices, reused across sweep angles.
    scratch: Vec<Point>,
    cursor: Point,
    placements: Vec<PlacedShape>,
    index: SpatialGrid,
    stop_reason: Option<StopReason>,
    efficiency_percent: f64,
    attempts: u64,
}

impl PackingEngine {
    /// Validates the inputs and prepares a run.
    ///
    /// The container gets its winding normalized. The unit shape is
    /// normalized and re-centered on its bounding-box center, which is also
    /// the pivot for every rotation.
    pub fn configure(
        container: Polygon,
        unit: Polygon,
        position_step: f64,
        rotation_step_deg: f64,
        config: &PackConfig,
    ) -> Result<Self> {
        container.validate("container")?;
        unit.validate("unit shape")?;
        validate_steps(position_step, rotation_step_deg)?;
        if config.capacity == 0 {
            return Err(Error::InvalidConfig("capacity must be at least 1".into()));
        }

        let container = container.normalized();
        let container_bounds = container.bounds();
        let container_area = container.area();

        let unit = unit.normalized().recentered();
        let unit_area = unit.area();

        if !unit.is_convex() {
            log::warn!(
                "unit shape is concave; the separating axis test may reject placements that do not overlap"
            );
        }

        let index = SpatialGrid::new(config.grid, config.capacity)?;
        if !index.covers(&container_bounds) {
            log::warn!(
                "container bounds {:?} extend past the {}x{} spatial grid; broad-phase queries near the edge will be slower",
                container_bounds,
                config.grid.width,
                config.grid.height
            );
        }

        log::debug!(
            "configured packing: container area {:.2}, unit area {:.2}, position step {}, rotation step {} deg",
            container_area,
            unit_area,
            position_step,
            rotation_step_deg
        );

        Ok(Self {
            cursor: (container_bounds.min_x, container_bounds.min_y),
            container,
            container_bounds,
            container_area,
            unit,
            unit_area,
            position_step,
            rotation_step_deg,
            scratch: Vec::with_capacity(MAX_VERTICES),
            placements: Vec::new(),
            index,
            stop_reason: None,
            efficiency_percent: 0.0,
            attempts: 0,
        })
    }

    /// Normalized container.
    pub fn container(&self) -> &Polygon {
        &self.container
    }

    /// Normalized, re-centered unit shape.
    pub fn unit_shape(&self) -> &Polygon {
        &self.unit
    }

    /// Absolute container area.
    pub fn container_area(&self) -> f64 {
        self.container_area
    }

    /// Absolute unit shape area.
    pub fn unit_area(&self) -> f64 {
        self.unit_area
    }

    /// Current scan cursor.
    pub fn cursor(&self) -> Point {
        self.cursor
    }

    /// Accepted placements so far.
    pub fn placements(&self) -> &[PlacedShape] {
        &self.placements
    }

    /// Number of accepted placements.
    pub fn placed_count(&self) -> usize {
        self.placements.len()
    }

    /// Cursor positions tried so far.
    pub fn attempts(&self) -> u64 {
        self.attempts
    }

    /// Current position step.
    pub fn position_step(&self) -> f64 {
        self.position_step
    }

    /// Current rotation step in degrees.
    pub fn rotation_step(&self) -> f64 {
        self.rotation_step_deg
    }

    /// Returns true once the run has stopped.
    pub fn is_done(&self) -> bool {
        self.stop_reason.is_some()
    }

    /// Why the run stopped, if it has.
    pub fn stop_reason(&self) -> Option<StopReason> {
        self.stop_reason
    }

    /// Changes the position step; takes effect from the next cursor move.
    pub fn set_position_step(&mut self, position_step: f64) -> Result<()> {
        validate_steps(position_step, self.rotation_step_deg)?;
        self.position_step = position_step;
        Ok(())
    }

    /// Changes the rotation step; takes effect from the next attempt.
    pub fn set_rotation_step(&mut self, rotation_step_deg: f64) -> Result<()> {
        validate_steps(self.position_step, rotation_step_deg)?;
        self.rotation_step_deg = rotation_step_deg;
        Ok(())
    }

    /// Tries up to `max_attempts` cursor positions.
    pub fn step(&mut self, max_attempts: usize) -> ProgressReport {
        self.step_with(max_attempts, |_| {})
    }

    /// Like [`step`](Self::step), reporting placements and completion to
    /// `on_event`.
    pub fn step_with<F>(&mut self, max_attempts: usize, mut on_event: F) -> ProgressReport
    where
        F: FnMut(&PackEvent),
    {
        let placed_before = self.placements.len();
        let mut attempts = 0;

        while attempts < max_attempts && !self.is_done() {
            attempts += 1;

            if self.cursor.1 >= self.container_bounds.max_y {
                self.finish(StopReason::Completed, &mut on_event);
                break;
            }

            self.attempt(&mut on_event);
            self.advance_cursor();

            if self.index.is_saturated() && !self.is_done() {
                self.finish(StopReason::CapacityExceeded, &mut on_event);
            }
        }

        self.attempts += attempts as u64;
        ProgressReport {
            placed_count: self.placements.len(),
            cursor: self.cursor,
            done: self.is_done(),
            placed_this_step: self.placements.len() - placed_before,
            attempts_this_step: attempts,
        }
    }

    /// Steps until the run stops and returns the result.
    pub fn run_to_completion(&mut self, attempts_per_step: usize) -> PackResult {
        let attempts_per_step = attempts_per_step.max(1);
        while !self.is_done() {
            self.step(attempts_per_step);
        }
        self.snapshot()
    }

    /// Result of the run, available once it has stopped.
    pub fn result(&self) -> Option<PackResult> {
        self.is_done().then(|| self.snapshot())
    }

    fn snapshot(&self) -> PackResult {
        PackResult {
            placements: self.placements.clone(),
            efficiency_percent: self.efficiency_percent,
            stop_reason: self.stop_reason.unwrap_or(StopReason::Completed),
            container_area: self.container_area,
            unit_area: self.unit_area,
            attempts: self.attempts,
        }
    }

    /// Returns true if `candidate` overlaps any accepted placement.
    ///
    /// Once the spatial index is saturated every candidate collides.
    pub fn collides(&mut self, candidate: &Polygon) -> bool {
        let bounds = candidate.bounds();
        collides_with_placed(
            &mut self.index,
            &self.placements,
            candidate.vertices(),
            &bounds,
        )
    }

    fn attempt<F>(&mut self, on_event: &mut F)
    where
        F: FnMut(&PackEvent),
    {
        let (cx, cy) = self.cursor;

        for angle_deg in sweep_angles(self.rotation_step_deg) {
            Transform2D::new(cx, cy, angle_deg.to_radians())
                .apply_into(self.unit.vertices(), &mut self.scratch);
            let candidate_bounds = bounds(&self.scratch);
            // A vertex outside the container's box is outside the container.
            if !self.container_bounds.contains(&candidate_bounds) {
                continue;
            }
            if !is_fully_inside(&self.scratch, self.container.vertices()) {
                continue;
            }
            if collides_with_placed(
                &mut self.index,
                &self.placements,
                &self.scratch,
                &candidate_bounds,
            ) {
                continue;
            }

            let vertices = self.scratch.clone();
            self.accept(vertices, candidate_bounds, angle_deg, on_event);
            return;
        }
    }

    fn accept<F>(&mut self, vertices: Vec<Point>, bounds: AABB2D, angle_deg: f64, on_event: &mut F)
    where
        F: FnMut(&PackEvent),
    {
        let index = self.placements.len();
        if let Err(err) = self.index.insert(index, &bounds) {
            log::warn!("dropping placement at {:?}: {}", self.cursor, err);
            self.finish(StopReason::CapacityExceeded, on_event);
            return;
        }

        log::trace!(
            "placed #{} at ({:.2}, {:.2}) rotated {:.1} deg",
            index,
            self.cursor.0,
            self.cursor.1,
            angle_deg
        );

        self.placements.push(PlacedShape {
            index,
            polygon: Polygon::new(vertices),
            bounds,
            position: self.cursor,
            angle_deg,
        });
        on_event(&PackEvent::Placed {
            index,
            position: self.cursor,
            angle_deg,
        });
    }

    fn advance_cursor(&mut self) {
        let (x, y) = self.cursor;
        let next_x = x + self.position_step;
        // A step below the coordinate's precision would stall the scan.
        if next_x >= self.container_bounds.max_x || next_x == x {
            let next_y = y + self.position_step;
            self.cursor = (
                self.container_bounds.min_x,
                if next_y == y {
                    self.container_bounds.max_y
                } else {
                    next_y
                },
            );
        } else {
            self.cursor = (next_x, y);
        }
    }

    fn finish<F>(&mut self, reason: StopReason, on_event: &mut F)
    where
        F: FnMut(&PackEvent),
    {
        self.stop_reason = Some(reason);
        self.efficiency_percent =
            efficiency_percent(self.placements.len(), self.unit_area, self.container_area);

        match reason {
            StopReason::Completed => log::info!(
                "packing complete: {} shapes, {:.2}% efficiency after {} attempts",
                self.placements.len(),
                self.efficiency_percent,
                self.attempts
            ),
            StopReason::CapacityExceeded => log::warn!(
                "packing halted at the {}-shape index capacity ({:.2}% efficiency)",
                self.index.capacity(),
                self.efficiency_percent
            ),
        }

        on_event(&PackEvent::Finished {
            placed_count: self.placements.len(),
            efficiency_percent: self.efficiency_percent,
            reason,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use scanpack_core::GridConfig;

    fn square_container() -> Polygon {
        Polygon::rectangle(100.0, 100.0)
    }

    #[test]
    fn test_configure_rejects_bad_input() {
        let config = PackConfig::default();
        let unit = Polygon::rectangle(10.0, 10.0);

        let two = Polygon::new(vec![(0.0, 0.0), (1.0, 1.0)]);
        assert!(matches!(
            PackingEngine::configure(two.clone(), unit.clone(), 1.0, 1.0, &config),
            Err(Error::InvalidPolygon(_))
        ));
        assert!(matches!(
            PackingEngine::configure(square_container(), two, 1.0, 1.0, &config),
            Err(Error::InvalidPolygon(_))
        ));
        assert!(matches!(
            PackingEngine::configure(square_container(), unit.clone(), 0.0, 1.0, &config),
            Err(Error::InvalidPolygon(_))
        ));
        assert!(matches!(
            PackingEngine::configure(square_container(), unit.clone(), 1.0, -90.0, &config),
            Err(Error::InvalidPolygon(_))
        ));

        let huge_grid = config.with_grid(GridConfig::new(40.0, 1e300, 800.0));
        assert!(matches!(
            PackingEngine::configure(square_container(), unit, 1.0, 1.0, &huge_grid),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_configure_normalizes_and_recenters() {
        let engine = PackingEngine::configure(
            Polygon::rectangle(100.0, 100.0),
            Polygon::rectangle(10.0, 4.0).translated(50.0, 50.0),
            5.0,
            90.0,
            &PackConfig::default(),
        )
        .unwrap();

        assert!(engine.container().signed_area() <= 0.0);
        assert!(engine.unit_shape().signed_area() <= 0.0);
        assert_eq!(engine.unit_shape().center(), (0.0, 0.0));
        assert_eq!(engine.cursor(), (0.0, 0.0));
        assert_relative_eq!(engine.container_area(), 10_000.0);
        assert_relative_eq!(engine.unit_area(), 40.0);
    }

    #[test]
    fn test_sweep_angles() {
        let angles: Vec<f64> = sweep_angles(50.0).collect();
        assert_eq!(angles, vec![0.0, 50.0, 100.0, 150.0, 200.0, 250.0, 300.0, 350.0]);

        // 360 itself is excluded
        assert_eq!(sweep_angles(120.0).count(), 3);
        assert_eq!(sweep_angles(90.0).count(), 4);
    }

    #[test]
    fn test_tiny_rotation_step() {
        // Angles are produced on demand, so a fine sweep costs time per
        // attempt but no memory up front.
        let mut engine = PackingEngine::configure(
            square_container(),
            Polygon::rectangle(10.0, 10.0),
            10.0,
            1e-9,
            &PackConfig::default(),
        )
        .unwrap();
        assert!(engine.scratch.capacity() <= MAX_VERTICES);

        engine.set_rotation_step(1e-6).unwrap();
        engine.set_rotation_step(1e-3).unwrap();
        let report = engine.step(1);
        assert_eq!(report.attempts_this_step, 1);
        assert_eq!(report.placed_count, 0);
        assert_eq!(report.cursor, (10.0, 0.0));
        assert!(engine.scratch.capacity() <= MAX_VERTICES);
    }

    #[test]
    fn test_step_is_bounded() {
        let mut engine = PackingEngine::configure(
            square_container(),
            Polygon::rectangle(10.0, 10.0),
            10.0,
            90.0,
            &PackConfig::default(),
        )
        .unwrap();

        let report = engine.step(5);
        assert_eq!(report.attempts_this_step, 5);
        assert!(!report.done);
        assert_eq!(report.cursor, (50.0, 0.0));
        assert_eq!(engine.attempts(), 5);
    }

    #[test]
    fn test_cursor_wraps_in_raster_order() {
        let mut engine = PackingEngine::configure(
            square_container(),
            Polygon::rectangle(10.0, 10.0),
            10.0,
            90.0,
            &PackConfig::default(),
        )
        .unwrap();

        // Ten positions per row: x = 0, 10, ..., 90
        let report = engine.step(10);
        assert_eq!(report.cursor, (0.0, 10.0));
        let report = engine.step(3);
        assert_eq!(report.cursor, (30.0, 10.0));
    }

    #[test]
    fn test_bar_only_fits_upright() {
        // A 30x10 bar only fits a 12-wide, 40-tall container when upright.
        let container = Polygon::rectangle(12.0, 40.0);
        let bar = Polygon::rectangle(30.0, 10.0);
        let mut engine =
            PackingEngine::configure(container, bar, 1.0, 45.0, &PackConfig::default()).unwrap();

        let mut placed = Vec::new();
        while !engine.is_done() {
            engine.step_with(50, |event| {
                if let PackEvent::Placed { angle_deg, .. } = event {
                    placed.push(*angle_deg);
                }
            });
        }

        assert_eq!(placed.len(), 1);
        assert!(placed[0] == 90.0 || placed[0] == 270.0);
    }

    #[test]
    fn test_collides_after_placement() {
        let mut engine = PackingEngine::configure(
            square_container(),
            Polygon::rectangle(10.0, 10.0),
            10.0,
            90.0,
            &PackConfig::default(),
        )
        .unwrap();
        engine.run_to_completion(100);

        let first = engine.placements()[0].polygon.clone();
        assert!(engine.collides(&first));
        assert!(engine.collides(&first.translated(3.0, 3.0)));
        assert!(!engine.collides(&first.translated(500.0, 500.0)));
    }

    #[test]
    fn test_capacity_guard_halts_packing() {
        let config = PackConfig::default().with_capacity(3);
        let mut engine = PackingEngine::configure(
            square_container(),
            Polygon::rectangle(10.0, 10.0),
            10.0,
            90.0,
            &config,
        )
        .unwrap();

        let result = engine.run_to_completion(7);
        assert_eq!(result.placed_count(), 3);
        assert!(result.capacity_exceeded());
        assert_relative_eq!(result.efficiency_percent, 3.0, epsilon = 1e-9);

        // Every further query reports an overlap, even far away
        let far = Polygon::rectangle(1.0, 1.0).translated(1000.0, 1000.0);
        assert!(engine.collides(&far));

        let report = engine.step(10);
        assert!(report.done);
        assert_eq!(report.attempts_this_step, 0);
    }

    #[test]
    fn test_result_only_when_done() {
        let mut engine = PackingEngine::configure(
            square_container(),
            Polygon::rectangle(10.0, 10.0),
            10.0,
            90.0,
            &PackConfig::default(),
        )
        .unwrap();

        assert!(engine.result().is_none());
        engine.run_to_completion(1000);
        let result = engine.result().unwrap();
        assert_eq!(result.stop_reason, StopReason::Completed);
        assert_eq!(result.placed_count(), engine.placed_count());
    }

    #[test]
    fn test_set_steps() {
        let mut engine = PackingEngine::configure(
            square_container(),
            Polygon::rectangle(10.0, 10.0),
            10.0,
            90.0,
            &PackConfig::default(),
        )
        .unwrap();

        engine.set_rotation_step(45.0).unwrap();
        engine.set_position_step(2.5).unwrap();
        assert_eq!(engine.position_step(), 2.5);

        assert!(engine.set_position_step(0.0).is_err());
        assert!(engine.set_rotation_step(f64::NAN).is_err());
        assert_eq!(engine.rotation_step(), 45.0);
    }

    #[test]
    fn test_unit_too_large_places_nothing() {
        let mut engine = PackingEngine::configure(
            Polygon::rectangle(20.0, 20.0),
            Polygon::rectangle(50.0, 50.0),
            1.0,
            15.0,
            &PackConfig::default(),
        )
        .unwrap();

        let result = engine.run_to_completion(200);
        assert_eq!(result.placed_count(), 0);
        assert_eq!(result.efficiency_percent, 0.0);
        assert_eq!(result.attempts, 20 * 20 + 1);
    }
}
