//! Interactive packing session.
//!
//! Tracks the phase a host is in (drawing the container, drawing the unit
//! shape, packing, done), owns the vertex draft being edited and drives the
//! [`PackingEngine`] one bounded step at a time.

use crate::geometry::{Polygon, MAX_VERTICES};
use crate::packer::{PackResult, PackingEngine, PlacedShape};
use scanpack_core::{
    validate_steps, Error, EventCallback, PackConfig, PackEvent, Point, ProgressReport, Result,
};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Default hit-test radius for [`Session::vertex_at`].
pub const DEFAULT_HIT_RADIUS: f64 = 8.0;

/// Phase of a packing session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SessionState {
    /// Collecting container vertices.
    DefiningContainer,
    /// Container fixed; collecting unit shape vertices.
    DefiningInnerShape,
    /// Engine running.
    Packing,
    /// Engine stopped; a result is available.
    Done,
}

impl SessionState {
    /// Returns true in the two vertex-drafting phases.
    pub fn is_defining(&self) -> bool {
        matches!(self, Self::DefiningContainer | Self::DefiningInnerShape)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::DefiningContainer => "defining container",
            Self::DefiningInnerShape => "defining inner shape",
            Self::Packing => "packing",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// A packing session.
pub struct Session {
    config: PackConfig,
    state: SessionState,
    draft: Vec<Point>,
    container: Option<Polygon>,
    engine: Option<PackingEngine>,
    position_step: f64,
    rotation_step_deg: f64,
    on_event: Option<EventCallback>,
}

impl Default for Session {
    fn default() -> Self {
        Self::with_valid_config(PackConfig::default())
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("state", &self.state)
            .field("draft", &self.draft)
            .field("container", &self.container)
            .field("position_step", &self.position_step)
            .field("rotation_step_deg", &self.rotation_step_deg)
            .field("placed_count", &self.placements().len())
            .finish()
    }
}

impl Session {
    /// Creates a session in [`SessionState::DefiningContainer`].
    ///
    /// Step sizes start at the configuration's `position_step` and
    /// `rotation_step_deg`.
    pub fn new(config: PackConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_valid_config(config))
    }

    fn with_valid_config(config: PackConfig) -> Self {
        Self {
            position_step: config.position_step,
            rotation_step_deg: config.rotation_step_deg,
            config,
            state: SessionState::DefiningContainer,
            draft: Vec::new(),
            container: None,
            engine: None,
            on_event: None,
        }
    }

    /// Session configuration.
    pub fn config(&self) -> &PackConfig {
        &self.config
    }

    /// Current phase.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Vertices of the shape being drafted.
    pub fn draft(&self) -> &[Point] {
        &self.draft
    }

    /// The fixed container, once defined.
    pub fn container(&self) -> Option<&Polygon> {
        self.container.as_ref()
    }

    /// The running or finished engine.
    pub fn engine(&self) -> Option<&PackingEngine> {
        self.engine.as_ref()
    }

    /// Placements accepted so far; empty before packing starts.
    pub fn placements(&self) -> &[PlacedShape] {
        match &self.engine {
            Some(engine) => engine.placements(),
            None => &[],
        }
    }

    /// Current position step.
    pub fn position_step(&self) -> f64 {
        self.position_step
    }

    /// Current rotation step in degrees.
    pub fn rotation_step(&self) -> f64 {
        self.rotation_step_deg
    }

    /// Subscribes to placement and completion events.
    pub fn set_event_callback(&mut self, callback: EventCallback) {
        self.on_event = Some(callback);
    }

    /// Removes the event subscription.
    pub fn clear_event_callback(&mut self) {
        self.on_event = None;
    }

    /// Changes the position step; forwarded to a running engine.
    pub fn set_position_step(&mut self, position_step: f64) -> Result<()> {
        validate_steps(position_step, self.rotation_step_deg)?;
        if let Some(engine) = self.engine.as_mut() {
            engine.set_position_step(position_step)?;
        }
        self.position_step = position_step;
        Ok(())
    }

    /// Changes the rotation step; forwarded to a running engine.
    pub fn set_rotation_step(&mut self, rotation_step_deg: f64) -> Result<()> {
        validate_steps(self.position_step, rotation_step_deg)?;
        if let Some(engine) = self.engine.as_mut() {
            engine.set_rotation_step(rotation_step_deg)?;
        }
        self.rotation_step_deg = rotation_step_deg;
        Ok(())
    }

    fn require_defining(&self, operation: &str) -> Result<()> {
        if self.state.is_defining() {
            Ok(())
        } else {
            Err(Error::InvalidState(format!(
                "cannot {} while {}",
                operation, self.state
            )))
        }
    }

    /// Appends a vertex to the draft.
    ///
    /// Returns `Ok(false)` without changing the draft once it holds
    /// [`MAX_VERTICES`] vertices.
    pub fn add_vertex(&mut self, point: Point) -> Result<bool> {
        self.require_defining("add a vertex")?;
        if self.draft.len() >= MAX_VERTICES {
            return Ok(false);
        }
        self.draft.push(point);
        Ok(true)
    }

    /// Removes and returns the most recent draft vertex.
    pub fn undo_vertex(&mut self) -> Result<Option<Point>> {
        self.require_defining("undo a vertex")?;
        Ok(self.draft.pop())
    }

    /// Moves draft vertex `index` to `point`.
    pub fn move_vertex(&mut self, index: usize, point: Point) -> Result<()> {
        self.require_defining("move a vertex")?;
        let len = self.draft.len();
        let vertex = self.draft.get_mut(index).ok_or_else(|| {
            Error::InvalidPolygon(format!(
                "vertex {} out of range for a draft of {}",
                index, len
            ))
        })?;
        *vertex = point;
        Ok(())
    }

    /// Index of the first draft vertex within `radius` of `point`.
    pub fn vertex_at(&self, point: Point, radius: f64) -> Option<usize> {
        let r2 = radius * radius;
        self.draft.iter().position(|&(x, y)| {
            let dx = x - point.0;
            let dy = y - point.1;
            dx * dx + dy * dy <= r2
        })
    }

    /// Closes the draft as the container or the unit shape, depending on
    /// the phase. The draft is left untouched if the shape is rejected.
    pub fn finish_shape(&mut self) -> Result<()> {
        self.require_defining("finish a shape")?;
        let polygon = Polygon::new(self.draft.clone());
        match self.state {
            SessionState::DefiningContainer => self.define_container(polygon),
            _ => self.define_unit_shape(polygon),
        }
    }

    /// Fixes the container and moves on to the unit shape.
    pub fn define_container(&mut self, container: Polygon) -> Result<()> {
        if self.state != SessionState::DefiningContainer {
            return Err(Error::InvalidState(format!(
                "cannot define the container while {}",
                self.state
            )));
        }
        container.validate("container")?;

        let container = container.normalized();
        log::debug!(
            "container defined: {} vertices, area {:.2}",
            container.len(),
            container.area()
        );
        self.container = Some(container);
        self.draft.clear();
        self.state = SessionState::DefiningInnerShape;
        Ok(())
    }

    /// Fixes the unit shape and starts packing.
    pub fn define_unit_shape(&mut self, unit: Polygon) -> Result<()> {
        let container = match (&self.state, &self.container) {
            (SessionState::DefiningInnerShape, Some(container)) => container.clone(),
            _ => {
                return Err(Error::InvalidState(format!(
                    "cannot define the unit shape while {}",
                    self.state
                )))
            }
        };

        let engine = PackingEngine::configure(
            container,
            unit,
            self.position_step,
            self.rotation_step_deg,
            &self.config,
        )?;
        self.start(engine);
        Ok(())
    }

    /// Defines both shapes and the step sizes at once and starts packing.
    ///
    /// Allowed in any phase; a previous run is discarded. On error the
    /// session is left unchanged.
    pub fn configure(
        &mut self,
        container: Polygon,
        unit: Polygon,
        position_step: f64,
        rotation_step_deg: f64,
    ) -> Result<()> {
        let engine = PackingEngine::configure(
            container,
            unit,
            position_step,
            rotation_step_deg,
            &self.config,
        )?;
        self.position_step = position_step;
        self.rotation_step_deg = rotation_step_deg;
        self.container = Some(engine.container().clone());
        self.start(engine);
        Ok(())
    }

    fn start(&mut self, engine: PackingEngine) {
        self.engine = Some(engine);
        self.draft.clear();
        self.state = SessionState::Packing;
        log::info!(
            "packing started: position step {}, rotation step {} deg",
            self.position_step,
            self.rotation_step_deg
        );
    }

    /// Advances packing by up to `max_attempts` cursor positions.
    ///
    /// Calling this once done returns a final report without doing any work.
    pub fn step(&mut self, max_attempts: usize) -> Result<ProgressReport> {
        let engine = self.engine.as_mut().ok_or_else(|| {
            Error::InvalidState(format!("cannot step while {}", self.state))
        })?;

        let callback = &mut self.on_event;
        let report = engine.step_with(max_attempts, |event: &PackEvent| {
            if let Some(callback) = callback.as_mut() {
                callback(event);
            }
        });

        if report.done {
            self.state = SessionState::Done;
        }
        Ok(report)
    }

    /// One host tick: [`step`](Self::step) with the configured attempts per step.
    pub fn tick(&mut self) -> Result<ProgressReport> {
        self.step(self.config.attempts_per_step)
    }

    /// Final result, available once packing is done.
    pub fn result(&self) -> Result<PackResult> {
        self.engine
            .as_ref()
            .and_then(PackingEngine::result)
            .ok_or_else(|| {
                Error::InvalidState(format!("no result available while {}", self.state))
            })
    }

    /// Discards everything and starts over with a new container.
    ///
    /// Step sizes and the event subscription are kept.
    pub fn reset(&mut self) {
        self.engine = None;
        self.container = None;
        self.draft.clear();
        self.state = SessionState::DefiningContainer;
        log::debug!("session reset");
    }

    /// Keeps the container and starts over with a new unit shape.
    pub fn restart_keep_container(&mut self) -> Result<()> {
        if self.state != SessionState::Done {
            return Err(Error::InvalidState(format!(
                "cannot restart with the same container while {}",
                self.state
            )));
        }
        self.engine = None;
        self.draft.clear();
        self.state = SessionState::DefiningInnerShape;
        log::debug!("session restarted with the previous container");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scanpack_core::StopReason;
    use std::sync::{Arc, Mutex};

    fn fast_session() -> Session {
        Session::new(
            PackConfig::new()
                .with_position_step(10.0)
                .with_rotation_step(90.0),
        )
        .unwrap()
    }

    fn draw(session: &mut Session, points: &[Point]) {
        for &p in points {
            assert!(session.add_vertex(p).unwrap());
        }
        session.finish_shape().unwrap();
    }

    const CONTAINER: [Point; 4] = [(0.0, 0.0), (100.0, 0.0), (100.0, 100.0), (0.0, 100.0)];
    const UNIT: [Point; 4] = [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)];

    #[test]
    fn test_initial_state() {
        let session = Session::default();
        assert_eq!(session.state(), SessionState::DefiningContainer);
        assert_eq!(session.position_step(), 3.0);
        assert_eq!(session.rotation_step(), 5.0);
        assert!(session.placements().is_empty());
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        assert!(Session::new(PackConfig::new().with_capacity(0)).is_err());
    }

    #[test]
    fn test_draft_editing() {
        let mut session = Session::default();
        session.add_vertex((10.0, 10.0)).unwrap();
        session.add_vertex((50.0, 10.0)).unwrap();
        session.add_vertex((30.0, 40.0)).unwrap();

        assert_eq!(session.vertex_at((52.0, 13.0), DEFAULT_HIT_RADIUS), Some(1));
        assert_eq!(session.vertex_at((52.0, 30.0), DEFAULT_HIT_RADIUS), None);

        session.move_vertex(2, (30.0, 60.0)).unwrap();
        assert_eq!(session.draft()[2], (30.0, 60.0));
        assert!(session.move_vertex(3, (0.0, 0.0)).is_err());

        assert_eq!(session.undo_vertex().unwrap(), Some((30.0, 60.0)));
        assert_eq!(session.draft().len(), 2);
    }

    #[test]
    fn test_draft_vertex_limit() {
        let mut session = Session::default();
        for i in 0..MAX_VERTICES {
            assert!(session.add_vertex((i as f64, 0.0)).unwrap());
        }
        assert!(!session.add_vertex((99.0, 99.0)).unwrap());
        assert_eq!(session.draft().len(), MAX_VERTICES);
    }

    #[test]
    fn test_finish_shape_needs_three_vertices() {
        let mut session = Session::default();
        session.add_vertex((0.0, 0.0)).unwrap();
        session.add_vertex((10.0, 0.0)).unwrap();

        assert!(matches!(
            session.finish_shape(),
            Err(Error::InvalidPolygon(_))
        ));
        assert_eq!(session.state(), SessionState::DefiningContainer);
        assert_eq!(session.draft().len(), 2);
    }

    #[test]
    fn test_full_flow() {
        let mut session = fast_session();
        draw(&mut session, &CONTAINER);
        assert_eq!(session.state(), SessionState::DefiningInnerShape);
        assert!(session.draft().is_empty());
        assert!(session.container().unwrap().signed_area() <= 0.0);

        draw(&mut session, &UNIT);
        assert_eq!(session.state(), SessionState::Packing);

        while session.state() == SessionState::Packing {
            session.tick().unwrap();
        }

        let result = session.result().unwrap();
        assert_eq!(result.placed_count(), 81);
        assert_eq!(result.stop_reason, StopReason::Completed);
    }

    #[test]
    fn test_wrong_state_errors() {
        let mut session = fast_session();
        assert!(matches!(session.tick(), Err(Error::InvalidState(_))));
        assert!(matches!(session.result(), Err(Error::InvalidState(_))));
        assert!(matches!(
            session.define_unit_shape(Polygon::new(UNIT.to_vec())),
            Err(Error::InvalidState(_))
        ));
        assert!(session.restart_keep_container().is_err());

        session
            .configure(
                Polygon::new(CONTAINER.to_vec()),
                Polygon::new(UNIT.to_vec()),
                10.0,
                90.0,
            )
            .unwrap();
        assert!(matches!(
            session.add_vertex((1.0, 1.0)),
            Err(Error::InvalidState(_))
        ));
        assert!(matches!(session.result(), Err(Error::InvalidState(_))));
    }

    #[test]
    fn test_configure_failure_leaves_session_unchanged() {
        let mut session = fast_session();
        session.add_vertex((1.0, 1.0)).unwrap();

        let err = session.configure(
            Polygon::new(CONTAINER.to_vec()),
            Polygon::new(UNIT.to_vec()),
            -1.0,
            90.0,
        );
        assert!(err.is_err());
        assert_eq!(session.state(), SessionState::DefiningContainer);
        assert_eq!(session.draft().len(), 1);
        assert_eq!(session.position_step(), 10.0);
    }

    #[test]
    fn test_restart_keep_container() {
        let mut session = fast_session();
        session
            .configure(
                Polygon::new(CONTAINER.to_vec()),
                Polygon::new(UNIT.to_vec()),
                10.0,
                90.0,
            )
            .unwrap();
        while !session.tick().unwrap().done {}
        assert_eq!(session.state(), SessionState::Done);

        session.restart_keep_container().unwrap();
        assert_eq!(session.state(), SessionState::DefiningInnerShape);
        assert!(session.container().is_some());
        assert!(session.placements().is_empty());

        // A larger unit packs fewer copies into the same container
        draw(
            &mut session,
            &[(0.0, 0.0), (20.0, 0.0), (20.0, 20.0), (0.0, 20.0)],
        );
        while !session.tick().unwrap().done {}
        assert!(session.result().unwrap().placed_count() < 81);
    }

    #[test]
    fn test_reset_discards_container() {
        let mut session = fast_session();
        draw(&mut session, &CONTAINER);
        session.reset();
        assert_eq!(session.state(), SessionState::DefiningContainer);
        assert!(session.container().is_none());
    }

    #[test]
    fn test_step_sizes_forwarded_to_engine() {
        let mut session = Session::default();
        session.set_position_step(4.0).unwrap();
        assert!(session.set_rotation_step(0.0).is_err());

        session
            .configure(
                Polygon::new(CONTAINER.to_vec()),
                Polygon::new(UNIT.to_vec()),
                10.0,
                90.0,
            )
            .unwrap();
        session.set_rotation_step(45.0).unwrap();
        session.set_position_step(5.0).unwrap();

        let engine = session.engine().unwrap();
        assert_eq!(engine.rotation_step(), 45.0);
        assert_eq!(engine.position_step(), 5.0);
    }

    #[test]
    fn test_event_callback() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);

        let mut session = fast_session();
        session.set_event_callback(Box::new(move |event: &PackEvent| {
            sink.lock().unwrap().push(*event);
        }));
        session
            .configure(
                Polygon::new(CONTAINER.to_vec()),
                Polygon::new(UNIT.to_vec()),
                10.0,
                90.0,
            )
            .unwrap();
        while !session.tick().unwrap().done {}

        let events = events.lock().unwrap();
        let placed = events
            .iter()
            .filter(|e| matches!(e, PackEvent::Placed { .. }))
            .count();
        assert_eq!(placed, 81);
        assert!(matches!(
            events.last(),
            Some(PackEvent::Finished {
                placed_count: 81,
                reason: StopReason::Completed,
                ..
            })
        ));
    }
}
