//! The interactive polygon capture protocol.
//!
//! A session moves from `Idle` to `Capturing` on [`DrawingSession::start`],
//! accumulates up to [`MAX_POINTS`] clicks, and returns to `Idle` either by
//! completing (emitting the vertices) or by cancelling. Markers and the preview
//! outline are derived from the captured points, so leaving `Capturing` always
//! clears them.

use crate::drawing::error::DrawingError;
use crate::types::lat_lon::LatLon;
use log::debug;
use serde::Serialize;
use std::mem;

pub const MIN_POINTS: usize = 3;
pub const MAX_POINTS: usize = 12;

#[derive(Debug, Clone, Default, PartialEq)]
enum DrawingState {
    #[default]
    Idle,
    Capturing(Vec<LatLon>),
}

/// What the map surface should show after a point was added.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrawingUpdate {
    /// One marker per captured point, in click order.
    pub markers: Vec<LatLon>,
    /// The closed outline (first point repeated at the end) once at least
    /// [`MIN_POINTS`] points exist.
    pub preview: Option<Vec<LatLon>>,
}

impl DrawingUpdate {
    fn from_points(points: &[LatLon]) -> Self {
        Self {
            markers: points.to_vec(),
            preview: preview_ring(points),
        }
    }
}

pub(crate) fn preview_ring(points: &[LatLon]) -> Option<Vec<LatLon>> {
    if points.len() < MIN_POINTS {
        return None;
    }
    Some(closed_ring(points))
}

pub(crate) fn closed_ring(points: &[LatLon]) -> Vec<LatLon> {
    let mut ring = Vec::with_capacity(points.len() + 1);
    ring.extend_from_slice(points);
    if let Some(first) = points.first() {
        ring.push(*first);
    }
    ring
}

#[derive(Debug, Clone, Default)]
pub struct DrawingSession {
    state: DrawingState,
}

impl DrawingSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_capturing(&self) -> bool {
        matches!(self.state, DrawingState::Capturing(_))
    }

    /// The points captured so far; empty when idle.
    pub fn points(&self) -> &[LatLon] {
        match &self.state {
            DrawingState::Idle => &[],
            DrawingState::Capturing(points) => points,
        }
    }

    /// The current markers and preview, or `None` when idle.
    pub fn update(&self) -> Option<DrawingUpdate> {
        match &self.state {
            DrawingState::Idle => None,
            DrawingState::Capturing(points) => Some(DrawingUpdate::from_points(points)),
        }
    }

    pub fn start(&mut self) -> Result<(), DrawingError> {
        if self.is_capturing() {
            return Err(DrawingError::AlreadyCapturing);
        }
        debug!("Drawing session started");
        self.state = DrawingState::Capturing(Vec::with_capacity(MAX_POINTS));
        Ok(())
    }

    /// Appends a point. At [`MAX_POINTS`] further points are rejected; the
    /// session is not completed automatically.
    pub fn add_point(&mut self, coordinate: LatLon) -> Result<DrawingUpdate, DrawingError> {
        let DrawingState::Capturing(points) = &mut self.state else {
            return Err(DrawingError::NotCapturing);
        };
        if points.len() >= MAX_POINTS {
            return Err(DrawingError::PointLimit { max: MAX_POINTS });
        }
        points.push(coordinate);
        Ok(DrawingUpdate::from_points(points))
    }

    /// Finishes the polygon and returns its vertices in click order.
    ///
    /// With fewer than [`MIN_POINTS`] points the session keeps capturing.
    pub fn complete(&mut self) -> Result<Vec<LatLon>, DrawingError> {
        let found = match &self.state {
            DrawingState::Idle => return Err(DrawingError::NotCapturing),
            DrawingState::Capturing(points) => points.len(),
        };
        if found < MIN_POINTS {
            return Err(DrawingError::TooFewPoints {
                min: MIN_POINTS,
                found,
            });
        }
        match mem::take(&mut self.state) {
            DrawingState::Capturing(points) => {
                debug!("Drawing session completed with {} points", points.len());
                Ok(points)
            }
            DrawingState::Idle => Err(DrawingError::NotCapturing),
        }
    }

    /// Discards the session. Returns whether one was in progress.
    pub fn cancel(&mut self) -> bool {
        let was_capturing = self.is_capturing();
        if was_capturing {
            debug!("Drawing session cancelled");
        }
        self.state = DrawingState::Idle;
        was_capturing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(i: usize) -> LatLon {
        LatLon(50.0 + i as f64 * 0.1, 4.0 + i as f64 * 0.1)
    }

    #[test]
    fn test_start_twice_is_rejected() {
        let mut session = DrawingSession::new();
        session.start().unwrap();
        session.add_point(point(0)).unwrap();
        assert_eq!(session.start(), Err(DrawingError::AlreadyCapturing));
        assert_eq!(session.points(), &[point(0)]);
    }

    #[test]
    fn test_add_point_when_idle_is_rejected() {
        let mut session = DrawingSession::new();
        assert_eq!(session.add_point(point(0)), Err(DrawingError::NotCapturing));
        assert!(session.points().is_empty());
    }

    #[test]
    fn test_preview_appears_from_third_point() {
        let mut session = DrawingSession::new();
        session.start().unwrap();
        assert!(session.add_point(point(0)).unwrap().preview.is_none());
        let second = session.add_point(point(1)).unwrap();
        assert!(second.preview.is_none());
        assert_eq!(second.markers.len(), 2);

        let third = session.add_point(point(2)).unwrap();
        assert_eq!(
            third.preview,
            Some(vec![point(0), point(1), point(2), point(0)])
        );
    }

    #[test]
    fn test_complete_with_two_points_is_rejected() {
        let mut session = DrawingSession::new();
        session.start().unwrap();
        session.add_point(point(0)).unwrap();
        session.add_point(point(1)).unwrap();

        assert_eq!(
            session.complete(),
            Err(DrawingError::TooFewPoints { min: 3, found: 2 })
        );
        assert!(session.is_capturing());
        assert_eq!(session.points().len(), 2);
    }

    #[test]
    fn test_complete_with_three_points_emits_them_in_order() {
        let mut session = DrawingSession::new();
        session.start().unwrap();
        for i in 0..3 {
            session.add_point(point(i)).unwrap();
        }

        let vertices = session.complete().unwrap();
        assert_eq!(vertices, vec![point(0), point(1), point(2)]);
        assert!(!session.is_capturing());
        assert!(session.points().is_empty());
        assert!(session.update().is_none());
    }

    #[test]
    fn test_thirteenth_point_is_rejected() {
        let mut session = DrawingSession::new();
        session.start().unwrap();
        for i in 0..MAX_POINTS {
            session.add_point(point(i)).unwrap();
        }
        assert_eq!(
            session.add_point(point(99)),
            Err(DrawingError::PointLimit { max: MAX_POINTS })
        );
        assert_eq!(session.points().len(), 12);
        assert!(session.is_capturing());
    }

    #[test]
    fn test_cancel_discards_points() {
        let mut session = DrawingSession::new();
        session.start().unwrap();
        for i in 0..4 {
            session.add_point(point(i)).unwrap();
        }

        assert!(session.cancel());
        assert!(session.points().is_empty());
        assert!(session.update().is_none());
        assert_eq!(session.complete(), Err(DrawingError::NotCapturing));
        assert!(!session.cancel());
    }

    #[test]
    fn test_restart_after_complete_starts_empty() {
        let mut session = DrawingSession::new();
        session.start().unwrap();
        for i in 0..3 {
            session.add_point(point(i)).unwrap();
        }
        session.complete().unwrap();

        session.start().unwrap();
        assert_eq!(session.update().unwrap().markers, Vec::<LatLon>::new());
    }
}
