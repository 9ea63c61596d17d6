//! This module provides the main entry point: a [`Dashboard`] that owns the
//! polygons, the drawing session and the current selection, and turns user
//! intents into state transitions.
//!
//! Every handler performs one atomic transition on `&mut self`. Weather fetches
//! run in the background; their results are applied when the caller drives
//! [`Dashboard::process_next`] or [`Dashboard::settle`].

use crate::coordinator::{ApplyOutcome, RecomputeCoordinator, SelectionTag};
use crate::drawing::session::{DrawingSession, DrawingUpdate};
use crate::error::DashboardError;
use crate::store::polygon::{Polygon, PolygonId};
use crate::store::polygon_store::PolygonStore;
use crate::types::lat_lon::LatLon;
use crate::types::time_range::{AnyTimeRange, TimeRange, Timeline};
use crate::types::variable::{Variable, VariableId};
use crate::view::MapView;
use crate::weather_data::open_meteo::OpenMeteo;
use crate::weather_data::source::WeatherSource;
use bon::bon;
use chrono::{DateTime, Utc};
use log::{debug, info};
use std::sync::Arc;

/// A user intent forwarded by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    StartDrawing,
    StopDrawing,
    AddPoint(LatLon),
    FinishPolygon,
    CancelDrawing,
    SelectVariable(VariableId),
    SetAnalysisRange(TimeRange),
    SetCurrentInstant(DateTime<Utc>),
    /// Delete an existing polygon. The presentation layer asks for confirmation first.
    DeletePolygon(PolygonId),
    Refresh,
}

/// A raw pointer event from the map surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MapEvent {
    /// Primary click at a coordinate.
    Click(LatLon),
    /// Secondary click, optionally on top of an existing polygon.
    SecondaryClick { polygon: Option<PolygonId> },
}

/// The polygon drawing and coloring engine.
///
/// # Examples
///
/// ```no_run
/// # use polygon_weather::{Dashboard, DashboardError, LatLon, VariableId};
/// # #[tokio::main]
/// # async fn main() -> Result<(), DashboardError> {
/// let mut dashboard = Dashboard::with_open_meteo(VariableId::Temperature)?;
///
/// dashboard.start_drawing()?;
/// for point in [LatLon(52.3, 4.8), LatLon(52.4, 4.9), LatLon(52.3, 5.0)] {
///     dashboard.add_point(point)?;
/// }
/// let id = dashboard.finish_polygon()?;
///
/// dashboard.settle().await;
/// println!("{:?}", dashboard.polygon(id));
/// # Ok(())
/// # }
/// ```
pub struct Dashboard {
    store: PolygonStore,
    session: DrawingSession,
    variable: Variable,
    timeline: Timeline,
    coordinator: RecomputeCoordinator,
}

#[bon]
impl Dashboard {
    /// Creates a dashboard.
    ///
    /// * `.source(Arc<dyn WeatherSource>)`: **Required.** Where weather data comes from.
    /// * `.variable(VariableId)`: Optional. Initially selected variable. Defaults to temperature.
    /// * `.current_instant(DateTime<Utc>)`: Optional. Timeline cursor. Defaults to now.
    /// * `.analysis_range(TimeRange)`: Optional. Defaults to the last complete UTC
    ///   day before the current instant.
    #[builder]
    pub fn new(
        source: Arc<dyn WeatherSource>,
        variable: Option<VariableId>,
        current_instant: Option<DateTime<Utc>>,
        analysis_range: Option<TimeRange>,
    ) -> Self {
        let current_instant = current_instant.unwrap_or_else(Utc::now);
        let analysis_range =
            analysis_range.unwrap_or_else(|| TimeRange::last_complete_day(current_instant));
        let variable = Variable::get(variable.unwrap_or(VariableId::Temperature));
        info!("Dashboard ready: {} over {}", variable.id, analysis_range);
        Self {
            store: PolygonStore::new(),
            session: DrawingSession::new(),
            variable,
            timeline: Timeline::new(current_instant, analysis_range),
            coordinator: RecomputeCoordinator::new(source),
        }
    }

    /// A dashboard backed by the public Open-Meteo archive with default settings.
    pub fn with_open_meteo(variable: VariableId) -> Result<Self, DashboardError> {
        let source = OpenMeteo::builder().build()?;
        Ok(Self::builder()
            .source(Arc::new(source))
            .variable(variable)
            .build())
    }
}

impl Dashboard {
    fn selection(&self) -> SelectionTag {
        SelectionTag {
            variable: self.variable.id,
            range: self.timeline.analysis_range,
        }
    }

    /// Enters drawing mode.
    pub fn start_drawing(&mut self) -> Result<(), DashboardError> {
        Ok(self.session.start()?)
    }

    /// Leaves drawing mode, discarding any captured points. Returns whether a
    /// session was active.
    pub fn stop_drawing(&mut self) -> bool {
        self.session.cancel()
    }

    /// Same as [`Dashboard::stop_drawing`]; named for the explicit cancel gesture.
    pub fn cancel_drawing(&mut self) -> bool {
        self.session.cancel()
    }

    pub fn add_point(&mut self, coordinate: LatLon) -> Result<DrawingUpdate, DashboardError> {
        Ok(self.session.add_point(coordinate)?)
    }

    /// Commits the polygon being drawn and starts fetching its value.
    pub fn finish_polygon(&mut self) -> Result<PolygonId, DashboardError> {
        let vertices = self.session.complete()?;
        let id = self.store.commit(vertices, self.variable.id)?;
        let selection = self.selection();
        if let Some(polygon) = self.store.get(id) {
            self.coordinator.dispatch(polygon, selection);
        }
        Ok(id)
    }

    /// Switches the variable and recomputes every polygon. Selecting the
    /// current variable again does nothing and returns `false`.
    pub fn select_variable(&mut self, variable: VariableId) -> bool {
        if self.variable.id == variable {
            return false;
        }
        info!("Selected variable {} (was {})", variable, self.variable.id);
        self.variable = Variable::get(variable);
        self.store.reassign_variable(variable);
        self.coordinator.recompute_all(&self.store, self.selection());
        true
    }

    /// Replaces the analysis range and recomputes every polygon. Returns
    /// `Ok(false)` if the range did not change.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::UnrecognizedTimeRange`] if `range` cannot be
    /// turned into a [`TimeRange`].
    pub fn set_analysis_range(&mut self, range: impl AnyTimeRange) -> Result<bool, DashboardError> {
        let range = range
            .get_time_range()
            .ok_or(DashboardError::UnrecognizedTimeRange)?;
        if !self.timeline.set_analysis_range(range) {
            return Ok(false);
        }
        info!("Analysis range set to {}", range);
        self.store.reset_derived();
        self.coordinator.recompute_all(&self.store, self.selection());
        Ok(true)
    }

    /// Moves the timeline cursor. Does not trigger a recompute.
    pub fn set_current_instant(&mut self, at: DateTime<Utc>) -> bool {
        self.timeline.set_current_instant(at)
    }

    /// Removes a polygon and drops its in-flight fetch. Unknown ids are ignored.
    pub fn delete_polygon(&mut self, id: PolygonId) -> bool {
        self.coordinator.forget(id);
        self.store.remove(id).is_some()
    }

    /// Re-fetches every polygon under the current selection.
    pub fn refresh(&mut self) {
        self.coordinator.recompute_all(&self.store, self.selection());
    }

    /// Handles an intent, logging and ignoring transitions that do not apply.
    /// Returns whether the state changed.
    pub fn handle(&mut self, intent: Intent) -> bool {
        let result = match intent {
            Intent::StartDrawing => self.start_drawing().map(|_| true),
            Intent::StopDrawing => Ok(self.stop_drawing()),
            Intent::AddPoint(coordinate) => self.add_point(coordinate).map(|_| true),
            Intent::FinishPolygon => self.finish_polygon().map(|_| true),
            Intent::CancelDrawing => Ok(self.cancel_drawing()),
            Intent::SelectVariable(variable) => Ok(self.select_variable(variable)),
            Intent::SetAnalysisRange(range) => self.set_analysis_range(range),
            Intent::SetCurrentInstant(at) => Ok(self.set_current_instant(at)),
            Intent::DeletePolygon(id) => Ok(self.delete_polygon(id)),
            Intent::Refresh => {
                self.refresh();
                Ok(true)
            }
        };
        result.unwrap_or_else(|e| {
            debug!("Ignoring {:?}: {}", intent, e);
            false
        })
    }

    /// Translates a map surface event into an intent.
    ///
    /// While drawing, a click adds a point and a secondary click finishes the
    /// polygon. Otherwise a secondary click on a polygon deletes it if
    /// `confirm` approves.
    pub fn map_event<F>(&mut self, event: MapEvent, confirm: F) -> bool
    where
        F: FnOnce(&Polygon) -> bool,
    {
        let intent = match (self.session.is_capturing(), event) {
            (true, MapEvent::Click(coordinate)) => Intent::AddPoint(coordinate),
            (true, MapEvent::SecondaryClick { .. }) => Intent::FinishPolygon,
            (false, MapEvent::SecondaryClick { polygon: Some(id) }) => {
                match self.store.get(id) {
                    Some(polygon) if confirm(polygon) => Intent::DeletePolygon(id),
                    _ => return false,
                }
            }
            (false, _) => return false,
        };
        self.handle(intent)
    }

    /// Waits for one background fetch and applies it. Returns `None` once
    /// nothing is in flight.
    pub async fn process_next(&mut self) -> Option<ApplyOutcome> {
        let result = self.coordinator.next_result().await?;
        let selection = self.selection();
        Some(self.coordinator.apply(result, &mut self.store, selection))
    }

    /// Applies background fetches until none are in flight. Returns how many
    /// updated a polygon.
    pub async fn settle(&mut self) -> usize {
        let mut applied = 0;
        while let Some(outcome) = self.process_next().await {
            if matches!(outcome, ApplyOutcome::Applied { .. }) {
                applied += 1;
            }
        }
        applied
    }

    pub fn polygons(&self) -> &[Polygon] {
        self.store.polygons()
    }

    pub fn polygon(&self, id: PolygonId) -> Option<&Polygon> {
        self.store.get(id)
    }

    pub fn variable(&self) -> &Variable {
        &self.variable
    }

    pub fn timeline(&self) -> Timeline {
        self.timeline
    }

    pub fn is_drawing(&self) -> bool {
        self.session.is_capturing()
    }

    pub fn pending_fetches(&self) -> usize {
        self.coordinator.in_flight()
    }

    pub fn view(&self) -> MapView {
        MapView::project(&self.store, &self.session, &self.variable, self.timeline)
    }
}
