//! A declarative projection of the dashboard state for the map surface.
//!
//! Rebuilt from the polygon store and the drawing session on every call.

use crate::drawing::session::{closed_ring, DrawingSession, DrawingUpdate};
use crate::store::polygon::PolygonId;
use crate::store::polygon_store::PolygonStore;
use crate::types::lat_lon::LatLon;
use crate::types::time_range::Timeline;
use crate::types::variable::{Color, ColorRule, Variable};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolygonLayer {
    pub id: PolygonId,
    /// Closed outline, first vertex repeated at the end.
    pub ring: Vec<LatLon>,
    pub fill: Color,
    pub value: Option<f64>,
    pub unit: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub name: &'static str,
    pub unit: &'static str,
    pub rules: Vec<ColorRule>,
}

impl From<&Variable> for Legend {
    fn from(variable: &Variable) -> Self {
        Self {
            name: variable.name,
            unit: variable.unit,
            rules: variable.rules.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub polygons: Vec<PolygonLayer>,
    /// Markers and preview of the polygon being drawn, if any.
    pub drawing: Option<DrawingUpdate>,
    pub legend: Legend,
    pub timeline: Timeline,
}

impl MapView {
    pub fn project(
        store: &PolygonStore,
        session: &DrawingSession,
        variable: &Variable,
        timeline: Timeline,
    ) -> Self {
        let polygons = store
            .polygons()
            .iter()
            .map(|polygon| PolygonLayer {
                id: polygon.id,
                ring: closed_ring(&polygon.vertices),
                fill: polygon.color,
                value: polygon.value,
                unit: Variable::get(polygon.variable).unit,
            })
            .collect();
        Self {
            polygons,
            drawing: session.update(),
            legend: Legend::from(variable),
            timeline,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::time_range::TimeRange;
    use crate::types::variable::VariableId;
    use chrono::{TimeZone, Utc};

    fn timeline() -> Timeline {
        let now = Utc.with_ymd_and_hms(2024, 6, 2, 12, 0, 0).unwrap();
        Timeline::new(now, TimeRange::last_complete_day(now))
    }

    #[test]
    fn test_projection_reflects_store_and_session() {
        let mut store = PolygonStore::new();
        let id = store
            .commit(
                vec![LatLon(0.0, 0.0), LatLon(0.0, 1.0), LatLon(1.0, 1.0)],
                VariableId::Temperature,
            )
            .unwrap();
        store.update_derived(id, Some(22.0), Color("#f59e0b"));
        let mut session = DrawingSession::new();
        session.start().unwrap();
        session.add_point(LatLon(5.0, 5.0)).unwrap();

        let variable = Variable::get(VariableId::Temperature);
        let view = MapView::project(&store, &session, &variable, timeline());

        assert_eq!(view.polygons.len(), 1);
        let layer = &view.polygons[0];
        assert_eq!(layer.ring.len(), 4);
        assert_eq!(layer.ring.first(), layer.ring.last());
        assert_eq!(layer.fill, Color("#f59e0b"));
        assert_eq!(layer.unit, "°C");

        let drawing = view.drawing.unwrap();
        assert_eq!(drawing.markers, vec![LatLon(5.0, 5.0)]);
        assert!(drawing.preview.is_none());
        assert_eq!(view.legend.rules.len(), 5);
    }

    #[test]
    fn test_idle_session_has_no_overlay() {
        let store = PolygonStore::new();
        let session = DrawingSession::new();
        let variable = Variable::get(VariableId::Humidity);
        let view = MapView::project(&store, &session, &variable, timeline());
        assert!(view.drawing.is_none());
        assert!(view.polygons.is_empty());
    }

    #[test]
    fn test_json_shape() {
        let mut store = PolygonStore::new();
        store
            .commit(
                vec![LatLon(0.0, 0.0), LatLon(0.0, 1.0), LatLon(1.0, 1.0)],
                VariableId::WindSpeed,
            )
            .unwrap();
        let variable = Variable::get(VariableId::WindSpeed);
        let json = MapView::project(&store, &DrawingSession::new(), &variable, timeline())
            .to_json()
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["polygons"][0]["id"], 1);
        assert_eq!(value["polygons"][0]["fill"], "#9ca3af");
        assert!(value["polygons"][0]["value"].is_null());
        assert_eq!(value["legend"]["unit"], "km/h");
        assert!(value["drawing"].is_null());
    }
}
