use crate::types::lat_lon::LatLon;
use crate::types::variable::{Color, VariableId};
use serde::Serialize;
use std::fmt;

/// Identifies a committed polygon. Never reused within a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct PolygonId(pub u64);

impl fmt::Display for PolygonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "polygon-{}", self.0)
    }
}

/// A committed polygon and the value/color derived for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Polygon {
    pub id: PolygonId,
    pub vertices: Vec<LatLon>,
    pub variable: VariableId,
    /// Average of `variable` over the analysis range at the centroid, once fetched.
    pub value: Option<f64>,
    pub color: Color,
}

impl Polygon {
    pub(crate) fn new(id: PolygonId, vertices: Vec<LatLon>, variable: VariableId) -> Self {
        Self {
            id,
            vertices,
            variable,
            value: None,
            color: Color::NEUTRAL,
        }
    }

    pub fn centroid(&self) -> Option<LatLon> {
        centroid(&self.vertices)
    }

    pub(crate) fn reset_derived(&mut self) {
        self.value = None;
        self.color = Color::NEUTRAL;
    }
}

/// Arithmetic mean of the vertices, used as the query point for weather data.
///
/// This is not a geodesic or area-weighted centroid. Returns `None` for an
/// empty slice.
///
/// # Examples
///
/// ```
/// use polygon_weather::{centroid, LatLon};
///
/// let square = [LatLon(0.0, 0.0), LatLon(0.0, 2.0), LatLon(2.0, 2.0), LatLon(2.0, 0.0)];
/// assert_eq!(centroid(&square), Some(LatLon(1.0, 1.0)));
/// ```
pub fn centroid(vertices: &[LatLon]) -> Option<LatLon> {
    if vertices.is_empty() {
        return None;
    }
    let count = vertices.len() as f64;
    let (lat_sum, lon_sum) = vertices
        .iter()
        .fold((0.0, 0.0), |(lat, lon), v| (lat + v.0, lon + v.1));
    Some(LatLon(lat_sum / count, lon_sum / count))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centroid_of_square() {
        let square = [
            LatLon(0.0, 0.0),
            LatLon(0.0, 2.0),
            LatLon(2.0, 2.0),
            LatLon(2.0, 0.0),
        ];
        assert_eq!(centroid(&square), Some(LatLon(1.0, 1.0)));
    }

    #[test]
    fn test_centroid_is_vertex_mean_not_area_centroid() {
        // Doubling up a vertex pulls the mean towards it.
        let skewed = [
            LatLon(0.0, 0.0),
            LatLon(0.0, 0.0),
            LatLon(0.0, 3.0),
            LatLon(3.0, 0.0),
        ];
        assert_eq!(centroid(&skewed), Some(LatLon(0.75, 0.75)));
    }

    #[test]
    fn test_centroid_of_empty_is_none() {
        assert_eq!(centroid(&[]), None);
    }

    #[test]
    fn test_new_polygon_is_neutral() {
        let polygon = Polygon::new(
            PolygonId(7),
            vec![LatLon(0.0, 0.0), LatLon(1.0, 0.0), LatLon(0.0, 1.0)],
            VariableId::Humidity,
        );
        assert_eq!(polygon.value, None);
        assert_eq!(polygon.color, Color::NEUTRAL);
        assert_eq!(polygon.id.to_string(), "polygon-7");
    }
}
