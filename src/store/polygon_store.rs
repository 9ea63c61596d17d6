//! The ordered collection of committed polygons.

use crate::drawing::session::{MAX_POINTS, MIN_POINTS};
use crate::store::error::StoreError;
use crate::store::polygon::{Polygon, PolygonId};
use crate::types::lat_lon::LatLon;
use crate::types::variable::{Color, VariableId};
use log::{debug, info};

/// Owns every committed [`Polygon`], in insertion order.
///
/// Presentation code only ever reads through [`PolygonStore::polygons`]; all
/// mutation goes through the dashboard's intent handlers.
#[derive(Debug, Default)]
pub struct PolygonStore {
    polygons: Vec<Polygon>,
    next_id: u64,
}

impl PolygonStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a polygon with no value and the neutral color, returning its fresh id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::VertexCount`] unless there are 3 to 12 vertices.
    pub fn commit(
        &mut self,
        vertices: Vec<LatLon>,
        variable: VariableId,
    ) -> Result<PolygonId, StoreError> {
        if !(MIN_POINTS..=MAX_POINTS).contains(&vertices.len()) {
            return Err(StoreError::VertexCount {
                min: MIN_POINTS,
                max: MAX_POINTS,
                found: vertices.len(),
            });
        }
        self.next_id += 1;
        let id = PolygonId(self.next_id);
        info!("Committed {} with {} vertices", id, vertices.len());
        self.polygons.push(Polygon::new(id, vertices, variable));
        Ok(id)
    }

    /// Removes the polygon if present. Unknown ids are ignored.
    pub fn remove(&mut self, id: PolygonId) -> Option<Polygon> {
        let index = self.polygons.iter().position(|p| p.id == id)?;
        info!("Removed {}", id);
        Some(self.polygons.remove(index))
    }

    /// Sets the derived value and color in place. Returns `false` when the
    /// polygon no longer exists, e.g. it was deleted while its fetch was in flight.
    pub fn update_derived(&mut self, id: PolygonId, value: Option<f64>, color: Color) -> bool {
        match self.get_mut(id) {
            Some(polygon) => {
                polygon.value = value;
                polygon.color = color;
                true
            }
            None => {
                debug!("Ignoring update for missing {}", id);
                false
            }
        }
    }

    /// Associates every polygon with `variable` and clears derived fields until
    /// they are recomputed.
    pub fn reassign_variable(&mut self, variable: VariableId) {
        for polygon in &mut self.polygons {
            polygon.variable = variable;
            polygon.reset_derived();
        }
    }

    /// Clears derived fields of every polygon, keeping their variable.
    pub fn reset_derived(&mut self) {
        self.polygons.iter_mut().for_each(Polygon::reset_derived);
    }

    pub fn polygons(&self) -> &[Polygon] {
        &self.polygons
    }

    pub fn get(&self, id: PolygonId) -> Option<&Polygon> {
        self.polygons.iter().find(|p| p.id == id)
    }

    fn get_mut(&mut self, id: PolygonId) -> Option<&mut Polygon> {
        self.polygons.iter_mut().find(|p| p.id == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = PolygonId> + '_ {
        self.polygons.iter().map(|p| p.id)
    }

    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle(offset: f64) -> Vec<LatLon> {
        vec![
            LatLon(offset, offset),
            LatLon(offset + 1.0, offset),
            LatLon(offset, offset + 1.0),
        ]
    }

    #[test]
    fn test_commit_then_remove_leaves_store_empty() {
        let mut store = PolygonStore::new();
        let id = store.commit(triangle(0.0), VariableId::Temperature).unwrap();
        assert!(store.remove(id).is_some());
        assert!(store.is_empty());
    }

    #[test]
    fn test_remove_unknown_id_is_noop() {
        let mut store = PolygonStore::new();
        store.commit(triangle(0.0), VariableId::Temperature).unwrap();
        let before = store.polygons().to_vec();

        assert!(store.remove(PolygonId(999)).is_none());
        assert_eq!(store.polygons(), before.as_slice());
    }

    #[test]
    fn test_ids_are_unique_after_removal() {
        let mut store = PolygonStore::new();
        let first = store.commit(triangle(0.0), VariableId::Temperature).unwrap();
        store.remove(first);
        let second = store.commit(triangle(1.0), VariableId::Temperature).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_commit_rejects_bad_vertex_counts() {
        let mut store = PolygonStore::new();
        let two = vec![LatLon(0.0, 0.0), LatLon(1.0, 1.0)];
        assert_eq!(
            store.commit(two, VariableId::Humidity),
            Err(StoreError::VertexCount {
                min: 3,
                max: 12,
                found: 2
            })
        );
        let thirteen = vec![LatLon(0.0, 0.0); 13];
        assert!(store.commit(thirteen, VariableId::Humidity).is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn test_update_derived_preserves_order() {
        let mut store = PolygonStore::new();
        let a = store.commit(triangle(0.0), VariableId::Temperature).unwrap();
        let b = store.commit(triangle(1.0), VariableId::Temperature).unwrap();
        let c = store.commit(triangle(2.0), VariableId::Temperature).unwrap();

        assert!(store.update_derived(b, Some(12.5), Color("#22c55e")));
        assert_eq!(store.ids().collect::<Vec<_>>(), vec![a, b, c]);
        let updated = store.get(b).unwrap();
        assert_eq!(updated.value, Some(12.5));
        assert_eq!(updated.color, Color("#22c55e"));
    }

    #[test]
    fn test_update_derived_on_missing_polygon_is_noop() {
        let mut store = PolygonStore::new();
        let id = store.commit(triangle(0.0), VariableId::Temperature).unwrap();
        store.remove(id);
        assert!(!store.update_derived(id, Some(1.0), Color("#000000")));
        assert!(store.is_empty());
    }

    #[test]
    fn test_reassign_variable_resets_derived() {
        let mut store = PolygonStore::new();
        let id = store.commit(triangle(0.0), VariableId::Temperature).unwrap();
        store.update_derived(id, Some(3.0), Color("#60a5fa"));

        store.reassign_variable(VariableId::WindSpeed);
        let polygon = store.get(id).unwrap();
        assert_eq!(polygon.variable, VariableId::WindSpeed);
        assert_eq!(polygon.value, None);
        assert_eq!(polygon.color, Color::NEUTRAL);
    }
}
