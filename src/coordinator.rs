//! Keeps every polygon's value and color consistent with the selected variable
//! and the active analysis range.
//!
//! Each fetch runs as its own tokio task and reports back over a channel. The
//! owner of the [`PolygonStore`] pulls results with
//! [`RecomputeCoordinator::next_result`] and applies them one at a time with
//! [`RecomputeCoordinator::apply`], so the store is only ever mutated from a
//! single place. Results are tagged with the selection they were issued for and
//! a per-dispatch ticket; anything that no longer matches is discarded.

use crate::classifier::classify;
use crate::store::polygon::{Polygon, PolygonId};
use crate::store::polygon_store::PolygonStore;
use crate::types::time_range::TimeRange;
use crate::types::variable::{Color, Variable, VariableId};
use crate::weather_data::source::{average_series, WeatherRequest, WeatherSource};
use futures_util::FutureExt;
use log::{debug, warn};
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;

/// The selection a fetch was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SelectionTag {
    pub variable: VariableId,
    pub range: TimeRange,
}

/// A resolved fetch. `value` is `None` when the source failed or returned no
/// usable samples.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FetchResult {
    pub polygon: PolygonId,
    pub tag: SelectionTag,
    pub ticket: u64,
    pub value: Option<f64>,
}

/// What happened to a [`FetchResult`] handed to [`RecomputeCoordinator::apply`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ApplyOutcome {
    /// The polygon was updated with this value and color.
    Applied {
        polygon: PolygonId,
        value: Option<f64>,
        color: Color,
    },
    /// The selection changed after the fetch was issued.
    Stale,
    /// A newer fetch for the same polygon was issued after this one.
    Superseded,
    /// The polygon was deleted while the fetch was in flight.
    Orphaned,
}

struct InFlight {
    ticket: u64,
    handle: AbortHandle,
}

pub struct RecomputeCoordinator {
    source: Arc<dyn WeatherSource>,
    sender: mpsc::UnboundedSender<FetchResult>,
    receiver: mpsc::UnboundedReceiver<FetchResult>,
    in_flight: HashMap<PolygonId, InFlight>,
    next_ticket: u64,
}

impl RecomputeCoordinator {
    pub fn new(source: Arc<dyn WeatherSource>) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self {
            source,
            sender,
            receiver,
            in_flight: HashMap::new(),
            next_ticket: 0,
        }
    }

    /// Starts a fetch for `polygon` under `tag`, aborting any earlier fetch for
    /// the same polygon.
    ///
    /// Must be called from within a tokio runtime.
    pub fn dispatch(&mut self, polygon: &Polygon, tag: SelectionTag) {
        let Some(centroid) = polygon.centroid() else {
            warn!("{} has no vertices, skipping fetch", polygon.id);
            return;
        };
        self.next_ticket += 1;
        let ticket = self.next_ticket;
        let polygon_id = polygon.id;
        let request = WeatherRequest::new(centroid, tag.variable, &tag.range);
        let source = Arc::clone(&self.source);
        let sender = self.sender.clone();

        let handle = tokio::spawn(async move {
            // A panicking source still reports, so the polygon is not left pending.
            let fetch = AssertUnwindSafe(source.fetch_series(&request)).catch_unwind();
            let value = match fetch.await {
                Ok(Ok(series)) => {
                    let value = average_series(&series);
                    if value.is_none() {
                        debug!("No usable samples for {} ({})", polygon_id, tag.variable);
                    }
                    value
                }
                Ok(Err(e)) => {
                    warn!("Fetching {} for {} failed: {}", tag.variable, polygon_id, e);
                    None
                }
                Err(_) => {
                    warn!("Fetching {} for {} panicked", tag.variable, polygon_id);
                    None
                }
            };
            // Fails only once the coordinator is dropped.
            let _ = sender.send(FetchResult {
                polygon: polygon_id,
                tag,
                ticket,
                value,
            });
        })
        .abort_handle();

        if let Some(previous) = self
            .in_flight
            .insert(polygon_id, InFlight { ticket, handle })
        {
            previous.handle.abort();
        }
        debug!(
            "Dispatched fetch #{} for {} ({} over {})",
            ticket, polygon_id, tag.variable, tag.range
        );
    }

    /// Issues one independent fetch per polygon in the store.
    pub fn recompute_all(&mut self, store: &PolygonStore, tag: SelectionTag) {
        for polygon in store.polygons() {
            self.dispatch(polygon, tag);
        }
    }

    /// Drops any in-flight fetch for a deleted polygon.
    pub fn forget(&mut self, polygon: PolygonId) {
        if let Some(in_flight) = self.in_flight.remove(&polygon) {
            in_flight.handle.abort();
        }
    }

    /// Applies a resolved fetch to `store` if it still matches `current` and is
    /// the latest fetch for its polygon.
    pub fn apply(
        &mut self,
        result: FetchResult,
        store: &mut PolygonStore,
        current: SelectionTag,
    ) -> ApplyOutcome {
        let latest = self
            .in_flight
            .get(&result.polygon)
            .is_some_and(|in_flight| in_flight.ticket == result.ticket);
        if latest {
            self.in_flight.remove(&result.polygon);
        }

        if store.get(result.polygon).is_none() {
            debug!("Discarding result for deleted {}", result.polygon);
            return ApplyOutcome::Orphaned;
        }
        if result.tag != current {
            debug!(
                "Discarding stale result for {} ({} over {})",
                result.polygon, result.tag.variable, result.tag.range
            );
            return ApplyOutcome::Stale;
        }
        if !latest {
            debug!("Discarding superseded fetch #{} for {}", result.ticket, result.polygon);
            return ApplyOutcome::Superseded;
        }

        let color = match result.value {
            Some(value) => classify(value, &Variable::get(result.tag.variable)),
            None => Color::NEUTRAL,
        };
        store.update_derived(result.polygon, result.value, color);
        ApplyOutcome::Applied {
            polygon: result.polygon,
            value: result.value,
            color,
        }
    }

    /// Waits for the next resolved fetch. Returns `None` immediately when
    /// nothing is in flight and no result is queued.
    pub async fn next_result(&mut self) -> Option<FetchResult> {
        if let Ok(result) = self.receiver.try_recv() {
            return Some(result);
        }
        if self.in_flight.is_empty() {
            return None;
        }
        self.receiver.recv().await
    }

    /// Number of polygons with a fetch that has not been applied yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    pub fn is_idle(&self) -> bool {
        self.in_flight.is_empty()
    }
}

impl Drop for RecomputeCoordinator {
    fn drop(&mut self) {
        for in_flight in self.in_flight.values() {
            in_flight.handle.abort();
        }
    }
}
