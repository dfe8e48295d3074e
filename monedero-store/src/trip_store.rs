//! Trip store.
//!
//! Persisted ordered collection of trips under the `trips` key. The
//! packing list has no item-level API here: callers replace the whole
//! list through [`TripStore::update`], building the replacement with the
//! pure helpers on [`Trip`].

use monedero_core::{NewTrip, Trip, TripPatch};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::cell::PersistentCell;
use crate::hub::{StorageHub, TRIPS_KEY};

/// Persistent store of trips with change notifications.
pub struct TripStore {
    cell: PersistentCell<Vec<Trip>>,
}

impl TripStore {
    /// Binds the trip collection, defaulting to empty.
    pub async fn bind(hub: &StorageHub) -> Self {
        Self {
            cell: PersistentCell::bind(hub, TRIPS_KEY, Vec::new()).await,
        }
    }

    /// Snapshot of the collection, in insertion order.
    pub fn trips(&self) -> Vec<Trip> {
        self.cell.get()
    }

    /// Looks up one trip by id.
    pub fn trip(&self, id: &str) -> Option<Trip> {
        self.cell.get().into_iter().find(|t| t.id == id)
    }

    /// Creates a trip with a fresh unique id and appends it.
    pub async fn add(&self, new: NewTrip) -> Trip {
        let trip = new.into_trip();
        let created = trip.clone();
        self.cell
            .with(|prev| {
                let mut next = prev.clone();
                next.push(trip);
                next
            })
            .await;
        info!(id = %created.id, title = %created.title, "Trip added");
        created
    }

    /// Merges `patch` into the trip matching `id`, including whole-list
    /// replacement of the packing list. Unknown ids leave the collection
    /// unchanged.
    pub async fn update(&self, id: &str, patch: TripPatch) {
        self.cell
            .with(|prev| {
                prev.iter()
                    .map(|t| {
                        if t.id == id {
                            let mut updated = t.clone();
                            patch.apply(&mut updated);
                            updated
                        } else {
                            t.clone()
                        }
                    })
                    .collect()
            })
            .await;
        debug!(id, "Trip updated");
    }

    /// Removes the trip matching `id`; no-op if absent.
    ///
    /// Events referencing the trip are not touched: their `trip_id` keeps
    /// dangling and aggregation simply stops resolving it.
    pub async fn remove(&self, id: &str) {
        self.cell
            .with(|prev| prev.iter().filter(|t| t.id != id).cloned().collect())
            .await;
        debug!(id, "Trip removed");
    }

    /// Subscribes to collection changes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.cell.subscribe()
    }
}

// ============================================================================
// Tests
// ============================================================================
