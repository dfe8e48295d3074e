//! Calendar event store.
//!
//! Persisted ordered collection of activities under the `events` key.
//! Order is insertion order, not date order. The derived financial summary
//! is recomputed from the full collection on every read.

use monedero_core::aggregate;
use monedero_core::{Event, EventPatch, FinancialSummary, NewEvent};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::cell::PersistentCell;
use crate::hub::{EVENTS_KEY, StorageHub};

/// Persistent store of calendar events with change notifications.
pub struct EventStore {
    cell: PersistentCell<Vec<Event>>,
}

impl EventStore {
    /// Binds the event collection, defaulting to empty.
    pub async fn bind(hub: &StorageHub) -> Self {
        Self {
            cell: PersistentCell::bind(hub, EVENTS_KEY, Vec::new()).await,
        }
    }

    /// Snapshot of the collection, in insertion order.
    pub fn events(&self) -> Vec<Event> {
        self.cell.get()
    }

    /// Looks up one event by id.
    pub fn event(&self, id: &str) -> Option<Event> {
        self.cell.get().into_iter().find(|e| e.id == id)
    }

    /// Creates an event with a fresh unique id and appends it.
    pub async fn add(&self, new: NewEvent) -> Event {
        let event = new.into_event();
        let created = event.clone();
        self.cell
            .with(|prev| {
                let mut next = prev.clone();
                next.push(event);
                next
            })
            .await;
        info!(id = %created.id, title = %created.title, "Event added");
        created
    }

    /// Merges `patch` into the event matching `id`. Unspecified fields keep
    /// their prior value; an unknown id leaves the collection unchanged.
    pub async fn update(&self, id: &str, patch: EventPatch) {
        self.cell
            .with(|prev| {
                prev.iter()
                    .map(|e| {
                        if e.id == id {
                            let mut updated = e.clone();
                            patch.apply(&mut updated);
                            updated
                        } else {
                            e.clone()
                        }
                    })
                    .collect()
            })
            .await;
        debug!(id, "Event updated");
    }

    /// Removes the event matching `id`; no-op if absent.
    pub async fn remove(&self, id: &str) {
        self.cell
            .with(|prev| prev.iter().filter(|e| e.id != id).cloned().collect())
            .await;
        debug!(id, "Event removed");
    }

    /// Derived global income/expense summary.
    pub fn summary(&self) -> FinancialSummary {
        aggregate::global_summary(&self.cell.get())
    }

    /// Events flagged for reminders, for the notification scheduler.
    pub fn reminders(&self) -> Vec<Event> {
        self.cell.get().into_iter().filter(|e| e.remind_me).collect()
    }

    /// Subscribes to collection changes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.cell.subscribe()
    }
}

// ============================================================================
// Tests
// ============================================================================
