//! Shared storage hub.
//!
//! One [`StorageHub`] is constructed per process and handed to every store.
//! It owns the durable backend and the in-process change broadcast that
//! keeps independent cells bound to the same key consistent: a writer's
//! committed value is dispatched synchronously to every other live binding
//! of that key. External changes to the durable store come in through
//! [`StorageHub::notify_external`] and converge on the same listener set.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info, warn};

use crate::backend::StorageBackend;

// ============================================================================
// Owned Keys
// ============================================================================

/// Durable key for the event collection.
pub const EVENTS_KEY: &str = "finance_agenda_events";
/// Durable key for the trip collection.
pub const TRIPS_KEY: &str = "finance_agenda_trips";
/// Durable key for the settings record.
pub const SETTINGS_KEY: &str = "finance_agenda_settings";

/// Every durable key this system owns.
pub const OWNED_KEYS: &[&str] = &[EVENTS_KEY, TRIPS_KEY, SETTINGS_KEY];

// ============================================================================
// Listeners
// ============================================================================

/// Applies a broadcast payload to one cell's cache. `None` payload means
/// the key is absent and the cell should revert to its default. Returns
/// false once the binding is gone so the hub can prune it.
type ApplyFn = Box<dyn Fn(Option<&str>) -> bool + Send + Sync>;

struct Listener {
    key: &'static str,
    origin: u64,
    apply: ApplyFn,
}

// ============================================================================
// Storage Hub
// ============================================================================

struct HubInner {
    backend: Box<dyn StorageBackend>,
    listeners: RwLock<Vec<Listener>>,
    next_origin: AtomicU64,
}

/// Shared handle to the durable backend and the change broadcast.
///
/// Cheap to clone; all clones share one backend and one listener set.
#[derive(Clone)]
pub struct StorageHub {
    inner: Arc<HubInner>,
}

impl StorageHub {
    /// Creates a hub over the given backend.
    pub fn new(backend: impl StorageBackend + 'static) -> Self {
        Self {
            inner: Arc::new(HubInner {
                backend: Box::new(backend),
                listeners: RwLock::new(Vec::new()),
                next_origin: AtomicU64::new(1),
            }),
        }
    }

    /// The durable backend.
    pub fn backend(&self) -> &dyn StorageBackend {
        self.inner.backend.as_ref()
    }

    /// Allocates a unique origin id for a new cell.
    pub(crate) fn next_origin(&self) -> u64 {
        self.inner.next_origin.fetch_add(1, Ordering::Relaxed)
    }

    /// Registers a cell's listener for `key`.
    pub(crate) fn register(&self, key: &'static str, origin: u64, apply: ApplyFn) {
        self.inner
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Listener { key, origin, apply });
    }

    /// Dispatches a value change to every live binding of `key` except the
    /// originating cell (which committed its cache before broadcasting).
    /// Dead bindings are pruned along the way.
    pub(crate) fn dispatch(&self, key: &str, payload: Option<&str>, origin: Option<u64>) {
        let mut listeners = self
            .inner
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        listeners.retain(|l| {
            if l.key != key || origin == Some(l.origin) {
                return true;
            }
            (l.apply)(payload)
        });
        debug!(key, external = origin.is_none(), "Change dispatched");
    }

    /// Reacts to the durable value under `key` having been changed outside
    /// the in-process write path: re-reads it and broadcasts to every
    /// binding, the same way an in-process write would.
    pub async fn notify_external(&self, key: &str) {
        let payload = match self.backend().load(key).await {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "Reload failed, treating key as absent");
                None
            }
        };
        self.dispatch(key, payload.as_deref(), None);
    }

    /// Reinitializes every owned key from durable storage. Used after a
    /// backup import or a destructive reset instead of a process restart.
    pub async fn reload_all(&self) {
        for key in OWNED_KEYS {
            self.notify_external(key).await;
        }
        info!("Stores reinitialized from durable storage");
    }

    /// Removes every durable key this system owns and reverts all live
    /// bindings to their defaults. Irreversible; callers are expected to
    /// have confirmed with the user first.
    pub async fn clear_owned(&self) {
        for key in OWNED_KEYS {
            if let Err(e) = self.backend().remove(key).await {
                warn!(key, error = %e, "Failed to remove key during reset");
            }
        }
        self.reload_all().await;
        info!("All owned keys cleared");
    }
}

// ============================================================================
// Tests
// ============================================================================
