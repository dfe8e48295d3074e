//! Typed persistent key-value cells.
//!
//! A [`PersistentCell`] binds one durable key to an in-memory value of type
//! `T`. Reads serve the cache; writes serialize, persist, commit the cache
//! and broadcast through the hub so every other cell bound to the same key
//! converges. Storage faults never escape: a failed load falls back to the
//! default and a failed write is logged and dropped.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::{Mutex, watch};
use tracing::{debug, warn};

use crate::hub::StorageHub;

fn read_lock<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_lock<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

/// A typed binding of one durable key with change notification.
pub struct PersistentCell<T> {
    hub: StorageHub,
    key: &'static str,
    origin: u64,
    cache: Arc<RwLock<T>>,
    /// Serializes writes from this instance so a function-form write always
    /// folds over the most recent committed value (no lost updates from
    /// back-to-back edits).
    write_gate: Mutex<()>,
    notify: watch::Sender<u64>,
    version: Arc<AtomicU64>,
}

impl<T> PersistentCell<T>
where
    T: Clone + Serialize + DeserializeOwned + Send + Sync + 'static,
{
    /// Binds `key`, loading the durable value or falling back to `default`
    /// on a missing key, unreadable backing store, or corrupt JSON. Never
    /// fails.
    ///
    /// The binding stays subscribed to the hub broadcast: writes by other
    /// cells bound to the same key, and external-change notifications,
    /// update this cache identically.
    pub async fn bind(hub: &StorageHub, key: &'static str, default: T) -> Self {
        let initial = match hub.backend().load(key).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(value) => value,
                Err(e) => {
                    warn!(key, error = %e, "Corrupt durable value, using default");
                    default.clone()
                }
            },
            Ok(None) => default.clone(),
            Err(e) => {
                warn!(key, error = %e, "Backing store unreadable, using default");
                default.clone()
            }
        };

        let origin = hub.next_origin();
        let cache = Arc::new(RwLock::new(initial));
        let (notify, _) = watch::channel(0);
        let version = Arc::new(AtomicU64::new(0));

        let weak_cache = Arc::downgrade(&cache);
        let listener_notify = notify.clone();
        let listener_version = Arc::clone(&version);
        hub.register(
            key,
            origin,
            Box::new(move |payload| {
                let Some(cache) = weak_cache.upgrade() else {
                    return false;
                };
                let next: T = match payload {
                    Some(raw) => match serde_json::from_str(raw) {
                        Ok(value) => value,
                        Err(e) => {
                            warn!(key, error = %e, "Ignoring unparseable broadcast");
                            return true;
                        }
                    },
                    None => default.clone(),
                };
                *write_lock(&cache) = next;
                let v = listener_version.fetch_add(1, Ordering::SeqCst) + 1;
                let _ = listener_notify.send(v);
                true
            }),
        );

        debug!(key, origin, "Cell bound");
        Self {
            hub: hub.clone(),
            key,
            origin,
            cache,
            write_gate: Mutex::new(()),
            notify,
            version,
        }
    }

    /// The durable key this cell is bound to.
    pub fn key(&self) -> &'static str {
        self.key
    }

    /// The hub this cell belongs to.
    pub fn hub(&self) -> &StorageHub {
        &self.hub
    }

    /// Returns a copy of the cached value.
    pub fn get(&self) -> T {
        read_lock(&self.cache).clone()
    }

    /// Replaces the value with a literal.
    pub async fn set(&self, value: T) {
        self.with(|_| value).await;
    }

    /// Function-form write: folds `f` over the current cached value,
    /// persists the result, commits the cache and broadcasts.
    ///
    /// On a serialization or durable-write failure the previous value is
    /// retained, the failure is logged, and the call is a no-op.
    pub async fn with<F>(&self, f: F)
    where
        F: FnOnce(&T) -> T,
    {
        let _gate = self.write_gate.lock().await;

        // Fold over the latest committed value, not one captured earlier.
        let next = f(&read_lock(&self.cache));

        let raw = match serde_json::to_string(&next) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(key = self.key, error = %e, "Serialization failed, write dropped");
                return;
            }
        };
        if let Err(e) = self.hub.backend().store(self.key, &raw).await {
            warn!(key = self.key, error = %e, "Durable write failed, write dropped");
            return;
        }

        *write_lock(&self.cache) = next;
        let v = self.version.fetch_add(1, Ordering::SeqCst) + 1;
        let _ = self.notify.send(v);

        self.hub.dispatch(self.key, Some(&raw), Some(self.origin));
    }

    /// Subscribes to cache commits on this binding, from both the local
    /// write path and the broadcast path. The value is a version counter.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.notify.subscribe()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{MemoryBackend, StorageBackend};
    use crate::error::StoreError;
    use crate::hub::EVENTS_KEY;
    use async_trait::async_trait;

    async fn hub() -> StorageHub {
        StorageHub::new(MemoryBackend::new())
    }

    #[tokio::test]
    async fn test_bind_missing_key_uses_default() {
        let hub = hub().await;
        let cell: PersistentCell<Vec<u32>> = PersistentCell::bind(&hub, EVENTS_KEY, vec![7]).await;
        assert_eq!(cell.get(), vec![7]);
    }

    #[tokio::test]
    async fn test_bind_corrupt_value_uses_default() {
        let hub = hub().await;
        hub.backend().store(EVENTS_KEY, "not json{{").await.unwrap();

        let cell: PersistentCell<Vec<u32>> = PersistentCell::bind(&hub, EVENTS_KEY, Vec::new()).await;
        assert!(cell.get().is_empty());
    }

    #[tokio::test]
    async fn test_set_persists_and_updates_cache() {
        let hub = hub().await;
        let cell: PersistentCell<Vec<u32>> = PersistentCell::bind(&hub, EVENTS_KEY, Vec::new()).await;

        cell.set(vec![1, 2]).await;

        assert_eq!(cell.get(), vec![1, 2]);
        assert_eq!(
            hub.backend().load(EVENTS_KEY).await.unwrap().as_deref(),
            Some("[1,2]")
        );
    }

    #[tokio::test]
    async fn test_function_writes_fold_over_latest_value() {
        let hub = hub().await;
        let cell: PersistentCell<u64> = PersistentCell::bind(&hub, EVENTS_KEY, 1).await;

        // f2(f1(initial)) with no intervening external write
        cell.with(|v| v + 10).await;
        cell.with(|v| v * 2).await;

        assert_eq!(cell.get(), 22);
    }

    #[tokio::test]
    async fn test_writer_broadcast_reaches_sibling_cell() {
        let hub = hub().await;
        let writer: PersistentCell<Vec<u32>> = PersistentCell::bind(&hub, EVENTS_KEY, Vec::new()).await;
        let reader: PersistentCell<Vec<u32>> = PersistentCell::bind(&hub, EVENTS_KEY, Vec::new()).await;
        let rx = reader.subscribe();

        writer.with(|prev| {
            let mut next = prev.clone();
            next.push(42);
            next
        })
        .await;

        assert_eq!(reader.get(), vec![42]);
        assert!(rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_external_change_converges_on_same_listener_set() {
        let hub = hub().await;
        let cell: PersistentCell<Vec<u32>> = PersistentCell::bind(&hub, EVENTS_KEY, Vec::new()).await;

        // Another process rewrites the durable value behind our back
        hub.backend().store(EVENTS_KEY, "[9,9]").await.unwrap();
        hub.notify_external(EVENTS_KEY).await;

        assert_eq!(cell.get(), vec![9, 9]);
    }

    #[tokio::test]
    async fn test_absent_broadcast_reverts_to_default() {
        let hub = hub().await;
        let cell: PersistentCell<Vec<u32>> = PersistentCell::bind(&hub, EVENTS_KEY, vec![5]).await;
        cell.set(vec![1]).await;

        hub.backend().remove(EVENTS_KEY).await.unwrap();
        hub.notify_external(EVENTS_KEY).await;

        assert_eq!(cell.get(), vec![5]);
    }

    #[tokio::test]
    async fn test_unparseable_broadcast_is_ignored() {
        let hub = hub().await;
        let cell: PersistentCell<Vec<u32>> = PersistentCell::bind(&hub, EVENTS_KEY, Vec::new()).await;
        cell.set(vec![3]).await;

        hub.backend().store(EVENTS_KEY, "garbage").await.unwrap();
        hub.notify_external(EVENTS_KEY).await;

        assert_eq!(cell.get(), vec![3]);
    }

    /// Backend that accepts reads but rejects every write.
    struct ReadOnlyBackend(MemoryBackend);

    #[async_trait]
    impl StorageBackend for ReadOnlyBackend {
        async fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.0.load(key).await
        }

        async fn store(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(StoreError::Io(std::io::Error::other("disk full")))
        }

        async fn remove(&self, key: &str) -> Result<(), StoreError> {
            self.0.remove(key).await
        }
    }

    #[tokio::test]
    async fn test_failed_durable_write_is_a_noop() {
        let hub = StorageHub::new(ReadOnlyBackend(MemoryBackend::new()));
        let cell: PersistentCell<Vec<u32>> = PersistentCell::bind(&hub, EVENTS_KEY, vec![1]).await;
        let rx = cell.subscribe();

        cell.set(vec![2]).await;

        // Previous value retained, no notification sent
        assert_eq!(cell.get(), vec![1]);
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_subscribe_sees_broadcast_path_commits() {
        let hub = hub().await;
        let writer: PersistentCell<u64> = PersistentCell::bind(&hub, EVENTS_KEY, 0).await;
        let reader: PersistentCell<u64> = PersistentCell::bind(&hub, EVENTS_KEY, 0).await;
        let mut rx = reader.subscribe();

        writer.set(1).await;
        assert!(rx.has_changed().unwrap());
        rx.mark_unchanged();

        writer.set(2).await;
        assert!(rx.has_changed().unwrap());
        assert_eq!(reader.get(), 2);
    }
}
