//! User preferences store.
//!
//! Singleton settings record under the `settings` key, created with
//! defaults on first access and mutated by partial merge.

use monedero_core::{Settings, SettingsPatch};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::cell::PersistentCell;
use crate::hub::{SETTINGS_KEY, StorageHub};

/// Persistent settings store with change notifications.
pub struct SettingsStore {
    cell: PersistentCell<Settings>,
}

impl SettingsStore {
    /// Binds the settings record, defaulting to the fixed default record.
    pub async fn bind(hub: &StorageHub) -> Self {
        Self {
            cell: PersistentCell::bind(hub, SETTINGS_KEY, Settings::default()).await,
        }
    }

    /// A copy of the current settings.
    pub fn get(&self) -> Settings {
        self.cell.get()
    }

    /// Merges the present fields of `patch` into the record.
    pub async fn update(&self, patch: SettingsPatch) {
        self.cell
            .with(|prev| {
                let mut next = prev.clone();
                patch.apply(&mut next);
                next
            })
            .await;
        debug!("Settings updated");
    }

    /// Wipes everything this system persists: settings, events AND trips,
    /// then reinitializes every live store from defaults.
    ///
    /// Irreversible. Callers must confirm with the user before invoking.
    pub async fn reset(&self) {
        warn!("Resetting all persisted data");
        self.cell.hub().clear_owned().await;
    }

    /// Subscribes to settings changes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.cell.subscribe()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use crate::event_store::EventStore;
    use monedero_core::NewEvent;

    #[tokio::test]
    async fn test_first_access_yields_defaults() {
        let hub = StorageHub::new(MemoryBackend::new());
        let store = SettingsStore::bind(&hub).await;
        assert_eq!(store.get(), Settings::default());
    }

    #[tokio::test]
    async fn test_update_merges_partial_fields() {
        let hub = StorageHub::new(MemoryBackend::new());
        let store = SettingsStore::bind(&hub).await;

        store
            .update(SettingsPatch {
                currency: Some("€".to_string()),
                ..SettingsPatch::default()
            })
            .await;

        let settings = store.get();
        assert_eq!(settings.currency, "€");
        assert_eq!(settings.user_name, "Usuario");
    }

    #[tokio::test]
    async fn test_sibling_binding_sees_update() {
        let hub = StorageHub::new(MemoryBackend::new());
        let settings_page = SettingsStore::bind(&hub).await;
        let sidebar = SettingsStore::bind(&hub).await;

        settings_page
            .update(SettingsPatch {
                user_name: Some("Marta".to_string()),
                ..SettingsPatch::default()
            })
            .await;

        assert_eq!(sidebar.get().user_name, "Marta");
    }

    #[tokio::test]
    async fn test_reset_clears_every_owned_key() {
        let hub = StorageHub::new(MemoryBackend::new());
        let settings = SettingsStore::bind(&hub).await;
        let events = EventStore::bind(&hub).await;

        settings
            .update(SettingsPatch {
                currency: Some("€".to_string()),
                ..SettingsPatch::default()
            })
            .await;
        events
            .add(NewEvent { title: "Gone soon".to_string(), ..NewEvent::default() })
            .await;

        settings.reset().await;

        assert_eq!(settings.get(), Settings::default());
        assert!(events.events().is_empty());
    }
}
