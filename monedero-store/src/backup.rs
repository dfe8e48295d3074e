//! Backup/restore gateway.
//!
//! Serializes the three durable records into one transferable document and
//! restores from one. Import writes the backing store directly, bypassing
//! the in-process broadcast, then reinitializes every live binding through
//! [`StorageHub::reload_all`] — the in-process equivalent of the full
//! reload that used to follow a restore.

use chrono::Local;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use monedero_core::{Event, Settings, Trip};

use crate::error::StoreError;
use crate::hub::{EVENTS_KEY, SETTINGS_KEY, StorageHub, TRIPS_KEY};

/// The transferable backup document. All three fields are optional on
/// import; a field absent from the document leaves the corresponding
/// store untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BackupDocument {
    /// Event collection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<Event>>,
    /// Trip collection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trips: Option<Vec<Trip>>,
    /// Settings record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settings: Option<Settings>,
}

/// Suggested filename for an export, embedding the current local date:
/// `backup_agenda_YYYY-MM-DD.json`.
pub fn backup_filename() -> String {
    format!("backup_agenda_{}.json", Local::now().format("%Y-%m-%d"))
}

async fn load_or<T: DeserializeOwned>(hub: &StorageHub, key: &str, default: T) -> T {
    match hub.backend().load(key).await {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "Corrupt durable value, exporting default");
                default
            }
        },
        Ok(None) => default,
        Err(e) => {
            warn!(key, error = %e, "Backing store unreadable, exporting default");
            default
        }
    }
}

/// Assembles a document from the current durable state of all three
/// stores.
pub async fn export_document(hub: &StorageHub) -> BackupDocument {
    BackupDocument {
        events: Some(load_or(hub, EVENTS_KEY, Vec::new()).await),
        trips: Some(load_or(hub, TRIPS_KEY, Vec::new()).await),
        settings: Some(load_or(hub, SETTINGS_KEY, Settings::default()).await),
    }
}

/// Exports the current state as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`StoreError::Serialization`] if the document cannot be
/// serialized.
pub async fn export_json(hub: &StorageHub) -> Result<String, StoreError> {
    let document = export_document(hub).await;
    Ok(serde_json::to_string_pretty(&document)?)
}

/// Restores from a serialized backup document.
///
/// The document is parsed in full before anything is written; a malformed
/// document aborts with no partial application. Present fields overwrite
/// the corresponding durable keys directly, then every live binding is
/// reinitialized from durable storage.
///
/// # Errors
///
/// Returns [`StoreError::MalformedBackup`] on a parse failure and
/// [`StoreError::Io`] if the backing store rejects a write.
pub async fn import_document(hub: &StorageHub, raw: &str) -> Result<(), StoreError> {
    let document: BackupDocument =
        serde_json::from_str(raw).map_err(StoreError::MalformedBackup)?;

    // Serialize every present field before the first write so a failure
    // cannot leave the keys half-applied.
    let mut writes: Vec<(&str, String)> = Vec::new();
    if let Some(events) = &document.events {
        writes.push((EVENTS_KEY, serde_json::to_string(events)?));
    }
    if let Some(trips) = &document.trips {
        writes.push((TRIPS_KEY, serde_json::to_string(trips)?));
    }
    if let Some(settings) = &document.settings {
        writes.push((SETTINGS_KEY, serde_json::to_string(settings)?));
    }

    for (key, value) in &writes {
        hub.backend().store(key, value).await?;
    }

    hub.reload_all().await;
    info!(keys = writes.len(), "Backup imported");
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MemoryBackend;
    use crate::event_store::EventStore;
    use crate::settings_store::SettingsStore;
    use crate::trip_store::TripStore;
    use monedero_core::{Financials, NewEvent, NewTrip, SettingsPatch};

    async fn seeded_hub() -> StorageHub {
        let hub = StorageHub::new(MemoryBackend::new());
        let events = EventStore::bind(&hub).await;
        let trips = TripStore::bind(&hub).await;
        let settings = SettingsStore::bind(&hub).await;

        events
            .add(NewEvent {
                title: "Flight".to_string(),
                financials: Some(Financials::expense(500.0)),
                ..NewEvent::default()
            })
            .await;
        trips
            .add(NewTrip { title: "Lisboa".to_string(), budget: 1000.0, ..NewTrip::default() })
            .await;
        settings
            .update(SettingsPatch {
                currency: Some("€".to_string()),
                ..SettingsPatch::default()
            })
            .await;
        hub
    }

    #[test]
    fn test_backup_filename_embeds_date() {
        let name = backup_filename();
        assert!(name.starts_with("backup_agenda_"));
        assert!(name.ends_with(".json"));
        // backup_agenda_YYYY-MM-DD.json
        assert_eq!(name.len(), "backup_agenda_0000-00-00.json".len());
    }

    #[tokio::test]
    async fn test_export_then_import_restores_identical_state() {
        let hub = seeded_hub().await;
        let exported = export_json(&hub).await.unwrap();

        // Fresh environment, restore
        let restored_hub = StorageHub::new(MemoryBackend::new());
        import_document(&restored_hub, &exported).await.unwrap();

        let events = EventStore::bind(&restored_hub).await;
        let trips = TripStore::bind(&restored_hub).await;
        let settings = SettingsStore::bind(&restored_hub).await;

        let original_events = EventStore::bind(&hub).await.events();
        assert_eq!(events.events(), original_events);
        assert_eq!(trips.trips()[0].title, "Lisboa");
        assert_eq!(settings.get().currency, "€");
    }

    #[tokio::test]
    async fn test_import_with_absent_fields_leaves_stores_untouched() {
        let hub = seeded_hub().await;
        let events_before = EventStore::bind(&hub).await.events();

        import_document(&hub, r#"{"settings":{"currency":"£"}}"#).await.unwrap();

        let settings = SettingsStore::bind(&hub).await;
        assert_eq!(settings.get().currency, "£");
        assert_eq!(EventStore::bind(&hub).await.events(), events_before);
        assert_eq!(TripStore::bind(&hub).await.trips().len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_import_applies_nothing() {
        let hub = seeded_hub().await;
        let before = export_json(&hub).await.unwrap();

        let result = import_document(&hub, "{not json").await;
        assert!(matches!(result, Err(StoreError::MalformedBackup(_))));

        assert_eq!(export_json(&hub).await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_import_reaches_live_bindings() {
        let hub = StorageHub::new(MemoryBackend::new());
        let events = EventStore::bind(&hub).await;
        assert!(events.events().is_empty());

        let exported = export_json(&seeded_hub().await).await.unwrap();
        import_document(&hub, &exported).await.unwrap();

        // The pre-existing binding converged without rebinding
        assert_eq!(events.events().len(), 1);
        assert_eq!(events.events()[0].title, "Flight");
    }

    #[tokio::test]
    async fn test_export_of_empty_environment_uses_defaults() {
        let hub = StorageHub::new(MemoryBackend::new());
        let document = export_document(&hub).await;

        assert_eq!(document.events.unwrap(), Vec::new());
        assert_eq!(document.trips.unwrap(), Vec::new());
        assert_eq!(document.settings.unwrap(), Settings::default());
    }
}
