// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Monedero Store
//!
//! Persistent state layer for the monedero finance agenda.
//!
//! This crate provides:
//!
//! - **`StorageHub`**: the shared durable backend plus the in-process
//!   change broadcast keeping independent bindings of a key consistent
//! - **`PersistentCell`**: a typed key binding with cache, fold-over-latest
//!   writes and watch-channel notifications
//! - **`EventStore` / `TripStore` / `SettingsStore`**: the three entity
//!   stores over the cells
//! - **backup**: export/import of the whole state as one document
//!
//! ## Usage
//!
//! ```ignore
//! use monedero_store::{EventStore, FileBackend, StorageHub};
//!
//! let hub = StorageHub::new(FileBackend::default_location());
//! let events = EventStore::bind(&hub).await;
//!
//! let created = events.add(new_event).await;
//!
//! // Any other binding of the events key sees the change
//! let mut rx = events.subscribe();
//! while rx.changed().await.is_ok() {
//!     println!("Events updated!");
//! }
//! ```

pub mod backend;
pub mod backup;
pub mod cell;
pub mod error;
pub mod event_store;
pub mod hub;
pub mod settings_store;
pub mod trip_store;

pub use backend::{FileBackend, MemoryBackend, StorageBackend, default_data_dir};
pub use backup::{BackupDocument, backup_filename, export_document, export_json, import_document};
pub use cell::PersistentCell;
pub use error::StoreError;
pub use event_store::EventStore;
pub use hub::{EVENTS_KEY, OWNED_KEYS, SETTINGS_KEY, StorageHub, TRIPS_KEY};
pub use settings_store::SettingsStore;
pub use trip_store::TripStore;

#[cfg(test)]
mod scenario_tests;
