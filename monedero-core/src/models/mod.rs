//! Domain models.
//!
//! Entities (events, trips, settings), their partial-update patch types,
//! and the derived financial summary.

mod event;
mod settings;
mod summary;
mod trip;

pub use event::{Category, Event, EventPatch, FinancialKind, Financials, NewEvent};
pub use settings::{Settings, SettingsPatch};
pub use summary::FinancialSummary;
pub use trip::{NewTrip, PackingItem, Trip, TripPatch};
