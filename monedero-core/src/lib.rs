// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Monedero Core
//!
//! Domain types and pure derivation logic for the monedero finance agenda.
//!
//! This crate provides:
//!
//! - Entity models: [`Event`], [`Trip`], [`PackingItem`], [`Settings`]
//! - Partial-update patches: [`EventPatch`], [`TripPatch`], [`SettingsPatch`]
//!   (`None` field = unchanged, preserving merge-update semantics)
//! - The derived [`FinancialSummary`] and the [`aggregate`] module joining
//!   events and trips (per-trip totals, budget status, chart feeds)
//!
//! Nothing in this crate performs I/O; persistence lives in
//! `monedero-store`.

pub mod aggregate;
pub mod error;
pub mod models;

pub use error::CoreError;

pub use models::{
    // Entities
    Category,
    Event,
    FinancialKind,
    Financials,
    NewEvent,
    NewTrip,
    PackingItem,
    Settings,
    Trip,
    // Patches
    EventPatch,
    SettingsPatch,
    TripPatch,
    // Derived
    FinancialSummary,
};

pub use aggregate::{ChartFeed, ChartFilter, TripBudgetStatus};
