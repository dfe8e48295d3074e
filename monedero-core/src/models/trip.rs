//! Trip types.
//!
//! A [`Trip`] groups events under a date range, a budget and a packing
//! checklist. The store mutates the packing list only by whole-list
//! replacement; the helpers here build the replacement lists that differ
//! by one item.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

// ============================================================================
// Packing Item
// ============================================================================

/// One entry of a trip's packing checklist.
///
/// Ids are unique within the owning trip's list only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PackingItem {
    /// Opaque id, scoped to the owning trip.
    pub id: String,
    /// Item label.
    pub text: String,
    /// Checked off or not.
    pub completed: bool,
}

impl PackingItem {
    /// Creates an unchecked item with a fresh id.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            completed: false,
        }
    }
}

// ============================================================================
// Trip
// ============================================================================

/// A date-ranged grouping with a budget and packing checklist.
///
/// No `start_date <= end_date` ordering is enforced; both are caller
/// supplied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Trip {
    /// Opaque unique id.
    pub id: String,
    /// Trip title.
    pub title: String,
    /// First day.
    pub start_date: NaiveDate,
    /// Last day.
    pub end_date: NaiveDate,
    /// Budget in the display currency. May be zero.
    pub budget: f64,
    /// Free-text notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Packing checklist, replaced wholesale on update.
    pub packing_list: Vec<PackingItem>,
    /// Display color.
    pub color: String,
}

impl Default for Trip {
    fn default() -> Self {
        Self {
            id: String::new(),
            title: String::new(),
            start_date: NaiveDate::default(),
            end_date: NaiveDate::default(),
            budget: 0.0,
            notes: None,
            packing_list: Vec::new(),
            color: "#EC4899".to_string(),
        }
    }
}

impl Trip {
    /// Packing list with `item` appended.
    pub fn packing_list_with(&self, item: PackingItem) -> Vec<PackingItem> {
        let mut list = self.packing_list.clone();
        list.push(item);
        list
    }

    /// Packing list with the matching item's `completed` flag flipped.
    /// Unknown ids return the list unchanged.
    pub fn packing_list_toggled(&self, item_id: &str) -> Vec<PackingItem> {
        self.packing_list
            .iter()
            .map(|i| {
                if i.id == item_id {
                    PackingItem { completed: !i.completed, ..i.clone() }
                } else {
                    i.clone()
                }
            })
            .collect()
    }

    /// Packing list with the matching item relabeled.
    pub fn packing_list_renamed(&self, item_id: &str, text: &str) -> Vec<PackingItem> {
        self.packing_list
            .iter()
            .map(|i| {
                if i.id == item_id {
                    PackingItem { text: text.to_string(), ..i.clone() }
                } else {
                    i.clone()
                }
            })
            .collect()
    }

    /// Packing list without the matching item.
    pub fn packing_list_without(&self, item_id: &str) -> Vec<PackingItem> {
        self.packing_list
            .iter()
            .filter(|i| i.id != item_id)
            .cloned()
            .collect()
    }
}

/// Trip data without an id, as submitted by a rendering surface.
#[derive(Debug, Clone, Default)]
pub struct NewTrip {
    /// Title, required non-empty.
    pub title: String,
    /// First day.
    pub start_date: NaiveDate,
    /// Last day.
    pub end_date: NaiveDate,
    /// Budget, may be zero.
    pub budget: f64,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Display color override.
    pub color: Option<String>,
    /// Initial packing list.
    pub packing_list: Vec<PackingItem>,
}

impl NewTrip {
    /// Checks save-time requirements.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::EmptyTitle`] if the title is blank.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.title.trim().is_empty() {
            return Err(CoreError::EmptyTitle);
        }
        Ok(())
    }

    /// Materializes the trip with a freshly generated id.
    pub fn into_trip(self) -> Trip {
        Trip {
            id: Uuid::new_v4().to_string(),
            title: self.title,
            start_date: self.start_date,
            end_date: self.end_date,
            budget: self.budget,
            notes: self.notes,
            packing_list: self.packing_list,
            color: self.color.unwrap_or_else(|| "#EC4899".to_string()),
        }
    }
}

// ============================================================================
// Trip Patch
// ============================================================================

/// Partial-field update for a trip. `None` = leave unchanged.
#[derive(Debug, Clone, Default)]
pub struct TripPatch {
    /// New title.
    pub title: Option<String>,
    /// New first day.
    pub start_date: Option<NaiveDate>,
    /// New last day.
    pub end_date: Option<NaiveDate>,
    /// New budget.
    pub budget: Option<f64>,
    /// New notes, or `Some(None)` to clear them.
    pub notes: Option<Option<String>>,
    /// New display color.
    pub color: Option<String>,
    /// Replacement packing list.
    pub packing_list: Option<Vec<PackingItem>>,
}

impl TripPatch {
    /// Applies the present fields onto `trip`. The id is never touched.
    pub fn apply(&self, trip: &mut Trip) {
        if let Some(title) = &self.title {
            trip.title = title.clone();
        }
        if let Some(start_date) = self.start_date {
            trip.start_date = start_date;
        }
        if let Some(end_date) = self.end_date {
            trip.end_date = end_date;
        }
        if let Some(budget) = self.budget {
            trip.budget = budget;
        }
        if let Some(notes) = &self.notes {
            trip.notes = notes.clone();
        }
        if let Some(color) = &self.color {
            trip.color = color.clone();
        }
        if let Some(packing_list) = &self.packing_list {
            trip.packing_list = packing_list.clone();
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
