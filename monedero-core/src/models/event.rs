//! Calendar activity types.
//!
//! An [`Event`] is a dated, time-boxed activity that may carry a financial
//! transaction and may be loosely linked to a trip via `trip_id`. The link
//! is a soft foreign key: nothing validates it at write time, and deleting
//! a trip leaves referencing events untouched.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

// ============================================================================
// Category
// ============================================================================

/// Activity category. Fixed enumeration; drives the default display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Personal activities.
    #[default]
    Personal,
    /// Work activities.
    Work,
    /// Financial activities (bills, payouts).
    Finance,
    /// Travel activities.
    Travel,
    /// Anything else.
    Other,
}

impl Category {
    /// Default display color for events created under this category.
    pub fn default_color(&self) -> &'static str {
        match self {
            Category::Work => "#3B82F6",
            Category::Personal => "#8B5CF6",
            Category::Finance => "#10B981",
            Category::Travel => "#EC4899",
            Category::Other => "#64748b",
        }
    }

    /// All categories, in display order.
    pub fn all() -> &'static [Category] {
        &[
            Category::Work,
            Category::Personal,
            Category::Finance,
            Category::Travel,
            Category::Other,
        ]
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Personal => write!(f, "personal"),
            Category::Work => write!(f, "work"),
            Category::Finance => write!(f, "finance"),
            Category::Travel => write!(f, "travel"),
            Category::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for Category {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "personal" => Ok(Category::Personal),
            "work" => Ok(Category::Work),
            "finance" => Ok(Category::Finance),
            "travel" => Ok(Category::Travel),
            "other" => Ok(Category::Other),
            _ => Err(CoreError::UnknownCategory(s.to_string())),
        }
    }
}

// ============================================================================
// Financials
// ============================================================================

/// Classification of a transaction attached to an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FinancialKind {
    /// Money coming in.
    Income,
    /// Money going out.
    Expense,
}

impl std::fmt::Display for FinancialKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FinancialKind::Income => write!(f, "income"),
            FinancialKind::Expense => write!(f, "expense"),
        }
    }
}

/// Monetary effect of an event. Absent on the event = no monetary effect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Financials {
    /// Income or expense.
    #[serde(rename = "type")]
    pub kind: FinancialKind,
    /// Non-negative amount in the user's display currency.
    pub amount: f64,
}

impl Financials {
    /// An income transaction.
    pub fn income(amount: f64) -> Self {
        Self { kind: FinancialKind::Income, amount }
    }

    /// An expense transaction.
    pub fn expense(amount: f64) -> Self {
        Self { kind: FinancialKind::Expense, amount }
    }
}

// ============================================================================
// Event
// ============================================================================

/// A dated, time-boxed activity, optionally carrying a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Event {
    /// Opaque unique id, assigned at creation, immutable.
    pub id: String,
    /// Title, required non-empty at save time.
    pub title: String,
    /// Optional free-text description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Calendar date (`YYYY-MM-DD` on the wire).
    pub date: NaiveDate,
    /// Start time, `HH:MM`. No ordering constraint against `end_time`.
    pub start_time: String,
    /// End time, `HH:MM`.
    pub end_time: String,
    /// Activity category.
    pub category: Category,
    /// Display color. Seeded from the category, independently editable.
    pub color: String,
    /// Monetary effect, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub financials: Option<Financials>,
    /// Whether the notification scheduler should pick this event up.
    pub remind_me: bool,
    /// Soft link to a trip. Never validated; may dangle after trip deletion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trip_id: Option<String>,
    /// Free text for reservations, links, confirmation numbers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
}

impl Default for Event {
    fn default() -> Self {
        Self {
            id: String::new(),
            title: String::new(),
            description: None,
            date: NaiveDate::default(),
            start_time: String::new(),
            end_time: String::new(),
            category: Category::default(),
            color: Category::default().default_color().to_string(),
            financials: None,
            remind_me: false,
            trip_id: None,
            documentation: None,
        }
    }
}

/// Event data without an id, as submitted by a rendering surface.
#[derive(Debug, Clone, Default)]
pub struct NewEvent {
    /// Title, required non-empty.
    pub title: String,
    /// Optional description.
    pub description: Option<String>,
    /// Calendar date.
    pub date: NaiveDate,
    /// Start time, `HH:MM`.
    pub start_time: String,
    /// End time, `HH:MM`.
    pub end_time: String,
    /// Activity category.
    pub category: Category,
    /// Display color override. Defaults to the category color.
    pub color: Option<String>,
    /// Monetary effect, if any.
    pub financials: Option<Financials>,
    /// Reminder flag.
    pub remind_me: bool,
    /// Soft link to a trip.
    pub trip_id: Option<String>,
    /// Reservation notes.
    pub documentation: Option<String>,
}

impl NewEvent {
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

    /// Materializes the event with a freshly generated id.
    pub fn into_event(self) -> Event {
        let color = self
            .color
            .unwrap_or_else(|| self.category.default_color().to_string());
        Event {
            id: Uuid::new_v4().to_string(),
            title: self.title,
            description: self.description,
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
            category: self.category,
            color,
            financials: self.financials,
            remind_me: self.remind_me,
            trip_id: self.trip_id,
            documentation: self.documentation,
        }
    }
}

// ============================================================================
// Event Patch
// ============================================================================

/// Partial-field update for an event. `None` = leave unchanged.
///
/// Optional entity fields use a nested `Option` so a patch can distinguish
/// "leave as is" (`None`) from "clear" (`Some(None)`).
#[derive(Debug, Clone, Default)]
pub struct EventPatch {
    /// New title.
    pub title: Option<String>,
    /// New description, or `Some(None)` to clear it.
    pub description: Option<Option<String>>,
    /// New date.
    pub date: Option<NaiveDate>,
    /// New start time.
    pub start_time: Option<String>,
    /// New end time.
    pub end_time: Option<String>,
    /// New category. Does not re-derive the color.
    pub category: Option<Category>,
    /// New display color.
    pub color: Option<String>,
    /// New financials, or `Some(None)` to remove the monetary effect.
    pub financials: Option<Option<Financials>>,
    /// New reminder flag.
    pub remind_me: Option<bool>,
    /// New trip link, or `Some(None)` to unlink.
    pub trip_id: Option<Option<String>>,
    /// New documentation, or `Some(None)` to clear it.
    pub documentation: Option<Option<String>>,
}

impl EventPatch {
    /// Applies the present fields onto `event`. Omitted fields keep their
    /// prior value; the id is never touched.
    pub fn apply(&self, event: &mut Event) {
        if let Some(title) = &self.title {
            event.title = title.clone();
        }
        if let Some(description) = &self.description {
            event.description = description.clone();
        }
        if let Some(date) = self.date {
            event.date = date;
        }
        if let Some(start_time) = &self.start_time {
            event.start_time = start_time.clone();
        }
        if let Some(end_time) = &self.end_time {
            event.end_time = end_time.clone();
        }
        if let Some(category) = self.category {
            event.category = category;
        }
        if let Some(color) = &self.color {
            event.color = color.clone();
        }
        if let Some(financials) = self.financials {
            event.financials = financials;
        }
        if let Some(remind_me) = self.remind_me {
            event.remind_me = remind_me;
        }
        if let Some(trip_id) = &self.trip_id {
            event.trip_id = trip_id.clone();
        }
        if let Some(documentation) = &self.documentation {
            event.documentation = documentation.clone();
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
