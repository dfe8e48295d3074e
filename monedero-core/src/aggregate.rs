//! Cross-entity aggregation.
//!
//! Pure derivation functions joining the event and trip collections:
//! per-trip expense totals, budget remaining, the global summary, and the
//! chart feed selection. Everything here is stateless and recomputed from
//! the slices it is handed; an event whose `trip_id` no longer resolves
//! contributes to no trip total but stays in the global summary.

use serde::{Deserialize, Serialize};

use crate::models::{Event, FinancialKind, FinancialSummary, Trip};

// ============================================================================
// Global Summary
// ============================================================================

/// Folds the full event collection into income/expense totals.
///
/// Addition is commutative, so the result is invariant under any permutation
/// of `events`.
pub fn global_summary(events: &[Event]) -> FinancialSummary {
    let mut total_income = 0.0;
    let mut total_expenses = 0.0;
    for event in events {
        match event.financials {
            Some(f) if f.kind == FinancialKind::Income => total_income += f.amount,
            Some(f) if f.kind == FinancialKind::Expense => total_expenses += f.amount,
            _ => {}
        }
    }
    FinancialSummary::new(total_income, total_expenses)
}

// ============================================================================
// Per-Trip Derivations
// ============================================================================

/// Expense events linked to `trip_id`, in collection order. An id that
/// resolves to no trip in `trips` yields an empty sequence: events whose
/// link dangles contribute to no trip view.
pub fn trip_expenses<'a>(trips: &[Trip], events: &'a [Event], trip_id: &str) -> Vec<&'a Event> {
    if !trips.iter().any(|t| t.id == trip_id) {
        return Vec::new();
    }
    events
        .iter()
        .filter(|e| {
            e.trip_id.as_deref() == Some(trip_id)
                && e.financials.map(|f| f.kind) == Some(FinancialKind::Expense)
        })
        .collect()
}

/// Sum of expense amounts linked to `trip_id`. Zero when the id does not
/// resolve.
pub fn trip_total(trips: &[Trip], events: &[Event], trip_id: &str) -> f64 {
    trip_expenses(trips, events, trip_id)
        .iter()
        .filter_map(|e| e.financials)
        .map(|f| f.amount)
        .sum()
}

/// Budget position of one trip.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripBudgetStatus {
    /// Sum of linked expenses.
    pub total_expenses: f64,
    /// The trip's budget.
    pub budget: f64,
    /// `budget - total_expenses`. Negative when over budget.
    pub remaining: f64,
}

/// Budget status for `trip_id`. An id that resolves to no trip yields a
/// zeroed status rather than an error.
pub fn trip_budget_status(trips: &[Trip], events: &[Event], trip_id: &str) -> TripBudgetStatus {
    let Some(trip) = trips.iter().find(|t| t.id == trip_id) else {
        return TripBudgetStatus::default();
    };
    let total_expenses = trip_total(trips, events, trip_id);
    TripBudgetStatus {
        total_expenses,
        budget: trip.budget,
        remaining: trip.budget - total_expenses,
    }
}

// ============================================================================
// Chart Feed
// ============================================================================

/// What the financial chart should plot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ChartFilter {
    /// Whole-collection income vs expenses.
    #[default]
    Global,
    /// One trip's spend vs budget.
    Trip(String),
}

/// Data series handed to the chart surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum ChartFeed {
    /// Income and expense bars.
    #[serde(rename = "global")]
    Global {
        /// Total income.
        income: f64,
        /// Total expenses.
        expenses: f64,
    },
    /// Budget and actual-spend bars.
    #[serde(rename = "trip")]
    Trip {
        /// Linked expenses of the trip.
        expenses: f64,
        /// The trip's budget.
        budget: f64,
    },
}

/// Selects chart data for the given filter. A trip filter whose id does not
/// resolve falls back to the zeroed global case.
pub fn chart_feed(filter: &ChartFilter, trips: &[Trip], events: &[Event]) -> ChartFeed {
    match filter {
        ChartFilter::Global => {
            let summary = global_summary(events);
            ChartFeed::Global {
                income: summary.total_income,
                expenses: summary.total_expenses,
            }
        }
        ChartFilter::Trip(trip_id) => match trips.iter().find(|t| t.id == *trip_id) {
            Some(trip) => ChartFeed::Trip {
                expenses: trip_total(trips, events, trip_id),
                budget: trip.budget,
            },
            None => ChartFeed::Global { income: 0.0, expenses: 0.0 },
        },
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Financials, NewEvent, NewTrip};

    fn expense_event(title: &str, amount: f64, trip_id: Option<&str>) -> Event {
        NewEvent {
            title: title.to_string(),
            financials: Some(Financials::expense(amount)),
            trip_id: trip_id.map(str::to_string),
            ..NewEvent::default()
        }
        .into_event()
    }

    fn income_event(title: &str, amount: f64) -> Event {
        NewEvent {
            title: title.to_string(),
            financials: Some(Financials::income(amount)),
            ..NewEvent::default()
        }
        .into_event()
    }

    fn trip(id: &str, budget: f64) -> Trip {
        let mut trip = NewTrip {
            title: format!("Trip {id}"),
            budget,
            ..NewTrip::default()
        }
        .into_trip();
        trip.id = id.to_string();
        trip
    }

    #[test]
    fn test_global_summary_totals() {
        let events = vec![
            income_event("Salary", 2000.0),
            expense_event("Groceries", 800.0, None),
            NewEvent { title: "Walk".to_string(), ..NewEvent::default() }.into_event(),
        ];

        let summary = global_summary(&events);
        assert_eq!(summary.total_income, 2000.0);
        assert_eq!(summary.total_expenses, 800.0);
        assert_eq!(summary.balance, 1200.0);
    }

    #[test]
    fn test_global_summary_order_independent() {
        let a = income_event("a", 100.0);
        let b = expense_event("b", 40.0, None);
        let c = expense_event("c", 25.0, Some("T1"));

        let forward = global_summary(&[a.clone(), b.clone(), c.clone()]);
        let reversed = global_summary(&[c, b, a]);
        assert_eq!(forward, reversed);
    }

    #[test]
    fn test_trip_expenses_filters_kind_and_link() {
        let trips = vec![trip("T1", 1000.0), trip("T2", 400.0)];
        let events = vec![
            expense_event("Flight", 500.0, Some("T1")),
            expense_event("Hotel", 300.0, Some("T2")),
            income_event("Refund", 50.0),
        ];

        let linked = trip_expenses(&trips, &events, "T1");
        assert_eq!(linked.len(), 1);
        assert_eq!(linked[0].title, "Flight");
        assert_eq!(trip_total(&trips, &events, "T1"), 500.0);
    }

    #[test]
    fn test_trip_budget_status() {
        let trips = vec![trip("T1", 1000.0)];
        let events = vec![expense_event("Flight", 500.0, Some("T1"))];

        let status = trip_budget_status(&trips, &events, "T1");
        assert_eq!(status.total_expenses, 500.0);
        assert_eq!(status.budget, 1000.0);
        assert_eq!(status.remaining, 500.0);
    }

    #[test]
    fn test_trip_budget_status_unknown_trip_is_zeroed() {
        let status = trip_budget_status(&[], &[expense_event("x", 10.0, Some("T1"))], "T1");
        assert_eq!(status, TripBudgetStatus::default());
    }

    #[test]
    fn test_dangling_trip_id_tolerated() {
        // Events referencing a deleted trip stay global-only
        let events = vec![expense_event("Flight", 500.0, Some("gone"))];

        assert!(trip_expenses(&[], &events, "gone").is_empty());
        assert_eq!(trip_total(&[], &events, "gone"), 0.0);
        assert_eq!(trip_budget_status(&[], &events, "gone"), TripBudgetStatus::default());
        assert_eq!(global_summary(&events).total_expenses, 500.0);
    }

    #[test]
    fn test_chart_feed_global() {
        let events = vec![income_event("a", 100.0), expense_event("b", 30.0, None)];
        let feed = chart_feed(&ChartFilter::Global, &[], &events);
        assert_eq!(feed, ChartFeed::Global { income: 100.0, expenses: 30.0 });
    }

    #[test]
    fn test_chart_feed_trip_and_fallback() {
        let trips = vec![trip("T1", 1000.0)];
        let events = vec![expense_event("Flight", 500.0, Some("T1"))];

        let feed = chart_feed(&ChartFilter::Trip("T1".to_string()), &trips, &events);
        assert_eq!(feed, ChartFeed::Trip { expenses: 500.0, budget: 1000.0 });

        let fallback = chart_feed(&ChartFilter::Trip("nope".to_string()), &trips, &events);
        assert_eq!(fallback, ChartFeed::Global { income: 0.0, expenses: 0.0 });
    }
}
