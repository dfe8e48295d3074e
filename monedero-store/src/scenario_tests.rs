//! Cross-store scenario tests.
//!
//! End-to-end flows over a shared hub: trip budgets fed by linked events,
//! dangling trip references after deletion, and the chart feed selection.

use monedero_core::aggregate::{self, ChartFeed, ChartFilter};
use monedero_core::{Financials, NewEvent, NewTrip};

use crate::backend::MemoryBackend;
use crate::event_store::EventStore;
use crate::hub::StorageHub;
use crate::trip_store::TripStore;

struct Env {
    events: EventStore,
    trips: TripStore,
}

async fn env() -> Env {
    let hub = StorageHub::new(MemoryBackend::new());
    Env {
        events: EventStore::bind(&hub).await,
        trips: TripStore::bind(&hub).await,
    }
}

fn expense(title: &str, amount: f64, trip_id: &str) -> NewEvent {
    NewEvent {
        title: title.to_string(),
        date: "2026-03-01".parse().unwrap(),
        financials: Some(Financials::expense(amount)),
        trip_id: Some(trip_id.to_string()),
        ..NewEvent::default()
    }
}

#[tokio::test]
async fn test_linked_expense_feeds_trip_budget_status() {
    let env = env().await;
    let trip = env
        .trips
        .add(NewTrip { title: "Lisboa".to_string(), budget: 1000.0, ..NewTrip::default() })
        .await;
    env.events.add(expense("Flight", 500.0, &trip.id)).await;

    let status = aggregate::trip_budget_status(&env.trips.trips(), &env.events.events(), &trip.id);
    assert_eq!(status.total_expenses, 500.0);
    assert_eq!(status.budget, 1000.0);
    assert_eq!(status.remaining, 500.0);
}

#[tokio::test]
async fn test_global_summary_over_unlinked_events() {
    let env = env().await;
    env.events
        .add(NewEvent {
            title: "Salary".to_string(),
            financials: Some(Financials::income(2000.0)),
            ..NewEvent::default()
        })
        .await;
    env.events
        .add(NewEvent {
            title: "Rent".to_string(),
            financials: Some(Financials::expense(800.0)),
            ..NewEvent::default()
        })
        .await;

    let summary = env.events.summary();
    assert_eq!(summary.total_income, 2000.0);
    assert_eq!(summary.total_expenses, 800.0);
    assert_eq!(summary.balance, 1200.0);
}

#[tokio::test]
async fn test_deleting_trip_leaves_linked_events_dangling() {
    let env = env().await;
    let trip = env
        .trips
        .add(NewTrip { title: "Lisboa".to_string(), budget: 1000.0, ..NewTrip::default() })
        .await;
    let flight = env.events.add(expense("Flight", 500.0, &trip.id)).await;
    let hotel = env.events.add(expense("Hotel", 300.0, &trip.id)).await;

    env.trips.remove(&trip.id).await;

    // Both events persist unchanged, trip_id intact but unresolvable
    let events = env.events.events();
    assert_eq!(events, vec![flight, hotel]);
    assert_eq!(events[0].trip_id.as_deref(), Some(trip.id.as_str()));

    // Aggregation over the current trip collection ignores the dangling id
    assert!(aggregate::trip_expenses(&env.trips.trips(), &events, &trip.id).is_empty());
    let status = aggregate::trip_budget_status(&env.trips.trips(), &events, &trip.id);
    assert_eq!(status.budget, 0.0);
    assert_eq!(status.total_expenses, 0.0);

    // But the events still count globally
    assert_eq!(env.events.summary().total_expenses, 800.0);
}

#[tokio::test]
async fn test_chart_feed_follows_filter() {
    let env = env().await;
    let trip = env
        .trips
        .add(NewTrip { title: "Lisboa".to_string(), budget: 1000.0, ..NewTrip::default() })
        .await;
    env.events.add(expense("Flight", 500.0, &trip.id)).await;
    env.events
        .add(NewEvent {
            title: "Salary".to_string(),
            financials: Some(Financials::income(2000.0)),
            ..NewEvent::default()
        })
        .await;

    let trips = env.trips.trips();
    let events = env.events.events();

    let global = aggregate::chart_feed(&ChartFilter::Global, &trips, &events);
    assert_eq!(global, ChartFeed::Global { income: 2000.0, expenses: 500.0 });

    let per_trip = aggregate::chart_feed(&ChartFilter::Trip(trip.id.clone()), &trips, &events);
    assert_eq!(per_trip, ChartFeed::Trip { expenses: 500.0, budget: 1000.0 });

    env.trips.remove(&trip.id).await;
    let fallback =
        aggregate::chart_feed(&ChartFilter::Trip(trip.id), &env.trips.trips(), &events);
    assert_eq!(fallback, ChartFeed::Global { income: 0.0, expenses: 0.0 });
}

#[tokio::test]
async fn test_rapid_edits_from_one_instance_do_not_lose_updates() {
    let env = env().await;
    let a = env.events.add(expense("a", 1.0, "T1")).await;

    // Two back-to-back merge updates through the same store instance
    env.events
        .update(&a.id, monedero_core::EventPatch {
            title: Some("first".to_string()),
            ..Default::default()
        })
        .await;
    env.events
        .update(&a.id, monedero_core::EventPatch {
            description: Some(Some("second".to_string())),
            ..Default::default()
        })
        .await;

    let updated = env.events.event(&a.id).unwrap();
    assert_eq!(updated.title, "first");
    assert_eq!(updated.description.as_deref(), Some("second"));
}
