//! Summary, budget and chart subcommands.

use anyhow::Result;
use clap::Args;

use monedero_core::aggregate::{self, ChartFeed, ChartFilter};
use monedero_store::{EventStore, SettingsStore, StorageHub, TripStore};

use crate::{Cli, OutputFormat};

/// Arguments for `budget`.
#[derive(Args)]
pub struct BudgetArgs {
    /// Id of the trip to report on.
    pub trip_id: String,
}

/// Arguments for `chart`.
#[derive(Args)]
pub struct ChartArgs {
    /// Plot one trip's spend vs budget instead of the global series.
    #[arg(long)]
    pub trip: Option<String>,
}

async fn currency(hub: &StorageHub) -> String {
    SettingsStore::bind(hub).await.get().currency
}

/// Prints the global income/expense summary.
pub async fn run_summary(hub: &StorageHub, cli: &Cli) -> Result<()> {
    let events = EventStore::bind(hub).await;
    let summary = events.summary();

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
        OutputFormat::Text => {
            let symbol = currency(hub).await;
            println!("Income:   {symbol}{:.2}", summary.total_income);
            println!("Expenses: {symbol}{:.2}", summary.total_expenses);
            println!("Balance:  {symbol}{:.2}", summary.balance);
        }
    }
    Ok(())
}

/// Prints the budget position of one trip.
pub async fn run_budget(args: &BudgetArgs, hub: &StorageHub, cli: &Cli) -> Result<()> {
    let events = EventStore::bind(hub).await;
    let trips = TripStore::bind(hub).await;

    let status = aggregate::trip_budget_status(&trips.trips(), &events.events(), &args.trip_id);

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&status)?),
        OutputFormat::Text => {
            let symbol = currency(hub).await;
            match trips.trip(&args.trip_id) {
                Some(trip) => println!("Trip:      {}", trip.title),
                None => println!("Trip:      (not found, totals are zero)"),
            }
            println!("Budget:    {symbol}{:.2}", status.budget);
            println!("Spent:     {symbol}{:.2}", status.total_expenses);
            println!("Remaining: {symbol}{:.2}", status.remaining);
            if status.remaining < 0.0 {
                println!("Over budget!");
            }
        }
    }
    Ok(())
}

/// Prints the chart feed, global or per trip.
pub async fn run_chart(args: &ChartArgs, hub: &StorageHub, cli: &Cli) -> Result<()> {
    let events = EventStore::bind(hub).await;
    let trips = TripStore::bind(hub).await;

    let filter = match &args.trip {
        Some(id) => ChartFilter::Trip(id.clone()),
        None => ChartFilter::Global,
    };
    let feed = aggregate::chart_feed(&filter, &trips.trips(), &events.events());

    match cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&feed)?),
        OutputFormat::Text => {
            let symbol = currency(hub).await;
            match feed {
                ChartFeed::Global { income, expenses } => {
                    println!("Income:   {symbol}{income:.2}");
                    println!("Expenses: {symbol}{expenses:.2}");
                }
                ChartFeed::Trip { expenses, budget } => {
                    println!("Budget:   {symbol}{budget:.2}");
                    println!("Expenses: {symbol}{expenses:.2}");
                }
            }
        }
    }
    Ok(())
}
