//! Event subcommands.

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Args, Subcommand};

use monedero_core::{Category, Event, EventPatch, Financials, NewEvent};
use monedero_store::{EventStore, StorageHub};

use crate::{Cli, OutputFormat};

/// Event management.
#[derive(Subcommand)]
pub enum EventCommand {
    /// Add a calendar event.
    Add(AddArgs),
    /// List events, optionally filtered.
    #[command(visible_alias = "ls")]
    List(ListArgs),
    /// Update fields of an event; omitted fields stay unchanged.
    Update(UpdateArgs),
    /// Remove an event.
    #[command(visible_alias = "rm")]
    Remove(RemoveArgs),
}

/// Arguments for `event add`.
#[derive(Args)]
pub struct AddArgs {
    /// Event title.
    #[arg(long)]
    pub title: String,

    /// Calendar date (YYYY-MM-DD).
    #[arg(long)]
    pub date: NaiveDate,

    /// Start time (HH:MM).
    #[arg(long, default_value = "09:00")]
    pub start: String,

    /// End time (HH:MM).
    #[arg(long, default_value = "10:00")]
    pub end: String,

    /// Category: personal, work, finance, travel, other.
    #[arg(long, default_value = "personal")]
    pub category: Category,

    /// Display color override (defaults to the category color).
    #[arg(long)]
    pub color: Option<String>,

    /// Description text.
    #[arg(long)]
    pub description: Option<String>,

    /// Record this event as income of the given amount.
    #[arg(long, conflicts_with = "expense")]
    pub income: Option<f64>,

    /// Record this event as an expense of the given amount.
    #[arg(long)]
    pub expense: Option<f64>,

    /// Link the event to a trip id.
    #[arg(long)]
    pub trip: Option<String>,

    /// Flag the event for a reminder.
    #[arg(long)]
    pub remind: bool,

    /// Reservation notes, links, confirmation numbers.
    #[arg(long)]
    pub documentation: Option<String>,
}

/// Arguments for `event list`.
#[derive(Args)]
pub struct ListArgs {
    /// Only events on this date.
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// Only events linked to this trip id.
    #[arg(long)]
    pub trip: Option<String>,

    /// Only events flagged for reminders.
    #[arg(long)]
    pub reminders: bool,
}

/// Arguments for `event update`.
#[derive(Args)]
pub struct UpdateArgs {
    /// Id of the event to update.
    pub id: String,

    /// New title.
    #[arg(long)]
    pub title: Option<String>,

    /// New date (YYYY-MM-DD).
    #[arg(long)]
    pub date: Option<NaiveDate>,

    /// New start time (HH:MM).
    #[arg(long)]
    pub start: Option<String>,

    /// New end time (HH:MM).
    #[arg(long)]
    pub end: Option<String>,

    /// New category.
    #[arg(long)]
    pub category: Option<Category>,

    /// New display color.
    #[arg(long)]
    pub color: Option<String>,

    /// New description.
    #[arg(long, conflicts_with = "clear_description")]
    pub description: Option<String>,

    /// Clear the description.
    #[arg(long)]
    pub clear_description: bool,

    /// Set income of the given amount.
    #[arg(long, conflicts_with_all = ["expense", "clear_financials"])]
    pub income: Option<f64>,

    /// Set an expense of the given amount.
    #[arg(long, conflicts_with = "clear_financials")]
    pub expense: Option<f64>,

    /// Remove the monetary effect entirely.
    #[arg(long)]
    pub clear_financials: bool,

    /// Link to a trip id.
    #[arg(long, conflicts_with = "clear_trip")]
    pub trip: Option<String>,

    /// Unlink from any trip.
    #[arg(long)]
    pub clear_trip: bool,

    /// New reminder flag.
    #[arg(long)]
    pub remind: Option<bool>,

    /// New documentation text.
    #[arg(long, conflicts_with = "clear_documentation")]
    pub documentation: Option<String>,

    /// Clear the documentation.
    #[arg(long)]
    pub clear_documentation: bool,
}

/// Arguments for `event remove`.
#[derive(Args)]
pub struct RemoveArgs {
    /// Id of the event to remove.
    pub id: String,
}

fn financials_from(income: Option<f64>, expense: Option<f64>) -> Result<Option<Financials>> {
    let financials = match (income, expense) {
        (Some(amount), None) => Some(Financials::income(amount)),
        (None, Some(amount)) => Some(Financials::expense(amount)),
        (None, None) => None,
        (Some(_), Some(_)) => bail!("--income and --expense are mutually exclusive"),
    };
    if let Some(f) = &financials {
        if f.amount < 0.0 {
            bail!("amount must be non-negative");
        }
    }
    Ok(financials)
}

/// Runs an event subcommand.
pub async fn run(cmd: &EventCommand, hub: &StorageHub, cli: &Cli) -> Result<()> {
    let store = EventStore::bind(hub).await;

    match cmd {
        EventCommand::Add(args) => {
            let new = NewEvent {
                title: args.title.clone(),
                description: args.description.clone(),
                date: args.date,
                start_time: args.start.clone(),
                end_time: args.end.clone(),
                category: args.category,
                color: args.color.clone(),
                financials: financials_from(args.income, args.expense)?,
                remind_me: args.remind,
                trip_id: args.trip.clone(),
                documentation: args.documentation.clone(),
            };
            new.validate().context("invalid event")?;

            let created = store.add(new).await;
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&created)?),
                OutputFormat::Text => println!("Added event {} ({})", created.title, created.id),
            }
        }
        EventCommand::List(args) => {
            let events: Vec<Event> = store
                .events()
                .into_iter()
                .filter(|e| args.date.is_none_or(|d| e.date == d))
                .filter(|e| {
                    args.trip
                        .as_deref()
                        .is_none_or(|t| e.trip_id.as_deref() == Some(t))
                })
                .filter(|e| !args.reminders || e.remind_me)
                .collect();

            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&events)?),
                OutputFormat::Text => {
                    for e in &events {
                        let money = match e.financials {
                            Some(f) => format!("  [{} {}]", f.kind, f.amount),
                            None => String::new(),
                        };
                        println!(
                            "{}  {} {}-{}  {}  {}{}",
                            e.id, e.date, e.start_time, e.end_time, e.category, e.title, money
                        );
                    }
                    if events.is_empty() {
                        println!("No events.");
                    }
                }
            }
        }
        EventCommand::Update(args) => {
            if store.event(&args.id).is_none() {
                bail!("no event with id {}", args.id);
            }
            if let Some(title) = &args.title {
                if title.trim().is_empty() {
                    bail!("title must not be empty");
                }
            }

            let financials = if args.clear_financials {
                Some(None)
            } else {
                financials_from(args.income, args.expense)?.map(Some)
            };
            let patch = EventPatch {
                title: args.title.clone(),
                description: if args.clear_description {
                    Some(None)
                } else {
                    args.description.clone().map(Some)
                },
                date: args.date,
                start_time: args.start.clone(),
                end_time: args.end.clone(),
                category: args.category,
                color: args.color.clone(),
                financials,
                remind_me: args.remind,
                trip_id: if args.clear_trip {
                    Some(None)
                } else {
                    args.trip.clone().map(Some)
                },
                documentation: if args.clear_documentation {
                    Some(None)
                } else {
                    args.documentation.clone().map(Some)
                },
            };

            store.update(&args.id, patch).await;
            if cli.format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&store.event(&args.id))?);
            } else {
                println!("Updated event {}", args.id);
            }
        }
        EventCommand::Remove(args) => {
            if store.event(&args.id).is_none() {
                bail!("no event with id {}", args.id);
            }
            store.remove(&args.id).await;
            println!("Removed event {}", args.id);
        }
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use monedero_core::FinancialKind;

    #[test]
    fn test_financials_from_flags() {
        let income = financials_from(Some(100.0), None).unwrap().unwrap();
        assert_eq!(income.kind, FinancialKind::Income);
        assert_eq!(income.amount, 100.0);

        let expense = financials_from(None, Some(40.0)).unwrap().unwrap();
        assert_eq!(expense.kind, FinancialKind::Expense);

        assert!(financials_from(None, None).unwrap().is_none());
        assert!(financials_from(Some(1.0), Some(1.0)).is_err());
        assert!(financials_from(None, Some(-5.0)).is_err());
    }
}
