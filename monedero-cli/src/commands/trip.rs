//! Trip and packing list subcommands.

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Args, Subcommand};

use monedero_core::{NewTrip, PackingItem, Trip, TripPatch};
use monedero_store::{StorageHub, TripStore};

use crate::{Cli, OutputFormat};

/// Trip management.
#[derive(Subcommand)]
pub enum TripCommand {
    /// Add a trip.
    Add(AddArgs),
    /// List trips.
    #[command(visible_alias = "ls")]
    List,
    /// Update fields of a trip; omitted fields stay unchanged.
    Update(UpdateArgs),
    /// Remove a trip. Events linked to it are left in place.
    #[command(visible_alias = "rm")]
    Remove(RemoveArgs),
    /// Work with a trip's packing checklist.
    Packing(PackingArgs),
}

/// Arguments for `trip add`.
#[derive(Args)]
pub struct AddArgs {
    /// Trip title.
    #[arg(long)]
    pub title: String,

    /// First day (YYYY-MM-DD).
    #[arg(long)]
    pub start: NaiveDate,

    /// Last day (YYYY-MM-DD).
    #[arg(long)]
    pub end: NaiveDate,

    /// Budget in the display currency.
    #[arg(long, default_value_t = 0.0)]
    pub budget: f64,

    /// Free-text notes.
    #[arg(long)]
    pub notes: Option<String>,

    /// Display color override.
    #[arg(long)]
    pub color: Option<String>,
}

/// Arguments for `trip update`.
#[derive(Args)]
pub struct UpdateArgs {
    /// Id of the trip to update.
    pub id: String,

    /// New title.
    #[arg(long)]
    pub title: Option<String>,

    /// New first day (YYYY-MM-DD).
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// New last day (YYYY-MM-DD).
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// New budget.
    #[arg(long)]
    pub budget: Option<f64>,

    /// New notes.
    #[arg(long, conflicts_with = "clear_notes")]
    pub notes: Option<String>,

    /// Clear the notes.
    #[arg(long)]
    pub clear_notes: bool,

    /// New display color.
    #[arg(long)]
    pub color: Option<String>,
}

/// Arguments for `trip remove`.
#[derive(Args)]
pub struct RemoveArgs {
    /// Id of the trip to remove.
    pub id: String,
}

/// Arguments for `trip packing`.
#[derive(Args)]
pub struct PackingArgs {
    /// Id of the owning trip.
    pub id: String,

    /// Packing list operation.
    #[command(subcommand)]
    pub action: PackingAction,
}

/// Packing checklist operations.
#[derive(Subcommand)]
pub enum PackingAction {
    /// List the checklist items.
    #[command(visible_alias = "ls")]
    List,
    /// Append an unchecked item.
    Add {
        /// Item label.
        text: String,
    },
    /// Flip an item's completed flag.
    Toggle {
        /// Id of the item to toggle.
        item_id: String,
    },
    /// Relabel an item.
    Rename {
        /// Id of the item to relabel.
        item_id: String,
        /// New label.
        text: String,
    },
    /// Remove an item.
    #[command(visible_alias = "rm")]
    Remove {
        /// Id of the item to remove.
        item_id: String,
    },
}

fn print_trip_line(trip: &Trip) {
    let done = trip.packing_list.iter().filter(|i| i.completed).count();
    println!(
        "{}  {} .. {}  budget {}  packing {}/{}  {}",
        trip.id,
        trip.start_date,
        trip.end_date,
        trip.budget,
        done,
        trip.packing_list.len(),
        trip.title
    );
}

fn print_packing_list(items: &[PackingItem]) {
    for item in items {
        let mark = if item.completed { "x" } else { " " };
        println!("[{mark}] {}  {}", item.id, item.text);
    }
    if items.is_empty() {
        println!("No packing items.");
    }
}

fn require_trip(store: &TripStore, id: &str) -> Result<Trip> {
    store
        .trip(id)
        .with_context(|| format!("no trip with id {id}"))
}

/// Runs a trip subcommand.
pub async fn run(cmd: &TripCommand, hub: &StorageHub, cli: &Cli) -> Result<()> {
    let store = TripStore::bind(hub).await;

    match cmd {
        TripCommand::Add(args) => {
            let new = NewTrip {
                title: args.title.clone(),
                start_date: args.start,
                end_date: args.end,
                budget: args.budget,
                notes: args.notes.clone(),
                color: args.color.clone(),
                packing_list: Vec::new(),
            };
            new.validate().context("invalid trip")?;

            let created = store.add(new).await;
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&created)?),
                OutputFormat::Text => println!("Added trip {} ({})", created.title, created.id),
            }
        }
        TripCommand::List => {
            let trips = store.trips();
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&trips)?),
                OutputFormat::Text => {
                    for trip in &trips {
                        print_trip_line(trip);
                    }
                    if trips.is_empty() {
                        println!("No trips.");
                    }
                }
            }
        }
        TripCommand::Update(args) => {
            require_trip(&store, &args.id)?;
            if let Some(title) = &args.title {
                if title.trim().is_empty() {
                    bail!("title must not be empty");
                }
            }

            let patch = TripPatch {
                title: args.title.clone(),
                start_date: args.start,
                end_date: args.end,
                budget: args.budget,
                notes: if args.clear_notes {
                    Some(None)
                } else {
                    args.notes.clone().map(Some)
                },
                color: args.color.clone(),
                packing_list: None,
            };
            store.update(&args.id, patch).await;

            if cli.format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&store.trip(&args.id))?);
            } else {
                println!("Updated trip {}", args.id);
            }
        }
        TripCommand::Remove(args) => {
            require_trip(&store, &args.id)?;
            store.remove(&args.id).await;
            println!("Removed trip {}", args.id);
        }
        TripCommand::Packing(args) => {
            let trip = require_trip(&store, &args.id)?;

            let replacement = match &args.action {
                PackingAction::List => {
                    if cli.format == OutputFormat::Json {
                        println!("{}", serde_json::to_string_pretty(&trip.packing_list)?);
                    } else {
                        print_packing_list(&trip.packing_list);
                    }
                    return Ok(());
                }
                PackingAction::Add { text } => {
                    if text.trim().is_empty() {
                        bail!("item label must not be empty");
                    }
                    trip.packing_list_with(PackingItem::new(text.clone()))
                }
                PackingAction::Toggle { item_id } => trip.packing_list_toggled(item_id),
                PackingAction::Rename { item_id, text } => {
                    trip.packing_list_renamed(item_id, text)
                }
                PackingAction::Remove { item_id } => trip.packing_list_without(item_id),
            };

            store
                .update(
                    &args.id,
                    TripPatch { packing_list: Some(replacement), ..TripPatch::default() },
                )
                .await;

            let refreshed = require_trip(&store, &args.id)?;
            if cli.format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&refreshed.packing_list)?);
            } else {
                print_packing_list(&refreshed.packing_list);
            }
        }
    }
    Ok(())
}
