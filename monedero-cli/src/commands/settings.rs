//! Settings subcommands.

use anyhow::{Result, bail};
use clap::{Args, Subcommand};

use monedero_core::SettingsPatch;
use monedero_store::{SettingsStore, StorageHub};

use crate::{Cli, OutputFormat};

/// User preferences.
#[derive(Subcommand)]
pub enum SettingsCommand {
    /// Show the current settings.
    Show,
    /// Change settings fields; omitted fields stay unchanged.
    Set(SetArgs),
}

/// Arguments for `settings set`.
#[derive(Args)]
pub struct SetArgs {
    /// Display name.
    #[arg(long)]
    pub name: Option<String>,

    /// Currency symbol used in amounts.
    #[arg(long)]
    pub currency: Option<String>,

    /// Avatar gradient token.
    #[arg(long)]
    pub avatar: Option<String>,

    /// Whether reminders are enabled.
    #[arg(long)]
    pub notifications: Option<bool>,
}

/// Runs a settings subcommand.
pub async fn run(cmd: &SettingsCommand, hub: &StorageHub, cli: &Cli) -> Result<()> {
    let store = SettingsStore::bind(hub).await;

    match cmd {
        SettingsCommand::Show => {
            let settings = store.get();
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&settings)?),
                OutputFormat::Text => {
                    println!("Name:          {}", settings.user_name);
                    println!("Currency:      {}", settings.currency);
                    println!("Avatar:        {}", settings.avatar_gradient);
                    println!("Notifications: {}", settings.notifications_enabled);
                }
            }
        }
        SettingsCommand::Set(args) => {
            if args.name.is_none()
                && args.currency.is_none()
                && args.avatar.is_none()
                && args.notifications.is_none()
            {
                bail!("nothing to change, pass at least one of --name/--currency/--avatar/--notifications");
            }

            store
                .update(SettingsPatch {
                    user_name: args.name.clone(),
                    currency: args.currency.clone(),
                    avatar_gradient: args.avatar.clone(),
                    notifications_enabled: args.notifications,
                })
                .await;

            if cli.format == OutputFormat::Json {
                println!("{}", serde_json::to_string_pretty(&store.get())?);
            } else {
                println!("Settings updated");
            }
        }
    }
    Ok(())
}
