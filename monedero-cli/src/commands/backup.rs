//! Export, import and reset subcommands.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;

use monedero_store::{SettingsStore, StorageHub, backup};

/// Arguments for `export`.
#[derive(Args)]
pub struct ExportArgs {
    /// Output file (defaults to backup_agenda_YYYY-MM-DD.json in the
    /// current directory). `-` writes to stdout.
    #[arg(long, short)]
    pub out: Option<PathBuf>,
}

/// Arguments for `import`.
#[derive(Args)]
pub struct ImportArgs {
    /// Backup file to restore from.
    pub file: PathBuf,
}

/// Arguments for `reset`.
#[derive(Args)]
pub struct ResetArgs {
    /// Skip the confirmation prompt.
    #[arg(long, short)]
    pub yes: bool,
}

/// Writes the full state to a backup file.
pub async fn run_export(args: &ExportArgs, hub: &StorageHub) -> Result<()> {
    let json = backup::export_json(hub).await?;

    match &args.out {
        Some(path) if path.as_os_str() == "-" => {
            println!("{json}");
        }
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("Exported to {}", path.display());
        }
        None => {
            let name = backup::backup_filename();
            std::fs::write(&name, &json).with_context(|| format!("writing {name}"))?;
            println!("Exported to {name}");
        }
    }
    Ok(())
}

/// Restores from a backup file. Sections absent from the file leave the
/// corresponding store untouched.
pub async fn run_import(args: &ImportArgs, hub: &StorageHub) -> Result<()> {
    let raw = std::fs::read_to_string(&args.file)
        .with_context(|| format!("reading {}", args.file.display()))?;

    backup::import_document(hub, &raw)
        .await
        .with_context(|| format!("importing {}", args.file.display()))?;

    println!("Imported {}", args.file.display());
    Ok(())
}

/// Deletes ALL stored data and restores defaults. Prompts unless `--yes`.
pub async fn run_reset(args: &ResetArgs, hub: &StorageHub) -> Result<()> {
    if !args.yes {
        print!("This deletes ALL events, trips and settings. Type 'yes' to continue: ");
        io::stdout().flush()?;

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        if answer.trim() != "yes" {
            bail!("reset aborted");
        }
    }

    SettingsStore::bind(hub).await.reset().await;
    println!("All data deleted, defaults restored.");
    Ok(())
}
