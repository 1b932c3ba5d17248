use anyhow::Result;
use clap::{Parser, Subcommand};
use contact_deck::{logging, Config, ConfigManager, ContactDeck, HttpContactSource, SystemClock};
use std::{path::PathBuf, sync::Arc};

#[derive(Parser)]
#[command(name = "xtask", about = "Contact deck workspace tasks")]
struct Cli {
    /// Storage directory; overrides `[storage] dir` from the layered config
    #[arg(long, global = true)]
    dir: Option<PathBuf>,
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Print the statistics report as JSON
    Stats,
    /// Export favorites to a JSON file (defaults to `[export] path`)
    ExportFavorites { out: Option<PathBuf> },
    /// Fetch contacts from `[source] url` and replace the cache
    Refresh,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cm = ConfigManager::load(".")?;
    if let Some(dir) = cli.dir {
        let mut patch = Config::default();
        patch.storage.dir = Some(dir);
        cm.apply_runtime_overlay(patch);
    }
    let cfg = cm.get();
    logging::init(&cfg.logging);
    let deck = ContactDeck::open(&cfg)?;

    match cli.cmd {
        Cmd::Stats => {
            println!("{}", serde_json::to_string_pretty(&deck.stats.compute().await)?);
        }
        Cmd::ExportFavorites { out } => {
            let out = match out { Some(p) => p, None => cfg.export_path()? };
            let path = deck.export_favorites(&out).await?;
            println!("OK: {}", path.display());
        }
        Cmd::Refresh => {
            let source = HttpContactSource::new(&cfg.source, Arc::new(SystemClock));
            let contacts = deck.refresh(&source).await?;
            println!("OK: {} contacts from {}", contacts.len(), cfg.source.url());
        }
    }
    Ok(())
}
