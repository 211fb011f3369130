//! Command-line runner for the transfer scraper
//!
//! Without arguments this scrapes the default league and season range and
//! writes `<season>/<league>.csv` below the current directory.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use transfers_core::{LeagueDescriptor, ScrapeConfig, TransferScraper};

#[derive(Debug, Parser)]
#[command(author, version, about = "Scrape football transfer tables into per-season CSV files")]
struct Cli {
    /// JSON file describing leagues, season ranges and client settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory below which `<season>/<league>.csv` files are written
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Seconds to wait between page requests
    #[arg(long)]
    pause_secs: Option<u64>,

    /// Scrape a single league (URL slug, e.g. "premier-league")
    #[arg(long, requires_all = ["league_id", "season"])]
    league: Option<String>,

    /// Identifier of the single league (e.g. "GB1")
    #[arg(long, requires = "league")]
    league_id: Option<String>,

    /// Start year of the single season to scrape
    #[arg(long, requires = "league")]
    season: Option<u16>,
}

impl Cli {
    fn into_config(self) -> Result<ScrapeConfig> {
        let mut config = match &self.config {
            Some(path) => ScrapeConfig::from_path(path)
                .with_context(|| format!("loading configuration from {}", path.display()))?,
            None => ScrapeConfig::default(),
        };

        if let (Some(league), Some(id), Some(season)) = (self.league, self.league_id, self.season) {
            config.leagues = vec![LeagueDescriptor::single_season(&league, &id, season).into()];
        }
        if let Some(output_dir) = self.output_dir {
            config.output_dir = output_dir;
        }
        if let Some(pause_secs) = self.pause_secs {
            config.pause_secs = pause_secs;
        }

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let config = Cli::parse().into_config()?;
    info!(
        leagues = config.leagues.len(),
        output_dir = %config.output_dir.display(),
        "starting transfer scrape"
    );

    let scraper = TransferScraper::new(config)?;
    let summary = scraper.run().await?;

    for export in &summary.exports {
        info!("Wrote {} rows to {}", export.rows, export.path.display());
    }
    for skipped in &summary.skipped_leagues {
        warn!("Skipped {}: {}", skipped.league, skipped.reason);
    }
    for skipped in &summary.skipped_seasons {
        warn!("No data for {} {}, previous export kept", skipped.league, skipped.season);
    }

    Ok(())
}
