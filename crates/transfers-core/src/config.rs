//! Run configuration
//!
//! Describes what to scrape (leagues and season ranges) separately from
//! how to scrape it. A configuration can be loaded from a JSON file; the
//! default reproduces the historical run of one Premier League season.

use std::fs;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::client::ClientConfig;
use crate::error::{Result, TransferError};

const SLUG_PATTERN: &str = r"^[a-z0-9]+(?:-[a-z0-9]+)*$";
const ID_PATTERN: &str = r"^[A-Za-z0-9]+$";

/// A league and the inclusive range of seasons to scrape for it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeagueDescriptor {
    /// URL slug, also used as the output file name (e.g. "premier-league")
    pub name: String,
    /// Site identifier of the competition (e.g. "GB1")
    pub id: String,
    pub first_season: u16,
    pub last_season: u16,
}

impl LeagueDescriptor {
    pub fn new(name: &str, id: &str, first_season: u16, last_season: u16) -> Self {
        Self {
            name: name.to_string(),
            id: id.to_string(),
            first_season,
            last_season,
        }
    }

    /// A single-season descriptor
    pub fn single_season(name: &str, id: &str, season: u16) -> Self {
        Self::new(name, id, season, season)
    }

    pub fn seasons(&self) -> RangeInclusive<u16> {
        self.first_season..=self.last_season
    }

    /// Check the descriptor has the shape the page URLs need.
    ///
    /// # Errors
    /// - `TransferError::InvalidLeague` - bad slug, id or season range
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| TransferError::InvalidLeague {
            league: self.name.clone(),
            reason,
        };

        let slug = regex_lite::Regex::new(SLUG_PATTERN).map_err(|e| TransferError::Config(e.to_string()))?;
        if !slug.is_match(&self.name) {
            return Err(invalid("name must be a lowercase slug like 'premier-league'".to_string()));
        }

        let id = regex_lite::Regex::new(ID_PATTERN).map_err(|e| TransferError::Config(e.to_string()))?;
        if !id.is_match(&self.id) {
            return Err(invalid(format!("id '{}' must be alphanumeric", self.id)));
        }

        for season in [self.first_season, self.last_season] {
            if !(1000..=9999).contains(&season) {
                return Err(invalid(format!("season {season} is not a four-digit year")));
            }
        }
        if self.first_season > self.last_season {
            return Err(invalid(format!(
                "first season {} is after last season {}",
                self.first_season, self.last_season
            )));
        }

        Ok(())
    }
}

/// A league entry as read from a configuration file.
///
/// Entries whose fields have the wrong types are kept so the run can
/// report and skip them without rejecting the whole file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LeagueEntry {
    Descriptor(LeagueDescriptor),
    Malformed(serde_json::Value),
}

impl LeagueEntry {
    /// Label used in diagnostics
    pub fn label(&self) -> String {
        match self {
            LeagueEntry::Descriptor(league) => league.name.clone(),
            LeagueEntry::Malformed(value) => value
                .get("name")
                .and_then(serde_json::Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| value.to_string()),
        }
    }

    /// The validated descriptor.
    ///
    /// # Errors
    /// - `TransferError::InvalidLeague` - malformed entry or failed validation
    pub fn descriptor(&self) -> Result<&LeagueDescriptor> {
        match self {
            LeagueEntry::Descriptor(league) => {
                league.validate()?;
                Ok(league)
            }
            LeagueEntry::Malformed(_) => Err(TransferError::InvalidLeague {
                league: self.label(),
                reason: "expected string `name` and `id` and integer `first_season` and `last_season`"
                    .to_string(),
            }),
        }
    }
}

impl From<LeagueDescriptor> for LeagueEntry {
    fn from(league: LeagueDescriptor) -> Self {
        LeagueEntry::Descriptor(league)
    }
}

/// What a failed window (fetch or parse) does to the rest of the run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowErrorPolicy {
    /// Log it and carry on with the next window
    SkipWindow,
    /// Log it and move on to the next league
    SkipLeague,
    /// Stop the whole run
    #[default]
    Abort,
}

/// Configuration for a scraping run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    pub leagues: Vec<LeagueEntry>,
    /// Directory below which `<season>/<league>.csv` files are written
    pub output_dir: PathBuf,
    /// Pause between consecutive page requests, in seconds
    pub pause_secs: u64,
    pub on_window_error: WindowErrorPolicy,
    pub client: ClientConfig,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            leagues: vec![LeagueDescriptor::single_season("premier-league", "GB1", 2018).into()],
            output_dir: PathBuf::from("."),
            pause_secs: 3,
            on_window_error: WindowErrorPolicy::default(),
            client: ClientConfig::default(),
        }
    }
}

impl ScrapeConfig {
    /// Parse a JSON configuration; missing fields take their defaults.
    ///
    /// # Errors
    /// - `TransferError::Config` - the text is not a valid configuration
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| TransferError::Config(e.to_string()))
    }

    /// Load a JSON configuration file.
    ///
    /// # Errors
    /// - `TransferError::Io` - the file cannot be read
    /// - `TransferError::Config` - the file is not a valid configuration
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn pause(&self) -> Duration {
        Duration::from_secs(self.pause_secs)
    }
}
