//! Football Transfer Scraper Core Library
//!
//! This crate scrapes historical transfer tables (player moves, fees,
//! clubs, nationalities) from league transfer pages and writes one CSV
//! file per league and season.
//!
//! # Features
//! - Fetch a league's transfers page for a season and window
//! - Parse the per-club inbound/outbound tables into normalized rows
//! - Assemble the club tables into one dataset per season
//! - Export datasets as `<season>/<league>.csv`
//! - Fixed pause between requests to avoid overloading the server

pub mod client;
pub mod config;
pub mod dataset;
pub mod error;
pub mod export;
pub mod pacing;
pub mod parser;
pub mod scraper;
pub mod types;

// Re-export main types for convenience
pub use client::{ClientConfig, TransferClient};
pub use config::{LeagueDescriptor, LeagueEntry, ScrapeConfig, WindowErrorPolicy};
pub use dataset::{assemble_season, assemble_window, Dataset, DatasetRow};
pub use error::{Result, TransferError};
pub use export::{CsvExporter, ExportSummary};
pub use pacing::{Pacer, TokioPacer};
pub use scraper::{RunSummary, SkippedLeague, SkippedSeason, TransferScraper};
pub use types::{
    ClubTables, ExtractedRow, Movement, PageRequest, TransferRecord, TransferTable, Window,
};
