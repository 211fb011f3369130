//! Data types for the transfer scraper
//!
//! This module contains the core data structures shared by the parser,
//! the assembler and the exporter.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Direction of a transfer relative to the club whose table lists it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Movement {
    /// Arrival at the club
    In,
    /// Departure from the club
    Out,
}

impl Movement {
    /// Value written to the `Movement` column
    pub fn label(self) -> &'static str {
        match self {
            Movement::In => "In",
            Movement::Out => "Out",
        }
    }

    /// Parse a `Movement` column value
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "In" => Some(Movement::In),
            "Out" => Some(Movement::Out),
            _ => None,
        }
    }
}

impl fmt::Display for Movement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Transfer window within a season
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Window {
    Summer,
    Winter,
}

impl Window {
    /// Both windows of a season, in scraping order
    pub const ALL: [Window; 2] = [Window::Summer, Window::Winter];

    /// Code used by the site's `s_w` query parameter and the `Window` column
    pub fn code(self) -> &'static str {
        match self {
            Window::Summer => "s",
            Window::Winter => "w",
        }
    }

    /// Parse a window code (`s` or `w`)
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "s" => Some(Window::Summer),
            "w" => Some(Window::Winter),
            _ => None,
        }
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Identifies one transfers page: a league, a season and a window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// League slug as used in the URL path (e.g. "premier-league")
    pub league_slug: String,
    /// League identifier (e.g. "GB1")
    pub league_id: String,
    /// Season start year
    pub season: u16,
    pub window: Window,
}

impl PageRequest {
    pub fn new(league_slug: &str, league_id: &str, season: u16, window: Window) -> Self {
        Self {
            league_slug: league_slug.to_string(),
            league_id: league_id.to_string(),
            season,
            window,
        }
    }

    /// Four-digit season identifier as written to the `Season` column
    pub fn season_id(&self) -> String {
        self.season.to_string()
    }
}

/// One extracted data row of a transfer table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractedRow {
    /// A transfer with its cell values and trailing metadata
    Transfer(Vec<String>),
    /// The club had no activity in this direction.
    /// `width` is one less than the header width.
    NoActivity { width: usize },
}

impl ExtractedRow {
    /// Cell values as nullable fields; a no-activity row is all nulls
    pub fn cells(&self) -> Vec<Option<String>> {
        match self {
            ExtractedRow::Transfer(cells) => cells.iter().cloned().map(Some).collect(),
            ExtractedRow::NoActivity { width } => vec![None; *width],
        }
    }

    pub fn is_no_activity(&self) -> bool {
        matches!(self, ExtractedRow::NoActivity { .. })
    }
}

/// A single transfer table: its transformed header and data rows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransferTable {
    pub header: Vec<String>,
    pub rows: Vec<ExtractedRow>,
}

impl TransferTable {
    /// Prepend the owning club's name to every transfer row.
    /// The header already carries the `Club` column.
    pub fn prepend_club(&mut self, club: &str) {
        for row in &mut self.rows {
            if let ExtractedRow::Transfer(cells) = row {
                cells.insert(0, club.to_string());
            }
        }
    }
}

/// The inbound and outbound tables of one club within one window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClubTables {
    pub club: String,
    pub inbound: TransferTable,
    pub outbound: TransferTable,
}

/// Typed view of one exported transfer row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    pub club: String,
    pub name: String,
    /// Player nationality, from the flag alt text
    pub nationality: Option<String>,
    pub club_involved: Option<String>,
    pub country_involved: Option<String>,
    /// Fee or loan indicator
    pub fee: Option<String>,
    pub movement: Movement,
    pub season: String,
    pub window: Window,
    pub league: String,
    /// Remaining source columns (age, position, market value...) in order
    pub attributes: Vec<(String, Option<String>)>,
}
