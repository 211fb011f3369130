//! Tabular datasets built from transfer tables
//!
//! A `Dataset` is a header plus rows keyed by that header. Club tables are
//! turned into datasets and stacked into one dataset per window and then
//! per season.

use std::collections::HashSet;

use crate::error::{Result, TransferError};
use crate::types::{ClubTables, ExtractedRow, Movement, TransferRecord, TransferTable, Window};

/// Column holding the player's name; rows without one are not exported
pub const NAME_COLUMN: &str = "Name";

/// One dataset row
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetRow {
    /// Cell values aligned with the dataset's columns
    Transfer(Vec<Option<String>>),
    /// Placeholder for a club without activity in one direction
    NoActivity,
}

/// Rows keyed by a list of column names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<DatasetRow>,
}

impl Dataset {
    /// Key a table's rows by its header.
    ///
    /// # Errors
    /// - `TransferError::RowShape` - a transfer row is not as wide as the header
    pub fn from_table(table: TransferTable) -> Result<Self> {
        let expected = table.header.len();
        let rows = table
            .rows
            .into_iter()
            .map(|row| match row {
                ExtractedRow::Transfer(cells) if cells.len() != expected => {
                    Err(TransferError::RowShape {
                        expected,
                        found: cells.len(),
                    })
                }
                ExtractedRow::Transfer(cells) => {
                    Ok(DatasetRow::Transfer(cells.into_iter().map(Some).collect()))
                }
                ExtractedRow::NoActivity { .. } => Ok(DatasetRow::NoActivity),
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            columns: table.header,
            rows,
        })
    }

    /// Stack datasets vertically, in order.
    pub fn concat<I>(datasets: I) -> Self
    where
        I: IntoIterator<Item = Dataset>,
    {
        datasets.into_iter().fold(Dataset::default(), |mut acc, dataset| {
            acc.append(dataset);
            acc
        })
    }

    /// Append another dataset's rows below this one's.
    ///
    /// Columns are matched by name. Columns only one side has are added at
    /// the end and left null on the other side's rows. A repeated name
    /// matches its occurrences in order: the second `Pos` goes to the
    /// second `Pos` column.
    pub fn append(&mut self, other: Dataset) {
        if self.columns.is_empty() && self.rows.is_empty() {
            *self = other;
            return;
        }
        if self.columns == other.columns {
            self.rows.extend(other.rows);
            return;
        }

        let mut positions = Vec::with_capacity(other.columns.len());
        let mut taken = vec![false; self.columns.len()];
        for column in &other.columns {
            let existing = self
                .columns
                .iter()
                .zip(&taken)
                .position(|(name, &used)| !used && name == column);
            let position = match existing {
                Some(position) => position,
                None => {
                    self.columns.push(column.clone());
                    taken.push(false);
                    for row in &mut self.rows {
                        if let DatasetRow::Transfer(cells) = row {
                            cells.push(None);
                        }
                    }
                    self.columns.len() - 1
                }
            };
            taken[position] = true;
            positions.push(position);
        }

        let width = self.columns.len();
        for row in other.rows {
            match row {
                DatasetRow::Transfer(cells) => {
                    let mut aligned = vec![None; width];
                    for (cell, &position) in cells.into_iter().zip(&positions) {
                        aligned[position] = cell;
                    }
                    self.rows.push(DatasetRow::Transfer(aligned));
                }
                DatasetRow::NoActivity => self.rows.push(DatasetRow::NoActivity),
            }
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[DatasetRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    /// Cell values of the transfer rows
    pub fn transfers(&self) -> impl Iterator<Item = &[Option<String>]> {
        self.rows.iter().filter_map(|row| match row {
            DatasetRow::Transfer(cells) => Some(cells.as_slice()),
            DatasetRow::NoActivity => None,
        })
    }

    /// Keep only transfer rows with a non-empty name, in their original order.
    pub fn without_placeholders(mut self) -> Self {
        let name_index = self.column_index(NAME_COLUMN);
        self.rows.retain(|row| match (row, name_index) {
            (DatasetRow::Transfer(cells), Some(index)) => cells
                .get(index)
                .and_then(Option::as_deref)
                .is_some_and(|name| !name.is_empty()),
            _ => false,
        });
        self
    }

    /// Typed views of the transfer rows. Rows missing a club, name,
    /// movement or window are skipped.
    pub fn records(&self) -> Vec<TransferRecord> {
        let lookup = ColumnLookup::new(&self.columns);
        self.transfers()
            .filter_map(|cells| lookup.record(cells))
            .collect()
    }
}

/// Turn the club tables of one window into a single dataset: all inbound
/// tables first, then all outbound tables.
///
/// # Errors
/// - `TransferError::RowShape` - a table's rows do not line up with its header
pub fn assemble_window(clubs: Vec<ClubTables>) -> Result<Dataset> {
    let mut inbound = Vec::with_capacity(clubs.len());
    let mut outbound = Vec::with_capacity(clubs.len());

    for ClubTables {
        club,
        inbound: mut inbound_table,
        outbound: mut outbound_table,
    } in clubs
    {
        inbound_table.prepend_club(&club);
        outbound_table.prepend_club(&club);
        inbound.push(Dataset::from_table(inbound_table)?);
        outbound.push(Dataset::from_table(outbound_table)?);
    }

    let mut window = Dataset::concat(inbound);
    window.append(Dataset::concat(outbound));
    Ok(window)
}

/// Combine the window datasets of one season, in order.
pub fn assemble_season<I>(windows: I) -> Dataset
where
    I: IntoIterator<Item = Dataset>,
{
    Dataset::concat(windows)
}

/// Column positions used to build `TransferRecord`s
struct ColumnLookup<'a> {
    columns: &'a [String],
    club: Option<usize>,
    name: Option<usize>,
    nationality: Option<usize>,
    club_involved: Option<usize>,
    country_involved: Option<usize>,
    fee: Option<usize>,
    movement: Option<usize>,
    season: Option<usize>,
    window: Option<usize>,
    league: Option<usize>,
}

impl<'a> ColumnLookup<'a> {
    fn new(columns: &'a [String]) -> Self {
        let find = |name: &str| columns.iter().position(|column| column == name);
        Self {
            columns,
            club: find("Club"),
            name: find(NAME_COLUMN),
            nationality: find("Nat.").or_else(|| find("Nationality")),
            club_involved: find("Club involved"),
            country_involved: find("Country involved"),
            fee: find("Fee"),
            movement: find("Movement"),
            season: find("Season"),
            window: find("Window"),
            league: find("League"),
        }
    }

    fn record(&self, cells: &[Option<String>]) -> Option<TransferRecord> {
        let get = |index: Option<usize>| index.and_then(|i| cells.get(i).cloned().flatten());

        let known: HashSet<usize> = [
            self.club,
            self.name,
            self.nationality,
            self.club_involved,
            self.country_involved,
            self.fee,
            self.movement,
            self.season,
            self.window,
            self.league,
        ]
        .into_iter()
        .flatten()
        .collect();

        let attributes = self
            .columns
            .iter()
            .enumerate()
            .filter(|(index, _)| !known.contains(index))
            .map(|(index, column)| (column.clone(), cells.get(index).cloned().flatten()))
            .collect();

        Some(TransferRecord {
            club: get(self.club)?,
            name: get(self.name).filter(|name| !name.is_empty())?,
            nationality: get(self.nationality),
            club_involved: get(self.club_involved),
            country_involved: get(self.country_involved),
            fee: get(self.fee),
            movement: Movement::from_label(&get(self.movement)?)?,
            season: get(self.season).unwrap_or_default(),
            window: Window::from_code(&get(self.window)?)?,
            league: get(self.league).unwrap_or_default(),
            attributes,
        })
    }
}
