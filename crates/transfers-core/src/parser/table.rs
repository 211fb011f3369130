//! Transfer table parser
//!
//! Turns one `<table>` of a transfers page into a transformed header and a
//! list of data rows. Cell values are read according to a layout chosen
//! once per table from the markers the site puts inside its cells.

use scraper::ElementRef;

use crate::error::{Result, TransferError};
use crate::types::{ExtractedRow, Movement, PageRequest, TransferTable, Window};

/// Cell text the site shows when a club had no arrivals
pub const NO_ARRIVALS: &str = "No new arrivals";

/// Cell text the site shows when a club had no departures
pub const NO_DEPARTURES: &str = "No departures";

/// Columns appended to every header, in order
pub const TRAILING_COLUMNS: [&str; 4] = ["Movement", "Season", "Window", "League"];

/// Metadata appended to every transfer row of a table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowMetadata {
    pub movement: Movement,
    pub season: String,
    pub window: Window,
    pub league: String,
}

impl RowMetadata {
    pub fn new(movement: Movement, request: &PageRequest) -> Self {
        Self {
            movement,
            season: request.season_id(),
            window: request.window,
            league: request.league_slug.clone(),
        }
    }

    /// Values in `TRAILING_COLUMNS` order
    fn values(&self) -> [String; 4] {
        [
            self.movement.label().to_string(),
            self.season.clone(),
            self.window.code().to_string(),
            self.league.clone(),
        ]
    }
}

/// How a single cell's value is read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellRule {
    /// Player name block (`.di`): its visible text
    Name,
    /// Flag image (`img.flaggenrahmen`): its alt text
    Flag,
    /// Club profile link (`a.vereinprofil_tooltip`): alt text of its crest
    ClubCrest,
    /// Plain visible text
    Text,
}

impl CellRule {
    /// Rule signalled by the marker on the cell's first child element, if any
    pub fn detect(cell: &ElementRef) -> Option<Self> {
        marker(cell).map(|(rule, _)| rule)
    }

    /// Read a cell with this rule. A cell lacking the expected marker is
    /// read as plain text.
    pub fn extract(self, cell: &ElementRef) -> String {
        match marker(cell) {
            Some((CellRule::Name, child)) if self == CellRule::Name => stripped_text(&child),
            Some((CellRule::Flag, child)) if self == CellRule::Flag => child
                .value()
                .attr("alt")
                .map(|alt| alt.trim().to_string())
                .unwrap_or_else(|| stripped_text(cell)),
            Some((CellRule::ClubCrest, child)) if self == CellRule::ClubCrest => {
                first_child_element(&child)
                    .and_then(|crest| crest.value().attr("alt"))
                    .map(|alt| alt.trim().to_string())
                    .unwrap_or_else(|| stripped_text(cell))
            }
            _ => stripped_text(cell),
        }
    }
}

/// Extraction strategy for a whole table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableLayout {
    /// Known transfer layout: one rule per column
    Marked(Vec<CellRule>),
    /// No markers found; every cell is read as text
    RawText,
}

impl TableLayout {
    /// Pick the layout from the first data row carrying any marker.
    pub fn detect(rows: &[ElementRef]) -> Self {
        for row in rows {
            let rules: Vec<Option<CellRule>> = row_cells(row).iter().map(CellRule::detect).collect();
            if rules.iter().any(Option::is_some) {
                return TableLayout::Marked(
                    rules.into_iter().map(|rule| rule.unwrap_or(CellRule::Text)).collect(),
                );
            }
        }
        TableLayout::RawText
    }

    /// Rule for the cell at `column`; columns past the sampled row are text
    pub fn rule_for(&self, column: usize) -> CellRule {
        match self {
            TableLayout::Marked(rules) => rules.get(column).copied().unwrap_or(CellRule::Text),
            TableLayout::RawText => CellRule::Text,
        }
    }
}

/// Transform the raw header texts into the output header.
///
/// Position 0 becomes `Name`, a `Club` column is inserted in front, the
/// second-to-last column becomes `Club involved`, `Country involved` is
/// inserted before the last column and the four metadata columns are
/// appended. An empty header stays empty.
///
/// # Errors
/// - `TransferError::TableShape` - fewer than three raw columns, which
///   would make the renamed positions collide
///
/// # Examples
/// ```
/// use transfers_core::parser::transform_header;
///
/// let raw = ["In", "Age", "Left", "Fee"].map(String::from).to_vec();
/// let header = transform_header(raw).unwrap();
/// assert_eq!(
///     header,
///     ["Club", "Name", "Age", "Club involved", "Country involved", "Fee",
///      "Movement", "Season", "Window", "League"]
/// );
/// ```
pub fn transform_header(raw: Vec<String>) -> Result<Vec<String>> {
    if raw.is_empty() {
        return Ok(raw);
    }
    if raw.len() < 3 {
        return Err(TransferError::TableShape(format!(
            "header has {} columns, expected at least 3",
            raw.len()
        )));
    }

    let mut header = raw;
    header[0] = "Name".to_string();
    header.insert(0, "Club".to_string());
    let second_to_last = header.len() - 2;
    header[second_to_last] = "Club involved".to_string();
    header.insert(header.len() - 1, "Country involved".to_string());
    header.extend(TRAILING_COLUMNS.iter().map(|column| column.to_string()));
    Ok(header)
}

/// Extract the header and data rows of one transfer table.
///
/// A row showing a no-activity notice becomes `ExtractedRow::NoActivity`;
/// every other row gets the metadata values appended.
pub fn extract_table(table: ElementRef, metadata: &RowMetadata) -> Result<TransferTable> {
    let rows = table_rows(&table);
    let Some((header_row, data_rows)) = rows.split_first() else {
        return Ok(TransferTable::default());
    };

    let raw_header: Vec<String> = child_elements(header_row)
        .filter(|el| el.value().name() == "th")
        .map(|th| stripped_text(&th))
        .collect();
    let header = transform_header(raw_header)?;

    let layout = TableLayout::detect(data_rows);
    let mut extracted = Vec::with_capacity(data_rows.len());

    for row in data_rows {
        let cells = row_cells(row);
        if cells.is_empty() {
            continue;
        }

        let mut values: Vec<String> = cells
            .iter()
            .enumerate()
            .map(|(column, cell)| layout.rule_for(column).extract(cell))
            .collect();

        if values.iter().any(|value| value == NO_ARRIVALS || value == NO_DEPARTURES) {
            extracted.push(ExtractedRow::NoActivity {
                width: header.len().saturating_sub(1),
            });
        } else {
            values.extend(metadata.values());
            extracted.push(ExtractedRow::Transfer(values));
        }
    }

    Ok(TransferTable {
        header,
        rows: extracted,
    })
}

/// Visible text with every text fragment trimmed, joined without separator.
pub(crate) fn stripped_text(element: &ElementRef) -> String {
    element.text().map(str::trim).collect()
}

fn child_elements<'a>(element: &ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    element.children().filter_map(ElementRef::wrap)
}

pub(crate) fn first_child_element<'a>(element: &ElementRef<'a>) -> Option<ElementRef<'a>> {
    child_elements(element).next()
}

/// Marker carried by the first child element of a cell
fn marker<'a>(cell: &ElementRef<'a>) -> Option<(CellRule, ElementRef<'a>)> {
    let child = first_child_element(cell)?;
    let class = child.value().attr("class")?.split_whitespace().next()?;
    let rule = match class {
        "di" => CellRule::Name,
        "flaggenrahmen" => CellRule::Flag,
        "vereinprofil_tooltip" => CellRule::ClubCrest,
        _ => return None,
    };
    Some((rule, child))
}

/// The table's own rows; rows of nested tables are not included.
fn table_rows<'a>(table: &ElementRef<'a>) -> Vec<ElementRef<'a>> {
    let mut rows = Vec::new();
    for child in child_elements(table) {
        match child.value().name() {
            "tr" => rows.push(child),
            "thead" | "tbody" | "tfoot" => {
                rows.extend(child_elements(&child).filter(|el| el.value().name() == "tr"))
            }
            _ => {}
        }
    }
    rows
}

fn row_cells<'a>(row: &ElementRef<'a>) -> Vec<ElementRef<'a>> {
    child_elements(row).filter(|el| el.value().name() == "td").collect()
}
