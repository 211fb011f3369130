//! Transfers page parser
//!
//! Locates the club headings and the transfer tables of a league page and
//! pairs them up per club.

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use crate::error::{Result, TransferError};
use crate::types::{ClubTables, Movement, PageRequest};

use super::table::{extract_table, first_child_element, stripped_text, RowMetadata};

/// Club headings and tables found on a transfers page
#[derive(Debug)]
pub struct LocatedTables<'a> {
    /// Club names in page order
    pub clubs: Vec<String>,
    /// Inbound table of every club, in page order
    pub inbound: Vec<ElementRef<'a>>,
    /// Outbound table of every club, in page order
    pub outbound: Vec<ElementRef<'a>>,
}

/// Find the club headings and split the tables into inbound and outbound.
///
/// The first `div.table-header` is the page heading and is dropped. Tables
/// alternate inbound/outbound per club, so even positions are inbound and
/// odd positions outbound.
pub fn locate_tables(document: &Html) -> Result<LocatedTables<'_>> {
    let header_selector = Selector::parse("div.table-header")
        .map_err(|e| TransferError::ParseError(format!("Invalid selector: {:?}", e)))?;
    let table_selector = Selector::parse("div.responsive-table")
        .map_err(|e| TransferError::ParseError(format!("Invalid selector: {:?}", e)))?;

    let clubs: Vec<String> = document
        .select(&header_selector)
        .skip(1)
        .map(|header| stripped_text(&header))
        .collect();

    let mut inbound = Vec::new();
    let mut outbound = Vec::new();
    for (position, container) in document.select(&table_selector).enumerate() {
        // An empty container keeps its slot so the alternation holds.
        let table = first_child_element(&container).unwrap_or(container);
        if position % 2 == 0 {
            inbound.push(table);
        } else {
            outbound.push(table);
        }
    }

    if clubs.len() != inbound.len() || inbound.len() != outbound.len() {
        warn!(
            clubs = clubs.len(),
            inbound = inbound.len(),
            outbound = outbound.len(),
            "club headings and transfer tables do not pair up"
        );
    }

    Ok(LocatedTables {
        clubs,
        inbound,
        outbound,
    })
}

/// Parse a transfers page into one `ClubTables` per club.
///
/// An error page or a page without tables yields an empty list.
///
/// # Errors
/// - `TransferError::TableShape` - a table header does not fit the layout
pub fn parse_transfers_page(html: &str, request: &PageRequest) -> Result<Vec<ClubTables>> {
    let document = Html::parse_document(html);
    let located = locate_tables(&document)?;

    let inbound_metadata = RowMetadata::new(Movement::In, request);
    let outbound_metadata = RowMetadata::new(Movement::Out, request);

    let mut clubs = Vec::with_capacity(located.clubs.len());
    for ((club, inbound), outbound) in located
        .clubs
        .into_iter()
        .zip(located.inbound)
        .zip(located.outbound)
    {
        let inbound = extract_table(inbound, &inbound_metadata)?;
        let outbound = extract_table(outbound, &outbound_metadata)?;
        debug!(
            %club,
            inbound = inbound.rows.len(),
            outbound = outbound.rows.len(),
            "extracted club tables"
        );
        clubs.push(ClubTables {
            club,
            inbound,
            outbound,
        });
    }

    Ok(clubs)
}
