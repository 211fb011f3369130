//! HTML parsers for league transfers pages
//!
//! This module contains the parsers for a transfers page:
//! - `page`: locate club headings and split tables into inbound/outbound
//! - `table`: extract the header and rows of a single transfer table

pub mod page;
pub mod table;

// Re-export main parsing functions
pub use page::{locate_tables, parse_transfers_page, LocatedTables};
pub use table::{
    extract_table, transform_header, CellRule, RowMetadata, TableLayout, NO_ARRIVALS,
    NO_DEPARTURES, TRAILING_COLUMNS,
};
