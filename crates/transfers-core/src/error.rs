//! Error types for the transfer scraper
//!
//! This module defines all error types used throughout the library.
//! TransferError implements Serialize so diagnostics can be emitted as JSON.

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Error type for transfer scraping operations
#[derive(Error, Debug)]
pub enum TransferError {
    /// HTTP request failed (DNS, connection reset, timeout...)
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Failed to parse HTML content
    #[error("Failed to parse HTML: {0}")]
    ParseError(String),

    /// Invalid URL format
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A league descriptor has the wrong shape
    #[error("Invalid league '{league}': {reason}")]
    InvalidLeague { league: String, reason: String },

    /// A table header does not match the known transfer layout
    #[error("Unexpected table layout: {0}")]
    TableShape(String),

    /// A data row does not line up with its header
    #[error("Row has {found} fields but header has {expected}")]
    RowShape { expected: usize, found: usize },

    /// Filesystem error while exporting
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration could not be loaded
    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Serialize TransferError as its display string
impl Serialize for TransferError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Result type alias for transfer scraping operations
pub type Result<T> = std::result::Result<T, TransferError>;
