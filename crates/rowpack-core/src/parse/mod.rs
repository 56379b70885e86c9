//! Input line parsing.
//!
//! A `LineParser` turns one raw input line into a typed record. Malformed
//! lines and blank lines are per-record conditions: the processor counts them
//! and moves on, so neither is ever an `InternalError`.

mod delimited;

use thiserror::Error as ThisError;

pub use delimited::{DelimitedFormat, DelimitedLineParser, DelimitedRecord};

///
/// ParseError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum ParseError {
    #[error("quoted field {field} is never closed")]
    UnterminatedQuote { field: usize },

    #[error("line holds more than one record")]
    MultipleRecords,

    #[error("{setting} {found:?} is not a single-byte ASCII character")]
    NonAsciiFormat { setting: &'static str, found: char },

    #[error("malformed record: {0}")]
    Malformed(String),
}

impl From<csv::Error> for ParseError {
    fn from(err: csv::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}

///
/// LineParser
///
/// `Ok(None)` means the line carried no record.
///

pub trait LineParser {
    type Record;

    fn parse(&self, line: &str) -> Result<Option<Self::Record>, ParseError>;
}
