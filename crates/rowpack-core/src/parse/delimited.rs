use crate::parse::{LineParser, ParseError};
use csv::{ReaderBuilder, StringRecord};
use derive_more::Deref;
use serde::{Deserialize, Serialize};
use std::io::Read;

///
/// DelimitedFormat
///
/// Field delimiter, quote and escape characters for delimited text input.
/// A doubled quote inside a quoted field stands for one literal quote.
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DelimitedFormat {
    pub delimiter: char,
    pub quote: Option<char>,
    pub escape: Option<char>,
}

impl Default for DelimitedFormat {
    fn default() -> Self {
        Self {
            delimiter: ',',
            quote: Some('"'),
            escape: None,
        }
    }
}

///
/// DelimitedRecord
/// Fields of one parsed line, in input order.
///

#[derive(Clone, Debug, Default, Deref, Eq, PartialEq)]
pub struct DelimitedRecord(Vec<String>);

impl DelimitedRecord {
    #[must_use]
    pub const fn new(fields: Vec<String>) -> Self {
        Self(fields)
    }

    #[must_use]
    pub fn into_fields(self) -> Vec<String> {
        self.0
    }
}

impl<S: Into<String>> FromIterator<S> for DelimitedRecord {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

///
/// DelimitedLineParser
///
/// Splits one line with a `csv` reader configured from its format. The line
/// is fed with a trailing newline so a quoted field left open swallows it and
/// shows up as unterminated.
///

#[derive(Clone, Debug, Default)]
pub struct DelimitedLineParser {
    format: DelimitedFormat,
}

impl DelimitedLineParser {
    #[must_use]
    pub const fn new(format: DelimitedFormat) -> Self {
        Self { format }
    }

    #[must_use]
    pub const fn format(&self) -> &DelimitedFormat {
        &self.format
    }

    fn reader_builder(&self) -> Result<ReaderBuilder, ParseError> {
        let delimiter = format_byte("delimiter", self.format.delimiter)?;
        let quote = self
            .format
            .quote
            .map(|ch| format_byte("quote", ch))
            .transpose()?;
        let escape = self
            .format
            .escape
            .map(|ch| format_byte("escape", ch))
            .transpose()?;

        let mut builder = ReaderBuilder::new();
        builder
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter)
            .quoting(quote.is_some())
            .double_quote(true)
            .escape(escape.filter(|&byte| Some(byte) != quote));
        if let Some(quote) = quote {
            builder.quote(quote);
        }

        Ok(builder)
    }
}

impl LineParser for DelimitedLineParser {
    type Record = DelimitedRecord;

    fn parse(&self, line: &str) -> Result<Option<DelimitedRecord>, ParseError> {
        let line = line.strip_suffix('\n').unwrap_or(line);
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.trim().is_empty() {
            return Ok(None);
        }

        let mut reader = self
            .reader_builder()?
            .from_reader(line.as_bytes().chain(&b"\n"[..]));
        let mut record = StringRecord::new();
        if !reader.read_record(&mut record)? {
            return Ok(None);
        }
        if record.iter().next_back().is_some_and(|field| field.ends_with('\n')) {
            return Err(ParseError::UnterminatedQuote {
                field: record.len(),
            });
        }
        if reader.read_record(&mut StringRecord::new())? {
            return Err(ParseError::MultipleRecords);
        }

        Ok(Some(record.iter().collect()))
    }
}

fn format_byte(setting: &'static str, ch: char) -> Result<u8, ParseError> {
    u8::try_from(ch)
        .ok()
        .filter(u8::is_ascii)
        .ok_or(ParseError::NonAsciiFormat { setting, found: ch })
}

///
/// TESTS
///
