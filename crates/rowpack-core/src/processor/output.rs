use crate::{codec::RowBlob, error::InternalError};
use std::fmt;

///
/// TableRowKey
///
/// Output key of one encoded row: physical table name plus row key.
/// Orders by table, then by row key bytes, which is the order the host sort
/// step groups rows for bulk loading.
///

#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TableRowKey {
    table: String,
    row_key: Vec<u8>,
}

impl TableRowKey {
    #[must_use]
    pub fn new(table: impl Into<String>, row_key: impl Into<Vec<u8>>) -> Self {
        Self {
            table: table.into(),
            row_key: row_key.into(),
        }
    }

    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    #[must_use]
    pub fn row_key(&self) -> &[u8] {
        &self.row_key
    }
}

impl fmt::Display for TableRowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.table, String::from_utf8_lossy(&self.row_key))
    }
}

///
/// OutputRecord
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OutputRecord {
    pub key: TableRowKey,
    pub blob: RowBlob,
}

impl OutputRecord {
    #[must_use]
    pub const fn new(key: TableRowKey, blob: RowBlob) -> Self {
        Self { key, blob }
    }
}

///
/// RowSink
///
/// Receives encoded rows in emission order. A sink error is fatal for the
/// processing unit.
///

pub trait RowSink {
    fn emit(&mut self, record: OutputRecord) -> Result<(), InternalError>;
}

impl RowSink for Vec<OutputRecord> {
    fn emit(&mut self, record: OutputRecord) -> Result<(), InternalError> {
        self.push(record);

        Ok(())
    }
}

impl<S> RowSink for &mut S
where
    S: RowSink + ?Sized,
{
    fn emit(&mut self, record: OutputRecord) -> Result<(), InternalError> {
        (**self).emit(record)
    }
}
