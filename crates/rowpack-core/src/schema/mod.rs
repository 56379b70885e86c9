//! Schema source boundary.
//!
//! The processing unit never owns schema metadata; it asks a `SchemaSource`
//! for one logical table at a time during setup and keeps only what the
//! column index catalog derives from the answer.

use crate::model::TableSchema;
use thiserror::Error as ThisError;

///
/// SchemaError
///

#[derive(Debug, ThisError)]
pub enum SchemaError {
    #[error("table '{table}' not found in schema catalog")]
    TableNotFound { table: String },

    #[error("schema unavailable for table '{table}': {reason}")]
    Unavailable { table: String, reason: String },
}

///
/// SchemaSource
///
/// Resolves live table metadata by logical name.
///

pub trait SchemaSource {
    fn resolve_table(&self, logical_name: &str) -> Result<TableSchema, SchemaError>;
}

impl<S> SchemaSource for &S
where
    S: SchemaSource + ?Sized,
{
    fn resolve_table(&self, logical_name: &str) -> Result<TableSchema, SchemaError> {
        (**self).resolve_table(logical_name)
    }
}
