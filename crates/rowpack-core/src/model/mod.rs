//! Runtime schema model.
//!
//! These types describe what the schema source hands back for one table and
//! what the processing unit resolves its configured targets into. They carry
//! names and reserved qualifiers only; the dense column numbering derived from
//! them lives in `catalog`.

pub mod column;
pub mod table;

pub use column::ColumnModel;
pub use table::{DEFAULT_EMPTY_QUALIFIER, TableSchema, TargetTableRef};
