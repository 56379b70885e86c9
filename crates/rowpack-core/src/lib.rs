//! Core engine for rowpack: turns delimited input lines into compact,
//! column-indexed row blobs keyed by (physical table, row key), ready for a
//! host to sort and bulk-load.
//!
//! One `processor::RecordProcessor` is one processing unit. It parses a line,
//! asks a mutation planner what cells the line would write, groups those cells
//! per target row, replaces column names with dense catalog indexes and emits
//! one blob per row.
#![warn(unreachable_pub)]

pub mod aggregate;
pub mod catalog;
pub mod codec;
pub mod config;
pub mod error;
pub mod memory;
pub mod model;
pub mod mutation;
pub mod obs;
pub mod parse;
pub mod plan;
pub mod processor;
pub mod schema;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// Prelude
///
/// Vocabulary a host needs to configure and drive a processing unit.
///

pub mod prelude {
    pub use crate::{
        config::ImportConfig,
        mutation::{CellType, PendingMutation, PreUpsertTransform, TableMutations},
        obs::ImportCounters,
        parse::{DelimitedLineParser, LineParser},
        plan::{Connector, MutationPlanner, PlannerFactory, PlanningConnection, UpsertListener},
        processor::{OutputRecord, RecordProcessor, RowSink, TableRowKey},
        schema::SchemaSource,
    };
}
