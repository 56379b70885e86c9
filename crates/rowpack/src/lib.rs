//! ## Crate layout
//! - `core`: catalog, aggregation, row codec, planning boundary and the
//!   record processor.
//! - `error`: stable public error type for import hosts.
//!
//! The `prelude` module carries what a host needs to configure a processing
//! unit, feed it lines and collect encoded rows.

pub use rowpack_core as core;

pub mod error;

pub use error::{Error, ErrorKind, ErrorOrigin};

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Import
///
/// Run every line through one processing unit and close it, converting a
/// fatal unit error into the public [`Error`].
///

pub fn import<'l, C, P, M, I, S>(
    processor: core::processor::RecordProcessor<C, P, M>,
    lines: I,
    sink: &mut S,
) -> Result<core::obs::ImportCounters, Error>
where
    C: core::plan::PlanningConnection,
    P: core::parse::LineParser,
    P::Record: std::fmt::Debug,
    M: core::plan::MutationPlanner<C, P::Record>,
    I: IntoIterator<Item = &'l str>,
    S: core::processor::RowSink + ?Sized,
{
    processor.run(lines, sink).map_err(Error::from)
}

///
/// Prelude
/// using _ brings traits into scope and avoids name conflicts
///

pub mod prelude {
    pub use crate::{
        Error,
        core::{
            config::ImportConfig,
            memory::{MemoryConnection, MemoryConnector, MemorySchemaSource, SchemaSnapshot},
            model::{ColumnModel, TableSchema},
            mutation::{CellType, PendingMutation, PreUpsertTransform as _},
            obs::ImportCounters,
            parse::{DelimitedLineParser, DelimitedRecord, LineParser as _},
            plan::{
                Connector as _, MutationPlanner, PlannerError, PlanningConnection as _,
                UpsertListener,
            },
            processor::{OutputRecord, RecordProcessor, RowSink as _, TableRowKey},
            schema::SchemaSource as _,
        },
    };
}
