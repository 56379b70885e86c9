//! Record processor.
//!
//! Contract:
//! - One `RecordProcessor` is one processing unit: it owns its planning
//!   connection, parser and planner exclusively and is driven one input line
//!   at a time.
//! - Per-record conditions (unparseable line, empty line, tolerated planner
//!   error) are counted and never surface as errors.
//! - Every `InternalError` returned from `process_line` is fatal. The unit is
//!   marked aborted and rejects further lines.
//! - The planning connection is rolled back after every planned record,
//!   successful or not, so staged mutations never leak into the next record.

mod listener;
mod output;

use crate::{
    aggregate::RowAggregator,
    catalog::{ColumnIndexCatalog, TableColumnIndex},
    codec::encode_row,
    config::ImportConfig,
    error::InternalError,
    model::TargetTableRef,
    mutation::{IdentityTransform, PreUpsertTransform},
    obs::{COUNTER_GROUP_NAME, ImportCounter, ImportCounters},
    parse::LineParser,
    plan::{Connector, MutationPlanner, PlannerFactory, PlanningConnection},
    schema::SchemaSource,
};
use listener::UnitUpsertListener;
use std::{fmt, slice};

pub use output::{OutputRecord, RowSink, TableRowKey};

///
/// ProcessorPhase
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[remain::sorted]
pub enum ProcessorPhase {
    Aborted,
    Processing,
    Ready,
}

///
/// RecordProcessor
///

pub struct RecordProcessor<C, P, M>
where
    C: PlanningConnection,
    P: LineParser,
    M: MutationPlanner<C, P::Record>,
{
    conn: C,
    parser: P,
    planner: M,
    transform: Box<dyn PreUpsertTransform>,
    tables: Vec<TargetTableRef>,
    catalog: ColumnIndexCatalog,
    ignore_record_errors: bool,
    counters: ImportCounters,
    phase: ProcessorPhase,
    span: tracing::Span,
}

impl<C, P, M> RecordProcessor<C, P, M>
where
    C: PlanningConnection,
    P: LineParser,
    P::Record: fmt::Debug,
    M: MutationPlanner<C, P::Record>,
{
    ///
    /// setup
    ///
    /// Open the unit's planning connection and derive everything a record
    /// needs: target tables with their empty-marker qualifiers, the column
    /// index catalog and the planner. Any failure here is fatal.
    ///
    pub fn setup<K, F>(
        config: &ImportConfig,
        connector: &K,
        parser: P,
        planner_factory: &F,
    ) -> Result<Self, InternalError>
    where
        K: Connector<Connection = C>,
        F: PlannerFactory<C, P::Record, Planner = M>,
    {
        let span = tracing::debug_span!(
            "import_unit",
            tables = config.physical_tables.len()
        );
        let guard = span.enter();

        // Phase 1: reject bad table lists before touching the backend.
        config.validate()?;

        // Phase 2: open the connection; nothing planned may ever commit.
        let mut conn = connector.connect(config)?;
        if let Err(err) = conn.set_auto_commit(false) {
            release_after_failed_setup(conn);
            return Err(err.into());
        }

        // Phase 3: resolve targets, catalog and planner against the live schema.
        let prepared = prepare_targets(config, &conn).and_then(|(tables, catalog)| {
            let planner = planner_factory.build(config, &conn)?;
            Ok((tables, catalog, planner))
        });
        let (tables, catalog, planner) = match prepared {
            Ok(parts) => parts,
            Err(err) => {
                release_after_failed_setup(conn);
                return Err(err);
            }
        };

        tracing::debug!(
            tables = tables.len(),
            columns = (0..catalog.len())
                .filter_map(|index| catalog.table(index))
                .map(TableColumnIndex::len)
                .sum::<usize>(),
            ignore_record_errors = config.ignore_invalid_rows,
            "processing unit ready"
        );
        drop(guard);

        Ok(Self {
            conn,
            parser,
            planner,
            transform: Box::new(IdentityTransform),
            tables,
            catalog,
            ignore_record_errors: config.ignore_invalid_rows,
            counters: ImportCounters::default(),
            phase: ProcessorPhase::Ready,
            span,
        })
    }

    /// Replace the pre-upsert hook applied to every staged table batch.
    #[must_use]
    pub fn with_transform<T>(mut self, transform: T) -> Self
    where
        T: PreUpsertTransform + 'static,
    {
        self.transform = Box::new(transform);
        self
    }

    ///
    /// process_line
    ///
    /// Parse, plan, aggregate, encode and emit one input line.
    ///
    pub fn process_line<S>(&mut self, line: &str, sink: &mut S) -> Result<(), InternalError>
    where
        S: RowSink + ?Sized,
    {
        if self.phase == ProcessorPhase::Aborted {
            return Err(InternalError::processor_invariant(
                "processing unit was aborted by an earlier fatal error",
            ));
        }

        let span = self.span.clone();
        let _guard = span.enter();

        match self.handle_line(line, sink) {
            Ok(()) => {
                self.phase = ProcessorPhase::Processing;
                Ok(())
            }
            Err(err) => {
                self.phase = ProcessorPhase::Aborted;
                tracing::error!(error = %err.display_with_class(), "processing unit aborted");
                Err(err)
            }
        }
    }

    /// Feed every line through `process_line`, then close the unit.
    ///
    /// A fatal line error still closes the connection; the line error is
    /// returned and a close failure behind it is only logged.
    pub fn run<'l, I, S>(mut self, lines: I, sink: &mut S) -> Result<ImportCounters, InternalError>
    where
        I: IntoIterator<Item = &'l str>,
        S: RowSink + ?Sized,
    {
        for line in lines {
            if let Err(err) = self.process_line(line, sink) {
                if let Err(close_err) = self.close() {
                    tracing::warn!(
                        error = %close_err.display_with_class(),
                        "planning connection close failed after fatal error"
                    );
                }
                return Err(err);
            }
        }

        self.close()
    }

    ///
    /// close
    ///
    /// Release the planning connection and hand back the unit report.
    ///
    pub fn close(self) -> Result<ImportCounters, InternalError> {
        let Self {
            conn,
            counters,
            span,
            ..
        } = self;
        let _guard = span.enter();

        conn.close()?;
        tracing::debug!(
            group = COUNTER_GROUP_NAME,
            parser_errors = counters.parser_errors,
            empty_records = counters.empty_records,
            upserts_done = counters.upserts_done,
            record_errors = counters.record_errors,
            rows_emitted = counters.rows_emitted,
            dropped_mutations = counters.dropped_mutations,
            "processing unit closed"
        );

        Ok(counters)
    }

    #[must_use]
    pub const fn counters(&self) -> &ImportCounters {
        &self.counters
    }

    #[must_use]
    pub const fn phase(&self) -> ProcessorPhase {
        self.phase
    }

    #[must_use]
    pub fn tables(&self) -> &[TargetTableRef] {
        &self.tables
    }

    #[must_use]
    pub const fn catalog(&self) -> &ColumnIndexCatalog {
        &self.catalog
    }

    #[must_use]
    pub const fn connection(&self) -> &C {
        &self.conn
    }

    fn handle_line<S>(&mut self, line: &str, sink: &mut S) -> Result<(), InternalError>
    where
        S: RowSink + ?Sized,
    {
        let record = match self.parser.parse(line) {
            Ok(Some(record)) => record,
            Ok(None) => {
                self.counters.bump(ImportCounter::EmptyRecords);
                return Ok(());
            }
            Err(err) => {
                tracing::debug!(error = %err, "skipping unparseable line");
                self.counters.bump(ImportCounter::ParserErrors);
                return Ok(());
            }
        };

        let emitted = self.emit_record(&record, sink);
        let reset = self.conn.rollback();
        emitted?;
        reset?;

        Ok(())
    }

    fn emit_record<S>(&mut self, record: &P::Record, sink: &mut S) -> Result<(), InternalError>
    where
        S: RowSink + ?Sized,
    {
        let mut listener = UnitUpsertListener::new(&mut self.counters, self.ignore_record_errors);
        self.planner
            .execute(&mut self.conn, slice::from_ref(record), &mut listener)?;

        let transform = &*self.transform;
        let rows = RowAggregator::new(&self.tables).group(
            self.conn
                .pending_mutations()
                .map(|batch| batch.transformed(transform)),
        );
        self.counters
            .add(ImportCounter::DroppedMutations, rows.dropped());

        for (table_index, group) in rows {
            let blob = encode_row(&group, &self.catalog, table_index)?;
            let table = self.tables.get(table_index).ok_or_else(|| {
                InternalError::processor_invariant(format!(
                    "row grouped under unknown target table #{table_index}"
                ))
            })?;
            let key = TableRowKey::new(table.physical_name(), group.into_row_key());

            tracing::trace!(row = %key, bytes = blob.len(), "emitting row");
            sink.emit(OutputRecord::new(key, blob))?;
            self.counters.bump(ImportCounter::RowsEmitted);
        }

        Ok(())
    }
}

// Resolve each (physical, logical) pair once; the same schema answer feeds
// both the target's empty-marker qualifier and the catalog.
fn prepare_targets<S>(
    config: &ImportConfig,
    schema: &S,
) -> Result<(Vec<TargetTableRef>, ColumnIndexCatalog), InternalError>
where
    S: SchemaSource + ?Sized,
{
    let mut tables = Vec::with_capacity(config.physical_tables.len());
    let mut schemas = Vec::with_capacity(config.physical_tables.len());

    for (physical, logical) in config.table_pairs() {
        let table = schema.resolve_table(logical)?;
        tables.push(TargetTableRef::new(
            physical,
            logical,
            table.empty_qualifier.clone(),
        ));
        schemas.push(table);
    }
    let catalog = ColumnIndexCatalog::from_targets(&tables, &schemas)?;

    Ok((tables, catalog))
}

fn release_after_failed_setup<C>(conn: C)
where
    C: PlanningConnection,
{
    if let Err(err) = conn.close() {
        tracing::warn!(error = %err, "planning connection close failed after setup error");
    }
}
