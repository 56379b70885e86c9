//! Shared fixtures for unit tests: a two-table schema, a planner that stages
//! cells the way a relational upsert would, and connections that misbehave.

use crate::{
    config::ImportConfig,
    memory::{MemoryConnection, MemoryConnector, MemorySchemaSource},
    model::{ColumnModel, TableSchema},
    mutation::{PendingMutation, TableMutations},
    parse::DelimitedRecord,
    plan::{
        ConnectionError, Connector, MutationPlanner, PlannerError, PlanningConnection,
        UpsertListener,
    },
    schema::{SchemaError, SchemaSource},
};
use std::{cell::Cell, rc::Rc};

pub(crate) const PEOPLE: &str = "PEOPLE";
pub(crate) const PEOPLE_BY_NAME: &str = "PEOPLE_BY_NAME";

/// `PEOPLE(ID pk, cf.NAME, cf.AGE)` plus a key-only index `PEOPLE_BY_NAME`.
pub(crate) fn people_schema() -> MemorySchemaSource {
    MemorySchemaSource::new([
        TableSchema::new(
            PEOPLE,
            vec![
                ColumnModel::key("ID"),
                ColumnModel::cell("cf", "NAME"),
                ColumnModel::cell("cf", "AGE"),
            ],
        ),
        TableSchema::new(
            PEOPLE_BY_NAME,
            vec![ColumnModel::key("NAME"), ColumnModel::key("ID")],
        ),
    ])
}

pub(crate) fn people_connector() -> MemoryConnector {
    MemoryConnector::new(people_schema())
}

///
/// FixturePlanner
///
/// Plans `id,name,age` records. Stages the row-existence marker, `NAME` and
/// `AGE` against `PEOPLE`, optionally an index row, then any `extra` batches.
/// Records with the wrong field count or a non-numeric age go to the listener.
///

#[derive(Clone, Debug, Default)]
pub(crate) struct FixturePlanner {
    pub index: bool,
    pub extra: Vec<TableMutations>,
}

impl FixturePlanner {
    pub(crate) fn indexed() -> Self {
        Self {
            index: true,
            ..Self::default()
        }
    }

    pub(crate) fn with_extra(mut self, table: &str, mutations: Vec<PendingMutation>) -> Self {
        self.extra.push(TableMutations::new(table, mutations));
        self
    }

    fn plan_one(
        &self,
        conn: &mut MemoryConnection,
        record: &DelimitedRecord,
    ) -> Result<(), PlannerError> {
        let [id, name, age] = record.as_slice() else {
            return Err(PlannerError::Record(format!(
                "expected 3 fields, found {}",
                record.len()
            )));
        };
        age.parse::<u32>()
            .map_err(|err| PlannerError::Record(format!("AGE '{age}': {err}")))?;

        conn.stage(
            PEOPLE,
            [
                PendingMutation::put(id.as_str(), "cf", "_0", ""),
                PendingMutation::put(id.as_str(), "cf", "NAME", name.as_str()),
                PendingMutation::put(id.as_str(), "cf", "AGE", age.as_str()),
            ],
        )?;
        if self.index {
            let mut key = name.as_bytes().to_vec();
            key.push(0);
            key.extend_from_slice(id.as_bytes());
            conn.stage(
                PEOPLE_BY_NAME,
                [PendingMutation::put(key, "cf", "_0", "")],
            )?;
        }
        for batch in &self.extra {
            conn.stage(&batch.table, batch.mutations.iter().cloned())?;
        }

        Ok(())
    }
}

impl MutationPlanner<MemoryConnection, DelimitedRecord> for FixturePlanner {
    fn execute(
        &mut self,
        conn: &mut MemoryConnection,
        records: &[DelimitedRecord],
        listener: &mut dyn UpsertListener<DelimitedRecord>,
    ) -> Result<(), PlannerError> {
        for record in records {
            match self.plan_one(conn, record) {
                Ok(()) => listener.upsert_done(1),
                Err(err @ PlannerError::Record(_)) => listener.error_on_record(record, err)?,
                Err(err) => return Err(err),
            }
        }

        Ok(())
    }
}

pub(crate) fn planner_factory(
    planner: FixturePlanner,
) -> impl Fn(&ImportConfig, &MemoryConnection) -> Result<FixturePlanner, PlannerError> {
    move |_, _| Ok(planner.clone())
}

///
/// NoopPlanner
/// Reports every record as upserted without staging anything.
///

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct NoopPlanner;

impl<C, R> MutationPlanner<C, R> for NoopPlanner
where
    C: PlanningConnection,
{
    fn execute(
        &mut self,
        _conn: &mut C,
        records: &[R],
        listener: &mut dyn UpsertListener<R>,
    ) -> Result<(), PlannerError> {
        for _ in records {
            listener.upsert_done(1);
        }

        Ok(())
    }
}

///
/// FatalPlanner
/// Fails every `execute` call the way a misconfigured planner would.
///

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct FatalPlanner;

impl<C, R> MutationPlanner<C, R> for FatalPlanner
where
    C: PlanningConnection,
{
    fn execute(
        &mut self,
        _conn: &mut C,
        _records: &[R],
        _listener: &mut dyn UpsertListener<R>,
    ) -> Result<(), PlannerError> {
        Err(PlannerError::Config("lookup table is offline".to_string()))
    }
}

///
/// FailingCloseConnection
/// Memory connection whose `close` always fails.
///

#[derive(Debug)]
pub(crate) struct FailingCloseConnection(pub MemoryConnection);

impl SchemaSource for FailingCloseConnection {
    fn resolve_table(&self, logical_name: &str) -> Result<TableSchema, SchemaError> {
        self.0.resolve_table(logical_name)
    }
}

impl PlanningConnection for FailingCloseConnection {
    fn set_auto_commit(&mut self, enabled: bool) -> Result<(), ConnectionError> {
        self.0.set_auto_commit(enabled)
    }

    fn pending_mutations(&mut self) -> impl Iterator<Item = TableMutations> + '_ {
        self.0.pending_mutations()
    }

    fn rollback(&mut self) -> Result<(), ConnectionError> {
        self.0.rollback()
    }

    fn close(self) -> Result<(), ConnectionError> {
        Err(ConnectionError::Close("backend went away".to_string()))
    }
}

#[derive(Debug, Default)]
pub(crate) struct FailingCloseConnector;

impl Connector for FailingCloseConnector {
    type Connection = FailingCloseConnection;

    fn connect(&self, config: &ImportConfig) -> Result<Self::Connection, ConnectionError> {
        people_connector().connect(config).map(FailingCloseConnection)
    }
}

///
/// RecordingCloseConnection
/// Memory connection that flags a shared cell once it is closed.
///

#[derive(Debug)]
pub(crate) struct RecordingCloseConnection {
    inner: MemoryConnection,
    closed: Rc<Cell<bool>>,
}

impl SchemaSource for RecordingCloseConnection {
    fn resolve_table(&self, logical_name: &str) -> Result<TableSchema, SchemaError> {
        self.inner.resolve_table(logical_name)
    }
}

impl PlanningConnection for RecordingCloseConnection {
    fn set_auto_commit(&mut self, enabled: bool) -> Result<(), ConnectionError> {
        self.inner.set_auto_commit(enabled)
    }

    fn pending_mutations(&mut self) -> impl Iterator<Item = TableMutations> + '_ {
        self.inner.pending_mutations()
    }

    fn rollback(&mut self) -> Result<(), ConnectionError> {
        self.inner.rollback()
    }

    fn close(self) -> Result<(), ConnectionError> {
        self.closed.set(true);
        self.inner.close()
    }
}

#[derive(Debug, Default)]
pub(crate) struct RecordingCloseConnector {
    pub closed: Rc<Cell<bool>>,
}

impl Connector for RecordingCloseConnector {
    type Connection = RecordingCloseConnection;

    fn connect(&self, config: &ImportConfig) -> Result<Self::Connection, ConnectionError> {
        people_connector()
            .connect(config)
            .map(|inner| RecordingCloseConnection {
                inner,
                closed: Rc::clone(&self.closed),
            })
    }
}
