//! In-process schema source and planning connection.
//!
//! Backs a processing unit with a schema snapshot held in memory and a
//! staging buffer that is never committed anywhere. Used by hosts that plan
//! mutations themselves and by tests.

use crate::{
    config::ImportConfig,
    model::TableSchema,
    mutation::{PendingMutation, TableMutations},
    plan::{ConnectionError, Connector, PlanningConnection},
    schema::{SchemaError, SchemaSource},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

///
/// SchemaSnapshot
/// Serialized form of a schema source: a list of table schemas.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaSnapshot {
    #[serde(default)]
    pub tables: Vec<TableSchema>,
}

impl SchemaSnapshot {
    pub fn from_toml_str(input: &str) -> Result<Self, SchemaError> {
        toml::from_str(input).map_err(|err| SchemaError::Unavailable {
            table: String::new(),
            reason: err.to_string(),
        })
    }
}

///
/// MemorySchemaSource
///

#[derive(Clone, Debug, Default)]
pub struct MemorySchemaSource {
    tables: BTreeMap<String, TableSchema>,
}

impl MemorySchemaSource {
    /// Later schemas replace earlier ones with the same name.
    #[must_use]
    pub fn new(tables: impl IntoIterator<Item = TableSchema>) -> Self {
        let mut source = Self::default();
        for table in tables {
            source.insert(table);
        }

        source
    }

    pub fn insert(&mut self, table: TableSchema) -> Option<TableSchema> {
        self.tables.insert(table.name.clone(), table)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl From<SchemaSnapshot> for MemorySchemaSource {
    fn from(snapshot: SchemaSnapshot) -> Self {
        Self::new(snapshot.tables)
    }
}

impl SchemaSource for MemorySchemaSource {
    fn resolve_table(&self, logical_name: &str) -> Result<TableSchema, SchemaError> {
        self.tables
            .get(logical_name)
            .cloned()
            .ok_or_else(|| SchemaError::TableNotFound {
                table: logical_name.to_string(),
            })
    }
}

///
/// MemoryConnection
///
/// Staging buffer for one processing unit. Planners push table batches with
/// `stage`; the processor drains and rolls them back after every record.
///

#[derive(Debug)]
pub struct MemoryConnection {
    schema: MemorySchemaSource,
    pending: Vec<TableMutations>,
    auto_commit: bool,
    rollbacks: u64,
}

impl MemoryConnection {
    #[must_use]
    pub const fn new(schema: MemorySchemaSource) -> Self {
        Self {
            schema,
            pending: Vec::new(),
            auto_commit: true,
            rollbacks: 0,
        }
    }

    /// Stage mutations against a physical table.
    ///
    /// Consecutive batches for the same table extend the same staged batch.
    /// Staging requires auto-commit to be off; an auto-committing connection
    /// would persist planner output instead of holding it.
    pub fn stage(
        &mut self,
        table: &str,
        mutations: impl IntoIterator<Item = PendingMutation>,
    ) -> Result<(), ConnectionError> {
        if self.auto_commit {
            return Err(ConnectionError::Backend(format!(
                "cannot stage mutations for '{table}' with auto-commit enabled"
            )));
        }

        match self.pending.last_mut() {
            Some(batch) if batch.table == table => batch.mutations.extend(mutations),
            _ => self
                .pending
                .push(TableMutations::new(table, mutations.into_iter().collect())),
        }

        Ok(())
    }

    #[must_use]
    pub const fn auto_commit(&self) -> bool {
        self.auto_commit
    }

    /// Number of rollbacks issued since the connection opened.
    #[must_use]
    pub const fn rollbacks(&self) -> u64 {
        self.rollbacks
    }

    /// Mutations currently staged and not yet drained.
    #[must_use]
    pub fn staged_len(&self) -> usize {
        self.pending.iter().map(|batch| batch.mutations.len()).sum()
    }
}

impl SchemaSource for MemoryConnection {
    fn resolve_table(&self, logical_name: &str) -> Result<TableSchema, SchemaError> {
        self.schema.resolve_table(logical_name)
    }
}

impl PlanningConnection for MemoryConnection {
    fn set_auto_commit(&mut self, enabled: bool) -> Result<(), ConnectionError> {
        self.auto_commit = enabled;

        Ok(())
    }

    fn pending_mutations(&mut self) -> impl Iterator<Item = TableMutations> + '_ {
        self.pending.drain(..)
    }

    fn rollback(&mut self) -> Result<(), ConnectionError> {
        self.pending.clear();
        self.rollbacks = self.rollbacks.saturating_add(1);

        Ok(())
    }

    fn close(self) -> Result<(), ConnectionError> {
        if !self.pending.is_empty() {
            tracing::debug!(
                batches = self.pending.len(),
                "closing planning connection with staged mutations"
            );
        }

        Ok(())
    }
}

///
/// MemoryConnector
/// Opens a fresh `MemoryConnection` over a shared schema snapshot.
///

#[derive(Clone, Debug, Default)]
pub struct MemoryConnector {
    schema: MemorySchemaSource,
}

impl MemoryConnector {
    #[must_use]
    pub const fn new(schema: MemorySchemaSource) -> Self {
        Self { schema }
    }
}

impl Connector for MemoryConnector {
    type Connection = MemoryConnection;

    fn connect(&self, config: &ImportConfig) -> Result<Self::Connection, ConnectionError> {
        tracing::debug!(
            tables = config.physical_tables.len(),
            "opening in-memory planning connection"
        );

        Ok(MemoryConnection::new(self.schema.clone()))
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ColumnModel;

    fn schema() -> MemorySchemaSource {
        MemorySchemaSource::new([TableSchema::new(
            "T",
            vec![ColumnModel::key("ID"), ColumnModel::cell("cf", "NAME")],
        )])
    }

    #[test]
    fn snapshot_parses_from_toml() {
        let snapshot = SchemaSnapshot::from_toml_str(
            r#"
            [[tables]]
            name = "T"
            columns = [
                { name = "ID" },
                { name = "NAME", family = "cf" },
            ]
            "#,
        )
        .expect("snapshot should parse");
        let source = MemorySchemaSource::from(snapshot);

        let table = source.resolve_table("T").expect("T should resolve");
        assert_eq!(table.cell_columns().count(), 1);
        assert_eq!(table.empty_qualifier, b"_0");
    }

    #[test]
    fn unknown_table_is_not_found() {
        let err = schema().resolve_table("NOPE").expect_err("NOPE is not declared");

        assert!(matches!(err, SchemaError::TableNotFound { table } if table == "NOPE"));
    }

    #[test]
    fn staging_requires_auto_commit_off() {
        let mut conn = MemoryConnection::new(schema());

        assert!(conn.auto_commit());
        assert!(
            conn.stage("T", [PendingMutation::put("1", "cf", "NAME", "a")])
                .is_err()
        );

        conn.set_auto_commit(false).expect("auto-commit toggles");
        conn.stage("T", [PendingMutation::put("1", "cf", "NAME", "a")])
            .expect("staging should succeed");
        assert_eq!(conn.staged_len(), 1);
    }

    #[test]
    fn drain_yields_batches_once_in_stage_order() {
        let mut conn = MemoryConnection::new(schema());
        conn.set_auto_commit(false).expect("auto-commit toggles");
        conn.stage("T", [PendingMutation::put("1", "cf", "NAME", "a")])
            .expect("stage");
        conn.stage("T_IDX", [PendingMutation::put("a\x001", "cf", "_0", "")])
            .expect("stage");
        conn.stage("T_IDX", [PendingMutation::put("b\x002", "cf", "_0", "")])
            .expect("stage");

        let tables = conn
            .pending_mutations()
            .map(|batch| (batch.table, batch.mutations.len()))
            .collect::<Vec<_>>();
        assert_eq!(tables, [("T".to_string(), 1), ("T_IDX".to_string(), 2)]);
        assert_eq!(conn.pending_mutations().count(), 0);
    }

    #[test]
    fn rollback_clears_staged_mutations() {
        let mut conn = MemoryConnection::new(schema());
        conn.set_auto_commit(false).expect("auto-commit toggles");
        conn.stage("T", [PendingMutation::put("1", "cf", "NAME", "a")])
            .expect("stage");

        conn.rollback().expect("rollback");

        assert_eq!(conn.staged_len(), 0);
        assert_eq!(conn.rollbacks(), 1);
    }
}
