use crate::{config::ImportConfig, mutation::TableMutations, schema::SchemaSource};
use thiserror::Error as ThisError;

///
/// ConnectionError
///

#[derive(Debug, ThisError)]
pub enum ConnectionError {
    #[error("planning connection could not be opened: {0}")]
    Open(String),

    #[error("planning connection rejected auto-commit change: {0}")]
    AutoCommit(String),

    #[error("planning connection rollback failed: {0}")]
    Rollback(String),

    #[error("planning connection close failed: {0}")]
    Close(String),

    #[error("planning connection error: {0}")]
    Backend(String),
}

///
/// PlanningConnection
///
/// Schema-aware connection a mutation planner stages mutations into.
/// Exclusively owned by one processing unit and never shared.
///

pub trait PlanningConnection: SchemaSource {
    fn set_auto_commit(&mut self, enabled: bool) -> Result<(), ConnectionError>;

    /// Drain staged mutations as one ordered, single-pass sequence.
    fn pending_mutations(&mut self) -> impl Iterator<Item = TableMutations> + '_;

    /// Discard everything staged since the previous rollback.
    fn rollback(&mut self) -> Result<(), ConnectionError>;

    /// Release the connection.
    fn close(self) -> Result<(), ConnectionError>
    where
        Self: Sized;
}

///
/// Connector
/// Opens one planning connection per processing unit.
///

pub trait Connector {
    type Connection: PlanningConnection;

    fn connect(&self, config: &ImportConfig) -> Result<Self::Connection, ConnectionError>;
}
