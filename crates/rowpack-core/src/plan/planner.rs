use crate::{
    config::ImportConfig,
    plan::{ConnectionError, PlanningConnection, UpsertListener},
};
use thiserror::Error as ThisError;

///
/// PlannerError
///

#[derive(Debug, ThisError)]
pub enum PlannerError {
    #[error("record rejected: {0}")]
    Record(String),

    #[error("planner misconfigured: {0}")]
    Config(String),

    #[error(transparent)]
    Connection(#[from] ConnectionError),
}

///
/// MutationPlanner
///
/// Turns typed records into staged cell mutations on a planning connection.
/// Per-record failures go to the listener; an `Err` from `execute` is fatal.
///

pub trait MutationPlanner<C, R>
where
    C: PlanningConnection,
{
    fn execute(
        &mut self,
        conn: &mut C,
        records: &[R],
        listener: &mut dyn UpsertListener<R>,
    ) -> Result<(), PlannerError>;
}

///
/// PlannerFactory
/// Builds the unit's planner once the connection and targets are ready.
///

pub trait PlannerFactory<C, R>
where
    C: PlanningConnection,
{
    type Planner: MutationPlanner<C, R>;

    fn build(&self, config: &ImportConfig, conn: &C) -> Result<Self::Planner, PlannerError>;
}

impl<C, R, P, F> PlannerFactory<C, R> for F
where
    C: PlanningConnection,
    P: MutationPlanner<C, R>,
    F: Fn(&ImportConfig, &C) -> Result<P, PlannerError>,
{
    type Planner = P;

    fn build(&self, config: &ImportConfig, conn: &C) -> Result<Self::Planner, PlannerError> {
        self(config, conn)
    }
}
