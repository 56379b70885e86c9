//! Mutation planning boundary.
//!
//! Contract:
//! - A planning connection is opened once per processing unit with
//!   auto-commit disabled, and is used only to compute what *would* be
//!   written for one record.
//! - After the planner executes, the staged mutations are drained once via
//!   `pending_mutations`.
//! - `rollback` clears the connection's staged buffer. The processor calls it
//!   after every planned record; it is a buffer reset, not durability control,
//!   and nothing is ever committed through the connection.

mod connection;
mod listener;
mod planner;

pub use connection::{ConnectionError, Connector, PlanningConnection};
pub use listener::UpsertListener;
pub use planner::{MutationPlanner, PlannerError, PlannerFactory};
