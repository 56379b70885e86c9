//! Pending cell mutations produced by a mutation planner.
//!
//! A mutation lives for exactly one input record: the planner stages it, the
//! aggregator groups it, the encoder consumes it, and it is dropped.

mod cell;
mod transform;

pub use cell::CellType;
pub use transform::{IdentityTransform, PreUpsertTransform};

///
/// PendingMutation
///
/// One planned cell write or delete.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PendingMutation {
    pub row_key: Vec<u8>,
    pub family: Vec<u8>,
    pub qualifier: Vec<u8>,
    pub cell_type: CellType,
    pub value: Vec<u8>,
}

impl PendingMutation {
    #[must_use]
    pub fn put(
        row_key: impl Into<Vec<u8>>,
        family: impl Into<Vec<u8>>,
        qualifier: impl Into<Vec<u8>>,
        value: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            row_key: row_key.into(),
            family: family.into(),
            qualifier: qualifier.into(),
            cell_type: CellType::Put,
            value: value.into(),
        }
    }

    #[must_use]
    pub fn delete(
        row_key: impl Into<Vec<u8>>,
        family: impl Into<Vec<u8>>,
        qualifier: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            row_key: row_key.into(),
            family: family.into(),
            qualifier: qualifier.into(),
            cell_type: CellType::Delete,
            value: Vec::new(),
        }
    }
}

///
/// TableMutations
///
/// Mutations staged against one physical table, in planner emission order.
/// `table` is the physical table name the planner wrote to.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TableMutations {
    pub table: String,
    pub mutations: Vec<PendingMutation>,
}

impl TableMutations {
    #[must_use]
    pub fn new(table: impl Into<String>, mutations: Vec<PendingMutation>) -> Self {
        Self {
            table: table.into(),
            mutations,
        }
    }

    /// Run the pre-upsert hook over this batch.
    #[must_use]
    pub fn transformed<T>(self, transform: &T) -> Self
    where
        T: PreUpsertTransform + ?Sized,
    {
        let mutations = transform.transform(&self.table, self.mutations);

        Self {
            table: self.table,
            mutations,
        }
    }
}
