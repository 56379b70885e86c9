//! Row aggregation.
//!
//! Groups one record's staged mutations by target table and row key so each
//! target row can be encoded into a single blob. Grouping preserves planner
//! emission order inside every group and performs no deduplication.

use crate::{
    model::TargetTableRef,
    mutation::{PendingMutation, TableMutations},
};
use std::collections::BTreeMap;

///
/// RowGroup
///
/// All mutations for one (table, row key), in emission order.
/// Every mutation shares the group's row key by construction.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RowGroup {
    row_key: Vec<u8>,
    mutations: Vec<PendingMutation>,
}

impl RowGroup {
    fn new(first: PendingMutation) -> Self {
        Self {
            row_key: first.row_key.clone(),
            mutations: vec![first],
        }
    }

    #[must_use]
    pub fn row_key(&self) -> &[u8] {
        &self.row_key
    }

    #[must_use]
    pub fn into_row_key(self) -> Vec<u8> {
        self.row_key
    }

    #[must_use]
    pub fn mutations(&self) -> &[PendingMutation] {
        &self.mutations
    }

    /// Cells that carry a real value, skipping the row-existence marker.
    pub fn real_cells<'a>(
        &'a self,
        empty_qualifier: &'a [u8],
    ) -> impl Iterator<Item = &'a PendingMutation> + 'a {
        self.mutations
            .iter()
            .filter(move |mutation| mutation.qualifier.as_slice() != empty_qualifier)
    }
}

///
/// AggregatedRows
///
/// Row groups of one input record, keyed by target table index.
/// Iteration yields tables in declaration order and, within a table, rows in
/// the order their first mutation was staged.
///

#[derive(Debug, Default)]
pub struct AggregatedRows {
    tables: BTreeMap<usize, Vec<RowGroup>>,
    dropped: u64,
}

impl AggregatedRows {
    /// Row groups for one target table.
    #[must_use]
    pub fn table(&self, table_index: usize) -> &[RowGroup] {
        self.tables
            .get(&table_index)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Number of mutations discarded because their table was not a target.
    #[must_use]
    pub const fn dropped(&self) -> u64 {
        self.dropped
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.tables.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

impl IntoIterator for AggregatedRows {
    type Item = (usize, RowGroup);
    type IntoIter = Box<dyn Iterator<Item = (usize, RowGroup)>>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(
            self.tables
                .into_iter()
                .flat_map(|(table_index, rows)| rows.into_iter().map(move |row| (table_index, row))),
        )
    }
}

///
/// RowAggregator
///

#[derive(Clone, Copy, Debug)]
pub struct RowAggregator<'a> {
    tables: &'a [TargetTableRef],
}

impl<'a> RowAggregator<'a> {
    #[must_use]
    pub const fn new(tables: &'a [TargetTableRef]) -> Self {
        Self { tables }
    }

    /// Position of `physical_name` in the target list.
    ///
    /// Linear: a unit targets a base table plus its indexes, never many.
    #[must_use]
    pub fn table_index(&self, physical_name: &str) -> Option<usize> {
        self.tables
            .iter()
            .position(|table| table.physical_name() == physical_name)
    }

    /// Group staged batches by target table and row key.
    ///
    /// Batches for a table that is not a configured target are dropped and
    /// reported; the planner should never produce them, so each drop points at
    /// schema or configuration skew.
    pub fn group<I>(&self, batches: I) -> AggregatedRows
    where
        I: IntoIterator<Item = TableMutations>,
    {
        let mut rows = AggregatedRows::default();

        for batch in batches {
            let Some(table_index) = self.table_index(&batch.table) else {
                tracing::warn!(
                    table = %batch.table,
                    mutations = batch.mutations.len(),
                    "dropping staged mutations for a table that is not an import target"
                );
                rows.dropped = rows
                    .dropped
                    .saturating_add(batch.mutations.len() as u64);
                continue;
            };

            let groups = rows.tables.entry(table_index).or_default();
            for mutation in batch.mutations {
                match groups
                    .iter()
                    .position(|group| group.row_key == mutation.row_key)
                {
                    Some(slot) => groups[slot].mutations.push(mutation),
                    None => groups.push(RowGroup::new(mutation)),
                }
            }
        }

        rows
    }
}

///
/// TESTS
///
