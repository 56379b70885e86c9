//! Column index catalog.
//!
//! Every cell-backed column of every target table gets a dense integer that
//! replaces its (family, qualifier) names inside encoded row blobs. The
//! numbering is derived from schema-declared column order alone, so two
//! builds over the same schema snapshot always agree.
//!
//! The catalog is built once at unit setup and is read-only afterwards.

mod key;

use crate::{
    error::{ErrorClass, ErrorOrigin, InternalError},
    model::{TableSchema, TargetTableRef},
    schema::SchemaSource,
};
use std::collections::BTreeMap;

pub use key::{ColumnFamily, ColumnQualifier};

///
/// TableColumnIndex
///
/// Column numbering for one target table.
/// `columns` resolves names to indexes; `by_index` is its exact inverse.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TableColumnIndex {
    columns: BTreeMap<ColumnFamily, BTreeMap<ColumnQualifier, u32>>,
    by_index: Vec<(ColumnFamily, ColumnQualifier)>,
    empty_qualifier: ColumnQualifier,
}

impl TableColumnIndex {
    /// Number the cell-backed columns of `schema` in declared order.
    ///
    /// Primary-key columns are skipped. A repeated (family, qualifier) pair
    /// keeps the index it was first given.
    pub fn from_schema(schema: &TableSchema) -> Result<Self, InternalError> {
        let mut columns: BTreeMap<ColumnFamily, BTreeMap<ColumnQualifier, u32>> = BTreeMap::new();
        let mut by_index = Vec::new();

        for column in &schema.columns {
            let Some(family) = column.family.as_deref() else {
                continue;
            };
            let family = ColumnFamily::from(family);
            let qualifier = ColumnQualifier::from(column.qualifier_bytes());

            let qualifiers = columns.entry(family.clone()).or_default();
            if qualifiers.contains_key(&qualifier) {
                continue;
            }

            let index = u32::try_from(by_index.len()).map_err(|_| {
                InternalError::catalog_unsupported(format!(
                    "table '{}' has more cell columns than a column index can address",
                    schema.name
                ))
            })?;
            qualifiers.insert(qualifier.clone(), index);
            by_index.push((family, qualifier));
        }

        Ok(Self {
            columns,
            by_index,
            empty_qualifier: ColumnQualifier::from(schema.empty_qualifier.as_slice()),
        })
    }

    fn with_empty_qualifier(mut self, qualifier: ColumnQualifier) -> Self {
        self.empty_qualifier = qualifier;
        self
    }

    /// Resolve a (family, qualifier) pair to its dense index.
    #[must_use]
    pub fn lookup(&self, family: &[u8], qualifier: &[u8]) -> Option<u32> {
        self.columns
            .get(family)
            .and_then(|qualifiers| qualifiers.get(qualifier))
            .copied()
    }

    /// Resolve a dense index back to its (family, qualifier) pair.
    #[must_use]
    pub fn resolve(&self, index: u32) -> Option<(&ColumnFamily, &ColumnQualifier)> {
        let slot = usize::try_from(index).ok()?;
        self.by_index
            .get(slot)
            .map(|(family, qualifier)| (family, qualifier))
    }

    /// Qualifier of the table's row-existence marker cell.
    #[must_use]
    pub const fn empty_qualifier(&self) -> &ColumnQualifier {
        &self.empty_qualifier
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.by_index.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.by_index.is_empty()
    }
}

///
/// ColumnIndexCatalog
///
/// Per-table column numbering, positionally aligned with the unit's
/// target table list.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ColumnIndexCatalog {
    tables: Vec<TableColumnIndex>,
}

impl ColumnIndexCatalog {
    /// Build the catalog by resolving every target's logical table.
    ///
    /// Any resolution failure is returned as-is; without a complete catalog
    /// no row of the unit can be encoded.
    pub fn build<S>(tables: &[TargetTableRef], schema: &S) -> Result<Self, InternalError>
    where
        S: SchemaSource + ?Sized,
    {
        let schemas = tables
            .iter()
            .map(|table| schema.resolve_table(table.logical_name()))
            .collect::<Result<Vec<_>, _>>()?;

        Self::from_targets(tables, &schemas)
    }

    /// Build the catalog from schemas already resolved for `tables`.
    ///
    /// Each entry takes its empty-marker qualifier from the target, so the
    /// encoder skips exactly the marker the unit was set up with.
    pub fn from_targets(
        tables: &[TargetTableRef],
        schemas: &[TableSchema],
    ) -> Result<Self, InternalError> {
        if tables.len() != schemas.len() {
            return Err(InternalError::new(
                ErrorClass::InvariantViolation,
                ErrorOrigin::Catalog,
                format!(
                    "{} target tables but {} resolved schemas",
                    tables.len(),
                    schemas.len()
                ),
            ));
        }

        let tables = tables
            .iter()
            .zip(schemas)
            .map(|(target, schema)| {
                TableColumnIndex::from_schema(schema)
                    .map(|index| index.with_empty_qualifier(target.empty_qualifier().clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { tables })
    }

    /// Build the catalog from already-resolved schemas, in target order.
    pub fn from_schemas(schemas: &[TableSchema]) -> Result<Self, InternalError> {
        let tables = schemas
            .iter()
            .map(TableColumnIndex::from_schema)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { tables })
    }

    #[must_use]
    pub fn table(&self, table_index: usize) -> Option<&TableColumnIndex> {
        self.tables.get(table_index)
    }

    /// Column index for a cell of table `table_index`, if the table knows it.
    #[must_use]
    pub fn lookup(&self, table_index: usize, family: &[u8], qualifier: &[u8]) -> Option<u32> {
        self.table(table_index)
            .and_then(|table| table.lookup(family, qualifier))
    }

    /// Inverse of [`Self::lookup`].
    #[must_use]
    pub fn resolve(
        &self,
        table_index: usize,
        column_index: u32,
    ) -> Option<(&ColumnFamily, &ColumnQualifier)> {
        self.table(table_index)
            .and_then(|table| table.resolve(column_index))
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.tables.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
