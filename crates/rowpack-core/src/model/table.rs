use crate::{catalog::ColumnQualifier, model::ColumnModel};
use serde::{Deserialize, Serialize};

/// Qualifier of the row-existence marker cell when a schema does not name one.
pub const DEFAULT_EMPTY_QUALIFIER: &[u8] = b"_0";

fn default_empty_qualifier() -> Vec<u8> {
    DEFAULT_EMPTY_QUALIFIER.to_vec()
}

///
/// TableSchema
///
/// Metadata the schema source resolves for one logical table.
/// `columns` order is authoritative: the column index catalog numbers
/// cell-backed columns in exactly this order.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TableSchema {
    pub name: String,
    #[serde(default)]
    pub columns: Vec<ColumnModel>,
    #[serde(with = "serde_bytes", default = "default_empty_qualifier")]
    pub empty_qualifier: Vec<u8>,
}

impl TableSchema {
    #[must_use]
    pub fn new(name: impl Into<String>, columns: Vec<ColumnModel>) -> Self {
        Self {
            name: name.into(),
            columns,
            empty_qualifier: default_empty_qualifier(),
        }
    }

    #[must_use]
    pub fn with_empty_qualifier(mut self, qualifier: impl Into<Vec<u8>>) -> Self {
        self.empty_qualifier = qualifier.into();
        self
    }

    /// Columns that are stored as cells, in declared order.
    pub fn cell_columns(&self) -> impl Iterator<Item = &ColumnModel> {
        self.columns.iter().filter(|column| !column.is_primary_key())
    }
}

///
/// TargetTableRef
///
/// One physical destination of the import, resolved at unit setup.
/// The physical name keys emitted rows; the logical name keys schema lookups.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TargetTableRef {
    physical_name: String,
    logical_name: String,
    empty_qualifier: ColumnQualifier,
}

impl TargetTableRef {
    #[must_use]
    pub fn new(
        physical_name: impl Into<String>,
        logical_name: impl Into<String>,
        empty_qualifier: impl Into<ColumnQualifier>,
    ) -> Self {
        Self {
            physical_name: physical_name.into(),
            logical_name: logical_name.into(),
            empty_qualifier: empty_qualifier.into(),
        }
    }

    #[must_use]
    pub fn physical_name(&self) -> &str {
        &self.physical_name
    }

    #[must_use]
    pub fn logical_name(&self) -> &str {
        &self.logical_name
    }

    #[must_use]
    pub const fn empty_qualifier(&self) -> &ColumnQualifier {
        &self.empty_qualifier
    }
}
