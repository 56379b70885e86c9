use serde::{Deserialize, Serialize};

///
/// ColumnModel
/// One schema column in declared order.
///
/// Columns without a family are primary-key components; they live in the
/// row key and never appear as cells.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnModel {
    pub name: String,
    #[serde(default)]
    pub family: Option<String>,
}

impl ColumnModel {
    /// Build a primary-key column (no family).
    #[must_use]
    pub fn key(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            family: None,
        }
    }

    /// Build a cell-backed column under `family`.
    #[must_use]
    pub fn cell(family: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            family: Some(family.into()),
        }
    }

    #[must_use]
    pub const fn is_primary_key(&self) -> bool {
        self.family.is_none()
    }

    /// Qualifier bytes used by cells of this column.
    #[must_use]
    pub fn qualifier_bytes(&self) -> &[u8] {
        self.name.as_bytes()
    }
}
