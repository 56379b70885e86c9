use crate::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

///
/// ColumnInfo
///
/// One input field mapped to a target column, rendered as `TYPE:name`.
/// The type name is opaque here; the mutation planner interprets it.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnInfo {
    pub column_name: String,
    pub type_name: String,
}

impl ColumnInfo {
    #[must_use]
    pub fn new(column_name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            column_name: column_name.into(),
            type_name: type_name.into(),
        }
    }
}

impl fmt::Display for ColumnInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.type_name, self.column_name)
    }
}

impl FromStr for ColumnInfo {
    type Err = ConfigError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.split_once(':') {
            Some((type_name, column_name)) if !type_name.is_empty() && !column_name.is_empty() => {
                Ok(Self::new(column_name, type_name))
            }
            _ => Err(ConfigError::InvalidColumnInfo {
                input: input.to_string(),
            }),
        }
    }
}

// TOML has no null, so column slots travel as strings and "" marks a
// skipped input field.
pub(super) mod slots {
    use super::ColumnInfo;
    use serde::{Deserialize, Deserializer, Serializer, de::Error as _, ser::SerializeSeq};

    pub(crate) fn serialize<S>(columns: &[Option<ColumnInfo>], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(columns.len()))?;
        for column in columns {
            match column {
                Some(column) => seq.serialize_element(&column.to_string())?,
                None => seq.serialize_element("")?,
            }
        }
        seq.end()
    }

    pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Vec<Option<ColumnInfo>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Vec::<String>::deserialize(deserializer)?
            .iter()
            .map(|entry| {
                if entry.is_empty() {
                    Ok(None)
                } else {
                    entry.parse().map(Some).map_err(D::Error::custom)
                }
            })
            .collect()
    }
}
