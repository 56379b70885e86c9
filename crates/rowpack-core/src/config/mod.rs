//! Import configuration.
//!
//! A processing unit is configured either from a TOML document or from the
//! flat string properties a batch host hands each unit. Both routes produce
//! the same `ImportConfig`, which is validated before any connection opens.

mod column;

use crate::parse::DelimitedFormat;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error as ThisError;

pub use column::ColumnInfo;

/// Property key: JSON array of physical table names.
pub const TABLE_NAMES_KEY: &str = "rowpack.import.tablenames";

/// Property key: JSON array of logical table names, 1:1 with physical names.
pub const LOGICAL_NAMES_KEY: &str = "rowpack.import.logicalnames";

/// Property key: whether per-record planner errors are counted and skipped.
pub const IGNORE_INVALID_ROW_KEY: &str = "rowpack.import.ignoreinvalidrow";

/// Property key: `|`-joined column infos; an empty entry skips that input field.
pub const COLUMN_INFO_KEY: &str = "rowpack.import.columninfos";

/// Property key: single-character field delimiter.
pub const FIELD_DELIMITER_KEY: &str = "rowpack.import.fielddelimiter";

/// Property key: single-character quote, or empty for none.
pub const QUOTE_CHAR_KEY: &str = "rowpack.import.quotechar";

/// Property key: single-character escape, or empty for none.
pub const ESCAPE_CHAR_KEY: &str = "rowpack.import.escapechar";

const COLUMN_INFO_SEPARATOR: char = '|';

///
/// ConfigError
///

#[derive(Debug, Eq, PartialEq, ThisError)]
pub enum ConfigError {
    #[error("missing configuration key '{key}'")]
    MissingKey { key: &'static str },

    #[error("invalid value for '{key}': {reason}")]
    InvalidValue { key: &'static str, reason: String },

    #[error("no target tables configured")]
    NoTables,

    #[error("{physical} physical table names but {logical} logical table names")]
    TableCountMismatch { physical: usize, logical: usize },

    #[error("physical table '{table}' is configured more than once")]
    DuplicatePhysicalTable { table: String },

    #[error("invalid column info '{input}': expected TYPE:name")]
    InvalidColumnInfo { input: String },

    #[error("config parse failed: {0}")]
    Parse(String),
}

const fn default_ignore_invalid_rows() -> bool {
    true
}

///
/// ImportConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ImportConfig {
    pub physical_tables: Vec<String>,
    pub logical_tables: Vec<String>,

    #[serde(default = "default_ignore_invalid_rows")]
    pub ignore_invalid_rows: bool,

    /// Input fields in order; `None` marks a field the import skips.
    #[serde(default, with = "column::slots")]
    pub columns: Vec<Option<ColumnInfo>>,

    #[serde(default)]
    pub input: DelimitedFormat,
}

impl ImportConfig {
    /// Build a config whose physical and logical names are identical.
    #[must_use]
    pub fn for_tables<I, S>(tables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let physical_tables = tables.into_iter().map(Into::into).collect::<Vec<_>>();

        Self {
            logical_tables: physical_tables.clone(),
            physical_tables,
            ignore_invalid_rows: default_ignore_invalid_rows(),
            columns: Vec::new(),
            input: DelimitedFormat::default(),
        }
    }

    /// Parse and validate a TOML config document.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;

        Ok(config)
    }

    /// Read and validate a config from flat host properties.
    pub fn from_properties(props: &BTreeMap<String, String>) -> Result<Self, ConfigError> {
        let physical_tables = table_names(props, TABLE_NAMES_KEY)?;
        let logical_tables = table_names(props, LOGICAL_NAMES_KEY)?;

        let ignore_invalid_rows = match props.get(IGNORE_INVALID_ROW_KEY) {
            Some(raw) => raw
                .trim()
                .parse::<bool>()
                .map_err(|err| ConfigError::InvalidValue {
                    key: IGNORE_INVALID_ROW_KEY,
                    reason: err.to_string(),
                })?,
            None => default_ignore_invalid_rows(),
        };

        let columns = match props.get(COLUMN_INFO_KEY) {
            Some(raw) => parse_column_infos(raw)?,
            None => Vec::new(),
        };

        let defaults = DelimitedFormat::default();
        let input = DelimitedFormat {
            delimiter: match props.get(FIELD_DELIMITER_KEY) {
                Some(raw) => single_char(FIELD_DELIMITER_KEY, raw)?.ok_or(
                    ConfigError::InvalidValue {
                        key: FIELD_DELIMITER_KEY,
                        reason: "delimiter must not be empty".to_string(),
                    },
                )?,
                None => defaults.delimiter,
            },
            quote: match props.get(QUOTE_CHAR_KEY) {
                Some(raw) => single_char(QUOTE_CHAR_KEY, raw)?,
                None => defaults.quote,
            },
            escape: match props.get(ESCAPE_CHAR_KEY) {
                Some(raw) => single_char(ESCAPE_CHAR_KEY, raw)?,
                None => defaults.escape,
            },
        };

        let config = Self {
            physical_tables,
            logical_tables,
            ignore_invalid_rows,
            columns,
            input,
        };
        config.validate()?;

        Ok(config)
    }

    /// Write this config back as flat host properties.
    pub fn to_properties(&self) -> Result<BTreeMap<String, String>, ConfigError> {
        let mut props = BTreeMap::new();

        props.insert(
            TABLE_NAMES_KEY.to_string(),
            names_to_json(TABLE_NAMES_KEY, &self.physical_tables)?,
        );
        props.insert(
            LOGICAL_NAMES_KEY.to_string(),
            names_to_json(LOGICAL_NAMES_KEY, &self.logical_tables)?,
        );
        props.insert(
            IGNORE_INVALID_ROW_KEY.to_string(),
            self.ignore_invalid_rows.to_string(),
        );
        if !self.columns.is_empty() {
            props.insert(
                COLUMN_INFO_KEY.to_string(),
                join_column_infos(&self.columns),
            );
        }
        props.insert(
            FIELD_DELIMITER_KEY.to_string(),
            self.input.delimiter.to_string(),
        );
        props.insert(
            QUOTE_CHAR_KEY.to_string(),
            self.input.quote.map(String::from).unwrap_or_default(),
        );
        props.insert(
            ESCAPE_CHAR_KEY.to_string(),
            self.input.escape.map(String::from).unwrap_or_default(),
        );

        Ok(props)
    }

    /// Check table lists before a unit opens any connection.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.physical_tables.is_empty() {
            return Err(ConfigError::NoTables);
        }
        if self.physical_tables.len() != self.logical_tables.len() {
            return Err(ConfigError::TableCountMismatch {
                physical: self.physical_tables.len(),
                logical: self.logical_tables.len(),
            });
        }
        for (i, table) in self.physical_tables.iter().enumerate() {
            if self.physical_tables[..i].contains(table) {
                return Err(ConfigError::DuplicatePhysicalTable {
                    table: table.clone(),
                });
            }
        }

        let format = [
            (FIELD_DELIMITER_KEY, Some(self.input.delimiter)),
            (QUOTE_CHAR_KEY, self.input.quote),
            (ESCAPE_CHAR_KEY, self.input.escape),
        ];
        for (key, ch) in format {
            if let Some(ch) = ch.filter(|ch| !ch.is_ascii()) {
                return Err(ConfigError::InvalidValue {
                    key,
                    reason: format!("'{ch}' is not an ASCII character"),
                });
            }
        }

        Ok(())
    }

    /// (physical, logical) name pairs in target order.
    pub fn table_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.physical_tables
            .iter()
            .map(String::as_str)
            .zip(self.logical_tables.iter().map(String::as_str))
    }
}

fn table_names(
    props: &BTreeMap<String, String>,
    key: &'static str,
) -> Result<Vec<String>, ConfigError> {
    let raw = props.get(key).ok_or(ConfigError::MissingKey { key })?;

    serde_json::from_str(raw).map_err(|err| ConfigError::InvalidValue {
        key,
        reason: err.to_string(),
    })
}

fn names_to_json(key: &'static str, names: &[String]) -> Result<String, ConfigError> {
    serde_json::to_string(names).map_err(|err| ConfigError::InvalidValue {
        key,
        reason: err.to_string(),
    })
}

fn single_char(key: &'static str, raw: &str) -> Result<Option<char>, ConfigError> {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (None, _) => Ok(None),
        (Some(ch), None) => Ok(Some(ch)),
        (Some(_), Some(_)) => Err(ConfigError::InvalidValue {
            key,
            reason: format!("expected a single character, found '{raw}'"),
        }),
    }
}

/// Parse a `|`-joined column info list; empty entries are skipped fields.
pub fn parse_column_infos(raw: &str) -> Result<Vec<Option<ColumnInfo>>, ConfigError> {
    raw.split(COLUMN_INFO_SEPARATOR)
        .map(|entry| {
            if entry.is_empty() {
                Ok(None)
            } else {
                entry.parse().map(Some)
            }
        })
        .collect()
}

/// Inverse of [`parse_column_infos`].
#[must_use]
pub fn join_column_infos(columns: &[Option<ColumnInfo>]) -> String {
    columns
        .iter()
        .map(|column| column.as_ref().map(ToString::to_string).unwrap_or_default())
        .collect::<Vec<_>>()
        .join(&COLUMN_INFO_SEPARATOR.to_string())
}
