use crate::{
    codec::CodecError,
    config::ConfigError,
    plan::{ConnectionError, PlannerError},
    schema::SchemaError,
};
use std::fmt;
use thiserror::Error as ThisError;

///
/// InternalError
///
/// Structured runtime error with a stable internal classification.
/// Every `InternalError` that leaves the record processor aborts the
/// processing unit; recoverable per-record conditions are counted instead.
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct InternalError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,

    /// Optional structured error detail.
    /// The variant (if present) must correspond to `origin`.
    #[source]
    pub detail: Option<ErrorDetail>,
}

impl InternalError {
    /// Construct an InternalError without structured detail.
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
            detail: None,
        }
    }

    // Attach the typed source so callers can still reach the original cause.
    fn with_detail(class: ErrorClass, origin: ErrorOrigin, detail: ErrorDetail) -> Self {
        Self {
            class,
            origin,
            message: detail.to_string(),
            detail: Some(detail),
        }
    }

    /// Construct a processor-origin invariant violation.
    pub(crate) fn processor_invariant(message: impl Into<String>) -> Self {
        Self::new(
            ErrorClass::InvariantViolation,
            ErrorOrigin::Processor,
            message.into(),
        )
    }

    /// Construct a catalog-origin unsupported error.
    pub(crate) fn catalog_unsupported(message: impl Into<String>) -> Self {
        Self::new(ErrorClass::Unsupported, ErrorOrigin::Catalog, message.into())
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

impl From<SchemaError> for InternalError {
    fn from(err: SchemaError) -> Self {
        let class = match err {
            SchemaError::TableNotFound { .. } => ErrorClass::NotFound,
            SchemaError::Unavailable { .. } => ErrorClass::Internal,
        };

        Self::with_detail(class, ErrorOrigin::Schema, ErrorDetail::Schema(err))
    }
}

impl From<CodecError> for InternalError {
    fn from(err: CodecError) -> Self {
        let class = if err.is_encode_defect() {
            ErrorClass::InvariantViolation
        } else {
            ErrorClass::Corruption
        };

        Self::with_detail(class, ErrorOrigin::Codec, ErrorDetail::Codec(err))
    }
}

impl From<ConfigError> for InternalError {
    fn from(err: ConfigError) -> Self {
        Self::with_detail(
            ErrorClass::Unsupported,
            ErrorOrigin::Config,
            ErrorDetail::Config(err),
        )
    }
}

impl From<PlannerError> for InternalError {
    fn from(err: PlannerError) -> Self {
        Self::with_detail(
            ErrorClass::Internal,
            ErrorOrigin::Planner,
            ErrorDetail::Planner(err),
        )
    }
}

impl From<ConnectionError> for InternalError {
    fn from(err: ConnectionError) -> Self {
        Self::with_detail(
            ErrorClass::Internal,
            ErrorOrigin::Connection,
            ErrorDetail::Connection(err),
        )
    }
}

///
/// ErrorDetail
///
/// Structured, origin-specific error detail carried by [`InternalError`].
///

#[derive(Debug, ThisError)]
pub enum ErrorDetail {
    #[error(transparent)]
    Codec(CodecError),

    #[error(transparent)]
    Config(ConfigError),

    #[error(transparent)]
    Connection(ConnectionError),

    #[error(transparent)]
    Planner(PlannerError),

    #[error(transparent)]
    Schema(SchemaError),
}

///
/// ErrorClass
/// Internal error taxonomy for runtime classification.
/// Not a stable API; may change without notice.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[remain::sorted]
pub enum ErrorClass {
    Corruption,
    Internal,
    InvariantViolation,
    NotFound,
    Unsupported,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Corruption => "corruption",
            Self::Internal => "internal",
            Self::InvariantViolation => "invariant_violation",
            Self::NotFound => "not_found",
            Self::Unsupported => "unsupported",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
/// Internal origin taxonomy for runtime classification.
/// Not a stable API; may change without notice.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[remain::sorted]
pub enum ErrorOrigin {
    Catalog,
    Codec,
    Config,
    Connection,
    Planner,
    Processor,
    Schema,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Catalog => "catalog",
            Self::Codec => "codec",
            Self::Config => "config",
            Self::Connection => "connection",
            Self::Planner => "planner",
            Self::Processor => "processor",
            Self::Schema => "schema",
        };
        write!(f, "{label}")
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn schema_not_found_maps_to_schema_not_found() {
        let err: InternalError = SchemaError::TableNotFound {
            table: "ORDERS".to_string(),
        }
        .into();

        assert_eq!(err.class, ErrorClass::NotFound);
        assert_eq!(err.origin, ErrorOrigin::Schema);
        assert!(err.message.contains("ORDERS"), "unexpected error: {err:?}");
    }

    #[test]
    fn unknown_column_is_an_invariant_violation() {
        let err: InternalError = CodecError::UnknownColumn {
            table_index: 0,
            family: "cf".to_string(),
            qualifier: "missing".to_string(),
        }
        .into();

        assert_eq!(err.class, ErrorClass::InvariantViolation);
        assert_eq!(err.origin, ErrorOrigin::Codec);
    }

    #[test]
    fn truncated_blob_is_corruption() {
        let err: InternalError = CodecError::TruncatedVarint { offset: 3 }.into();

        assert_eq!(err.class, ErrorClass::Corruption);
        assert_eq!(err.display_with_class(), format!("codec:corruption: {err}"));
    }

    #[test]
    fn converted_errors_keep_their_original_cause() {
        let err: InternalError = ConnectionError::Close("socket reset".to_string()).into();

        let source = err.source().expect("detail should be exposed as the error source");
        assert!(
            source.to_string().contains("socket reset"),
            "unexpected source: {source}"
        );
        assert!(matches!(
            err.detail,
            Some(ErrorDetail::Connection(ConnectionError::Close(_)))
        ));
    }
}
