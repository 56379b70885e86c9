use derive_more::Display;
use rowpack_core::error::{
    ErrorClass as CoreErrorClass, ErrorOrigin as CoreErrorOrigin, InternalError,
};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// Error
/// Public error type with a stable kind + origin taxonomy.
///

#[derive(Debug, Deserialize, Serialize, ThisError)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            kind,
            origin,
            message: message.into(),
        }
    }
}

impl From<InternalError> for Error {
    fn from(err: InternalError) -> Self {
        Self::new(err.class.into(), err.origin.into(), err.message)
    }
}

///
/// ErrorKind
/// Public error taxonomy for import hosts.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorKind {
    /// Configuration or schema the import cannot work with.
    Unsupported,

    /// A configured table does not exist in the schema source.
    NotFound,

    /// Encoded bytes are damaged.
    Corruption,

    /// The caller cannot remediate this.
    Internal,
}

impl From<CoreErrorClass> for ErrorKind {
    fn from(class: CoreErrorClass) -> Self {
        match class {
            CoreErrorClass::Corruption => Self::Corruption,
            CoreErrorClass::Internal | CoreErrorClass::InvariantViolation => Self::Internal,
            CoreErrorClass::NotFound => Self::NotFound,
            CoreErrorClass::Unsupported => Self::Unsupported,
        }
    }
}

///
/// ErrorOrigin
/// Public origin taxonomy for import hosts.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorOrigin {
    Catalog,
    Codec,
    Config,
    Connection,
    Planner,
    Processor,
    Schema,
}

impl From<CoreErrorOrigin> for ErrorOrigin {
    fn from(origin: CoreErrorOrigin) -> Self {
        match origin {
            CoreErrorOrigin::Catalog => Self::Catalog,
            CoreErrorOrigin::Codec => Self::Codec,
            CoreErrorOrigin::Config => Self::Config,
            CoreErrorOrigin::Connection => Self::Connection,
            CoreErrorOrigin::Planner => Self::Planner,
            CoreErrorOrigin::Processor => Self::Processor,
            CoreErrorOrigin::Schema => Self::Schema,
        }
    }
}
