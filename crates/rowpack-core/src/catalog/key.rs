use derive_more::Deref;
use std::{borrow::Borrow, fmt};

///
/// ColumnFamily
///
/// Immutable column-family bytes used as a catalog key.
/// Lookups borrow as `[u8]`, so probing never copies the cell's bytes.
///

#[derive(Clone, Deref, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[deref(forward)]
pub struct ColumnFamily(Box<[u8]>);

///
/// ColumnQualifier
///
/// Immutable column-qualifier bytes used as a catalog key.
///

#[derive(Clone, Deref, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[deref(forward)]
pub struct ColumnQualifier(Box<[u8]>);

macro_rules! impl_column_bytes {
    ($ty:ident) => {
        impl $ty {
            #[must_use]
            pub fn as_bytes(&self) -> &[u8] {
                &self.0
            }
        }

        impl Borrow<[u8]> for $ty {
            fn borrow(&self) -> &[u8] {
                &self.0
            }
        }

        impl From<&[u8]> for $ty {
            fn from(bytes: &[u8]) -> Self {
                Self(bytes.into())
            }
        }

        impl From<Vec<u8>> for $ty {
            fn from(bytes: Vec<u8>) -> Self {
                Self(bytes.into_boxed_slice())
            }
        }

        impl From<&str> for $ty {
            fn from(name: &str) -> Self {
                Self(name.as_bytes().into())
            }
        }

        impl fmt::Debug for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($ty), self)
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&String::from_utf8_lossy(&self.0))
            }
        }
    };
}

impl_column_bytes!(ColumnFamily);
impl_column_bytes!(ColumnQualifier);
