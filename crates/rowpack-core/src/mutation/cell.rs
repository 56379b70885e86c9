use std::fmt;

///
/// CellType
///
/// Cell type tag written verbatim as one byte into encoded row blobs.
/// Byte values follow the storage engine's key-value type codes so the
/// downstream loader can pass them through untouched.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[remain::sorted]
#[repr(u8)]
pub enum CellType {
    Delete = 8,
    DeleteColumn = 12,
    DeleteFamily = 14,
    DeleteFamilyVersion = 10,
    Put = 4,
}

impl CellType {
    #[must_use]
    pub const fn as_byte(self) -> u8 {
        self as u8
    }

    /// Decode a type byte; unknown codes are rejected.
    #[must_use]
    pub const fn try_from_byte(byte: u8) -> Option<Self> {
        match byte {
            4 => Some(Self::Put),
            8 => Some(Self::Delete),
            10 => Some(Self::DeleteFamilyVersion),
            12 => Some(Self::DeleteColumn),
            14 => Some(Self::DeleteFamily),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Delete => "delete",
            Self::DeleteColumn => "delete_column",
            Self::DeleteFamily => "delete_family",
            Self::DeleteFamilyVersion => "delete_family_version",
            Self::Put => "put",
        }
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

///
/// TESTS
///
