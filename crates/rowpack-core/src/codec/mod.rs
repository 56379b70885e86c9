//! Row blob codec.
//!
//! One encoded row blob is the concatenation of zero or more cells:
//!
//! ```text
//! varint(column index) | type byte | varint(value length) | value bytes
//! ```
//!
//! Varints are unsigned LEB128. There is no header, terminator or cell count;
//! a reader consumes cells until the blob ends. Cells appear in planner
//! emission order and are not sorted by column index. A zero-length blob is a
//! valid row with no visible columns.

mod varint;
#[cfg(test)]
mod tests;

use crate::{aggregate::RowGroup, catalog::ColumnIndexCatalog, mutation::CellType};
use derive_more::Deref;
use thiserror::Error as ThisError;
use varint::{read_varint, write_varint};

// Typical rows are a handful of short cells.
const ROW_BLOB_INITIAL_CAPACITY: usize = 256;

///
/// CodecError
///

#[derive(Debug, ThisError)]
pub enum CodecError {
    #[error("no column index for {family}:{qualifier} in target table #{table_index}")]
    UnknownColumn {
        table_index: usize,
        family: String,
        qualifier: String,
    },

    #[error("no column index catalog entry for target table #{table_index}")]
    UnknownTable { table_index: usize },

    #[error("truncated varint at offset {offset}")]
    TruncatedVarint { offset: usize },

    #[error("varint at offset {offset} exceeds {bits} bits")]
    VarintOverflow { offset: usize, bits: u32 },

    #[error("missing cell type byte at offset {offset}")]
    MissingCellType { offset: usize },

    #[error("unknown cell type byte 0x{byte:02x} at offset {offset}")]
    UnknownCellType { byte: u8, offset: usize },

    #[error("cell value at offset {offset} needs {len} bytes, {remaining} remaining")]
    TruncatedValue {
        offset: usize,
        len: u64,
        remaining: usize,
    },
}

impl CodecError {
    /// True for failures raised while encoding, which indicate a broken
    /// planner/catalog contract rather than damaged bytes.
    #[must_use]
    pub const fn is_encode_defect(&self) -> bool {
        matches!(self, Self::UnknownColumn { .. } | Self::UnknownTable { .. })
    }
}

///
/// RowBlob
/// Encoded cells of one target row.
///

#[derive(Clone, Debug, Default, Deref, Eq, PartialEq)]
#[deref(forward)]
pub struct RowBlob(Vec<u8>);

impl RowBlob {
    #[must_use]
    pub const fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Decode the blob's cells.
    pub fn decode(&self) -> Result<Vec<EncodedCell>, CodecError> {
        decode_row(&self.0)
    }
}

///
/// EncodedCell
/// One decoded (column index, type, value) triple.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct EncodedCell {
    pub column_index: u32,
    pub cell_type: CellType,
    pub value: Vec<u8>,
}

/// Encode the real-value cells of one row group for target `table_index`.
///
/// Placeholder cells (qualifier equal to the table's empty marker) are
/// skipped. Every other cell must resolve through the catalog; a miss means
/// the planner produced a column the schema snapshot does not know and is
/// returned as [`CodecError::UnknownColumn`].
pub fn encode_row(
    group: &RowGroup,
    catalog: &ColumnIndexCatalog,
    table_index: usize,
) -> Result<RowBlob, CodecError> {
    let columns = catalog
        .table(table_index)
        .ok_or(CodecError::UnknownTable { table_index })?;

    let mut out = Vec::with_capacity(ROW_BLOB_INITIAL_CAPACITY);
    for cell in group.real_cells(columns.empty_qualifier()) {
        let column_index = columns
            .lookup(&cell.family, &cell.qualifier)
            .ok_or_else(|| CodecError::UnknownColumn {
                table_index,
                family: String::from_utf8_lossy(&cell.family).into_owned(),
                qualifier: String::from_utf8_lossy(&cell.qualifier).into_owned(),
            })?;

        write_varint(&mut out, u64::from(column_index));
        out.push(cell.cell_type.as_byte());
        write_varint(&mut out, cell.value.len() as u64);
        out.extend_from_slice(&cell.value);
    }
    out.shrink_to_fit();

    Ok(RowBlob(out))
}

/// Decode every cell of an encoded row blob.
pub fn decode_row(bytes: &[u8]) -> Result<Vec<EncodedCell>, CodecError> {
    let mut cells = Vec::new();
    let mut offset = 0;

    while offset < bytes.len() {
        let index_offset = offset;
        let column_index = u32::try_from(read_varint(bytes, &mut offset)?).map_err(|_| {
            CodecError::VarintOverflow {
                offset: index_offset,
                bits: u32::BITS,
            }
        })?;

        let byte = *bytes
            .get(offset)
            .ok_or(CodecError::MissingCellType { offset })?;
        let cell_type =
            CellType::try_from_byte(byte).ok_or(CodecError::UnknownCellType { byte, offset })?;
        offset += 1;

        let len = read_varint(bytes, &mut offset)?;
        let remaining = bytes.len() - offset;
        let value_len = usize::try_from(len)
            .ok()
            .filter(|&value_len| value_len <= remaining)
            .ok_or(CodecError::TruncatedValue {
                offset,
                len,
                remaining,
            })?;

        cells.push(EncodedCell {
            column_index,
            cell_type,
            value: bytes[offset..offset + value_len].to_vec(),
        });
        offset += value_len;
    }

    Ok(cells)
}
