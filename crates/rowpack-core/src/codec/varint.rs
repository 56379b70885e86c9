//! Unsigned LEB128: seven payload bits per byte, least-significant group
//! first, high bit set on every byte except the last.

use crate::codec::CodecError;

// Ten 7-bit groups cover 64 bits; the tenth may carry only the top bit.
pub(crate) const MAX_VARINT_BYTES: usize = 10;

/// Append `value` to `out`.
pub(crate) fn write_varint(out: &mut Vec<u8>, mut value: u64) {
    loop {
        #[expect(clippy::cast_possible_truncation)]
        let mut byte = (value & 0x7F) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        out.push(byte);
        if value == 0 {
            return;
        }
    }
}

/// Read one varint starting at `*offset`, advancing it past the varint.
pub(crate) fn read_varint(bytes: &[u8], offset: &mut usize) -> Result<u64, CodecError> {
    let start = *offset;
    let mut value = 0u64;

    for (i, shift) in (0..MAX_VARINT_BYTES).zip((0u32..).step_by(7)) {
        let Some(&byte) = bytes.get(start + i) else {
            return Err(CodecError::TruncatedVarint { offset: start });
        };
        let payload = u64::from(byte & 0x7F);
        if i == MAX_VARINT_BYTES - 1 && payload > 1 {
            return Err(CodecError::VarintOverflow {
                offset: start,
                bits: u64::BITS,
            });
        }

        value |= payload << shift;
        if byte & 0x80 == 0 {
            *offset = start + i + 1;
            return Ok(value);
        }
    }

    Err(CodecError::VarintOverflow {
        offset: start,
        bits: u64::BITS,
    })
}

///
/// TESTS
///
