// Field-by-field little-endian decoding of fixed-size records
// Records are never reinterpreted in place; each field is assembled explicitly

use byteorder::{ByteOrder, LittleEndian};
use ceres_core::CeresError;

/// Borrow the `len` bytes at `base` or fail with `OutOfRange`
pub fn slice_at(buf: &[u8], base: usize, len: usize) -> Result<&[u8], CeresError> {
    base.checked_add(len)
        .and_then(|end| buf.get(base..end))
        .ok_or_else(|| {
            CeresError::OutOfRange(format!(
                "Record field {:#x}+{} outside buffer of {} bytes",
                base,
                len,
                buf.len()
            ))
        })
}

pub fn read_u8(buf: &[u8], offset: usize) -> Result<u8, CeresError> {
    Ok(slice_at(buf, offset, 1)?[0])
}

pub fn read_u16(buf: &[u8], offset: usize) -> Result<u16, CeresError> {
    Ok(LittleEndian::read_u16(slice_at(buf, offset, 2)?))
}

pub fn read_i16(buf: &[u8], offset: usize) -> Result<i16, CeresError> {
    Ok(LittleEndian::read_i16(slice_at(buf, offset, 2)?))
}

pub fn read_i32(buf: &[u8], offset: usize) -> Result<i32, CeresError> {
    Ok(LittleEndian::read_i32(slice_at(buf, offset, 4)?))
}

/// Unsigned 24-bit little-endian group
pub fn read_u24(buf: &[u8], offset: usize) -> Result<u32, CeresError> {
    Ok(LittleEndian::read_u24(slice_at(buf, offset, 3)?))
}
