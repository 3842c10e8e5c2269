//! Binary property list (`bplist00`) parser.
//!
//! The format is a flat table of objects addressed by a trailing offset
//! table; arrays and dictionaries store object references (indexes into
//! that table) rather than inline children. The 32-byte trailer gives
//! the table geometry, which varies per file and must not be hard-coded.
//! The format contract forbids reference cycles, so plain recursive
//! materialization is safe.

use byteorder::{BigEndian, ByteOrder};

use super::value::PlistValue;

/// Parse a binary property list.
///
/// Returns `None` when the buffer does not start with the `bplist`
/// magic, so callers can fall back to the XML reader. Structural damage
/// (offsets or lengths running past the buffer, a bad length marker)
/// also yields `None` rather than panicking.
pub fn parse(buf: &[u8]) -> Option<PlistValue> {
    if buf.len() < 8 || &buf[..6] != b"bplist" {
        return None;
    }
    if buf.len() < 40 {
        // Magic plus the 32-byte trailer cannot fit
        return None;
    }

    let trailer = &buf[buf.len() - 32..];
    let offset_size = trailer[6] as usize;
    let ref_size = trailer[7] as usize;
    let num_objects = BigEndian::read_u64(&trailer[8..16]) as usize;
    let top = BigEndian::read_u64(&trailer[16..24]) as usize;
    let table_offset = BigEndian::read_u64(&trailer[24..32]) as usize;

    if offset_size == 0 || offset_size > 8 || ref_size == 0 || ref_size > 8 {
        return None;
    }
    // The offset table itself must fit inside the buffer; this also
    // bounds the allocation below for hostile object counts.
    let table_len = num_objects.checked_mul(offset_size)?;
    if table_offset.checked_add(table_len)? > buf.len() {
        return None;
    }

    let mut offsets = Vec::with_capacity(num_objects);
    for i in 0..num_objects {
        offsets.push(read_be(buf, table_offset + i * offset_size, offset_size)? as usize);
    }

    read_object(buf, &offsets, ref_size, top)
}

/// Read a big-endian unsigned integer of 1..=8 bytes.
fn read_be(buf: &[u8], offset: usize, len: usize) -> Option<u64> {
    if len == 0 || len > 8 {
        return None;
    }
    let slice = buf.get(offset..offset.checked_add(len)?)?;
    Some(BigEndian::read_uint(slice, len))
}

/// Decode the object length for data, string, and container markers.
///
/// The low nibble is the length directly unless it is 0xF, in which
/// case an integer object follows holding the extended length. Returns
/// the length and the offset of the first payload byte.
fn read_length(buf: &[u8], offset: usize, info: usize) -> Option<(usize, usize)> {
    if info != 0x0f {
        return Some((info, offset + 1));
    }
    let marker = *buf.get(offset + 1)?;
    if marker >> 4 != 0x1 {
        return None;
    }
    let int_len = 1usize << (marker & 0x0f);
    let length = read_be(buf, offset + 2, int_len)? as usize;
    Some((length, offset + 2 + int_len))
}

fn read_object(
    buf: &[u8],
    offsets: &[usize],
    ref_size: usize,
    index: usize,
) -> Option<PlistValue> {
    let offset = *offsets.get(index)?;
    let marker = *buf.get(offset)?;
    let info = (marker & 0x0f) as usize;

    match marker >> 4 {
        // Null / bool singletons
        0x0 => Some(match info {
            0x8 => PlistValue::Bool(false),
            0x9 => PlistValue::Bool(true),
            _ => PlistValue::Null,
        }),
        // Integer of 2^info bytes, big-endian
        0x1 => {
            let len = 1usize << info;
            Some(PlistValue::Integer(read_be(buf, offset + 1, len)? as i64))
        }
        // IEEE-754 float or double, big-endian
        0x2 => match 1usize << info {
            4 => {
                let slice = buf.get(offset + 1..offset + 5)?;
                Some(PlistValue::Real(BigEndian::read_f32(slice) as f64))
            }
            8 => {
                let slice = buf.get(offset + 1..offset + 9)?;
                Some(PlistValue::Real(BigEndian::read_f64(slice)))
            }
            _ => Some(PlistValue::Null),
        },
        // Raw byte data
        0x4 => {
            let (len, ptr) = read_length(buf, offset, info)?;
            let slice = buf.get(ptr..ptr.checked_add(len)?)?;
            Some(PlistValue::Bytes(slice.to_vec()))
        }
        // ASCII string (decoded as UTF-8)
        0x5 => {
            let (len, ptr) = read_length(buf, offset, info)?;
            let slice = buf.get(ptr..ptr.checked_add(len)?)?;
            Some(PlistValue::Text(String::from_utf8_lossy(slice).into_owned()))
        }
        // UTF-16BE string; length counts code units, not bytes
        0x6 => {
            let (len, ptr) = read_length(buf, offset, info)?;
            let slice = buf.get(ptr..ptr.checked_add(len.checked_mul(2)?)?)?;
            let units: Vec<u16> = slice
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            Some(PlistValue::Text(String::from_utf16_lossy(&units)))
        }
        // Array of object references
        0xa => {
            let (len, ptr) = read_length(buf, offset, info)?;
            let mut items = Vec::new();
            for i in 0..len {
                let r = read_be(buf, ptr + i * ref_size, ref_size)? as usize;
                items.push(read_object(buf, offsets, ref_size, r)?);
            }
            Some(PlistValue::Array(items))
        }
        // Dictionary stored as two parallel reference arrays, keys then
        // values
        0xd => {
            let (len, ptr) = read_length(buf, offset, info)?;
            let values_ptr = ptr.checked_add(len.checked_mul(ref_size)?)?;
            let mut entries = Vec::new();
            for i in 0..len {
                let key_ref = read_be(buf, ptr + i * ref_size, ref_size)? as usize;
                let val_ref = read_be(buf, values_ptr + i * ref_size, ref_size)? as usize;
                let key = read_object(buf, offsets, ref_size, key_ref)?;
                let value = read_object(buf, offsets, ref_size, val_ref)?;
                entries.push((key, value));
            }
            Some(PlistValue::Dict(entries))
        }
        // Unknown tags (dates, UIDs, sets) decode to Null so producer
        // extensions don't fail the document
        _ => Some(PlistValue::Null),
    }
}
