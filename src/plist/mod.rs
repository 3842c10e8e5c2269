//! Property list parsing.
//!
//! Apple property lists come in two serializations: the binary
//! `bplist00` object graph and an XML document. Both decode into the
//! same [`PlistValue`] shape. The binary form is tried first (its magic
//! header is unambiguous); anything else is decoded as text and handed
//! to the tolerant XML reader.

mod binary;
mod value;
mod xml;

pub use value::PlistValue;

use crate::text;

/// Parse property list bytes, binary or XML.
///
/// Returns `None` only when the buffer is not a binary plist and decodes
/// to empty text, which means there is nothing to parse at all. A
/// malformed XML document still yields a (possibly empty) dictionary.
pub fn parse(bytes: &[u8]) -> Option<PlistValue> {
    if let Some(value) = binary::parse(bytes) {
        return Some(value);
    }
    let text = text::decode(bytes);
    if text.is_empty() {
        return None;
    }
    Some(xml::parse(&text))
}
