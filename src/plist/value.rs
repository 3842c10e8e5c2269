use crate::text;

/// A decoded property list value.
///
/// Dictionaries keep their serialized key order and allow non-text keys,
/// which the binary format technically permits; lookups by string key
/// simply never match such entries.
#[derive(Debug, Clone, PartialEq)]
pub enum PlistValue {
    Null,
    Bool(bool),
    Integer(i64),
    Real(f64),
    Bytes(Vec<u8>),
    Text(String),
    Array(Vec<PlistValue>),
    Dict(Vec<(PlistValue, PlistValue)>),
}

impl PlistValue {
    pub fn is_dict(&self) -> bool {
        matches!(self, PlistValue::Dict(_))
    }

    /// Look up a dictionary value by text key. Returns `None` for
    /// non-dictionary values and missing keys alike.
    pub fn get(&self, key: &str) -> Option<&PlistValue> {
        match self {
            PlistValue::Dict(entries) => entries.iter().find_map(|(k, v)| match k {
                PlistValue::Text(text) if text == key => Some(v),
                _ => None,
            }),
            _ => None,
        }
    }

    /// Coerce a value to a display string.
    ///
    /// Numbers stringify, `true` becomes `"true"` while `false` becomes
    /// the empty string, byte data is decoded as text, and containers
    /// and null yield the empty string. Total over all variants so that
    /// downstream field access never fails.
    pub fn as_string(&self) -> String {
        match self {
            PlistValue::Text(s) => s.clone(),
            PlistValue::Integer(n) => n.to_string(),
            PlistValue::Real(r) => r.to_string(),
            PlistValue::Bool(true) => "true".to_string(),
            PlistValue::Bytes(b) => text::decode(b),
            _ => String::new(),
        }
    }
}
