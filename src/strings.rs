//! Localized `.strings` table parsing.
//!
//! A `.strings` resource is usually a text file of `"key" = "value";`
//! pairs, but some producers ship it as a binary or XML property list.
//! The plist interpretation is tried first; the text scanner is the
//! fallback.

use std::collections::HashMap;

use crate::plist::{self, PlistValue};
use crate::text;

/// Parse a `.strings` resource into a flat key/value table.
///
/// Lines that do not match the quoted-pair-with-semicolon shape are
/// skipped, never fatal. An unparsable resource yields an empty table.
pub fn parse(bytes: &[u8]) -> HashMap<String, String> {
    if let Some(PlistValue::Dict(entries)) = plist::parse(bytes) {
        if !entries.is_empty() {
            return entries
                .into_iter()
                .filter_map(|(key, value)| match key {
                    PlistValue::Text(key) => Some((key, value.as_string())),
                    _ => None,
                })
                .collect();
        }
    }

    parse_table(&text::decode(bytes))
}

/// Scan text for `"KEY" = "VALUE";` pairs.
fn parse_table(text: &str) -> HashMap<String, String> {
    let mut table = HashMap::new();
    let mut pos = 0;

    while let Some(start) = text[pos..].find('"').map(|i| pos + i) {
        match try_pair(text, start) {
            Some((key, value, next)) => {
                table.insert(key, value);
                pos = next;
            }
            None => pos = start + 1,
        }
    }

    table
}

/// Try to match one pair whose opening quote is at `start`. Keys must
/// be non-empty; values may be empty.
fn try_pair(text: &str, start: usize) -> Option<(String, String, usize)> {
    let bytes = text.as_bytes();

    let key_end = find_quote(bytes, start + 1)?;
    if key_end == start + 1 {
        return None;
    }

    let mut pos = skip_ws(bytes, key_end + 1);
    if bytes.get(pos) != Some(&b'=') {
        return None;
    }
    pos = skip_ws(bytes, pos + 1);
    if bytes.get(pos) != Some(&b'"') {
        return None;
    }

    let value_start = pos + 1;
    let value_end = find_quote(bytes, value_start)?;

    let end = skip_ws(bytes, value_end + 1);
    if bytes.get(end) != Some(&b';') {
        return None;
    }

    Some((
        unescape(&text[start + 1..key_end]),
        unescape(&text[value_start..value_end]),
        end + 1,
    ))
}

fn find_quote(bytes: &[u8], from: usize) -> Option<usize> {
    (from..bytes.len()).find(|&i| bytes[i] == b'"')
}

fn skip_ws(bytes: &[u8], from: usize) -> usize {
    (from..bytes.len())
        .find(|&i| !bytes[i].is_ascii_whitespace())
        .unwrap_or(bytes.len())
}

/// Resolve `\\`, `\n`, `\r`, `\t`, `\"`, `\'` escapes. Unrecognized
/// escapes are kept verbatim.
fn unescape(token: &str) -> String {
    let mut out = String::with_capacity(token.len());
    let mut chars = token.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some(escaped @ ('"' | '\'' | '\\')) => out.push(escaped),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }

    out
}
