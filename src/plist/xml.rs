//! Tolerant XML property list reader.
//!
//! This is not a general XML parser. Property lists only use a handful
//! of element types with no interesting attributes, so a small
//! recursive-descent scanner over a byte cursor is enough. Anything the
//! scanner does not recognize is skipped; malformed fragments never
//! fail the document.

use super::value::PlistValue;

/// Parse an XML property list document.
///
/// The top level is always a dictionary: every `<key>` immediately
/// followed by a value element contributes an entry, wherever the pair
/// appears in the text. Keys without a recognizable value element are
/// dropped.
pub fn parse(text: &str) -> PlistValue {
    PlistValue::Dict(parse_dict_body(text))
}

fn parse_dict_body(text: &str) -> Vec<(PlistValue, PlistValue)> {
    let mut entries = Vec::new();
    let mut pos = 0;

    while let Some(key_open) = find_ci(text, pos, "<key>") {
        let key_start = key_open + "<key>".len();
        let Some(key_end) = find_ci(text, key_start, "</key>") else {
            break;
        };
        let key = decode_entities(text[key_start..key_end].trim());
        pos = key_end + "</key>".len();

        if let Some((value, next)) = parse_value(text, pos) {
            entries.push((PlistValue::Text(key), value));
            pos = next;
        }
    }

    entries
}

fn parse_array_body(text: &str) -> Vec<PlistValue> {
    let mut items = Vec::new();
    let mut pos = 0;

    while pos < text.len() {
        pos = skip_ws(text, pos);
        if pos >= text.len() {
            break;
        }
        if let Some((value, next)) = parse_value(text, pos) {
            items.push(value);
            pos = next;
        } else {
            // Unrecognized element or stray text: skip past the next
            // tag close and keep scanning.
            match find_ci(text, pos, ">") {
                Some(end) => pos = end + 1,
                None => break,
            }
        }
    }

    items
}

/// Parse one value element starting at (or after whitespace from)
/// `pos`. Returns the value and the position just past it.
fn parse_value(text: &str, pos: usize) -> Option<(PlistValue, usize)> {
    let pos = skip_ws(text, pos);
    let rest = &text[pos..];

    if starts_ci(rest, "<string") {
        let (body, next) = element_body(text, pos, "string")?;
        Some((PlistValue::Text(decode_entities(body.trim())), next))
    } else if starts_ci(rest, "<integer") {
        let (body, next) = element_body(text, pos, "integer")?;
        Some((
            PlistValue::Integer(body.trim().parse().unwrap_or_default()),
            next,
        ))
    } else if starts_ci(rest, "<real") {
        let (body, next) = element_body(text, pos, "real")?;
        Some((
            PlistValue::Real(body.trim().parse().unwrap_or_default()),
            next,
        ))
    } else if starts_ci(rest, "<true") {
        Some((PlistValue::Bool(true), find_ci(text, pos, ">")? + 1))
    } else if starts_ci(rest, "<false") {
        Some((PlistValue::Bool(false), find_ci(text, pos, ">")? + 1))
    } else if starts_ci(rest, "<dict") {
        let (body, next) = element_body(text, pos, "dict")?;
        Some((PlistValue::Dict(parse_dict_body(body)), next))
    } else if starts_ci(rest, "<array") {
        let (body, next) = element_body(text, pos, "array")?;
        Some((PlistValue::Array(parse_array_body(body)), next))
    } else {
        None
    }
}

/// Locate the body of the element opening at `pos`.
///
/// Handles self-closing tags (`<string/>`) and nested occurrences of
/// the same element name by depth counting, which the containers need.
/// Returns the inner text and the position just past the closing tag.
fn element_body<'t>(text: &'t str, pos: usize, name: &str) -> Option<(&'t str, usize)> {
    let open_end = find_ci(text, pos, ">")?;
    if text[..open_end].ends_with('/') {
        return Some(("", open_end + 1));
    }

    let body_start = open_end + 1;
    let open_tag = format!("<{name}");
    let close_tag = format!("</{name}>");

    let mut depth = 1usize;
    let mut cursor = body_start;
    loop {
        let next_close = find_ci(text, cursor, &close_tag)?;
        match find_ci(text, cursor, &open_tag) {
            Some(next_open) if next_open < next_close => {
                depth += 1;
                cursor = next_open + open_tag.len();
            }
            _ => {
                depth -= 1;
                if depth == 0 {
                    return Some((&text[body_start..next_close], next_close + close_tag.len()));
                }
                cursor = next_close + close_tag.len();
            }
        }
    }
}

/// Decode the five named XML entities plus decimal and hex character
/// references. Unknown entities pass through literally.
fn decode_entities(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let Some(semi) = rest.find(';') else {
            out.push_str(rest);
            return out;
        };
        let entity = &rest[1..semi];
        match entity {
            "lt" => out.push('<'),
            "gt" => out.push('>'),
            "amp" => out.push('&'),
            "quot" => out.push('"'),
            "apos" => out.push('\''),
            _ => {
                if let Some(decoded) = decode_char_ref(entity) {
                    out.push(decoded);
                } else if !entity.starts_with('#') {
                    // Unknown named entity: keep the raw text
                    out.push_str(&rest[..semi + 1]);
                }
            }
        }
        rest = &rest[semi + 1..];
    }

    out.push_str(rest);
    out
}

fn decode_char_ref(entity: &str) -> Option<char> {
    let digits = entity.strip_prefix('#')?;
    let code = if let Some(hex) = digits.strip_prefix('x').or_else(|| digits.strip_prefix('X')) {
        u32::from_str_radix(hex, 16).ok()?
    } else {
        digits.parse().ok()?
    };
    char::from_u32(code)
}

fn skip_ws(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .find(|(_, c)| !c.is_whitespace())
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}

fn starts_ci(text: &str, prefix: &str) -> bool {
    text.len() >= prefix.len() && text[..prefix.len()].eq_ignore_ascii_case(prefix)
}

/// Case-insensitive substring search from `from`, returning a byte
/// index. Needles are ASCII tag text, so returned indexes always land
/// on character boundaries.
fn find_ci(text: &str, from: usize, needle: &str) -> Option<usize> {
    let hay = text.as_bytes();
    let needle = needle.as_bytes();
    if from > hay.len() {
        return None;
    }
    let last = hay.len().checked_sub(needle.len())?;
    (from..=last).find(|&i| hay[i..i + needle.len()].eq_ignore_ascii_case(needle))
}
