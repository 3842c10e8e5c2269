//! Metadata extraction from `.ipa` archive bytes.
//!
//! Composes the ZIP reader, property list parsers, and localized
//! strings resolver into a single pure function from byte buffer to
//! [`IpaMeta`]. Nothing is cached between calls; concurrent extractions
//! over different buffers share no state.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::plist::{self, PlistValue};
use crate::strings;
use crate::zip::{ZipArchive, ZipEntry};

/// Identifying metadata of an iOS app bundle.
///
/// `bundle_id` and `version` come straight from well-known `Info.plist`
/// keys; `display_name` is resolved through a fallback chain and may be
/// empty when nothing usable exists. Empty is a valid terminal value,
/// not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpaMeta {
    pub bundle_id: String,
    pub version: String,
    pub display_name: String,
}

/// Extract bundle metadata from a complete `.ipa` byte buffer.
///
/// 1. Locate the `Payload/<Name>.app/Info.plist` entry
/// 2. Decompress and parse it (binary plist, then XML)
/// 3. Read `CFBundleIdentifier`, the version (with
///    `CFBundleShortVersionString` → `CFBundleVersion` fallback), and
///    the display name (`CFBundleDisplayName` → `CFBundleName` →
///    `CFBundleExecutable`)
/// 4. If the display name is empty or looks like an unresolved build
///    placeholder, consult the development region's
///    `InfoPlist.strings`, then `Base.lproj`'s
///
/// Missing fields degrade to empty strings; only a structurally broken
/// archive or an absent/unreadable `Info.plist` fails the call.
///
/// # Errors
///
/// - [`Error::Archive`] for ZIP-level failures
/// - [`Error::InfoPlistNotFound`] when no matching entry exists
/// - [`Error::InfoPlistUnparsable`] when neither plist form parses
pub fn extract_meta(ipa_bytes: &[u8]) -> Result<IpaMeta> {
    let archive = ZipArchive::new(ipa_bytes);
    let entries = archive.entries()?;

    let info_entry = entries
        .iter()
        .find(|e| is_info_plist_path(&e.name))
        .ok_or(Error::InfoPlistNotFound)?;

    let info_buf = archive.read_entry(info_entry)?;
    let info = plist::parse(&info_buf).ok_or(Error::InfoPlistUnparsable)?;

    let bundle_id = dict_string(&info, "CFBundleIdentifier");

    let mut version = dict_string(&info, "CFBundleShortVersionString");
    if version.is_empty() {
        version = dict_string(&info, "CFBundleVersion");
    }

    let mut display_name = first_non_empty(
        &info,
        &["CFBundleDisplayName", "CFBundleName", "CFBundleExecutable"],
    );

    if display_name.is_empty() || looks_like_placeholder(&display_name) {
        if let Some(localized) = localized_display_name(&archive, &entries, info_entry, &info) {
            display_name = localized;
        }
    }

    Ok(IpaMeta {
        bundle_id,
        version,
        display_name,
    })
}

/// Resolve the display name from `InfoPlist.strings`, trying the
/// development region's `.lproj` directory and then `Base.lproj`.
/// Returns `None` when neither table yields a non-empty value, leaving
/// the caller's best-effort name in place.
fn localized_display_name(
    archive: &ZipArchive<'_>,
    entries: &[ZipEntry],
    info_entry: &ZipEntry,
    info: &PlistValue,
) -> Option<String> {
    let mut dev_region = dict_string(info, "CFBundleDevelopmentRegion");
    if dev_region.is_empty() {
        dev_region = "en".to_string();
    }

    // Directory of the Info.plist, trailing slash included
    let app_dir = &info_entry.name[..info_entry.name.rfind('/').map_or(0, |i| i + 1)];

    let by_path: HashMap<String, &ZipEntry> = entries
        .iter()
        .map(|e| (normalize_path(&e.name), e))
        .collect();

    let candidates = [
        normalize_path(&format!("{app_dir}{dev_region}.lproj/InfoPlist.strings")),
        normalize_path(&format!("{app_dir}Base.lproj/InfoPlist.strings")),
    ];

    for candidate in &candidates {
        let Some(entry) = by_path.get(candidate) else {
            continue;
        };
        let Ok(data) = archive.read_entry(entry) else {
            continue;
        };
        let table = strings::parse(&data);
        for key in ["CFBundleDisplayName", "CFBundleName", "CFBundleExecutable"] {
            if let Some(value) = table.get(key) {
                let trimmed = value.trim();
                if !trimmed.is_empty() {
                    return Some(trimmed.to_string());
                }
            }
        }
    }

    None
}

fn dict_string(info: &PlistValue, key: &str) -> String {
    info.get(key).map(PlistValue::as_string).unwrap_or_default()
}

fn first_non_empty(info: &PlistValue, keys: &[&str]) -> String {
    keys.iter()
        .map(|key| dict_string(info, key))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
        .unwrap_or_default()
}

/// Unresolved build-variable or format-string placeholders: `$(`, `%@`,
/// `%{`. A heuristic, not a protocol guarantee.
fn looks_like_placeholder(name: &str) -> bool {
    name.contains("$(") || name.contains("%@") || name.contains("%{")
}

/// Match `Payload/<segment>.app/Info.plist` case-insensitively,
/// anchored at the end of the entry name. The segment may not contain a
/// slash and may not be empty.
fn is_info_plist_path(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    let Some(rest) = lower.strip_suffix("/info.plist") else {
        return false;
    };
    let Some(rest) = rest.strip_suffix(".app") else {
        return false;
    };
    match rest.rfind('/') {
        Some(i) => !rest[i + 1..].is_empty() && rest[..=i].ends_with("payload/"),
        None => false,
    }
}

/// Lowercase, backslashes to slashes, duplicate slashes collapsed.
fn normalize_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut prev_slash = false;
    for c in path.chars() {
        let c = if c == '\\' { '/' } else { c };
        if c == '/' {
            if prev_slash {
                continue;
            }
            prev_slash = true;
        } else {
            prev_slash = false;
        }
        out.extend(c.to_lowercase());
    }
    out
}
