//! End-to-end extraction tests over synthetic archives.

use byteorder::{LittleEndian, WriteBytesExt};
use flate2::Compression;
use flate2::write::DeflateEncoder;
use std::io::Write;

use ipameta::{ArchiveError, Error, IpaMeta, extract_meta};

const STORED: u16 = 0;
const DEFLATE: u16 = 8;

/// Assemble a ZIP archive from (name, method, raw content) triples.
/// DEFLATE entries are compressed here; sizes in the headers refer to
/// the stored bytes.
fn build_zip(files: &[(&str, u16, &[u8])]) -> Vec<u8> {
    let mut buf = Vec::new();
    let mut centrals = Vec::new();

    for (name, method, content) in files {
        let data = match *method {
            DEFLATE => {
                let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
                encoder.write_all(content).unwrap();
                encoder.finish().unwrap()
            }
            _ => content.to_vec(),
        };

        let offset = buf.len() as u32;

        // Local file header
        buf.extend_from_slice(b"PK\x03\x04");
        buf.write_u16::<LittleEndian>(20).unwrap();
        buf.write_u16::<LittleEndian>(0).unwrap();
        buf.write_u16::<LittleEndian>(*method).unwrap();
        buf.write_u16::<LittleEndian>(0).unwrap();
        buf.write_u16::<LittleEndian>(0).unwrap();
        buf.write_u32::<LittleEndian>(0).unwrap();
        buf.write_u32::<LittleEndian>(data.len() as u32).unwrap();
        buf.write_u32::<LittleEndian>(content.len() as u32).unwrap();
        buf.write_u16::<LittleEndian>(name.len() as u16).unwrap();
        buf.write_u16::<LittleEndian>(0).unwrap();
        buf.extend_from_slice(name.as_bytes());
        buf.extend_from_slice(&data);

        // Matching central directory header
        let mut central = Vec::new();
        central.extend_from_slice(b"PK\x01\x02");
        central.write_u16::<LittleEndian>(20).unwrap();
        central.write_u16::<LittleEndian>(20).unwrap();
        central.write_u16::<LittleEndian>(0).unwrap();
        central.write_u16::<LittleEndian>(*method).unwrap();
        central.write_u16::<LittleEndian>(0).unwrap();
        central.write_u16::<LittleEndian>(0).unwrap();
        central.write_u32::<LittleEndian>(0).unwrap();
        central.write_u32::<LittleEndian>(data.len() as u32).unwrap();
        central.write_u32::<LittleEndian>(content.len() as u32).unwrap();
        central.write_u16::<LittleEndian>(name.len() as u16).unwrap();
        central.write_u16::<LittleEndian>(0).unwrap();
        central.write_u16::<LittleEndian>(0).unwrap();
        central.write_u16::<LittleEndian>(0).unwrap();
        central.write_u16::<LittleEndian>(0).unwrap();
        central.write_u32::<LittleEndian>(0).unwrap();
        central.write_u32::<LittleEndian>(offset).unwrap();
        central.extend_from_slice(name.as_bytes());
        centrals.push(central);
    }

    let cd_offset = buf.len() as u32;
    for central in &centrals {
        buf.extend_from_slice(central);
    }
    let cd_size = buf.len() as u32 - cd_offset;

    buf.extend_from_slice(b"PK\x05\x06");
    buf.write_u16::<LittleEndian>(0).unwrap();
    buf.write_u16::<LittleEndian>(0).unwrap();
    buf.write_u16::<LittleEndian>(files.len() as u16).unwrap();
    buf.write_u16::<LittleEndian>(files.len() as u16).unwrap();
    buf.write_u32::<LittleEndian>(cd_size).unwrap();
    buf.write_u32::<LittleEndian>(cd_offset).unwrap();
    buf.write_u16::<LittleEndian>(0).unwrap();
    buf
}

/// Hand-assemble a binary plist holding a flat dict of ASCII strings.
/// One-byte offsets and refs keep the geometry simple; the total size
/// stays well under 256 bytes in these tests.
fn bplist_dict(pairs: &[(&str, &str)]) -> Vec<u8> {
    fn push_ascii(buf: &mut Vec<u8>, s: &str) {
        if s.len() < 15 {
            buf.push(0x50 | s.len() as u8);
        } else {
            buf.push(0x5f);
            buf.push(0x10);
            buf.push(s.len() as u8);
        }
        buf.extend_from_slice(s.as_bytes());
    }

    let mut buf = b"bplist00".to_vec();
    let mut offsets = Vec::new();
    let n = pairs.len();

    offsets.push(buf.len());
    buf.push(0xd0 | n as u8);
    for i in 0..n {
        buf.push((1 + i) as u8);
    }
    for i in 0..n {
        buf.push((1 + n + i) as u8);
    }
    for (key, _) in pairs {
        offsets.push(buf.len());
        push_ascii(&mut buf, key);
    }
    for (_, value) in pairs {
        offsets.push(buf.len());
        push_ascii(&mut buf, value);
    }

    let table_offset = buf.len();
    for off in &offsets {
        buf.push(*off as u8);
    }
    buf.extend_from_slice(&[0u8; 6]);
    buf.push(1);
    buf.push(1);
    buf.extend_from_slice(&(offsets.len() as u64).to_be_bytes());
    buf.extend_from_slice(&0u64.to_be_bytes());
    buf.extend_from_slice(&(table_offset as u64).to_be_bytes());
    buf
}

fn xml_plist(pairs: &[(&str, &str)]) -> Vec<u8> {
    let mut doc = String::from(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
         <plist version=\"1.0\">\n<dict>\n",
    );
    for (key, value) in pairs {
        doc.push_str(&format!("\t<key>{key}</key>\n\t<string>{value}</string>\n"));
    }
    doc.push_str("</dict>\n</plist>\n");
    doc.into_bytes()
}

#[test]
fn round_trip_stored_binary_plist() {
    let info = bplist_dict(&[
        ("CFBundleIdentifier", "com.example.x"),
        ("CFBundleVersion", "1.2.3"),
        ("CFBundleDisplayName", "Hello"),
    ]);
    let zip = build_zip(&[("Payload/X.app/Info.plist", STORED, &info)]);

    let meta = extract_meta(&zip).unwrap();
    assert_eq!(
        meta,
        IpaMeta {
            bundle_id: "com.example.x".into(),
            version: "1.2.3".into(),
            display_name: "Hello".into(),
        }
    );
}

#[test]
fn deflate_and_stored_agree() {
    let info = bplist_dict(&[
        ("CFBundleIdentifier", "com.example.x"),
        ("CFBundleVersion", "1.2.3"),
        ("CFBundleDisplayName", "Hello"),
    ]);
    let stored = build_zip(&[("Payload/X.app/Info.plist", STORED, &info)]);
    let deflated = build_zip(&[("Payload/X.app/Info.plist", DEFLATE, &info)]);

    assert_eq!(extract_meta(&stored).unwrap(), extract_meta(&deflated).unwrap());
}

#[test]
fn binary_and_xml_plists_agree() {
    let pairs = [
        ("CFBundleIdentifier", "com.example.x"),
        ("CFBundleShortVersionString", "2.0"),
        ("CFBundleDisplayName", "Agreed"),
    ];
    let binary = build_zip(&[("Payload/X.app/Info.plist", STORED, &bplist_dict(&pairs))]);
    let xml = build_zip(&[("Payload/X.app/Info.plist", STORED, &xml_plist(&pairs))]);

    assert_eq!(extract_meta(&binary).unwrap(), extract_meta(&xml).unwrap());
}

#[test]
fn version_falls_back_to_bundle_version() {
    let info = bplist_dict(&[
        ("CFBundleIdentifier", "com.example.x"),
        ("CFBundleVersion", "9"),
    ]);
    let zip = build_zip(&[("Payload/X.app/Info.plist", STORED, &info)]);

    assert_eq!(extract_meta(&zip).unwrap().version, "9");
}

#[test]
fn display_name_falls_back_to_executable() {
    let info = bplist_dict(&[
        ("CFBundleIdentifier", "com.example.x"),
        ("CFBundleExecutable", "RunnerBin"),
    ]);
    let zip = build_zip(&[("Payload/X.app/Info.plist", STORED, &info)]);

    assert_eq!(extract_meta(&zip).unwrap().display_name, "RunnerBin");
}

#[test]
fn display_name_empty_when_no_source_exists() {
    let info = bplist_dict(&[("CFBundleIdentifier", "com.example.x")]);
    let zip = build_zip(&[("Payload/X.app/Info.plist", STORED, &info)]);

    let meta = extract_meta(&zip).unwrap();
    assert_eq!(meta.display_name, "");
    assert_eq!(meta.version, "");
}

#[test]
fn placeholder_triggers_localized_lookup() {
    let info = bplist_dict(&[
        ("CFBundleIdentifier", "com.example.x"),
        ("CFBundleVersion", "1.0"),
        ("CFBundleDisplayName", "$(PRODUCT_NAME)"),
    ]);
    let zip = build_zip(&[
        ("Payload/X.app/Info.plist", STORED, &info),
        (
            "Payload/X.app/en.lproj/InfoPlist.strings",
            STORED,
            br#""CFBundleDisplayName" = "Real Name";"#,
        ),
    ]);

    assert_eq!(extract_meta(&zip).unwrap().display_name, "Real Name");
}

#[test]
fn localized_lookup_honors_development_region() {
    let info = bplist_dict(&[
        ("CFBundleIdentifier", "com.example.x"),
        ("CFBundleDevelopmentRegion", "de"),
        ("CFBundleDisplayName", "$(PRODUCT_NAME)"),
    ]);
    let zip = build_zip(&[
        ("Payload/X.app/Info.plist", STORED, &info),
        (
            "Payload/X.app/de.lproj/InfoPlist.strings",
            STORED,
            br#""CFBundleDisplayName" = "Echter Name";"#,
        ),
        (
            "Payload/X.app/Base.lproj/InfoPlist.strings",
            STORED,
            br#""CFBundleDisplayName" = "Base Name";"#,
        ),
    ]);

    assert_eq!(extract_meta(&zip).unwrap().display_name, "Echter Name");
}

#[test]
fn localized_lookup_falls_back_to_base_lproj() {
    let info = bplist_dict(&[
        ("CFBundleIdentifier", "com.example.x"),
        ("CFBundleDisplayName", "$(PRODUCT_NAME)"),
    ]);
    let zip = build_zip(&[
        ("Payload/X.app/Info.plist", STORED, &info),
        (
            "Payload/X.app/Base.lproj/InfoPlist.strings",
            STORED,
            br#""CFBundleName" = "Base Name";"#,
        ),
    ]);

    assert_eq!(extract_meta(&zip).unwrap().display_name, "Base Name");
}

#[test]
fn unresolved_placeholder_is_kept_without_tables() {
    let info = bplist_dict(&[
        ("CFBundleIdentifier", "com.example.x"),
        ("CFBundleDisplayName", "$(PRODUCT_NAME)"),
    ]);
    let zip = build_zip(&[("Payload/X.app/Info.plist", STORED, &info)]);

    // Not an error: the best-effort value survives
    assert_eq!(extract_meta(&zip).unwrap().display_name, "$(PRODUCT_NAME)");
}

#[test]
fn missing_info_plist_is_fatal() {
    let zip = build_zip(&[("Payload/X.app/Assets.car", STORED, b"not a plist")]);

    assert!(matches!(
        extract_meta(&zip),
        Err(Error::InfoPlistNotFound)
    ));
}

#[test]
fn missing_eocd_is_fatal() {
    let garbage = vec![0x42u8; 4096];

    assert!(matches!(
        extract_meta(&garbage),
        Err(Error::Archive(ArchiveError::NoEndOfCentralDirectory))
    ));
}

#[test]
fn unparsable_info_plist_is_fatal() {
    let zip = build_zip(&[("Payload/X.app/Info.plist", STORED, b"")]);

    assert!(matches!(
        extract_meta(&zip),
        Err(Error::InfoPlistUnparsable)
    ));
}

#[test]
fn extraction_is_idempotent() {
    let info = bplist_dict(&[
        ("CFBundleIdentifier", "com.example.x"),
        ("CFBundleVersion", "1.2.3"),
        ("CFBundleDisplayName", "Hello"),
    ]);
    let zip = build_zip(&[("Payload/X.app/Info.plist", STORED, &info)]);

    assert_eq!(extract_meta(&zip).unwrap(), extract_meta(&zip).unwrap());
}

#[test]
fn entry_name_matching_is_case_insensitive() {
    let info = xml_plist(&[("CFBundleIdentifier", "com.example.case")]);
    let zip = build_zip(&[("payload/MyApp.APP/info.PLIST", STORED, &info)]);

    assert_eq!(extract_meta(&zip).unwrap().bundle_id, "com.example.case");
}
