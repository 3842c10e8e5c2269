//! Text decoding with byte-order-mark detection.

/// Decode a byte range into text.
///
/// The 2-byte UTF-16 BOMs are checked before the UTF-8 BOM, since a
/// UTF-16 buffer would otherwise be misread as UTF-8. Buffers without a
/// BOM are treated as UTF-8. Decoding is lossy; invalid sequences become
/// replacement characters rather than failing.
pub fn decode(bytes: &[u8]) -> String {
    match bytes {
        [0xff, 0xfe, rest @ ..] => decode_utf16(rest, u16::from_le_bytes),
        [0xfe, 0xff, rest @ ..] => decode_utf16(rest, u16::from_be_bytes),
        [0xef, 0xbb, 0xbf, rest @ ..] => String::from_utf8_lossy(rest).into_owned(),
        _ => String::from_utf8_lossy(bytes).into_owned(),
    }
}

/// Decode UTF-16 code units assembled by `unit`. A trailing odd byte is
/// dropped.
fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> String {
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| unit([pair[0], pair[1]]))
        .collect();
    String::from_utf16_lossy(&units)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_without_bom() {
        assert_eq!(decode("hello".as_bytes()), "hello");
    }

    #[test]
    fn utf8_with_bom() {
        assert_eq!(decode(b"\xef\xbb\xbfhello"), "hello");
    }

    #[test]
    fn utf16_little_endian() {
        let mut buf = vec![0xff, 0xfe];
        for unit in "héllo".encode_utf16() {
            buf.extend_from_slice(&unit.to_le_bytes());
        }
        assert_eq!(decode(&buf), "héllo");
    }

    #[test]
    fn utf16_big_endian() {
        let mut buf = vec![0xfe, 0xff];
        for unit in "héllo".encode_utf16() {
            buf.extend_from_slice(&unit.to_be_bytes());
        }
        assert_eq!(decode(&buf), "héllo");
    }

    #[test]
    fn empty_input() {
        assert_eq!(decode(&[]), "");
    }
}
