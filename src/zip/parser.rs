//! Low-level ZIP archive parser.
//!
//! This module handles the binary parsing of ZIP file structures from a
//! byte buffer already in memory.
//!
//! ## Parsing Strategy
//!
//! ZIP files are designed to be read from the end:
//! 1. Find the End of Central Directory (EOCD) at the buffer's end
//! 2. Read the Central Directory to get metadata for all files
//! 3. For extraction, read each file's Local File Header and data

use byteorder::{LittleEndian, ReadBytesExt};
use flate2::read::DeflateDecoder;
use std::io::{Cursor, Read};

use crate::error::ArchiveError;

use super::structures::*;

/// Maximum ZIP comment size allowed by the format (65535 bytes).
///
/// This limits the search area when looking for EOCD with a comment.
const MAX_COMMENT_SIZE: usize = 65535;

/// ZIP archive reader over a borrowed byte buffer.
///
/// Holds no state beyond the borrow; listing and reading entries are
/// independent operations and the archive can be shared freely.
///
/// ## Example
///
/// ```ignore
/// let archive = ZipArchive::new(&bytes);
/// for entry in archive.entries()? {
///     let data = archive.read_entry(&entry)?;
///     // Inspect decompressed data...
/// }
/// ```
pub struct ZipArchive<'a> {
    buf: &'a [u8],
}

impl<'a> ZipArchive<'a> {
    /// Create an archive reader over the given buffer.
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    /// Find and parse the End of Central Directory record.
    ///
    /// The EOCD is located at the end of the ZIP file. This method
    /// handles both the simple case (no comment) and archives with
    /// comments by searching backwards for the signature, bounded to
    /// the maximum possible comment size.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::NoEndOfCentralDirectory`] if no valid
    /// EOCD can be found, indicating the buffer is not a ZIP archive.
    pub fn find_eocd(&self) -> Result<EndOfCentralDirectory, ArchiveError> {
        if self.buf.len() < EndOfCentralDirectory::SIZE {
            return Err(ArchiveError::NoEndOfCentralDirectory);
        }

        // Optimization: first try the simple case where there's no comment.
        let tail = &self.buf[self.buf.len() - EndOfCentralDirectory::SIZE..];
        if &tail[0..4] == EndOfCentralDirectory::SIGNATURE && &tail[20..22] == b"\x00\x00" {
            return EndOfCentralDirectory::from_bytes(tail);
        }

        // EOCD not at expected location - search for it.
        // The EOCD could be earlier if there's a ZIP comment.
        let search_size = (MAX_COMMENT_SIZE + EndOfCentralDirectory::SIZE).min(self.buf.len());
        let window = &self.buf[self.buf.len() - search_size..];

        // Search backwards for EOCD signature (PK\x05\x06)
        for i in (0..=window.len() - EndOfCentralDirectory::SIZE).rev() {
            if &window[i..i + 4] == EndOfCentralDirectory::SIGNATURE {
                // Found a potential EOCD - verify the comment length
                // field matches the remaining bytes.
                let comment_len = u16::from_le_bytes([window[i + 20], window[i + 21]]) as usize;

                if comment_len == window.len() - i - EndOfCentralDirectory::SIZE {
                    return EndOfCentralDirectory::from_bytes(
                        &window[i..i + EndOfCentralDirectory::SIZE],
                    );
                }
            }
        }

        Err(ArchiveError::NoEndOfCentralDirectory)
    }

    /// List all files in the ZIP archive.
    ///
    /// Reads the Central Directory to get metadata for all entries.
    /// Individual malformed headers truncate the walk rather than
    /// failing the whole archive, since some producers pad the
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns an error only if no EOCD record exists.
    pub fn entries(&self) -> Result<Vec<ZipEntry>, ArchiveError> {
        let eocd = self.find_eocd()?;

        let cd_start = eocd.cd_offset as usize;
        let cd_end = cd_start
            .saturating_add(eocd.cd_size as usize)
            .min(self.buf.len());

        let mut entries = Vec::with_capacity(eocd.total_entries as usize);
        let mut pos = cd_start;

        for _ in 0..eocd.total_entries {
            if pos + CDFH_MIN_SIZE > cd_end {
                break;
            }
            match self.parse_cdfh(pos, cd_end)? {
                Some((entry, next)) => {
                    entries.push(entry);
                    pos = next;
                }
                None => break,
            }
        }

        Ok(entries)
    }

    /// Parse one Central Directory File Header at `pos`.
    ///
    /// Returns the entry and the position of the following header, or
    /// `None` when the signature does not match (end of usable
    /// directory).
    fn parse_cdfh(
        &self,
        pos: usize,
        cd_end: usize,
    ) -> Result<Option<(ZipEntry, usize)>, ArchiveError> {
        let header = &self.buf[pos..pos + CDFH_MIN_SIZE];
        if &header[0..4] != CDFH_SIGNATURE {
            return Ok(None);
        }

        let mut cursor = Cursor::new(header);
        cursor.set_position(10);
        let compression_method = cursor.read_u16::<LittleEndian>()?;
        cursor.set_position(20);
        let compressed_size = cursor.read_u32::<LittleEndian>()?;
        cursor.set_position(28);
        let name_len = cursor.read_u16::<LittleEndian>()? as usize;
        let extra_len = cursor.read_u16::<LittleEndian>()? as usize;
        let comment_len = cursor.read_u16::<LittleEndian>()? as usize;
        cursor.set_position(42);
        let local_header_offset = cursor.read_u32::<LittleEndian>()?;

        let name_end = pos + CDFH_MIN_SIZE + name_len;
        if name_end > cd_end {
            return Ok(None);
        }

        // Use lossy conversion to handle non-UTF8 filenames gracefully
        let name = String::from_utf8_lossy(&self.buf[pos + CDFH_MIN_SIZE..name_end]).to_string();

        let entry = ZipEntry {
            name,
            compression_method: CompressionMethod::from_u16(compression_method),
            compressed_size,
            local_header_offset,
        };

        Ok(Some((entry, name_end + extra_len + comment_len)))
    }

    /// Read and decompress a single entry.
    ///
    /// Seeks to the entry's Local File Header, which has variable-length
    /// fields (filename, extra field) that may differ from the Central
    /// Directory entry, and slices `compressed_size` bytes past them.
    /// Stored data is copied out verbatim; DEFLATE data is inflated with
    /// a raw (no zlib wrapper) decoder.
    ///
    /// # Errors
    ///
    /// - [`ArchiveError::LocalHeaderMismatch`] if the header signature
    ///   at the recorded offset is wrong
    /// - [`ArchiveError::Truncated`] if the data runs past the buffer
    /// - [`ArchiveError::UnsupportedCompression`] for any method other
    ///   than stored or DEFLATE
    pub fn read_entry(&self, entry: &ZipEntry) -> Result<Vec<u8>, ArchiveError> {
        let offset = entry.local_header_offset as usize;
        let header = self
            .buf
            .get(offset..offset + LFH_SIZE)
            .ok_or(ArchiveError::LocalHeaderMismatch)?;

        // Verify LFH signature (PK\x03\x04)
        if &header[0..4] != LFH_SIGNATURE {
            return Err(ArchiveError::LocalHeaderMismatch);
        }

        // Read the variable field lengths from fixed positions in LFH
        let mut cursor = Cursor::new(header);
        cursor.set_position(26); // Offset to filename length field
        let name_len = cursor.read_u16::<LittleEndian>()? as usize;
        let extra_len = cursor.read_u16::<LittleEndian>()? as usize;

        // Data starts after: LFH (30 bytes) + filename + extra field
        let data_start = offset + LFH_SIZE + name_len + extra_len;
        let data = self
            .buf
            .get(data_start..data_start + entry.compressed_size as usize)
            .ok_or(ArchiveError::Truncated)?;

        match entry.compression_method {
            // Copied, not borrowed, since callers may outlive the source buffer
            CompressionMethod::Stored => Ok(data.to_vec()),
            CompressionMethod::Deflate => {
                let mut out = Vec::new();
                DeflateDecoder::new(data).read_to_end(&mut out)?;
                Ok(out)
            }
            CompressionMethod::Unknown(method) => {
                Err(ArchiveError::UnsupportedCompression(method))
            }
        }
    }
}
