//! Error types for archive parsing and metadata extraction.
//!
//! Only two kinds of failure are fatal to an extraction: the archive not
//! being a structurally usable ZIP, and the `Info.plist` being absent or
//! unreadable. Every other irregularity (missing keys, malformed
//! `.strings` lines, padded central directory entries) degrades to a
//! default value instead of surfacing here.

use thiserror::Error;

/// Convenience alias for extraction results.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures at the ZIP container level.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// No End of Central Directory signature within the scannable tail
    /// window. The buffer is not a valid ZIP archive.
    #[error("end of central directory record not found")]
    NoEndOfCentralDirectory,

    /// The local file header at the recorded offset does not carry the
    /// expected signature; the archive is corrupt or non-standard.
    #[error("local file header signature mismatch")]
    LocalHeaderMismatch,

    /// The entry uses a compression method other than stored or DEFLATE.
    #[error("unsupported compression method {0}")]
    UnsupportedCompression(u16),

    /// Entry data extends past the end of the buffer.
    #[error("archive truncated")]
    Truncated,

    /// A read from the buffer or the DEFLATE stream failed.
    #[error("archive read error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures of a whole metadata extraction.
#[derive(Debug, Error)]
pub enum Error {
    /// The ZIP container itself could not be read.
    #[error(transparent)]
    Archive(#[from] ArchiveError),

    /// No `Payload/<Name>.app/Info.plist` entry exists in the archive,
    /// so it is not a usable app bundle.
    #[error("Info.plist not found in archive")]
    InfoPlistNotFound,

    /// Neither binary nor XML property list parsing produced a value
    /// for the `Info.plist` entry.
    #[error("Info.plist could not be parsed")]
    InfoPlistUnparsable,
}
