//! ZIP archive parsing over an in-memory buffer.
//!
//! An `.ipa` is an ordinary ZIP archive, so extraction starts here.
//!
//! ## Parsing Strategy
//!
//! ZIP files are designed to be read from the end:
//! 1. Find the End of Central Directory (EOCD) at the buffer's end
//! 2. Read the Central Directory to get metadata for all files
//! 3. For extraction, read the file's Local File Header and data
//!
//! Only one `Info.plist` and at most two `.strings` files are ever read
//! per extraction, so entries are decompressed individually on demand.
//!
//! ## Supported Features
//!
//! - Standard ZIP format (PKZIP APPNOTE 6.3.x compatible)
//! - STORED (no compression) method
//! - DEFLATE compression method
//!
//! ## Limitations
//!
//! - No encryption support
//! - No multi-disk archive support
//! - No ZIP64 (archive metadata is modeled with 32-bit offsets)

mod parser;
mod structures;

pub use parser::ZipArchive;
pub use structures::*;
