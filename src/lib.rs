//! # ipameta
//!
//! Extract identifying metadata from iOS application archives.
//!
//! An `.ipa` file is a ZIP container holding a `Payload/<Name>.app` bundle.
//! This library reads the archive's central directory, decompresses the
//! bundle's `Info.plist` (binary or XML property list), and resolves the
//! bundle identifier, version string, and display name, including the
//! localized `InfoPlist.strings` fallback chain for unresolved display
//! names. Everything is implemented over a plain byte buffer with no
//! archive or property-list crates.
//!
//! ## Example
//!
//! ```no_run
//! use ipameta::extract_meta;
//!
//! fn main() -> anyhow::Result<()> {
//!     let bytes = std::fs::read("MyApp.ipa")?;
//!     let meta = extract_meta(&bytes)?;
//!     println!("{} {} ({})", meta.bundle_id, meta.version, meta.display_name);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod error;
pub mod io;
pub mod meta;
pub mod plist;
pub mod strings;
pub mod text;
pub mod zip;

pub use cli::Cli;
pub use error::{ArchiveError, Error, Result};
pub use meta::{IpaMeta, extract_meta};
pub use plist::PlistValue;
pub use zip::{ZipArchive, ZipEntry};
