//! Archive byte retrieval.
//!
//! Extraction itself is a pure computation over an in-memory buffer;
//! this module only gets the buffer into memory, from a local path or
//! over HTTP.

mod http;
mod local;

pub use http::download;
pub use local::read_file;
