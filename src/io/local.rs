use anyhow::Result;
use std::path::Path;

/// Read a local archive into memory.
pub async fn read_file(path: &Path) -> Result<Vec<u8>> {
    Ok(tokio::fs::read(path).await?)
}
