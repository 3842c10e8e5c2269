use anyhow::{Result, bail};
use reqwest::Client;
use std::time::Duration;

const MAX_RETRY: u32 = 3;

/// Download a remote archive into memory.
///
/// Transient connection failures (timeout, connect) are retried with a
/// short backoff; an HTTP error status fails the download immediately.
pub async fn download(url: &str) -> Result<Vec<u8>> {
    let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

    let mut retry_count = 0;
    loop {
        match client.get(url).send().await {
            Ok(resp) => {
                if !resp.status().is_success() {
                    bail!("HTTP request failed with status: {}", resp.status());
                }
                let bytes = resp.bytes().await?;
                log::debug!("downloaded {} bytes from {}", bytes.len(), url);
                return Ok(bytes.to_vec());
            }
            Err(e) if e.is_timeout() || e.is_connect() => {
                retry_count += 1;
                if retry_count >= MAX_RETRY {
                    bail!("Max retries exceeded");
                }
                log::warn!(
                    "connection error, retry {}/{}: {}",
                    retry_count,
                    MAX_RETRY,
                    e
                );
                tokio::time::sleep(Duration::from_millis(500 * retry_count as u64)).await;
            }
            Err(e) => return Err(e.into()),
        }
    }
}
