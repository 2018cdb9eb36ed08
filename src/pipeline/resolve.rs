//! File resolution: turn a Telegram file handle into a download URL, and
//! fetch raw bytes behind such a URL.
//!
//! Photos never get downloaded by the relay itself; their URL is handed
//! straight to the vision provider, which fetches it. PDFs have to be
//! rasterised locally, so the document flow also calls [`download_file`].

use crate::error::RelayError;
use crate::telegram::{GetFileResponse, TelegramClient};
use tracing::debug;

/// Resolve a file handle to a fully-qualified download URL via `getFile`.
///
/// Each call hits the Bot API; nothing is cached between updates.
///
/// # Errors
/// [`RelayError::Resolution`] when the request fails, the body is not a
/// `getFile` response, `ok` is false, or no `file_path` is returned.
pub async fn resolve_file_url(client: &TelegramClient, file_id: &str) -> Result<String, RelayError> {
    let response = client
        .http()
        .get(client.method_url("getFile"))
        .query(&[("file_id", file_id)])
        .send()
        .await
        .map_err(|e| RelayError::resolution(file_id, format!("request failed: {}", e.without_url())))?;

    let body = response
        .text()
        .await
        .map_err(|e| RelayError::resolution(file_id, format!("failed to read body: {}", e.without_url())))?;

    let parsed: GetFileResponse = serde_json::from_str(&body)
        .map_err(|e| RelayError::resolution(file_id, format!("unparseable response: {e}")))?;

    if !parsed.ok {
        let description = parsed
            .description
            .unwrap_or_else(|| "file not found".to_string());
        return Err(RelayError::resolution(file_id, description));
    }

    let file_path = parsed
        .result
        .and_then(|f| f.file_path)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| RelayError::resolution(file_id, "response carried no file_path"))?;

    debug!("Resolved {} → {}", file_id, file_path);
    Ok(client.file_url(&file_path))
}

/// Download the bytes behind a resolved file URL.
///
/// File URLs embed the bot token, so transport errors are stripped of their
/// URL before they are logged.
///
/// # Errors
/// [`RelayError::Download`] on transport failure or a non-success status.
pub async fn download_file(client: &TelegramClient, url: &str) -> Result<Vec<u8>, RelayError> {
    let response = client
        .http()
        .get(url)
        .send()
        .await
        .map_err(|e| RelayError::Download {
            reason: e.without_url().to_string(),
        })?;

    if !response.status().is_success() {
        return Err(RelayError::Download {
            reason: format!("HTTP {}", response.status()),
        });
    }

    let bytes = response.bytes().await.map_err(|e| RelayError::Download {
        reason: e.without_url().to_string(),
    })?;

    debug!("Downloaded {} bytes", bytes.len());
    Ok(bytes.to_vec())
}
