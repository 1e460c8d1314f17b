use futures::StreamExt;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use tokio::io::AsyncWriteExt;

use super::error::TranscriptionError;
use super::staging::StagedRecording;

/// Stream `url` into `target`, returning the number of bytes written.
///
/// `timeout` bounds the whole exchange, headers and body. Signed URLs never appear in
/// errors or logs.
pub async fn download_to_file(
    client: &Client,
    url: &str,
    target: &StagedRecording,
    timeout: Duration,
    max_bytes: u64,
) -> Result<u64, TranscriptionError> {
    match tokio::time::timeout(timeout, stream_into(client, url, target, max_bytes)).await {
        Ok(result) => result,
        Err(_) => Err(TranscriptionError::Network(format!(
            "download timed out after {} ms",
            timeout.as_millis()
        ))),
    }
}

async fn stream_into(
    client: &Client,
    url: &str,
    target: &StagedRecording,
    max_bytes: u64,
) -> Result<u64, TranscriptionError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| {
            TranscriptionError::Network(format!("request failed: {}", e.without_url()))
        })?;

    let status = response.status();
    if status == StatusCode::NOT_FOUND {
        return Err(TranscriptionError::NotFound(
            "CDN returned 404 for the recording".to_string(),
        ));
    }
    if !status.is_success() {
        return Err(TranscriptionError::Network(format!(
            "CDN returned {}",
            status
        )));
    }

    let mut file = target.open_for_write().await.map_err(|e| {
        TranscriptionError::Unknown(format!("cannot open staged recording: {}", e))
    })?;

    let mut written: u64 = 0;
    let mut body = response.bytes_stream();
    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(|e| {
            TranscriptionError::Network(format!(
                "download interrupted after {} bytes: {}",
                written,
                e.without_url()
            ))
        })?;

        written += chunk.len() as u64;
        if written > max_bytes {
            return Err(TranscriptionError::Input(format!(
                "recording exceeds the {} byte limit",
                max_bytes
            )));
        }

        file.write_all(&chunk).await.map_err(|e| {
            TranscriptionError::Unknown(format!("cannot write staged recording: {}", e))
        })?;
    }

    file.flush().await.map_err(|e| {
        TranscriptionError::Unknown(format!("cannot flush staged recording: {}", e))
    })?;

    Ok(written)
}
