// Assembly AI engine for audio transcription

use anyhow::{Context, Result};
use async_trait::async_trait;
use prepmedia_core::TranscriptionResult;
use reqwest::{Body, Client, Response};
use serde::Deserialize;
use serde_json::json;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::io::ReaderStream;

use crate::engine::{classify_error_response, AudioUpload, EngineError, TranscriptionEngine};
use crate::validation::{validate_upload_size, ASSEMBLY_AI_MAX_UPLOAD_BYTES};

pub const ASSEMBLY_AI_BASE_URL: &str = "https://api.assemblyai.com/v2";

/// Polling gives up after this many status checks.
const MAX_POLL_ATTEMPTS: u32 = 120;

/// Polling delay grows by one interval per attempt up to this many intervals.
const MAX_POLL_INTERVALS: u32 = 5;

/// Assembly AI engine: upload, start a transcript job, poll until it settles
pub struct AssemblyAiEngine {
    http_client: Client,
    api_key: String,
    base_url: String,
    language_code: String,
    speech_model: String,
    poll_interval: Duration,
}

impl Debug for AssemblyAiEngine {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("AssemblyAiEngine")
            .field("base_url", &self.base_url)
            .field("language_code", &self.language_code)
            .field("speech_model", &self.speech_model)
            .finish_non_exhaustive()
    }
}

impl AssemblyAiEngine {
    pub fn new(
        api_key: impl Into<String>,
        base_url: Option<String>,
        language_code: impl Into<String>,
    ) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(300)) // 5 minute timeout for long audio files
            .build()
            .context("Failed to create HTTP client for Assembly AI")?;

        Ok(Self {
            http_client,
            api_key: api_key.into(),
            base_url: base_url
                .unwrap_or_else(|| ASSEMBLY_AI_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            language_code: language_code.into(),
            speech_model: "best".to_string(),
            poll_interval: Duration::from_secs(1),
        })
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    async fn error_from(response: Response) -> EngineError {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        classify_error_response(status, &body)
    }

    /// Upload the staged file to Assembly AI
    async fn upload_audio(&self, upload: &AudioUpload) -> Result<String, EngineError> {
        let url = format!("{}/upload", self.base_url);

        let file = tokio::fs::File::open(&upload.path).await.map_err(|e| {
            EngineError::Other(format!("cannot open {}: {}", upload.path.display(), e))
        })?;

        let response = self
            .http_client
            .post(&url)
            .header("authorization", &self.api_key)
            .header("content-type", "application/octet-stream")
            .header("content-length", upload.size_bytes)
            .body(Body::wrap_stream(ReaderStream::new(file)))
            .send()
            .await
            .map_err(|e| EngineError::Transport(format!("upload: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let upload_response: UploadResponse = response
            .json()
            .await
            .map_err(|e| EngineError::Transport(format!("upload response: {}", e)))?;

        Ok(upload_response.upload_url)
    }

    /// Start transcription job
    async fn start_transcription(&self, upload_url: &str) -> Result<String, EngineError> {
        let url = format!("{}/transcript", self.base_url);

        let request_body = json!({
            "audio_url": upload_url,
            "language_code": self.language_code,
            "speech_model": self.speech_model,
        });

        let response = self
            .http_client
            .post(&url)
            .header("authorization", &self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| EngineError::Transport(format!("start: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let transcript_response: TranscriptResponse = response
            .json()
            .await
            .map_err(|e| EngineError::Transport(format!("start response: {}", e)))?;

        Ok(transcript_response.id)
    }

    /// Poll for transcription completion
    async fn poll_transcription(&self, transcript_id: &str) -> Result<TranscriptStatus, EngineError> {
        let url = format!("{}/transcript/{}", self.base_url, transcript_id);

        let mut attempts = 0;

        loop {
            let response = self
                .http_client
                .get(&url)
                .header("authorization", &self.api_key)
                .send()
                .await
                .map_err(|e| EngineError::Transport(format!("poll: {}", e)))?;

            if !response.status().is_success() {
                return Err(Self::error_from(response).await);
            }

            let transcript: TranscriptStatus = response
                .json()
                .await
                .map_err(|e| EngineError::Transport(format!("poll response: {}", e)))?;

            match transcript.status.as_str() {
                "completed" => return Ok(transcript),
                "error" => {
                    return Err(classify_job_error(
                        transcript.error.as_deref().unwrap_or("Unknown error"),
                    ))
                }
                _ => {
                    // "queued" or "processing"
                    attempts += 1;
                    if attempts >= MAX_POLL_ATTEMPTS {
                        return Err(EngineError::Other(format!(
                            "transcript {} not finished after {} status checks",
                            transcript_id, MAX_POLL_ATTEMPTS
                        )));
                    }

                    sleep(self.poll_interval * attempts.min(MAX_POLL_INTERVALS)).await;
                }
            }
        }
    }
}

/// Classify the `error` field of a failed transcript job.
fn classify_job_error(message: &str) -> EngineError {
    let lowered = message.to_lowercase();
    if lowered.contains("does not appear to contain audio")
        || lowered.contains("transcoding failed")
        || lowered.contains("unsupported")
    {
        EngineError::UnsupportedFormat(message.to_string())
    } else if lowered.contains("too large") || lowered.contains("exceeds") {
        EngineError::FileTooLarge(message.to_string())
    } else {
        EngineError::Other(message.to_string())
    }
}

#[async_trait]
impl TranscriptionEngine for AssemblyAiEngine {
    fn name(&self) -> &str {
        "assembly_ai"
    }

    async fn transcribe(&self, upload: &AudioUpload) -> Result<TranscriptionResult, EngineError> {
        validate_upload_size(upload.size_bytes, ASSEMBLY_AI_MAX_UPLOAD_BYTES, self.name())?;

        let upload_url = self.upload_audio(upload).await?;
        tracing::debug!(file_name = %upload.file_name, "Audio uploaded, starting transcription");

        let transcript_id = self.start_transcription(&upload_url).await?;
        tracing::debug!(
            transcript_id = %transcript_id,
            "Transcription started, polling for completion"
        );

        let transcript = self.poll_transcription(&transcript_id).await?;

        tracing::info!(
            transcript_id = %transcript_id,
            text_length = transcript.text.as_ref().map(|t| t.len()).unwrap_or(0),
            "Assembly AI transcription completed"
        );

        Ok(TranscriptionResult {
            text: transcript.text.unwrap_or_default().trim().to_string(),
            language: transcript.language_code,
            duration_seconds: transcript.audio_duration,
        })
    }
}

// Assembly AI API response types
#[derive(Debug, Deserialize)]
struct UploadResponse {
    upload_url: String,
}

#[derive(Debug, Deserialize)]
struct TranscriptResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct TranscriptStatus {
    status: String,
    text: Option<String>,
    language_code: Option<String>,
    audio_duration: Option<f64>,
    error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn staged_upload(dir: &tempfile::TempDir) -> AudioUpload {
        let path = dir.path().join("recording.mp3");
        std::fs::write(&path, b"fake-mp3-bytes").unwrap();
        AudioUpload {
            path,
            file_name: "abc123.mp3".to_string(),
            content_type: "audio/mpeg".to_string(),
            size_bytes: 14,
        }
    }

    fn engine(base_url: String) -> AssemblyAiEngine {
        AssemblyAiEngine::new("test-api-key-123", Some(base_url), "en")
            .unwrap()
            .with_poll_interval(Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_transcribe_upload_start_poll() {
        let mut server = mockito::Server::new_async().await;
        let upload_url = format!("{}/files/abc", server.url());

        let upload_mock = server
            .mock("POST", "/upload")
            .match_header("authorization", "test-api-key-123")
            .match_body("fake-mp3-bytes")
            .with_status(200)
            .with_body(json!({ "upload_url": upload_url }).to_string())
            .create_async()
            .await;
        let start_mock = server
            .mock("POST", "/transcript")
            .match_body(Matcher::PartialJson(json!({
                "audio_url": upload_url,
                "language_code": "en",
            })))
            .with_status(200)
            .with_body(r#"{"id":"tx-1","status":"queued"}"#)
            .create_async()
            .await;
        let poll_mock = server
            .mock("GET", "/transcript/tx-1")
            .match_header("authorization", "test-api-key-123")
            .with_status(200)
            .with_body(r#"{"id":"tx-1","status":"completed","text":" Photosynthesis needs light. ","language_code":"en","audio_duration":4}"#)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let upload = staged_upload(&dir);
        let result = engine(server.url()).transcribe(&upload).await.unwrap();
        upload_mock.assert_async().await;
        start_mock.assert_async().await;
        poll_mock.assert_async().await;
        assert_eq!(result.text, "Photosynthesis needs light.");
        assert_eq!(result.language.as_deref(), Some("en"));
        assert_eq!(result.duration_seconds, Some(4.0));
    }

    #[tokio::test]
    async fn test_job_error_is_classified() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/upload")
            .with_status(200)
            .with_body(r#"{"upload_url":"https://cdn.assemblyai.com/upload/abc"}"#)
            .create_async()
            .await;
        server
            .mock("POST", "/transcript")
            .with_status(200)
            .with_body(r#"{"id":"tx-2","status":"queued"}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/transcript/tx-2")
            .with_status(200)
            .with_body(r#"{"id":"tx-2","status":"error","error":"Transcoding failed. File does not appear to contain audio."}"#)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let err = engine(server.url())
            .transcribe(&staged_upload(&dir))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::UnsupportedFormat(_)));
    }

    #[tokio::test]
    async fn test_upload_rate_limited() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/upload")
            .with_status(429)
            .with_body(r#"{"error":"Too many requests"}"#)
            .create_async()
            .await;

        let dir = tempfile::tempdir().unwrap();
        let err = engine(server.url())
            .transcribe(&staged_upload(&dir))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::RateLimited(_)));
    }

    #[test]
    fn test_classify_job_error() {
        assert!(matches!(
            classify_job_error("Audio duration exceeds the maximum"),
            EngineError::FileTooLarge(_)
        ));
        assert!(matches!(
            classify_job_error("Internal server error"),
            EngineError::Other(_)
        ));
    }
}
