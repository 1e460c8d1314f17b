// OpenAI Whisper engine for audio transcription

use anyhow::{Context, Result};
use async_trait::async_trait;
use prepmedia_core::TranscriptionResult;
use reqwest::multipart::{Form, Part};
use reqwest::{Body, Client};
use serde::Deserialize;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;
use tokio_util::io::ReaderStream;

use crate::engine::{classify_error_response, AudioUpload, EngineError, TranscriptionEngine};
use crate::validation::{validate_upload_size, OPENAI_MAX_UPLOAD_BYTES};

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

/// OpenAI-compatible `/audio/transcriptions` engine
pub struct WhisperEngine {
    http_client: Client,
    api_key: String,
    base_url: String,
    model: String,
    language: String,
}

impl Debug for WhisperEngine {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("WhisperEngine")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("language", &self.language)
            .finish_non_exhaustive()
    }
}

impl WhisperEngine {
    pub fn new(
        api_key: impl Into<String>,
        base_url: Option<String>,
        model: impl Into<String>,
        language: impl Into<String>,
    ) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(300)) // long recordings take a while to decode
            .build()
            .context("Failed to create HTTP client for OpenAI Whisper")?;

        Ok(Self {
            http_client,
            api_key: api_key.into(),
            base_url: base_url
                .unwrap_or_else(|| OPENAI_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            model: model.into(),
            language: language.into(),
        })
    }

    async fn file_part(&self, upload: &AudioUpload) -> Result<Part, EngineError> {
        let file = tokio::fs::File::open(&upload.path).await.map_err(|e| {
            EngineError::Other(format!("cannot open {}: {}", upload.path.display(), e))
        })?;

        Part::stream_with_length(Body::wrap_stream(ReaderStream::new(file)), upload.size_bytes)
            .file_name(upload.file_name.clone())
            .mime_str(&upload.content_type)
            .map_err(|e| EngineError::UnsupportedFormat(format!("mime: {}", e)))
    }
}

#[async_trait]
impl TranscriptionEngine for WhisperEngine {
    fn name(&self) -> &str {
        "openai_whisper"
    }

    async fn transcribe(&self, upload: &AudioUpload) -> Result<TranscriptionResult, EngineError> {
        validate_upload_size(upload.size_bytes, OPENAI_MAX_UPLOAD_BYTES, self.name())?;

        let url = format!("{}/audio/transcriptions", self.base_url);

        // Fixed decoding parameters keep repeated attempts on the same file consistent.
        let form = Form::new()
            .text("model", self.model.clone())
            .text("response_format", "verbose_json")
            .text("temperature", "0")
            .text("language", self.language.clone())
            .part("file", self.file_part(upload).await?);

        tracing::debug!(
            model = %self.model,
            file_name = %upload.file_name,
            size = upload.size_bytes,
            "Sending audio to OpenAI Whisper API"
        );

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| EngineError::Transport(format!("request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(classify_error_response(status.as_u16(), &body));
        }

        let transcript: VerboseTranscript = response
            .json()
            .await
            .map_err(|e| EngineError::Transport(format!("body: {}", e)))?;

        tracing::info!(
            chars = transcript.text.len(),
            duration = transcript.duration,
            "OpenAI Whisper transcription completed"
        );

        Ok(TranscriptionResult {
            text: transcript.text.trim().to_string(),
            language: transcript.language,
            duration_seconds: transcript.duration,
        })
    }
}

#[derive(Debug, Deserialize)]
struct VerboseTranscript {
    text: String,
    language: Option<String>,
    duration: Option<f64>,
}
