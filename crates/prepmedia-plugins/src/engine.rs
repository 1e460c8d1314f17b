//! Speech-to-text engine abstraction
//!
//! Engines talk to an external transcription service and report failures as a closed set
//! of tagged errors. Translating HTTP statuses and provider error bodies into that set
//! happens here and in the engine implementations, nowhere else.

use async_trait::async_trait;
use prepmedia_core::TranscriptionResult;
use serde::Deserialize;
use std::fmt::Debug;
use std::path::PathBuf;
use thiserror::Error;

/// A recording staged on local disk, ready to be streamed to an engine.
#[derive(Debug, Clone)]
pub struct AudioUpload {
    pub path: PathBuf,
    /// Name reported to the provider; providers sniff the container from its extension.
    pub file_name: String,
    pub content_type: String,
    pub size_bytes: u64,
}

/// Engine failures.
///
/// The set is closed so callers can classify every variant exhaustively.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("unsupported audio format: {0}")]
    UnsupportedFormat(String),

    #[error("audio file too large: {0}")]
    FileTooLarge(String),

    #[error("empty audio upload: {0}")]
    EmptyUpload(String),

    #[error("rate limited by transcription service: {0}")]
    RateLimited(String),

    #[error("transcription resource not found: {0}")]
    NotFound(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("transcription service error: {0}")]
    Other(String),
}

#[async_trait]
pub trait TranscriptionEngine: Send + Sync + Debug {
    /// Engine name used in logs
    fn name(&self) -> &str;

    /// Transcribe one staged recording.
    async fn transcribe(&self, upload: &AudioUpload) -> Result<TranscriptionResult, EngineError>;
}

/// OpenAI-style error envelope: `{"error": {"message": ..., "type": ..., "code": ...}}`.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    code: Option<String>,
}

/// Classify a non-success response from a transcription API.
pub fn classify_error_response(status: u16, body: &str) -> EngineError {
    let parsed = serde_json::from_str::<ErrorEnvelope>(body).ok();
    let message = parsed
        .as_ref()
        .map(|e| e.error.message.clone())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.trim().to_string());
    let code = parsed
        .as_ref()
        .and_then(|e| e.error.code.clone().or_else(|| e.error.kind.clone()))
        .unwrap_or_default();
    let detail = format!("status {}: {}", status, message);

    match status {
        429 => EngineError::RateLimited(detail),
        413 => EngineError::FileTooLarge(detail),
        415 => EngineError::UnsupportedFormat(detail),
        404 => EngineError::NotFound(detail),
        400 => {
            let lowered = message.to_lowercase();
            if code == "invalid_file_format"
                || code == "unsupported_file"
                || lowered.contains("invalid file format")
                || lowered.contains("unrecognized file format")
                || lowered.contains("could not be decoded")
            {
                EngineError::UnsupportedFormat(detail)
            } else if lowered.contains("maximum content size") || lowered.contains("too large") {
                EngineError::FileTooLarge(detail)
            } else {
                EngineError::Other(detail)
            }
        }
        _ => EngineError::Other(detail),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_rate_limit() {
        let body = r#"{"error":{"message":"Rate limit reached","type":"requests","code":"rate_limit_exceeded"}}"#;
        assert!(matches!(
            classify_error_response(429, body),
            EngineError::RateLimited(msg) if msg.contains("Rate limit reached")
        ));
    }

    #[test]
    fn test_classify_invalid_format() {
        let body = r#"{"error":{"message":"Invalid file format. Supported formats: ['flac', 'm4a', 'mp3']","type":"invalid_request_error","code":null}}"#;
        assert!(matches!(
            classify_error_response(400, body),
            EngineError::UnsupportedFormat(_)
        ));
    }

    #[test]
    fn test_classify_size_errors() {
        assert!(matches!(
            classify_error_response(413, "Request Entity Too Large"),
            EngineError::FileTooLarge(_)
        ));
        let body = r#"{"error":{"message":"Maximum content size limit (26214400) exceeded","type":"invalid_request_error"}}"#;
        assert!(matches!(
            classify_error_response(400, body),
            EngineError::FileTooLarge(_)
        ));
    }

    #[test]
    fn test_classify_not_found_and_other() {
        assert!(matches!(
            classify_error_response(404, "{}"),
            EngineError::NotFound(_)
        ));
        assert!(matches!(
            classify_error_response(503, "upstream connect error"),
            EngineError::Other(msg) if msg == "status 503: upstream connect error"
        ));
        assert!(matches!(
            classify_error_response(400, r#"{"error":{"message":"bad prompt"}}"#),
            EngineError::Other(_)
        ));
    }
}
