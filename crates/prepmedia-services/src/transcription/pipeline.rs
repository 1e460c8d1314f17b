use prepmedia_core::validation::audio::extension_of;
use prepmedia_core::{
    audio_content_type, Config, SecureUrlOptions, TranscriptionConfig, TranscriptionResult,
};
use prepmedia_plugins::{create_engine, AudioUpload, TranscriptionEngine};
use prepmedia_storage::resolve_key;
use reqwest::Client;
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::sleep;

use super::download::download_to_file;
use super::error::TranscriptionError;
use super::staging::StagedRecording;
use crate::secure_url::SecureUrlService;

/// Largest doubling applied to the base delay.
const MAX_BACKOFF_DOUBLINGS: u32 = 16;

/// Delay before attempt `attempt + 1`: `base * 2^(attempt - 1)`.
pub fn compute_retry_backoff(base: Duration, attempt: u32) -> Duration {
    let doublings = attempt.saturating_sub(1).min(MAX_BACKOFF_DOUBLINGS);
    base.saturating_mul(1u32 << doublings)
}

/// Downloads learner recordings through signed CDN URLs and transcribes them.
///
/// Each attempt runs validate, sign, download, verify, transcribe and cleanup in order.
/// Retryable failures are retried with exponential backoff; fatal ones end the run.
#[derive(Debug, Clone)]
pub struct AudioTranscriptionPipeline {
    urls: SecureUrlService,
    engine: Arc<dyn TranscriptionEngine>,
    http_client: Client,
    config: TranscriptionConfig,
}

impl AudioTranscriptionPipeline {
    pub fn new(
        urls: SecureUrlService,
        engine: Arc<dyn TranscriptionEngine>,
        config: TranscriptionConfig,
    ) -> Result<Self, TranscriptionError> {
        let http_client = Client::builder().build().map_err(|e| {
            TranscriptionError::Configuration(format!("cannot build HTTP client: {}", e))
        })?;

        Ok(Self {
            urls,
            engine,
            http_client,
            config,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, TranscriptionError> {
        let urls = SecureUrlService::from_config(config);
        let engine = create_engine(config.transcription())
            .map_err(|e| TranscriptionError::Configuration(e.to_string()))?;
        Self::new(urls, engine, config.transcription().clone())
    }

    pub fn config(&self) -> &TranscriptionConfig {
        &self.config
    }

    /// Transcribe with the configured retry budget.
    pub async fn transcribe(
        &self,
        object_key: &str,
    ) -> Result<TranscriptionResult, TranscriptionError> {
        self.transcribe_audio_with_retry(object_key, self.config.max_retries)
            .await
    }

    /// Transcribe a recording, making at most `max_retries` attempts (at least one).
    #[tracing::instrument(skip(self), fields(engine = %self.engine.name()))]
    pub async fn transcribe_audio_with_retry(
        &self,
        object_key: &str,
        max_retries: u32,
    ) -> Result<TranscriptionResult, TranscriptionError> {
        let key = resolve_key(object_key);
        self.config
            .audio_rules()
            .check(&key)
            .map_err(TranscriptionError::Validation)?;

        let max_attempts = max_retries.max(1);
        let started = Instant::now();
        let mut attempt = 1;

        loop {
            let attempt_started = Instant::now();
            match self.run_attempt(&key).await {
                Ok(result) => {
                    tracing::info!(
                        key = %key,
                        attempt = attempt,
                        duration_ms = attempt_started.elapsed().as_millis() as u64,
                        total_ms = started.elapsed().as_millis() as u64,
                        chars = result.text.len(),
                        "Transcription succeeded"
                    );
                    return Ok(result);
                }
                Err(err) if !err.is_retryable() => {
                    tracing::warn!(
                        key = %key,
                        attempt = attempt,
                        duration_ms = attempt_started.elapsed().as_millis() as u64,
                        error = %err,
                        "Transcription failed with unrecoverable error, will not retry"
                    );
                    return Err(err);
                }
                Err(err) if attempt >= max_attempts => {
                    tracing::error!(
                        key = %key,
                        attempt = attempt,
                        duration_ms = attempt_started.elapsed().as_millis() as u64,
                        total_ms = started.elapsed().as_millis() as u64,
                        error = %err,
                        "Transcription failed, retries exhausted"
                    );
                    return Err(TranscriptionError::Failed {
                        attempts: attempt,
                        source: Box::new(err),
                    });
                }
                Err(err) => {
                    let backoff = compute_retry_backoff(self.config.retry_base_delay, attempt);
                    tracing::warn!(
                        key = %key,
                        attempt = attempt,
                        max_attempts = max_attempts,
                        duration_ms = attempt_started.elapsed().as_millis() as u64,
                        backoff_ms = backoff.as_millis() as u64,
                        error = %err,
                        "Transcription attempt failed, scheduling retry"
                    );
                    sleep(backoff).await;
                    attempt += 1;
                }
            }
        }
    }

    async fn run_attempt(&self, key: &str) -> Result<TranscriptionResult, TranscriptionError> {
        let signed = self
            .urls
            .generate_secure_audio_url(
                key,
                SecureUrlOptions::expiring_in_hours(self.config.url_expiration_hours),
            )
            .map_err(|e| TranscriptionError::Configuration(e.to_string()))?;

        let extension = extension_of(key).unwrap_or_default();
        let staged = StagedRecording::create(&self.config.staging_dir, &extension)
            .map_err(staging_error)?;

        let outcome = self
            .download_and_transcribe(key, &extension, &signed.signed_url, &staged)
            .await;

        if let Err(e) = staged.close() {
            tracing::warn!(key = %key, error = %e, "Failed to remove staged recording");
        }

        outcome
    }

    async fn download_and_transcribe(
        &self,
        key: &str,
        extension: &str,
        signed_url: &str,
        staged: &StagedRecording,
    ) -> Result<TranscriptionResult, TranscriptionError> {
        let downloaded = download_to_file(
            &self.http_client,
            signed_url,
            staged,
            self.config.download_timeout,
            self.config.max_audio_size_bytes,
        )
        .await?;

        let size = staged.len().await.map_err(|e| {
            TranscriptionError::Unknown(format!("cannot stat staged recording: {}", e))
        })?;
        if size == 0 {
            return Err(TranscriptionError::EmptyFile);
        }
        if size > self.config.max_audio_size_bytes {
            return Err(TranscriptionError::Input(format!(
                "recording is {} bytes, limit is {} bytes",
                size, self.config.max_audio_size_bytes
            )));
        }

        tracing::debug!(key = %key, bytes = downloaded, "Recording downloaded");

        let upload = AudioUpload {
            path: staged.path().to_path_buf(),
            file_name: key.rsplit('/').next().unwrap_or(key).to_string(),
            content_type: audio_content_type(extension).to_string(),
            size_bytes: size,
        };

        Ok(self.engine.transcribe(&upload).await?)
    }
}

/// A staging directory that is missing or not writable will not fix itself.
fn staging_error(err: io::Error) -> TranscriptionError {
    match err.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => {
            TranscriptionError::Configuration(format!("staging directory unusable: {}", err))
        }
        _ => TranscriptionError::Unknown(format!("cannot create staged recording: {}", err)),
    }
}
