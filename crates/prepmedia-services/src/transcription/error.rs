use prepmedia_core::AppError;
use prepmedia_plugins::EngineError;
use thiserror::Error;

/// Transcription pipeline failures.
///
/// Every variant is either fatal (retrying cannot help) or retryable (a later attempt may
/// succeed); see [`TranscriptionError::is_retryable`].
#[derive(Debug, Error)]
pub enum TranscriptionError {
    #[error("invalid audio key: {0}")]
    Validation(String),

    #[error("transcription is not configured: {0}")]
    Configuration(String),

    #[error("audio rejected: {0}")]
    Input(String),

    #[error("audio not found: {0}")]
    NotFound(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("downloaded audio file is empty")]
    EmptyFile,

    #[error("transcription service unavailable: {0}")]
    Service(String),

    #[error("unexpected transcription error: {0}")]
    Unknown(String),

    #[error("transcription failed after {attempts} attempts: {source}")]
    Failed {
        attempts: u32,
        source: Box<TranscriptionError>,
    },
}

impl TranscriptionError {
    pub fn is_retryable(&self) -> bool {
        match self {
            TranscriptionError::Network(_)
            | TranscriptionError::EmptyFile
            | TranscriptionError::Service(_)
            | TranscriptionError::Unknown(_) => true,
            TranscriptionError::Validation(_)
            | TranscriptionError::Configuration(_)
            | TranscriptionError::Input(_)
            | TranscriptionError::NotFound(_)
            | TranscriptionError::Failed { .. } => false,
        }
    }

    /// The error that ended the last attempt.
    pub fn last_cause(&self) -> &TranscriptionError {
        match self {
            TranscriptionError::Failed { source, .. } => source.last_cause(),
            other => other,
        }
    }

    /// Number of attempts made before giving up.
    pub fn attempts(&self) -> u32 {
        match self {
            TranscriptionError::Failed { attempts, .. } => *attempts,
            _ => 1,
        }
    }
}

impl From<EngineError> for TranscriptionError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::UnsupportedFormat(msg) | EngineError::FileTooLarge(msg) => {
                TranscriptionError::Input(msg)
            }
            EngineError::EmptyUpload(_) => TranscriptionError::EmptyFile,
            EngineError::RateLimited(msg) => TranscriptionError::Service(msg),
            EngineError::NotFound(msg) => TranscriptionError::NotFound(msg),
            EngineError::Transport(msg) | EngineError::Other(msg) => {
                TranscriptionError::Unknown(msg)
            }
        }
    }
}

impl From<TranscriptionError> for AppError {
    fn from(err: TranscriptionError) -> Self {
        match err {
            TranscriptionError::Validation(_) => AppError::InvalidInput(err.to_string()),
            TranscriptionError::Configuration(_) => AppError::Configuration(err.to_string()),
            TranscriptionError::Input(_) => AppError::UnsupportedMedia(err.to_string()),
            TranscriptionError::NotFound(_) => AppError::NotFound(err.to_string()),
            TranscriptionError::Service(_) => AppError::RateLimited(err.to_string()),
            TranscriptionError::Network(_)
            | TranscriptionError::EmptyFile
            | TranscriptionError::Unknown(_) => AppError::Upstream(err.to_string()),
            TranscriptionError::Failed { source, .. } => AppError::from(*source),
        }
    }
}
