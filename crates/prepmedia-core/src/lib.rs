//! Prepmedia Core Library
//!
//! This crate provides the configuration, domain models, error types and validation
//! shared by the signing, transcription and CLI crates.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use config::{
    Config, ConfigError, LogFormat, SigningConfig, TranscriptionConfig, TranscriptionProvider,
};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{MediaCategory, SecureUrlOptions, SignedUrlResult, TranscriptionResult};
pub use validation::{audio_content_type, validate_audio_file, AudioKeyRules};
