//! Prepmedia Services Layer
//!
//! This crate hosts the services the rest of the platform calls: signed URL issuance for
//! every media category and the audio transcription pipeline. It re-exports the types
//! callers need so that they depend on a single facade.

pub mod secure_url;
pub mod transcription;

pub use prepmedia_core::validation::validate_audio_file;
pub use prepmedia_core::{MediaCategory, SecureUrlOptions, SignedUrlResult, TranscriptionResult};
pub use prepmedia_plugins::{create_engine, TranscriptionEngine};
pub use prepmedia_storage::{resolve_key, SigningError, UrlSigner};
pub use secure_url::SecureUrlService;
pub use transcription::{AudioTranscriptionPipeline, TranscriptionError};
