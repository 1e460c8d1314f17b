//! Audio transcription pipeline
//!
//! Turns a learner recording stored behind the CDN into text. The recording is fetched
//! through a short-lived signed URL into a scoped local file, handed to a speech-to-text
//! engine and deleted again, whatever the outcome.

pub mod download;
pub mod error;
pub mod pipeline;
pub mod staging;

pub use error::TranscriptionError;
pub use pipeline::{compute_retry_backoff, AudioTranscriptionPipeline};
pub use staging::StagedRecording;
