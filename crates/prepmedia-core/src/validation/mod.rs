//! Validation modules

pub mod audio;

pub use audio::{audio_content_type, validate_audio_file, AudioKeyRules};
