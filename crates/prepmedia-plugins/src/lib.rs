//! Prepmedia Plugins Library
//!
//! Speech-to-text engines used by the transcription pipeline. Each engine streams a staged
//! recording to an external service and reports failures as [`EngineError`].

pub mod engine;
pub mod factory;
pub mod validation;

#[cfg(feature = "engine-assembly-ai")]
pub mod assembly_ai;
#[cfg(feature = "engine-openai")]
pub mod whisper;

// Re-export commonly used types
#[cfg(feature = "engine-assembly-ai")]
pub use assembly_ai::AssemblyAiEngine;
pub use engine::{classify_error_response, AudioUpload, EngineError, TranscriptionEngine};
pub use factory::create_engine;
#[cfg(feature = "engine-openai")]
pub use whisper::WhisperEngine;
