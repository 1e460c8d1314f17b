pub mod media;
pub mod signed_url;
pub mod transcription;

pub use media::MediaCategory;
pub use signed_url::{SecureUrlOptions, SignedUrlResult};
pub use transcription::TranscriptionResult;
