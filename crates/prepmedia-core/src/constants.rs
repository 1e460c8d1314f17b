//! Application-wide constants.

/// Lifetime of a signed media URL when the caller does not pick one.
pub const DEFAULT_SIGNED_URL_EXPIRATION_HOURS: u32 = 24;

/// Lifetime of the signed URL the transcription pipeline downloads from.
/// Kept short: the URL only has to survive one download.
pub const TRANSCRIPTION_URL_EXPIRATION_HOURS: u32 = 1;

/// Namespace every user recording lives under in object storage.
pub const AUDIO_RECORDINGS_PREFIX: &str = "audio/user-recordings/";

/// Extensions accepted for user recordings (lowercase, without the dot).
pub const AUDIO_ALLOWED_EXTENSIONS: &[&str] =
    &["webm", "mp3", "wav", "m4a", "ogg", "mp4", "mpeg", "mpga"];

/// Hard wall-clock limit for downloading one recording.
pub const DOWNLOAD_TIMEOUT_SECS: u64 = 30;

/// Attempts made by the transcription pipeline before giving up.
pub const TRANSCRIPTION_MAX_RETRIES: u32 = 3;

/// First backoff delay; doubles on every subsequent attempt.
pub const TRANSCRIPTION_RETRY_BASE_DELAY_MS: u64 = 1000;

/// Largest upload the speech-to-text providers accept (25 MB).
pub const MAX_AUDIO_SIZE_MB: u64 = 25;

/// Default speech-to-text model and language hint.
pub const DEFAULT_TRANSCRIPTION_MODEL: &str = "whisper-1";
pub const DEFAULT_TRANSCRIPTION_LANGUAGE: &str = "en";
