//! Audio recording key validation
//!
//! Learner recordings are only accepted from a dedicated namespace and in a fixed set of
//! container formats. The checks here are pure: they look at the key, never at storage.

use crate::constants::{AUDIO_ALLOWED_EXTENSIONS, AUDIO_RECORDINGS_PREFIX};

/// Namespace and extension rules for recording keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioKeyRules {
    pub prefix: String,
    /// Lowercase extensions without the leading dot.
    pub allowed_extensions: Vec<String>,
}

impl Default for AudioKeyRules {
    fn default() -> Self {
        Self {
            prefix: AUDIO_RECORDINGS_PREFIX.to_string(),
            allowed_extensions: AUDIO_ALLOWED_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }
}

impl AudioKeyRules {
    /// Check a key, returning a human readable reason on rejection.
    pub fn check(&self, key: &str) -> Result<(), String> {
        if !key.starts_with(&self.prefix) {
            return Err(format!(
                "Audio key must be under '{}', got '{}'",
                self.prefix, key
            ));
        }

        if key.split('/').any(|segment| segment == "..") {
            return Err("Audio key must not contain '..' segments".to_string());
        }

        let file_name = &key[self.prefix.len()..];
        if file_name.is_empty() || file_name.ends_with('/') {
            return Err("Audio key is missing a file name".to_string());
        }

        let extension = extension_of(file_name)
            .ok_or_else(|| format!("Audio key '{}' has no file extension", key))?;

        if !self
            .allowed_extensions
            .iter()
            .any(|allowed| allowed == &extension)
        {
            return Err(format!(
                "Unsupported audio extension '.{}' (allowed: {})",
                extension,
                self.allowed_extensions.join(", ")
            ));
        }

        Ok(())
    }

    pub fn is_valid(&self, key: &str) -> bool {
        self.check(key).is_ok()
    }
}

/// Validate a recording key against the default namespace and extension set.
pub fn validate_audio_file(key: &str) -> bool {
    AudioKeyRules::default().is_valid(key)
}

/// Lowercased extension of the last path segment, if any.
pub fn extension_of(key: &str) -> Option<String> {
    let file_name = key.rsplit('/').next().unwrap_or(key);
    let (stem, ext) = file_name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_lowercase())
}

/// MIME type to announce when uploading a recording to a speech-to-text provider.
pub fn audio_content_type(extension: &str) -> &'static str {
    match extension.to_lowercase().as_str() {
        "webm" => "audio/webm",
        "mp3" | "mpeg" | "mpga" => "audio/mpeg",
        "wav" => "audio/wav",
        "m4a" => "audio/mp4",
        "mp4" => "audio/mp4",
        "ogg" => "audio/ogg",
        "flac" => "audio/flac",
        _ => "application/octet-stream",
    }
}
