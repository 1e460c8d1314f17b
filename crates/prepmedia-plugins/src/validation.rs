//! Upload limits enforced before a recording leaves the machine.

use crate::engine::EngineError;

/// OpenAI audio endpoint upload limit (25 MiB)
pub const OPENAI_MAX_UPLOAD_BYTES: u64 = 25 * 1024 * 1024;

/// AssemblyAI upload limit (2.2 GB)
pub const ASSEMBLY_AI_MAX_UPLOAD_BYTES: u64 = 2_200 * 1024 * 1024;

/// Validate that an upload is within the engine's accepted size
///
/// # Arguments
/// * `size` - Size of the staged file in bytes
/// * `max_size` - Maximum allowed size in bytes
/// * `engine` - Engine name for error messages
///
/// # Example
/// ```
/// # use prepmedia_plugins::validation::validate_upload_size;
/// assert!(validate_upload_size(1000, 2000, "test").is_ok());
/// assert!(validate_upload_size(1000, 500, "test").is_err());
/// ```
pub fn validate_upload_size(size: u64, max_size: u64, engine: &str) -> Result<(), EngineError> {
    if size == 0 {
        return Err(EngineError::EmptyUpload(format!(
            "{} received an empty audio file",
            engine
        )));
    }

    if size > max_size {
        return Err(EngineError::FileTooLarge(format!(
            "audio file size ({} bytes) exceeds the {} upload limit ({} bytes)",
            size, engine, max_size
        )));
    }

    tracing::debug!(
        engine = engine,
        size = size,
        max_size = max_size,
        "Upload size validation passed"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_upload_size_within_limit() {
        assert!(validate_upload_size(1000, 2000, "test").is_ok());
    }

    #[test]
    fn test_validate_upload_size_exact_limit() {
        assert!(validate_upload_size(1000, 1000, "test").is_ok());
    }

    #[test]
    fn test_validate_upload_size_exceeds_limit() {
        let result = validate_upload_size(OPENAI_MAX_UPLOAD_BYTES + 1, OPENAI_MAX_UPLOAD_BYTES, "openai");
        assert!(matches!(result, Err(EngineError::FileTooLarge(msg)) if msg.contains("exceeds")));
    }

    #[test]
    fn test_validate_upload_size_empty() {
        assert!(matches!(
            validate_upload_size(0, 1000, "test"),
            Err(EngineError::EmptyUpload(_))
        ));
    }
}
