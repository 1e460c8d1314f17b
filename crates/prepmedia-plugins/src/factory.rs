#[cfg(feature = "engine-assembly-ai")]
use crate::AssemblyAiEngine;
use crate::TranscriptionEngine;
#[cfg(feature = "engine-openai")]
use crate::WhisperEngine;
use anyhow::Result;
use prepmedia_core::{TranscriptionConfig, TranscriptionProvider};
use std::sync::Arc;

/// Create the transcription engine selected by configuration
pub fn create_engine(config: &TranscriptionConfig) -> Result<Arc<dyn TranscriptionEngine>> {
    let api_key = config.api_key.clone().ok_or_else(|| {
        anyhow::anyhow!(
            "TRANSCRIPTION_API_KEY not configured for {}",
            config.provider
        )
    })?;

    match config.provider {
        #[cfg(feature = "engine-openai")]
        TranscriptionProvider::OpenAi => {
            let engine = WhisperEngine::new(
                api_key,
                config.base_url.clone(),
                config.model.clone(),
                config.language.clone(),
            )?;
            Ok(Arc::new(engine))
        }

        #[cfg(not(feature = "engine-openai"))]
        TranscriptionProvider::OpenAi => Err(anyhow::anyhow!(
            "OpenAI engine not available (engine-openai feature not enabled)"
        )),

        #[cfg(feature = "engine-assembly-ai")]
        TranscriptionProvider::AssemblyAi => {
            let engine =
                AssemblyAiEngine::new(api_key, config.base_url.clone(), config.language.clone())?;
            Ok(Arc::new(engine))
        }

        #[cfg(not(feature = "engine-assembly-ai"))]
        TranscriptionProvider::AssemblyAi => Err(anyhow::anyhow!(
            "Assembly AI engine not available (engine-assembly-ai feature not enabled)"
        )),
    }
}

#[cfg(all(test, feature = "engine-openai", feature = "engine-assembly-ai"))]
mod tests {
    use super::*;

    #[test]
    fn test_missing_api_key_is_rejected() {
        let config = TranscriptionConfig::default();
        let err = create_engine(&config).unwrap_err();
        assert!(err.to_string().contains("TRANSCRIPTION_API_KEY"));
    }

    #[test]
    fn test_engine_selected_by_provider() {
        let openai = TranscriptionConfig {
            api_key: Some("sk-test".to_string()),
            ..Default::default()
        };
        assert_eq!(create_engine(&openai).unwrap().name(), "openai_whisper");

        let assembly = TranscriptionConfig {
            provider: TranscriptionProvider::AssemblyAi,
            api_key: Some("aai-test".to_string()),
            ..Default::default()
        };
        assert_eq!(create_engine(&assembly).unwrap().name(), "assembly_ai");
    }
}
