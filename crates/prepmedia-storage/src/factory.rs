use crate::{CdnUrlSigner, SigningError, SigningResult, UrlSigner};
use prepmedia_core::{Config, ConfigError};
use std::sync::Arc;

/// Create the CDN signer described by configuration
pub fn create_signer(config: &Config) -> SigningResult<Arc<dyn UrlSigner>> {
    let signing = config.signing().map_err(|err| match err {
        ConfigError::Missing(vars) => SigningError::NotConfigured(format!(
            "{} not configured",
            vars.join(", ")
        )),
        ConfigError::Invalid { .. } => SigningError::NotConfigured(err.to_string()),
    })?;

    let signer = CdnUrlSigner::new(signing)?;
    Ok(Arc::new(signer))
}
