//! Signing abstraction trait
//!
//! This module defines the UrlSigner trait every CDN signing backend implements.

use chrono::{DateTime, Utc};
use prepmedia_core::AppError;
use std::fmt::Debug;
use thiserror::Error;

/// Signing operation errors
///
/// None of these are transient: they mean the deployment or the caller is wrong.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SigningError {
    #[error("URL signing is not configured: {0}")]
    NotConfigured(String),

    #[error("Invalid CDN private key: {0}")]
    InvalidPrivateKey(String),

    #[error("Invalid object key: {0}")]
    InvalidKey(String),

    #[error("Invalid expiration: {0}")]
    InvalidExpiration(String),

    #[error("Signing failed: {0}")]
    SignatureFailed(String),
}

impl SigningError {
    /// Errors caused by deployment configuration rather than by the request.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            SigningError::NotConfigured(_) | SigningError::InvalidPrivateKey(_)
        )
    }
}

impl From<SigningError> for AppError {
    fn from(err: SigningError) -> Self {
        match err {
            SigningError::NotConfigured(_) | SigningError::InvalidPrivateKey(_) => {
                AppError::Configuration(err.to_string())
            }
            SigningError::InvalidKey(_) | SigningError::InvalidExpiration(_) => {
                AppError::InvalidInput(err.to_string())
            }
            SigningError::SignatureFailed(_) => AppError::Internal(err.to_string()),
        }
    }
}

/// Result type for signing operations
pub type SigningResult<T> = Result<T, SigningError>;

/// URL signing trait
///
/// Implementations are pure: the output depends only on the key, the expiration and the
/// credential captured at construction. They are shared across threads without locking.
pub trait UrlSigner: Send + Sync + Debug {
    /// Produce a URL granting GET access to `object_key` until `expires_at`.
    ///
    /// The signer does not refuse instants in the past; issuing an already expired grant
    /// is the caller's mistake to avoid.
    fn sign(&self, object_key: &str, expires_at: DateTime<Utc>) -> SigningResult<String>;

    /// Host the signed URLs point at.
    fn cdn_hostname(&self) -> &str;
}
