use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A freshly signed CDN URL.
///
/// Produced per call and never cached: each value carries its own expiration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedUrlResult {
    pub signed_url: String,
    /// Exact instant the CDN stops honouring `signed_url`.
    pub expires_at: DateTime<Utc>,
    pub expiration_hours: u32,
}

impl SignedUrlResult {
    /// Whether the grant is still valid at `now`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Per-call signing options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecureUrlOptions {
    /// Overrides the configured default lifetime.
    pub expiration_hours: Option<u32>,
}

impl SecureUrlOptions {
    pub fn expiring_in_hours(hours: u32) -> Self {
        Self {
            expiration_hours: Some(hours),
        }
    }
}
