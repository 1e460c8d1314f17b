//! Prepmedia Storage Library
//!
//! Object-storage addressing and CDN access grants.
//!
//! # Object keys
//!
//! An object key is the path of a file inside the media bucket, e.g.
//! `audio/user-recordings/abc123.webm`. Keys never carry a scheme or host; callers that
//! hold a full storage or CDN URL run it through [`resolve_key`] first.
//!
//! # Signed URLs
//!
//! [`CdnUrlSigner`] issues CloudFront-style canned-policy URLs. The CDN verifies them with
//! the public half of the key pair, so no request ever reaches this process.

pub mod factory;
pub mod keys;
pub mod signer;
pub mod traits;

// Re-export commonly used types
pub use factory::create_signer;
pub use keys::{is_absolute_url, resolve_key};
pub use signer::CdnUrlSigner;
pub use traits::{SigningError, SigningResult, UrlSigner};
