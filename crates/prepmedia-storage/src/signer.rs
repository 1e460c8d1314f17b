//! CloudFront-style canned policy signer.
//!
//! A signed URL carries three query parameters:
//!
//! - `Expires`: unix epoch seconds after which the CDN refuses the URL
//! - `Signature`: RSA (PKCS#1 v1.5, SHA-1) signature of the canned policy, base64 encoded
//!   with `+`, `=` and `/` replaced by `-`, `_` and `~`
//! - `Key-Pair-Id`: identifies the public key the CDN verifies with
//!
//! The canned policy is the exact JSON document below, with no whitespace; the CDN rebuilds
//! it from the request and checks the signature against it.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS, NON_ALPHANUMERIC};
use prepmedia_core::SigningConfig;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs1v15::SigningKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::signature::{SignatureEncoding, Signer};
use rsa::RsaPrivateKey;
use sha1::Sha1;
use std::fmt::{Debug, Formatter, Result as FmtResult};

use crate::traits::{SigningError, SigningResult, UrlSigner};

/// Characters escaped inside one path segment of the resource URL.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Characters escaped inside a query parameter value.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Signs object keys for one CDN distribution with one key pair.
#[derive(Clone)]
pub struct CdnUrlSigner {
    cdn_hostname: String,
    key_pair_id: String,
    signing_key: SigningKey<Sha1>,
}

impl Debug for CdnUrlSigner {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("CdnUrlSigner")
            .field("cdn_hostname", &self.cdn_hostname)
            .field("key_pair_id", &self.key_pair_id)
            .finish_non_exhaustive()
    }
}

impl CdnUrlSigner {
    /// Build a signer from the configured credential.
    ///
    /// Fails with `InvalidPrivateKey` if the PEM is neither a PKCS#1 nor a PKCS#8 RSA key.
    pub fn new(config: &SigningConfig) -> SigningResult<Self> {
        config
            .validate()
            .map_err(|e| SigningError::NotConfigured(e.to_string()))?;

        let pem = config.private_key_pem.trim();
        let private_key = match RsaPrivateKey::from_pkcs1_pem(pem) {
            Ok(key) => key,
            Err(pkcs1_err) => RsaPrivateKey::from_pkcs8_pem(pem).map_err(|pkcs8_err| {
                SigningError::InvalidPrivateKey(format!(
                    "not a PKCS#1 ({}) or PKCS#8 ({}) RSA key",
                    pkcs1_err, pkcs8_err
                ))
            })?,
        };

        tracing::debug!(
            cdn_hostname = %config.cdn_hostname,
            key_pair_id = %config.key_pair_id,
            "CDN URL signer initialized"
        );

        Ok(Self {
            cdn_hostname: config.cdn_hostname.clone(),
            key_pair_id: config.key_pair_id.clone(),
            signing_key: SigningKey::<Sha1>::new(private_key),
        })
    }

    /// Unsigned CDN URL of an object.
    pub fn resource_url(&self, object_key: &str) -> String {
        let encoded = object_key
            .trim_start_matches('/')
            .split('/')
            .map(|segment| utf8_percent_encode(segment, PATH_SEGMENT).to_string())
            .collect::<Vec<_>>()
            .join("/");
        format!("https://{}/{}", self.cdn_hostname, encoded)
    }

    fn signature_for(&self, policy: &str) -> SigningResult<String> {
        let signature = self
            .signing_key
            .try_sign(policy.as_bytes())
            .map_err(|e| SigningError::SignatureFailed(e.to_string()))?;
        Ok(cdn_safe_base64(&signature.to_bytes()))
    }
}

impl UrlSigner for CdnUrlSigner {
    fn sign(&self, object_key: &str, expires_at: DateTime<Utc>) -> SigningResult<String> {
        if object_key.trim_start_matches('/').is_empty() {
            return Err(SigningError::InvalidKey(
                "object key must not be empty".to_string(),
            ));
        }

        let resource = self.resource_url(object_key);
        let expires = expires_at.timestamp();
        let policy = canned_policy(&resource, expires);
        let signature = self.signature_for(&policy)?;

        Ok(format!(
            "{}?Expires={}&Signature={}&Key-Pair-Id={}",
            resource,
            expires,
            signature,
            utf8_percent_encode(&self.key_pair_id, QUERY_VALUE)
        ))
    }

    fn cdn_hostname(&self) -> &str {
        &self.cdn_hostname
    }
}

/// The canned policy document for `resource`, valid until `expires` (epoch seconds).
pub fn canned_policy(resource: &str, expires: i64) -> String {
    format!(
        r#"{{"Statement":[{{"Resource":"{}","Condition":{{"DateLessThan":{{"AWS:EpochTime":{}}}}}}}]}}"#,
        resource, expires
    )
}

/// Base64 with the three characters that are unsafe in a query string swapped out.
pub fn cdn_safe_base64(bytes: &[u8]) -> String {
    STANDARD
        .encode(bytes)
        .chars()
        .map(|c| match c {
            '+' => '-',
            '=' => '_',
            '/' => '~',
            other => other,
        })
        .collect()
}
