//! Object key resolution.
//!
//! Keys and URLs share a textual domain: the platform stores bare keys for new media and
//! full S3 or CDN URLs for older records. Everything is normalized to a bare key here.

use percent_encoding::percent_decode_str;
use url::Url;

/// Whether `input` is an absolute `http`/`https` URL.
pub fn is_absolute_url(input: &str) -> bool {
    matches!(Url::parse(input), Ok(url) if matches!(url.scheme(), "http" | "https"))
}

/// Normalize a bare key or a storage/CDN URL into an object key.
///
/// For absolute URLs the path is returned without its leading `/`, percent-decoded. Any
/// other input, including text that fails to parse, is returned unchanged.
pub fn resolve_key(input: &str) -> String {
    let url = match Url::parse(input) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => url,
        _ => return input.to_string(),
    };

    let path = url.path();
    let path = path.strip_prefix('/').unwrap_or(path);

    match percent_decode_str(path).decode_utf8() {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => path.to_string(),
    }
}
