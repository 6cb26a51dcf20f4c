//! Request fingerprinting.
//!
//! A fingerprint is a stable SHA-1 hex digest identifying a request, meant
//! as a deduplication or cache key. It covers:
//!
//! - the method, verbatim
//! - the canonicalized URL
//! - the headers sorted by case-insensitive name (then value), each
//!   rendered as `Title-Case-Name:value`
//! - the raw body bytes
//!
//! Header insertion order and header name case never change the result.
//! Any difference in the body always does.

mod canonical;

use std::fmt::Write;

use sha1::{Digest, Sha1};

use crate::error_handling::UrlError;
use crate::http::request::HttpRequest;
use crate::utils::title_case_header;

pub use canonical::{canonicalize_url, canonicalize_url_with};

/// Computes the fingerprint of `request`.
///
/// # Errors
///
/// Returns an error if the request URL cannot be canonicalized. The raw URL
/// is never used in its place.
pub fn request_fingerprint(request: &HttpRequest) -> Result<String, UrlError> {
    let url = canonicalize_url(request.url().as_str())?;

    let mut headers: Vec<(String, &str)> = request
        .headers()
        .iter()
        .map(|(name, value)| (name.to_ascii_lowercase(), value))
        .collect();
    headers.sort_unstable();

    let mut hasher = Sha1::new();
    hasher.update(request.method().as_bytes());
    hasher.update(b"\n");
    hasher.update(url.as_bytes());
    hasher.update(b"\n");
    for (name, value) in &headers {
        hasher.update(title_case_header(name).as_bytes());
        hasher.update(b":");
        hasher.update(value.as_bytes());
        hasher.update(b"\n");
    }
    hasher.update(b"\n");
    hasher.update(request.body().as_bytes());

    let fingerprint = to_hex(&hasher.finalize());
    log::trace!("Fingerprint of {} {}: {}", request.method(), url, fingerprint);
    Ok(fingerprint)
}

fn to_hex(digest: &[u8]) -> String {
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        // Writing to a String cannot fail
        let _ = write!(out, "{byte:02x}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::headers::HttpHeaders;

    fn request() -> HttpRequest {
        HttpRequest::new("https://example.com/search?q=rust&page=1")
            .with_method("POST")
            .with_headers([("Accept", "text/html"), ("X-Token", "abc")])
            .with_body("payload")
    }

    #[test]
    fn test_fingerprint_is_sha1_hex() {
        let fp = request_fingerprint(&request()).unwrap();
        assert_eq!(fp.len(), 40);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_fingerprint_of_known_input() {
        // sha1("GET\nhttp://example.com/\n\n")
        let request = HttpRequest::new("http://example.com");
        let mut hasher = Sha1::new();
        hasher.update(b"GET\nhttp://example.com/\n\n");
        assert_eq!(
            request_fingerprint(&request).unwrap(),
            to_hex(&hasher.finalize())
        );
    }

    #[test]
    fn test_header_rendering() {
        let request = HttpRequest::new("http://example.com/")
            .with_headers([("x-token", "abc"), ("ACCEPT", "*/*")]);
        let mut hasher = Sha1::new();
        hasher.update(b"GET\nhttp://example.com/\nAccept:*/*\nX-Token:abc\n\n");
        assert_eq!(
            request_fingerprint(&request).unwrap(),
            to_hex(&hasher.finalize())
        );
    }

    #[test]
    fn test_header_order_and_case_do_not_matter() {
        let reordered = HttpRequest::new("https://example.com/search?page=1&q=rust")
            .with_method("POST")
            .with_headers(HttpHeaders::new().with("x-token", "abc").with("ACCEPT", "text/html"))
            .with_body("payload");
        assert_eq!(
            request_fingerprint(&request()).unwrap(),
            request_fingerprint(&reordered).unwrap()
        );
    }

    #[test]
    fn test_body_method_and_url_matter() {
        let base = request_fingerprint(&request()).unwrap();
        let other_body = request_fingerprint(&request().with_body("payload2")).unwrap();
        let other_method = request_fingerprint(&request().with_method("post")).unwrap();
        let other_url = HttpRequest::new("https://example.com/search?q=go&page=1")
            .with_method("POST")
            .with_headers([("Accept", "text/html"), ("X-Token", "abc")])
            .with_body("payload");

        assert_ne!(base, other_body);
        assert_ne!(base, other_method);
        assert_ne!(base, request_fingerprint(&other_url).unwrap());
    }

    #[test]
    fn test_malformed_url_propagates() {
        let request = HttpRequest::new("/relative/only");
        assert!(matches!(
            request_fingerprint(&request),
            Err(UrlError::Parse { .. })
        ));
    }
}
