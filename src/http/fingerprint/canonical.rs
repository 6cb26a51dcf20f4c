//! URL canonicalization.
//!
//! Two URLs that address the same resource should canonicalize to the same
//! string. Parsing takes care of scheme and host case, default ports and
//! dot segments. On top of that the query is sorted and percent escapes
//! are normalized.

use percent_encoding::percent_decode_str;

use crate::config::CanonicalizeOptions;
use crate::error_handling::UrlError;
use crate::http::urls::parse_absolute;

/// Canonicalizes `url` with the default [`CanonicalizeOptions`].
///
/// # Errors
///
/// Returns [`UrlError::Parse`] if `url` is not an absolute URL. There is no
/// fallback to the raw string.
///
/// # Example
///
/// ```
/// use page_inputs::http::fingerprint::canonicalize_url;
///
/// let url = canonicalize_url("HTTP://Example.com:80/a%7eb?b=2&a=1#frag").unwrap();
/// assert_eq!(url, "http://example.com/a~b?a=1&b=2");
/// ```
pub fn canonicalize_url(url: &str) -> Result<String, UrlError> {
    canonicalize_url_with(url, &CanonicalizeOptions::default())
}

/// Canonicalizes `url` with explicit options.
///
/// # Errors
///
/// Returns [`UrlError::Parse`] if `url` is not an absolute URL.
pub fn canonicalize_url_with(url: &str, options: &CanonicalizeOptions) -> Result<String, UrlError> {
    let mut parsed = parse_absolute(url)?;

    if !parsed.cannot_be_a_base() {
        let path = normalize_escapes(parsed.path());
        parsed.set_path(&path);
    }

    let query = parsed
        .query()
        .map(|query| canonical_query(query, options.keep_blank_values));
    parsed.set_query(query.as_deref().filter(|q| !q.is_empty()));

    if !options.keep_fragments {
        parsed.set_fragment(None);
    }

    Ok(parsed.into())
}

/// Sorts query arguments by name, then value, and re-encodes them.
///
/// Arguments are compared as raw bytes, so escapes that are not valid
/// UTF-8 (`%FF`) survive and stay distinct from each other.
fn canonical_query(query: &str, keep_blank_values: bool) -> String {
    let mut pairs: Vec<(Vec<u8>, Vec<u8>)> = query
        .split('&')
        .filter(|argument| !argument.is_empty())
        .map(|argument| match argument.split_once('=') {
            Some((name, value)) => (decode_query_part(name), decode_query_part(value)),
            None => (decode_query_part(argument), Vec::new()),
        })
        .filter(|(_, value)| keep_blank_values || !value.is_empty())
        .collect();
    pairs.sort();

    let mut out = String::with_capacity(query.len());
    for (name, value) in &pairs {
        if !out.is_empty() {
            out.push('&');
        }
        out.extend(url::form_urlencoded::byte_serialize(name));
        out.push('=');
        out.extend(url::form_urlencoded::byte_serialize(value));
    }
    out
}

/// Percent-decodes one query name or value, reading `+` as a space.
fn decode_query_part(part: &str) -> Vec<u8> {
    let spaced = part.replace('+', " ");
    percent_decode_str(&spaced).collect()
}

/// Characters that never need escaping in a path segment.
fn is_path_safe(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || b"-._~!$&'()*+,;=:@".contains(&byte)
}

/// Decodes escapes of path-safe characters and upper-cases the hex digits
/// of the remaining ones (`%7e` becomes `~`, `%2f` becomes `%2F`).
fn normalize_escapes(path: &str) -> String {
    let bytes = path.as_bytes();
    let mut out = String::with_capacity(path.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                let decoded = (hi << 4) | lo;
                if is_path_safe(decoded) {
                    out.push(char::from(decoded));
                } else {
                    out.push('%');
                    out.push(char::from(bytes[i + 1].to_ascii_uppercase()));
                    out.push(char::from(bytes[i + 2].to_ascii_uppercase()));
                }
                i += 3;
                continue;
            }
        }
        out.push(char::from(bytes[i]));
        i += 1;
    }
    out
}

fn hex_value(byte: u8) -> Option<u8> {
    char::from(byte).to_digit(16).map(|d| d as u8)
}
