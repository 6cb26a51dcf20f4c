//! Declared encodings: the `Content-Type` charset parameter and in-body
//! `<meta>` / XML prolog declarations.

use std::sync::LazyLock;

use regex::bytes::Regex as BytesRegex;
use regex::Regex;

use super::resolve_encoding;
use crate::config::DECLARED_ENCODING_SCAN_LIMIT;

const HEADER_ENCODING_PATTERN: &str = r#"(?i)charset\s*=\s*["']?([\w-]+)"#;

/// `name = value`, with optional quotes around the value.
fn attr(name: &str, value: &str) -> String {
    format!(r#"{name}\s*=\s*["']?\s*{value}\s*["']?"#)
}

/// Builds the in-body declaration pattern.
///
/// Matches, at a tag start, either a `<meta>` carrying `http-equiv` +
/// `content=...; charset=` (in any order) or a bare `charset=` attribute,
/// an `<?xml ... encoding=...>` prolog, or the opening `<body` tag. Reaching
/// `<body` first ends the search without a declaration.
fn body_encoding_pattern() -> String {
    // Attributes skipped before the interesting one. Quotes inside values
    // are entity-encoded in HTML, so no escaping is handled.
    let skip_attrs = r#"(?:\s+[^=<>/\s"'\x00-\x1f\x7f]+(?:\s*=\s*(?:'[^']*'|"[^"]*"|[^'"\s]+))?)*?"#;
    let http_equiv = attr("http-equiv", "Content-Type");
    let content = attr(
        "content",
        r"(?P<mime>[^;]+);\s*charset=(?P<charset>[\w-]+)",
    );
    let charset = attr("charset", r"(?P<charset2>[\w-]+)");
    let xml = attr("encoding", r"(?P<xmlcharset>[\w-]+)");

    format!(
        r"(?i-u)<\s*(?:meta{skip_attrs}(?:(?:\s+{http_equiv}|\s+{content}){{2}}|\s+{charset})|\?xml\s[^>]+{xml}|body)"
    )
}

fn compile_regex_unsafe(pattern: &str, context: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| {
        panic!(
            "Failed to compile regex pattern '{}' in {}: {}. This is a programming error.",
            pattern, context, e
        )
    })
}

fn compile_bytes_regex_unsafe(pattern: &str, context: &str) -> BytesRegex {
    BytesRegex::new(pattern).unwrap_or_else(|e| {
        panic!(
            "Failed to compile regex pattern '{}' in {}: {}. This is a programming error.",
            pattern, context, e
        )
    })
}

static HEADER_ENCODING_RE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex_unsafe(HEADER_ENCODING_PATTERN, "HEADER_ENCODING_RE"));

static BODY_ENCODING_RE: LazyLock<BytesRegex> =
    LazyLock::new(|| compile_bytes_regex_unsafe(&body_encoding_pattern(), "BODY_ENCODING_RE"));

/// Returns the encoding named by the `charset` parameter of a
/// `Content-Type` header value.
///
/// # Examples
///
/// ```
/// use page_inputs::http::encoding::http_content_type_encoding;
///
/// assert_eq!(http_content_type_encoding("text/html; charset=ISO-8859-4"), Some("ISO-8859-4"));
/// assert_eq!(http_content_type_encoding("text/html"), None);
/// ```
pub fn http_content_type_encoding(content_type: &str) -> Option<&'static str> {
    if content_type.is_empty() {
        return None;
    }
    let label = HEADER_ENCODING_RE.captures(content_type)?.get(1)?.as_str();
    resolve_encoding(label)
}

/// Returns the encoding declared inside an HTML or XML body.
///
/// Only the first [`DECLARED_ENCODING_SCAN_LIMIT`] bytes are scanned.
pub fn html_body_declared_encoding(body: &[u8]) -> Option<&'static str> {
    let head = &body[..body.len().min(DECLARED_ENCODING_SCAN_LIMIT)];
    let captures = BODY_ENCODING_RE.captures(head)?;
    let label = ["charset", "charset2", "xmlcharset"]
        .iter()
        .find_map(|group| captures.name(group))?;
    // Labels are ASCII by construction of the pattern
    resolve_encoding(&String::from_utf8_lossy(label.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_content_type_encoding_variants() {
        assert_eq!(
            http_content_type_encoding("text/html; charset=utf-8"),
            Some("UTF-8")
        );
        assert_eq!(
            http_content_type_encoding("text/html;charset=UTF-8"),
            Some("UTF-8")
        );
        assert_eq!(
            http_content_type_encoding("text/html; charset=\"utf-8\""),
            Some("UTF-8")
        );
        assert_eq!(
            http_content_type_encoding("text/html; CHARSET=latin1"),
            Some("windows-1252")
        );
        assert_eq!(http_content_type_encoding(""), None);
        assert_eq!(http_content_type_encoding("application/json"), None);
    }

    #[test]
    fn test_http_content_type_encoding_unknown_label() {
        assert_eq!(
            http_content_type_encoding("text/html; charset=bogus-enc"),
            None
        );
    }

    #[test]
    fn test_meta_charset() {
        let body = br#"<html><head><meta charset="windows-1251"><title>x</title>"#;
        assert_eq!(html_body_declared_encoding(body), Some("windows-1251"));
    }

    #[test]
    fn test_meta_http_equiv_either_order() {
        let body = br#"<meta http-equiv="Content-Type" content="text/html; charset=gb2312">"#;
        assert_eq!(html_body_declared_encoding(body), Some("GBK"));

        let body = br#"<META content='text/html; charset=koi8-r' HTTP-EQUIV='content-type'>"#;
        assert_eq!(html_body_declared_encoding(body), Some("KOI8-R"));
    }

    #[test]
    fn test_meta_with_leading_attributes() {
        let body = br#"<meta name="x" data-y='1' charset=utf-8>"#;
        assert_eq!(html_body_declared_encoding(body), Some("UTF-8"));
    }

    #[test]
    fn test_xml_prolog() {
        let body = br#"<?xml version="1.0" encoding="ISO-8859-2"?><root/>"#;
        assert_eq!(html_body_declared_encoding(body), Some("ISO-8859-2"));
    }

    #[test]
    fn test_body_tag_stops_search() {
        let body = br#"<html><body><meta charset="utf-8"></body>"#;
        assert_eq!(html_body_declared_encoding(body), None);
    }

    #[test]
    fn test_declaration_beyond_scan_limit_is_ignored() {
        let mut body = vec![b' '; DECLARED_ENCODING_SCAN_LIMIT];
        body.extend_from_slice(br#"<meta charset="utf-8">"#);
        assert_eq!(html_body_declared_encoding(&body), None);
    }

    #[test]
    fn test_no_declaration() {
        assert_eq!(html_body_declared_encoding(b""), None);
        assert_eq!(
            html_body_declared_encoding(b"<html><head><title>t</title></head>"),
            None
        );
    }
}
