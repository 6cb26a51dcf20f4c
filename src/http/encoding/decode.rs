//! Browser-style body decoding.

use super::{html_body_declared_encoding, http_content_type_encoding, read_bom, Charset};
use crate::config::LAST_RESORT_ENCODING;

/// Result of decoding an HTML body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedText {
    /// Encoding the text was decoded with, or `None` when no signal
    /// identified one and the last-resort decode was used.
    pub encoding: Option<&'static str>,
    pub text: String,
}

fn last_resort(body: &[u8]) -> String {
    Charset::for_label(LAST_RESORT_ENCODING)
        .map(|charset| charset.decode_lossy(body))
        .unwrap_or_else(|| String::from_utf8_lossy(body).into_owned())
}

/// Decodes an HTML body the way browsers do.
///
/// Signals are consulted in order: byte order mark (stripped from the
/// text), `Content-Type` charset, in-body declaration, then `auto_detect`.
/// Malformed sequences are replaced with U+FFFD. When nothing identifies
/// an encoding the body is decoded lossily as UTF-8 and the reported
/// encoding is `None`.
pub fn html_to_unicode(
    content_type: &str,
    body: &[u8],
    auto_detect: Option<&dyn Fn(&[u8]) -> Option<&'static str>>,
) -> DecodedText {
    if let Some((encoding, bom)) = read_bom(body) {
        return decode_known(encoding, &body[bom.len()..]);
    }

    let detected = http_content_type_encoding(content_type)
        .or_else(|| html_body_declared_encoding(body))
        .or_else(|| auto_detect.and_then(|detect| detect(body)));

    match detected {
        Some(encoding) => decode_known(encoding, body),
        None => DecodedText {
            encoding: None,
            text: last_resort(body),
        },
    }
}

fn decode_known(encoding: &'static str, body: &[u8]) -> DecodedText {
    match Charset::for_label(encoding) {
        Some(charset) => DecodedText {
            encoding: Some(charset.name()),
            text: charset.decode_lossy(body),
        },
        None => DecodedText {
            encoding: None,
            text: last_resort(body),
        },
    }
}

/// Decodes `body` with an already chosen encoding.
///
/// A byte order mark still takes precedence over `encoding` and is
/// stripped, as browsers do. Unknown labels fall back to the lossy
/// last-resort decode.
pub fn decode_as(body: &[u8], encoding: &str) -> String {
    if let Some((bom_encoding, bom)) = read_bom(body) {
        return decode_known(bom_encoding, &body[bom.len()..]).text;
    }
    match Charset::for_label(encoding) {
        Some(charset) => charset.decode_lossy(body),
        None => last_resort(body),
    }
}

/// Returns whether `body` decodes under `label` without a single
/// malformed sequence.
///
/// The `ascii` label is checked as 7-bit ASCII, even though it resolves
/// to windows-1252 for reporting.
pub fn decodes_strictly(body: &[u8], label: &str) -> bool {
    if label.eq_ignore_ascii_case("ascii") || label.eq_ignore_ascii_case("us-ascii") {
        return body.is_ascii();
    }
    match Charset::for_label(label) {
        Some(Charset::Whatwg(encoding)) if encoding == encoding_rs::UTF_8 => {
            std::str::from_utf8(body).is_ok()
        }
        Some(charset) => charset.decode_strict(body).is_some(),
        None => false,
    }
}
