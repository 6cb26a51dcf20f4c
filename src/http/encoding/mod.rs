//! Text encoding detection and decoding.
//!
//! This module provides the building blocks the response model uses to
//! settle on one encoding for a body:
//! - `bom` - byte-order-mark sniffing
//! - `declared` - `Content-Type` charset and in-body `<meta>`/XML declarations
//! - `decode` - browser-style decoding and strict trial decoding
//!
//! Encodings are identified by their canonical WHATWG name (`"UTF-8"`,
//! `"windows-1252"`, `"UTF-16LE"`, ...). UTF-32, which browsers do not
//! support but which can still be announced by a BOM, is named `"UTF-32LE"`
//! or `"UTF-32BE"`. Any label that does not resolve is treated as absent.

mod bom;
mod declared;
mod decode;

use encoding_rs::Encoding;

use crate::config::CP1252_UNDEFINED_BYTES;

pub use bom::read_bom;
pub use declared::{html_body_declared_encoding, http_content_type_encoding};
pub use decode::{decode_as, decodes_strictly, html_to_unicode, DecodedText};

/// Canonical name reported for little-endian UTF-32.
pub const UTF_32LE: &str = "UTF-32LE";
/// Canonical name reported for big-endian UTF-32.
pub const UTF_32BE: &str = "UTF-32BE";

/// A resolved character set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Charset {
    Whatwg(&'static Encoding),
    Utf32Le,
    Utf32Be,
}

impl Charset {
    /// Resolves an encoding label (case-insensitive, surrounding whitespace
    /// ignored). Python-style spellings such as `utf_8`, `utf-16-le` and
    /// `latin_1` are accepted as well.
    pub(crate) fn for_label(label: &str) -> Option<Self> {
        let label = label.trim().to_ascii_lowercase();
        if label.is_empty() {
            return None;
        }

        match label.as_str() {
            "utf-32" | "utf32" | "utf-32le" | "utf-32-le" | "utf_32" | "utf_32_le" => {
                return Some(Charset::Utf32Le)
            }
            "utf-32be" | "utf-32-be" | "utf_32_be" => return Some(Charset::Utf32Be),
            "utf-16-le" | "utf_16_le" => return Some(Charset::Whatwg(encoding_rs::UTF_16LE)),
            "utf-16-be" | "utf_16_be" => return Some(Charset::Whatwg(encoding_rs::UTF_16BE)),
            "latin_1" | "latin-1" | "latin" | "iso8859_1" | "iso_8859_1" | "8859" | "cp819" => {
                return Some(Charset::Whatwg(encoding_rs::WINDOWS_1252))
            }
            _ => {}
        }

        let encoding = Encoding::for_label_no_replacement(label.as_bytes()).or_else(|| {
            let dashed = label.replace('_', "-");
            Encoding::for_label_no_replacement(dashed.as_bytes())
        })?;
        Some(Charset::Whatwg(encoding))
    }

    pub(crate) fn name(self) -> &'static str {
        match self {
            Charset::Whatwg(encoding) => encoding.name(),
            Charset::Utf32Le => UTF_32LE,
            Charset::Utf32Be => UTF_32BE,
        }
    }

    /// Decodes `bytes`, returning `None` on the first malformed sequence.
    ///
    /// cp1252 leaves five bytes undefined; browsers map them to C1 controls
    /// but a strict decode rejects them.
    pub(crate) fn decode_strict(self, bytes: &[u8]) -> Option<String> {
        match self {
            Charset::Whatwg(encoding) => {
                if encoding == encoding_rs::WINDOWS_1252
                    && bytes.iter().any(|b| CP1252_UNDEFINED_BYTES.contains(b))
                {
                    return None;
                }
                encoding
                    .decode_without_bom_handling_and_without_replacement(bytes)
                    .map(|text| text.into_owned())
            }
            Charset::Utf32Le => decode_utf32(bytes, u32::from_le_bytes, false),
            Charset::Utf32Be => decode_utf32(bytes, u32::from_be_bytes, false),
        }
    }

    /// Decodes `bytes`, replacing malformed sequences with U+FFFD.
    pub(crate) fn decode_lossy(self, bytes: &[u8]) -> String {
        match self {
            Charset::Whatwg(encoding) => encoding.decode_without_bom_handling(bytes).0.into_owned(),
            Charset::Utf32Le => {
                decode_utf32(bytes, u32::from_le_bytes, true).unwrap_or_default()
            }
            Charset::Utf32Be => {
                decode_utf32(bytes, u32::from_be_bytes, true).unwrap_or_default()
            }
        }
    }
}

fn decode_utf32(bytes: &[u8], read: fn([u8; 4]) -> u32, lossy: bool) -> Option<String> {
    let mut text = String::with_capacity(bytes.len() / 4);
    let mut chunks = bytes.chunks_exact(4);
    for chunk in &mut chunks {
        let unit = read([chunk[0], chunk[1], chunk[2], chunk[3]]);
        match char::from_u32(unit) {
            Some(c) => text.push(c),
            None if lossy => text.push(char::REPLACEMENT_CHARACTER),
            None => return None,
        }
    }
    if !chunks.remainder().is_empty() {
        if !lossy {
            return None;
        }
        text.push(char::REPLACEMENT_CHARACTER);
    }
    Some(text)
}

/// Resolves an encoding label to its canonical name.
///
/// Returns `None` for labels no decoder is available for, so callers can
/// fall through to the next detection stage.
///
/// # Examples
///
/// ```
/// use page_inputs::http::encoding::resolve_encoding;
///
/// assert_eq!(resolve_encoding("latin1"), Some("windows-1252"));
/// assert_eq!(resolve_encoding(" UTF8 "), Some("UTF-8"));
/// assert_eq!(resolve_encoding("klingon"), None);
/// ```
pub fn resolve_encoding(label: &str) -> Option<&'static str> {
    let resolved = Charset::for_label(label).map(Charset::name);
    if resolved.is_none() {
        log::debug!("Ignoring unknown encoding label '{label}'");
    }
    resolved
}
