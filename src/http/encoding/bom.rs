//! Byte-order-mark sniffing.

use super::{UTF_32BE, UTF_32LE};

// UTF-32LE must be tested before UTF-16LE: its BOM starts with FF FE.
const BOM_TABLE: &[(&[u8], &str)] = &[
    (b"\x00\x00\xfe\xff", UTF_32BE),
    (b"\xff\xfe\x00\x00", UTF_32LE),
    (b"\xfe\xff", "UTF-16BE"),
    (b"\xff\xfe", "UTF-16LE"),
    (b"\xef\xbb\xbf", "UTF-8"),
];

/// Reads the byte order mark at the start of `data`.
///
/// Returns the canonical encoding name and the BOM bytes, or `None` when
/// the data does not start with a known BOM.
pub fn read_bom(data: &[u8]) -> Option<(&'static str, &'static [u8])> {
    // Fast path: every BOM starts with one of these bytes
    if !matches!(data.first(), Some(0x00 | 0xef | 0xfe | 0xff)) {
        return None;
    }
    BOM_TABLE
        .iter()
        .find(|(bom, _)| data.starts_with(bom))
        .map(|&(bom, encoding)| (encoding, bom))
}
