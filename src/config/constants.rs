//! Configuration constants.
//!
//! This module defines the constants that pin down encoding detection,
//! URL canonicalization and form submission behavior.

// Encoding detection
/// Label tried first when inferring an encoding from the body bytes.
///
/// A body that decodes as ASCII is reported under the label's resolved
/// name (`windows-1252`), matching browser label resolution.
pub const DEFAULT_ENCODING: &str = "ascii";

/// Labels tried, in order, when no BOM, header or in-body declaration
/// supplied an encoding. The first label the body decodes under without
/// error wins.
///
/// This order is a compatibility contract tuned for legacy web content.
/// Do not reorder.
pub const INFERENCE_TRIAL_ORDER: &[&str] = &[DEFAULT_ENCODING, "utf-8", "cp1252"];

/// Encoding used for the lossy last-resort decode when inference finds
/// nothing decodable.
pub const LAST_RESORT_ENCODING: &str = "utf-8";

/// Number of leading body bytes scanned for a `<meta>` or XML prolog
/// encoding declaration.
pub const DECLARED_ENCODING_SCAN_LIMIT: usize = 4096;

/// Bytes left undefined by the cp1252 code page. A body containing any of
/// them fails the strict cp1252 trial.
pub const CP1252_UNDEFINED_BYTES: &[u8] = &[0x81, 0x8D, 0x8F, 0x90, 0x9D];

// HTTP header names and values
/// Content-Type header
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
/// Content type used for POST form submissions
pub const FORM_URLENCODED_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

// Request defaults
/// Method used when a request is built without one
pub const DEFAULT_METHOD: &str = "GET";
