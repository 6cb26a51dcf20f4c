//! Utility functions.
//!
//! This module provides:
//! - CSS selector parsing utilities
//! - Header name normalization

mod selector;

pub use selector::{parse_selector_unsafe, parse_selector_with_fallback, try_parse_selector};

/// Renders a header name in title case: the first letter of every run of
/// letters is upper-cased, the rest lower-cased (`content-TYPE` becomes
/// `Content-Type`, `x-api-key` becomes `X-Api-Key`).
pub fn title_case_header(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut previous_is_letter = false;
    for c in name.chars() {
        if c.is_alphabetic() {
            if previous_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            out.push(c);
            previous_is_letter = false;
        }
    }
    out
}
