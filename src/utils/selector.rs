//! CSS selector parsing utilities.

use scraper::Selector;

/// Selector that matches no element.
const MATCH_NOTHING: &str = "*:not(*)";

/// Parses a caller-supplied CSS selector.
///
/// If parsing fails, logs an error and returns a selector that matches
/// nothing, so an extraction with a bad selector yields no values instead
/// of aborting.
///
/// `context` names the caller in the log message (e.g. "HttpResponse::css").
pub fn parse_selector_with_fallback(selector_str: &str, context: &str) -> Selector {
    Selector::parse(selector_str).unwrap_or_else(|e| {
        log::error!(
            "Failed to parse CSS selector '{}' in {}: {}. Matching nothing.",
            selector_str,
            context,
            e
        );
        parse_selector_unsafe(MATCH_NOTHING, "fallback selector")
    })
}

/// Parses a selector that is a compile-time constant.
///
/// # Panics
///
/// Panics if the selector cannot be parsed (indicates a programming error).
pub fn parse_selector_unsafe(selector_str: &str, context: &str) -> Selector {
    Selector::parse(selector_str).unwrap_or_else(|e| {
        panic!(
            "Failed to parse CSS selector '{}' in {}: {}. This is a programming error.",
            selector_str, context, e
        )
    })
}

/// Parses a caller-supplied selector, returning `None` when it is invalid.
pub fn try_parse_selector(selector_str: &str) -> Option<Selector> {
    match Selector::parse(selector_str) {
        Ok(selector) => Some(selector),
        Err(e) => {
            log::debug!("Rejected CSS selector '{}': {}", selector_str, e);
            None
        }
    }
}
