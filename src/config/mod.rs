//! Library configuration and constants.
//!
//! This module provides:
//! - Encoding detection and form submission constants
//! - Logging option types
//! - URL canonicalization options

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{CanonicalizeOptions, LogFormat, LogLevel};
