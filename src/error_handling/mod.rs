//! Error handling.
//!
//! This module provides the error type definitions for every fallible
//! operation in the library:
//! - **Initialization**: logger setup
//! - **URLs**: parsing, joining and canonicalization
//! - **Bodies**: JSON decoding
//! - **Forms**: request construction from HTML forms
//! - **Fields**: registration, computation and item assembly

mod types;

// Re-export public API
pub use types::{BodyError, FieldError, FormError, InitializationError, UrlError};
