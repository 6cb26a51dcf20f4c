//! Error type definitions.
//!
//! This module defines all error types surfaced by the library.

use log::SetLoggerError;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),
}

/// Error types for URL parsing, joining and canonicalization.
///
/// Canonicalization never falls back to the raw string: a URL that cannot
/// be parsed is reported to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UrlError {
    /// The URL could not be parsed as an absolute URL.
    #[error("Failed to parse URL '{url}': {source}")]
    Parse {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The URL cannot serve as a base for joining (e.g. `data:` or `mailto:`).
    #[error("URL '{url}' cannot be used as a base URL")]
    CannotBeABase { url: String },
}

/// Error types for body decoding.
#[derive(Error, Debug)]
pub enum BodyError {
    /// The body is not a valid JSON document.
    #[error("Failed to decode JSON body: {0}")]
    Json(#[from] serde_json::Error),
}

/// Error types for building a request out of an HTML form.
#[derive(Error, Debug)]
pub enum FormError {
    /// The form selector is not valid CSS.
    #[error("Invalid form selector '{0}'")]
    InvalidSelector(String),

    /// No element in the document matched the form selector.
    #[error("No form matched selector '{0}'")]
    FormNotFound(String),

    /// The matched element is not a `<form>`.
    #[error("Element <{0}> is not a form")]
    NotAForm(String),

    /// The form action could not be resolved against the base URL.
    #[error(transparent)]
    Url(#[from] UrlError),
}

/// Error types for field registration and item assembly.
///
/// Errors raised by a field computation are carried in [`FieldError::Compute`]
/// untouched, so callers can downcast to their own error types.
#[derive(Error, Debug)]
pub enum FieldError {
    /// A field was registered under an unusable name.
    #[error("Invalid field name '{0}': field names must be non-empty identifiers")]
    InvalidName(String),

    /// A field was looked up that the page type never registered.
    #[error("No field named '{0}' is registered")]
    UnknownField(String),

    /// A field produced a deferred value while being read synchronously.
    #[error("Field '{0}' produced a deferred value; use the asynchronous assembler")]
    DeferredInSyncContext(String),

    /// The collected field values did not fit the target item type.
    #[error("Failed to construct item from fields: {0}")]
    ItemConstruction(#[source] serde_json::Error),

    /// A field computation failed.
    #[error(transparent)]
    Compute(#[from] anyhow::Error),
}
