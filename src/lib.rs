//! page_inputs library: HTTP page inputs and declarative item extraction
//!
//! This library provides the data layer a crawler or scraper builds on:
//! HTTP request and response values with deterministic text encoding
//! resolution, stable request fingerprints for deduplication and caching,
//! and a declarative field protocol that assembles structured items from
//! page objects. It performs no I/O of its own.
//!
//! # Example
//!
//! ```
//! use page_inputs::{request_fingerprint, HttpRequest, HttpResponse};
//!
//! let response = HttpResponse::new(
//!     "https://example.com/product/1",
//!     b"<html><head><meta charset=\"windows-1252\"></head><h1>Caf\xe9</h1></html>".to_vec(),
//! );
//! assert_eq!(response.encoding(), Some("windows-1252"));
//! assert_eq!(response.css("h1"), vec!["Café".to_string()]);
//!
//! let request = HttpRequest::new("https://example.com/search?b=2&a=1")
//!     .with_headers([("Accept", "text/html")]);
//! let fingerprint = request_fingerprint(&request)?;
//! assert_eq!(fingerprint.len(), 40);
//! # Ok::<(), page_inputs::UrlError>(())
//! ```
//!
//! # Logging
//!
//! Records are emitted through the `log` facade. Hosts may install any
//! logger, or use [`initialization::init_logger_with`].

pub mod config;
pub mod error_handling;
pub mod fields;
pub mod http;
pub mod initialization;
mod utils;

// Re-export public API
pub use config::{CanonicalizeOptions, LogFormat, LogLevel};
pub use error_handling::{BodyError, FieldError, FormError, InitializationError, UrlError};
pub use fields::{
    item_from_fields, item_from_fields_sync, FieldCache, FieldRegistry, FieldValue, Item,
    ItemPage,
};
pub use http::{
    canonicalize_url, canonicalize_url_with, request_fingerprint, HttpHeaders, HttpRequest,
    HttpRequestBody, HttpRequestHeaders, HttpResponse, HttpResponseBody, HttpResponseHeaders,
    NameValuePair, RequestUrl, ResponseUrl,
};
pub use utils::title_case_header;
