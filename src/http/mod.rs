//! HTTP message model.
//!
//! This module provides:
//! - Header, URL and body value types
//! - [`HttpRequest`], including construction from HTML forms
//! - [`HttpResponse`] with deterministic text encoding resolution
//! - Request fingerprinting and URL canonicalization
//!
//! Nothing here performs I/O. Requests are handed to an external client,
//! responses are built from what it returns.

mod body;
pub mod encoding;
pub mod fingerprint;
mod form;
mod headers;
mod request;
mod response;
mod urls;

// Re-export public API
pub use body::{HttpRequestBody, HttpResponseBody};
pub use fingerprint::{canonicalize_url, canonicalize_url_with, request_fingerprint};
pub use headers::{HttpHeaders, HttpRequestHeaders, HttpResponseHeaders, NameValuePair};
pub use request::HttpRequest;
pub use response::HttpResponse;
pub use urls::{RequestUrl, ResponseUrl};
