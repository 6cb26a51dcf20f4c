//! HTTP request model.

use crate::config::DEFAULT_METHOD;
use crate::error_handling::UrlError;
use crate::http::body::HttpRequestBody;
use crate::http::headers::HttpRequestHeaders;
use crate::http::urls::RequestUrl;

/// A generic HTTP request, as handed to an HTTP client or a cache.
///
/// The request is an immutable value: the `with_*` methods and
/// [`HttpRequest::urljoin`] return new values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    url: RequestUrl,
    method: String,
    headers: HttpRequestHeaders,
    body: HttpRequestBody,
}

impl HttpRequest {
    /// Creates a `GET` request with no headers and an empty body.
    pub fn new(url: impl Into<RequestUrl>) -> Self {
        Self {
            url: url.into(),
            method: DEFAULT_METHOD.to_string(),
            headers: HttpRequestHeaders::default(),
            body: HttpRequestBody::default(),
        }
    }

    /// Sets the method. Any text is accepted and kept verbatim.
    pub fn with_method(self, method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            ..self
        }
    }

    pub fn with_headers(self, headers: impl Into<HttpRequestHeaders>) -> Self {
        Self {
            headers: headers.into(),
            ..self
        }
    }

    pub fn with_body(self, body: impl Into<HttpRequestBody>) -> Self {
        Self {
            body: body.into(),
            ..self
        }
    }

    pub fn url(&self) -> &RequestUrl {
        &self.url
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn headers(&self) -> &HttpRequestHeaders {
        &self.headers
    }

    pub fn body(&self) -> &HttpRequestBody {
        &self.body
    }

    /// Returns `url` as an absolute URL, resolving it against this
    /// request's URL when it is relative.
    pub fn urljoin(&self, url: impl AsRef<str>) -> Result<RequestUrl, UrlError> {
        self.url.join(url)
    }
}
