//! HTTP response model and encoding resolution.
//!
//! A response resolves one text encoding from several, possibly
//! conflicting, signals. First non-empty answer wins:
//!
//! 1. the encoding the response was constructed with
//! 2. a byte order mark on the body
//! 3. the `Content-Type` header charset
//! 4. a `<meta>` / XML prolog declaration in the body
//! 5. inference: the first of [`INFERENCE_TRIAL_ORDER`] the body decodes under
//!
//! Each stage is computed at most once per response. Inference decodes the
//! body as a side effect and that text becomes the cached [`HttpResponse::text`]
//! value, so the body is never decoded twice.

use once_cell::sync::OnceCell;
use scraper::Html;
use serde_json::Value;
use std::sync::LazyLock;
use strum_macros::Display;

use crate::config::{HEADER_CONTENT_TYPE, INFERENCE_TRIAL_ORDER};
use crate::error_handling::{BodyError, UrlError};
use crate::http::body::HttpResponseBody;
use crate::http::encoding::{decode_as, decodes_strictly, html_to_unicode, resolve_encoding};
use crate::http::headers::HttpResponseHeaders;
use crate::http::urls::{RequestUrl, ResponseUrl};
use crate::utils::{parse_selector_unsafe, parse_selector_with_fallback};

const BASE_HREF_SELECTOR_STR: &str = "base[href]";

static BASE_HREF_SELECTOR: LazyLock<scraper::Selector> =
    LazyLock::new(|| parse_selector_unsafe(BASE_HREF_SELECTOR_STR, "BASE_HREF_SELECTOR"));

/// Detection stage an encoding was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub(crate) enum EncodingStage {
    #[strum(serialize = "explicit encoding")]
    Override,
    #[strum(serialize = "byte order mark")]
    Bom,
    #[strum(serialize = "Content-Type header")]
    Header,
    #[strum(serialize = "body declaration")]
    BodyDeclaration,
    #[strum(serialize = "inference")]
    Inference,
}

type StageResolver = fn(&HttpResponse) -> Option<&'static str>;

/// Lazily computed, write-once state of a response.
///
/// Every slot is single-flight: concurrent first readers block until one of
/// them has filled it, later reads are lock-free.
#[derive(Debug, Clone, Default)]
struct ResolvedState {
    resolved: OnceCell<Option<(EncodingStage, &'static str)>>,
    override_encoding: OnceCell<Option<&'static str>>,
    bom_encoding: OnceCell<Option<&'static str>>,
    header_encoding: OnceCell<Option<&'static str>>,
    body_declared_encoding: OnceCell<Option<&'static str>>,
    inferred_encoding: OnceCell<Option<&'static str>>,
    // Shared by `text()` and inference, which decodes as a side effect
    text: OnceCell<String>,
    json: OnceCell<Value>,
    base_url: OnceCell<String>,
    #[cfg(test)]
    decode_passes: std::sync::Arc<std::sync::atomic::AtomicUsize>,
}

/// A downloaded HTTP response.
///
/// `url` should be the URL of the response after all redirects. `status`
/// and `headers` are optional because responses can come from sources
/// that have neither (a local HTML file, for instance).
///
/// The response is immutable. The `with_*` methods return a new value with
/// fresh caches.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    url: ResponseUrl,
    body: HttpResponseBody,
    status: Option<u16>,
    headers: HttpResponseHeaders,
    encoding: Option<String>,
    state: ResolvedState,
}

impl HttpResponse {
    pub fn new(url: impl Into<ResponseUrl>, body: impl Into<HttpResponseBody>) -> Self {
        Self {
            url: url.into(),
            body: body.into(),
            status: None,
            headers: HttpResponseHeaders::default(),
            encoding: None,
            state: ResolvedState::default(),
        }
    }

    pub fn with_status(self, status: u16) -> Self {
        Self {
            status: Some(status),
            state: ResolvedState::default(),
            ..self
        }
    }

    pub fn with_headers(self, headers: impl Into<HttpResponseHeaders>) -> Self {
        Self {
            headers: headers.into(),
            state: ResolvedState::default(),
            ..self
        }
    }

    /// Forces the response encoding, skipping detection. Labels that do
    /// not name a known encoding are ignored.
    pub fn with_encoding(self, encoding: impl Into<String>) -> Self {
        Self {
            encoding: Some(encoding.into()),
            state: ResolvedState::default(),
            ..self
        }
    }

    pub fn url(&self) -> &ResponseUrl {
        &self.url
    }

    pub fn body(&self) -> &HttpResponseBody {
        &self.body
    }

    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn headers(&self) -> &HttpResponseHeaders {
        &self.headers
    }

    /// Returns the resolved encoding of the response.
    ///
    /// `None` only when every stage, inference included, came up empty.
    pub fn encoding(&self) -> Option<&'static str> {
        self.resolved_encoding().map(|(_, encoding)| encoding)
    }

    fn resolved_encoding(&self) -> Option<(EncodingStage, &'static str)> {
        *self.state.resolved.get_or_init(|| {
            let stages: [(EncodingStage, StageResolver); 5] = [
                (EncodingStage::Override, Self::override_encoding),
                (EncodingStage::Bom, Self::bom_encoding),
                (EncodingStage::Header, Self::header_encoding),
                (EncodingStage::BodyDeclaration, Self::body_declared_encoding),
                (EncodingStage::Inference, Self::inferred_encoding),
            ];
            let resolved = stages
                .into_iter()
                .find_map(|(stage, resolve)| resolve(self).map(|encoding| (stage, encoding)));
            if let Some((stage, encoding)) = resolved {
                log::debug!("Using encoding {encoding} for {} from {stage}", self.url);
            }
            resolved
        })
    }

    /// Returns the body converted to text using the resolved encoding,
    /// following browser rules (a BOM wins and is stripped, malformed
    /// sequences are replaced).
    pub fn text(&self) -> &str {
        // Resolve the encoding first: inference may fill the text slot
        let encoding = self.encoding();
        self.state.text.get_or_init(|| {
            self.record_decode_pass();
            match encoding {
                Some(encoding) => decode_as(&self.body, encoding),
                None => html_to_unicode("", &self.body, None).text,
            }
        })
    }

    /// Returns the body parsed as a JSON document.
    ///
    /// Parsing is independent of the text encoding. A successful parse is
    /// cached; a failure is not, and calling again fails again.
    pub fn json(&self) -> Result<&Value, BodyError> {
        self.state.json.get_or_try_init(|| self.body.json::<Value>())
    }

    /// Parses the response text as an HTML document.
    pub fn html(&self) -> Html {
        Html::parse_document(self.text())
    }

    /// Returns the text content of every element matching `selector`.
    ///
    /// An invalid selector is logged and matches nothing.
    pub fn css(&self, selector: &str) -> Vec<String> {
        let selector = parse_selector_with_fallback(selector, "HttpResponse::css");
        self.html()
            .select(&selector)
            .map(|element| element.text().collect::<String>())
            .collect()
    }

    /// Returns the base URL for resolving relative links: the document's
    /// `<base href>` when present, the response URL otherwise.
    pub fn base_url(&self) -> &str {
        self.state.base_url.get_or_init(|| {
            let document = self.html();
            document
                .select(&BASE_HREF_SELECTOR)
                .next()
                .and_then(|base| base.value().attr("href"))
                .and_then(|href| self.url.join(href.trim()).ok())
                .map(|url| url.as_str().to_string())
                .unwrap_or_else(|| self.url.as_str().to_string())
        })
    }

    /// Resolves `url` against [`HttpResponse::base_url`].
    pub fn urljoin(&self, url: impl AsRef<str>) -> Result<RequestUrl, UrlError> {
        RequestUrl::from(self.base_url()).join(url)
    }

    fn override_encoding(&self) -> Option<&'static str> {
        *self
            .state
            .override_encoding
            .get_or_init(|| self.encoding.as_deref().and_then(resolve_encoding))
    }

    fn bom_encoding(&self) -> Option<&'static str> {
        *self
            .state
            .bom_encoding
            .get_or_init(|| self.body.bom_encoding())
    }

    fn header_encoding(&self) -> Option<&'static str> {
        *self
            .state
            .header_encoding
            .get_or_init(|| self.headers.declared_encoding())
    }

    fn body_declared_encoding(&self) -> Option<&'static str> {
        *self
            .state
            .body_declared_encoding
            .get_or_init(|| self.body.declared_encoding())
    }

    fn inferred_encoding(&self) -> Option<&'static str> {
        *self.state.inferred_encoding.get_or_init(|| {
            let content_type = self.headers.get(HEADER_CONTENT_TYPE).unwrap_or("");
            self.record_decode_pass();
            let decoded = html_to_unicode(content_type, &self.body, Some(&auto_detect_encoding));
            if decoded.encoding.is_none() {
                log::debug!(
                    "No encoding could be inferred for {}; using last-resort decode",
                    self.url
                );
            }
            // Only inference writes the slot before `text()` reads it
            let _ = self.state.text.set(decoded.text);
            decoded.encoding
        })
    }

    #[cfg(test)]
    fn record_decode_pass(&self) {
        self.state
            .decode_passes
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    }

    #[cfg(not(test))]
    fn record_decode_pass(&self) {}
}

/// Returns the first encoding of the trial order the body decodes under
/// without errors.
fn auto_detect_encoding(body: &[u8]) -> Option<&'static str> {
    INFERENCE_TRIAL_ORDER.iter().find_map(|label| {
        let ok = decodes_strictly(body, label);
        log::trace!("Encoding trial '{label}': {}", if ok { "ok" } else { "failed" });
        if ok {
            resolve_encoding(label)
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    include!("response_tests.rs");
}
