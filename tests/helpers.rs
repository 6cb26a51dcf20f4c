// Shared test helpers for building requests, responses and pages.
//
// This module provides common utilities used across multiple test files to reduce duplication.

#![allow(dead_code)] // Each test file uses a different subset

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::LazyLock;

use page_inputs::{FieldCache, FieldRegistry, FieldValue, HttpRequest, HttpResponse, ItemPage};
use serde_json::json;

/// URL used by responses that do not care about their address.
pub const PAGE_URL: &str = "https://shop.example.com/products/42";

/// A product page HTML document declaring `charset` in a `<meta>` tag.
pub fn product_html(charset: &str) -> Vec<u8> {
    let mut html = format!(
        "<html><head><meta charset=\"{charset}\"><title>Chair</title></head><body>\
         <h1 class=\"name\">Chair</h1><span class=\"price\">19.99</span>"
    )
    .into_bytes();
    // "Café" in a single-byte encoding
    html.extend_from_slice(b"<p class=\"shop\">Caf\xe9</p></body></html>");
    html
}

/// A request with headers in the given order.
pub fn request_with_headers(headers: &[(&str, &str)]) -> HttpRequest {
    HttpRequest::new("https://api.example.com/v1/search?q=chairs&page=2")
        .with_method("POST")
        .with_headers(headers.to_vec())
        .with_body(r#"{"filters": []}"#)
}

/// Page with one plain, one cached and one deferred field over a response.
pub struct ProductPage {
    pub response: HttpResponse,
    pub cache: FieldCache,
    pub price_computations: AtomicUsize,
}

impl ProductPage {
    pub fn new(response: HttpResponse) -> Self {
        Self {
            response,
            cache: FieldCache::new(),
            price_computations: AtomicUsize::new(0),
        }
    }

    pub fn price_computations(&self) -> usize {
        self.price_computations.load(Ordering::SeqCst)
    }
}

static PRODUCT_FIELDS: LazyLock<FieldRegistry<ProductPage>> = LazyLock::new(|| {
    FieldRegistry::builder()
        .field("name", |page: &ProductPage| {
            Ok(FieldValue::immediate(page.response.css("h1.name").join("")))
        })
        .cached_field("price", |page: &ProductPage| {
            page.price_computations.fetch_add(1, Ordering::SeqCst);
            let text = page.response.css(".price").join("");
            Ok(json!(text.parse::<f64>()?).into())
        })
        .field("shop", |page: &ProductPage| {
            Ok(FieldValue::deferred(async move {
                tokio::task::yield_now().await;
                Ok::<_, anyhow::Error>(json!(page.response.css(".shop").join("")))
            }))
        })
        .build()
        .expect("product field names are valid")
});

impl ItemPage for ProductPage {
    fn fields() -> &'static FieldRegistry<Self> {
        &PRODUCT_FIELDS
    }

    fn field_cache(&self) -> &FieldCache {
        &self.cache
    }
}
