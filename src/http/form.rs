//! Request construction from HTML forms.
//!
//! Collects the values a browser would submit for a `<form>` found in a
//! response and turns them into a GET or POST [`HttpRequest`].

use scraper::ElementRef;

use crate::config::{DEFAULT_METHOD, FORM_URLENCODED_CONTENT_TYPE, HEADER_CONTENT_TYPE};
use crate::error_handling::FormError;
use crate::http::request::HttpRequest;
use crate::http::response::HttpResponse;
use crate::http::urls::{join, parse_absolute};
use crate::utils::try_parse_selector;

/// Characters stripped from both ends of an `action` attribute.
const HTML5_WHITESPACE: &[char] = &[' ', '\t', '\n', '\r', '\x0c'];

impl HttpRequest {
    /// Builds the request that submits the first form matching
    /// `form_selector` in `response`.
    ///
    /// # Arguments
    ///
    /// * `response` - The response containing the form
    /// * `form_selector` - CSS selector of the `<form>` element
    /// * `data` - Values to submit. A name present here replaces every
    ///   value the form itself carries for that name; repeated names
    ///   submit several values.
    ///
    /// The method is taken from the form's `method` attribute and forced to
    /// `GET` unless it is `GET` or `POST`. The target is the form's `action`
    /// resolved against the response's base URL. GET submissions carry the
    /// values in the URL query, POST submissions in a
    /// `application/x-www-form-urlencoded` body.
    ///
    /// # Errors
    ///
    /// Returns an error if the selector is invalid, matches nothing, matches
    /// something other than a `<form>`, or if the action cannot be resolved.
    pub fn from_form(
        response: &HttpResponse,
        form_selector: &str,
        data: &[(&str, &str)],
    ) -> Result<Self, FormError> {
        let selector = try_parse_selector(form_selector)
            .ok_or_else(|| FormError::InvalidSelector(form_selector.to_string()))?;
        let document = response.html();
        let form = document
            .select(&selector)
            .next()
            .ok_or_else(|| FormError::FormNotFound(form_selector.to_string()))?;
        let tag = form.value().name();
        if !tag.eq_ignore_ascii_case("form") {
            return Err(FormError::NotAForm(tag.to_string()));
        }

        let query = form_query(form, data);
        let method = form_method(form);
        let action = form_action(form, response.base_url())?;
        log::debug!("Submitting form '{}' as {} {}", form_selector, method, action);

        if method == "POST" {
            return Ok(HttpRequest::new(action)
                .with_method(method)
                .with_headers([(HEADER_CONTENT_TYPE, FORM_URLENCODED_CONTENT_TYPE)])
                .with_body(query));
        }

        let mut url = parse_absolute(&action)?;
        url.set_query(if query.is_empty() { None } else { Some(&query) });
        Ok(HttpRequest::new(url).with_method(method))
    }
}

fn form_method(form: ElementRef<'_>) -> String {
    let method = form
        .value()
        .attr("method")
        .unwrap_or(DEFAULT_METHOD)
        .to_uppercase();
    match method.as_str() {
        "GET" | "POST" => method,
        _ => DEFAULT_METHOD.to_string(),
    }
}

fn form_action(form: ElementRef<'_>, base_url: &str) -> Result<String, FormError> {
    match form.value().attr("action") {
        Some(action) => Ok(join(base_url, action.trim_matches(HTML5_WHITESPACE))?),
        None => Ok(base_url.to_string()),
    }
}

/// Encodes the submitted name/value pairs in document order, followed by
/// the caller-supplied pairs.
fn form_query(form: ElementRef<'_>, data: &[(&str, &str)]) -> String {
    let overridden = |name: &str| data.iter().any(|(key, _)| *key == name);

    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for element in form.descendants().filter_map(ElementRef::wrap) {
        let Some(name) = element.value().attr("name").filter(|n| !n.is_empty()) else {
            continue;
        };
        if overridden(name) {
            continue;
        }
        for value in control_values(element) {
            serializer.append_pair(name, &value);
        }
    }
    for (name, value) in data {
        serializer.append_pair(name, value);
    }
    serializer.finish()
}

/// Returns the values a form control submits. Controls that submit
/// nothing yield an empty list.
fn control_values(element: ElementRef<'_>) -> Vec<String> {
    let el = element.value();
    match el.name() {
        "textarea" => vec![element.text().collect()],
        "select" => select_values(element),
        "input" => {
            let kind = el.attr("type").unwrap_or("text").to_ascii_lowercase();
            match kind.as_str() {
                "submit" | "image" | "reset" => Vec::new(),
                "checkbox" | "radio" => {
                    if el.attr("checked").is_none() {
                        Vec::new()
                    } else {
                        vec![el.attr("value").unwrap_or("on").to_string()]
                    }
                }
                _ => vec![el.attr("value").unwrap_or_default().to_string()],
            }
        }
        _ => Vec::new(),
    }
}

fn select_values(select: ElementRef<'_>) -> Vec<String> {
    let options: Vec<ElementRef<'_>> = select
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|e| e.value().name() == "option")
        .collect();
    let option_value = |option: &ElementRef<'_>| {
        option
            .value()
            .attr("value")
            .map(str::to_string)
            .unwrap_or_else(|| option.text().collect::<String>().trim().to_string())
    };
    let selected = options
        .iter()
        .filter(|option| option.value().attr("selected").is_some());

    if select.value().attr("multiple").is_some() {
        return selected.map(option_value).collect();
    }
    // Single selects submit the last selected option, or the first option
    // when none is selected. A select without options submits nothing.
    selected
        .last()
        .or_else(|| options.first())
        .map(option_value)
        .into_iter()
        .collect()
}
