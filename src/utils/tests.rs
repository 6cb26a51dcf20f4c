// Utils module tests.

use super::*;

#[test]
fn test_parse_selector_with_fallback_valid() {
    let selector = parse_selector_with_fallback("div.price > span", "test");
    let html = scraper::Html::parse_fragment("<div class='price'><span>9</span></div>");
    assert_eq!(html.select(&selector).count(), 1);
}

#[test]
fn test_parse_selector_with_fallback_invalid_matches_nothing() {
    let selector = parse_selector_with_fallback("div[", "test");
    let html = scraper::Html::parse_fragment("<div>x</div>");
    assert_eq!(html.select(&selector).count(), 0);
}

#[test]
#[should_panic(expected = "programming error")]
fn test_parse_selector_unsafe_panics() {
    parse_selector_unsafe(">>>", "test");
}

#[test]
fn test_try_parse_selector() {
    assert!(try_parse_selector("form#login").is_some());
    assert!(try_parse_selector("form[").is_none());
}

#[test]
fn test_title_case_header() {
    assert_eq!(title_case_header("content-type"), "Content-Type");
    assert_eq!(title_case_header("CONTENT-TYPE"), "Content-Type");
    assert_eq!(title_case_header("x-api-key"), "X-Api-Key");
    assert_eq!(title_case_header("ETag"), "Etag");
    assert_eq!(title_case_header("x-b3-traceid"), "X-B3-Traceid");
    assert_eq!(title_case_header(""), "");
}
