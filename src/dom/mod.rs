//! HTML of rendered rows
//!
//! Rows of the virtualized track list only exist while they are near the
//! viewport, so the page hands back each row's `outerHTML` and every field is
//! read here with [`scraper`] queries:
//! - parse_selector: compile a CSS selector
//! - parse_row_html: decode the JSON array a row script returns
//! - first_text / first_attr / contains: field lookups inside a row

use crate::error::{BrowserError, Result};
use scraper::{ElementRef, Selector};

/// Compile a CSS selector
pub fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| BrowserError::InvalidArgument(format!("Invalid CSS selector '{}': {:?}", css, e)))
}

/// Parse the JSON string a row script returns into one HTML string per row
pub fn parse_row_html(json: &str) -> Result<Vec<String>> {
    serde_json::from_str(json).map_err(|e| BrowserError::DomParseFailed(format!("Failed to parse rendered rows: {}", e)))
}

/// Trimmed text of the first element under `scope` matching `selector`, or empty
pub fn first_text(scope: ElementRef<'_>, selector: &Selector) -> String {
    scope
        .select(selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

/// Attribute of the first match, or empty
pub fn first_attr(scope: ElementRef<'_>, selector: &Selector, attr: &str) -> String {
    scope
        .select(selector)
        .next()
        .and_then(|el| el.value().attr(attr))
        .map(String::from)
        .unwrap_or_default()
}

pub fn contains(scope: ElementRef<'_>, selector: &Selector) -> bool {
    scope.select(selector).next().is_some()
}
