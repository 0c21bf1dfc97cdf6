//! Small helpers over `scraper`.
use crate::error::ExtractError;
use scraper::{ElementRef, Selector};

/// Parse a CSS selector, keeping the offending text in the error.
pub fn compile(selector: &str) -> Result<Selector, ExtractError> {
    Selector::parse(selector).map_err(|e| ExtractError::Selector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

/// Concatenated text of every descendant text node, untrimmed.
pub fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect()
}

/// Text of the first descendant matching `selector`, if any.
pub fn first_text(element: ElementRef<'_>, selector: &Selector) -> Option<String> {
    element.select(selector).next().map(text_of)
}
