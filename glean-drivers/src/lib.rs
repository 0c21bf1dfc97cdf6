//! Driver layer for browser automation.
//!
//! This crate exposes the WebDriver-backed browser session used by the
//! flight scraper, plus the trait seam that lets the scraper run against a
//! scripted session in tests.
//!
//! - [`glean_browser::session::BrowserSession`]: navigate, settle, wait, click, snapshot, close
//! - [`glean_browser::driver::GleanDriver`]: `fantoccini` implementation
//! - [`glean_browser::page`]: bounded wait-for-condition primitives
pub mod glean_browser;
