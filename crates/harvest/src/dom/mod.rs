// ABOUTME: DOM helpers over scraper's parsed documents.
// ABOUTME: Content-area location strategies and noise-aware text extraction.

//! DOM utilities for locating and flattening page content.
//!
//! Everything here is synchronous and borrows from a `scraper::Html`, which
//! is not `Send`; callers parse, locate and extract before the next await.

pub mod locator;
pub mod text;

pub use locator::{ContentLocator, Strategy};
pub use text::{extract_text, extract_text_skipping, stripped_text};
