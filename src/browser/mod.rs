//! Browser-automation collaborator
//!
//! The scrape pipeline depends on a narrow automation surface (navigate,
//! query elements, wait for presence, click, go back, quit), not on any
//! specific engine. [`Browser`] is that surface; [`HttpBrowser`] is the
//! bundled implementation over a plain HTTP client.
//!
//! Element handles are snapshots of a single page render. Every navigation
//! bumps the page epoch, and using a handle from an earlier render is a
//! [`BrowserError::StaleElement`]. Callers must re-resolve collections
//! immediately before each indexed access and never cache a handle across
//! a navigation boundary.

mod http;

pub use http::HttpBrowser;

use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

/// Errors from the browser collaborator
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("navigation to {url} failed: {source}")]
    Navigation { url: String, source: reqwest::Error },

    #[error("request timeout for {url}")]
    RequestTimeout { url: String },

    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("timed out waiting for selector {selector:?}")]
    WaitTimeout { selector: String },

    #[error("invalid selector {selector:?}")]
    Selector { selector: String },

    #[error("stale element handle: the page has been re-rendered since the handle was taken")]
    StaleElement,

    #[error("element has no link target to follow")]
    NoLinkTarget,

    #[error("no previous page in history")]
    NoHistory,

    #[error("invalid link target {target:?}: {source}")]
    LinkTarget {
        target: String,
        source: url::ParseError,
    },
}

/// Result type for browser operations
pub type BrowserResult<T> = Result<T, BrowserError>;

/// A snapshot handle to one DOM element of the current page render.
///
/// The handle carries the text content, attributes, and outer HTML of the
/// node, plus the epoch of the render it was taken from. It is valid only
/// until the next navigation.
#[derive(Debug, Clone)]
pub struct Element {
    epoch: u64,
    text: String,
    attrs: HashMap<String, String>,
    html: String,
}

impl Element {
    /// Builds a snapshot from a live node of the given render epoch.
    pub fn from_node(node: ElementRef<'_>, epoch: u64) -> Self {
        let text = node.text().collect::<String>().trim().to_string();
        let attrs = node
            .value()
            .attrs()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self {
            epoch,
            text,
            attrs,
            html: node.html(),
        }
    }

    /// The render epoch this handle was taken from.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Concatenated, trimmed text content of the node.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Attribute value, if present on the node.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Outer HTML of the node as captured at snapshot time.
    pub fn html(&self) -> &str {
        &self.html
    }
}

/// Parses a CSS selector, mapping failure to a [`BrowserError`]
pub(crate) fn parse_selector(selector: &str) -> BrowserResult<Selector> {
    Selector::parse(selector).map_err(|_| BrowserError::Selector {
        selector: selector.to_string(),
    })
}

/// Selects elements matching `selector` inside an HTML document, snapshotting
/// each as an [`Element`] of the given epoch.
pub(crate) fn select_from(
    document: &Html,
    selector: &str,
    epoch: u64,
) -> BrowserResult<Vec<Element>> {
    let parsed = parse_selector(selector)?;
    Ok(document
        .select(&parsed)
        .map(|node| Element::from_node(node, epoch))
        .collect())
}

/// Read-only view of the current page render.
///
/// Split from [`Browser`] so that extraction code, which only reads the
/// current render, can be exercised against a static page in tests.
pub trait PageView {
    /// Finds all elements matching a CSS selector on the current page.
    fn find_elements(&self, selector: &str) -> BrowserResult<Vec<Element>>;

    /// Finds elements matching a CSS selector inside the subtree of a
    /// previously returned element.
    ///
    /// Fails with [`BrowserError::StaleElement`] if `scope` was taken from
    /// an earlier render.
    fn find_within(&self, scope: &Element, selector: &str) -> BrowserResult<Vec<Element>>;
}

/// The narrow browser-automation surface the scrape pipeline drives.
#[async_trait]
pub trait Browser: PageView {
    /// Navigates to a URL, replacing the current page.
    async fn navigate(&mut self, url: &str) -> BrowserResult<()>;

    /// Blocks until at least one element matching the selector is present
    /// on the current page, or the timeout elapses.
    async fn wait_until_present(&mut self, selector: &str, timeout: Duration) -> BrowserResult<()>;

    /// Follows the link target of an element (a navigation).
    async fn click(&mut self, element: &Element) -> BrowserResult<()>;

    /// Navigates back to the previous page in history.
    async fn back(&mut self) -> BrowserResult<()>;

    /// Releases the underlying engine.
    async fn quit(&mut self) -> BrowserResult<()>;
}

/// A fixed page render backed by an HTML string.
///
/// Implements only [`PageView`]; used to test extraction logic without a
/// navigation engine.
pub struct StaticPage {
    html: String,
}

impl StaticPage {
    pub fn new(html: impl Into<String>) -> Self {
        Self { html: html.into() }
    }
}

impl PageView for StaticPage {
    fn find_elements(&self, selector: &str) -> BrowserResult<Vec<Element>> {
        let document = Html::parse_document(&self.html);
        select_from(&document, selector, 0)
    }

    fn find_within(&self, scope: &Element, selector: &str) -> BrowserResult<Vec<Element>> {
        let fragment = Html::parse_fragment(&scope.html);
        select_from(&fragment, selector, scope.epoch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"
        <html><body>
            <div class="card" data-id="a"><span class="name">Alpha</span></div>
            <div class="card" data-id="b"><span class="name">Beta</span></div>
        </body></html>
    "#;

    #[test]
    fn test_find_elements_snapshots_text_and_attrs() {
        let page = StaticPage::new(PAGE);
        let cards = page.find_elements("div.card").unwrap();
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].text(), "Alpha");
        assert_eq!(cards[1].attr("data-id"), Some("b"));
    }

    #[test]
    fn test_find_within_scopes_to_subtree() {
        let page = StaticPage::new(PAGE);
        let cards = page.find_elements("div.card").unwrap();
        let names = page.find_within(&cards[1], "span.name").unwrap();
        assert_eq!(names.len(), 1);
        assert_eq!(names[0].text(), "Beta");
    }

    #[test]
    fn test_find_within_misses_siblings() {
        let page = StaticPage::new(PAGE);
        let cards = page.find_elements("div.card").unwrap();
        let names = page.find_within(&cards[0], "span.name").unwrap();
        assert_eq!(names.len(), 1);
        assert_eq!(names[0].text(), "Alpha");
    }

    #[test]
    fn test_invalid_selector_is_error() {
        let page = StaticPage::new(PAGE);
        assert!(matches!(
            page.find_elements("div[[["),
            Err(BrowserError::Selector { .. })
        ));
    }

    #[test]
    fn test_no_matches_is_empty_not_error() {
        let page = StaticPage::new(PAGE);
        let found = page.find_elements("ul.missing").unwrap();
        assert!(found.is_empty());
    }
}
