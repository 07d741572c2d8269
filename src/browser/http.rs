//! HTTP-backed browser implementation
//!
//! [`HttpBrowser`] drives the listing site with a plain HTTP client: each
//! navigation fetches the page body and re-renders it for selector queries,
//! a history stack backs `back()`, and `click` follows the element's link
//! target (`href`, or `data-url` for script-driven controls). Waits poll
//! the current render until the selector appears or the timeout budget is
//! spent.

use crate::browser::{
    select_from, Browser, BrowserError, BrowserResult, Element, PageView,
};
use crate::config::ScraperConfig;
use crate::Result as BusgridResult;
use async_trait::async_trait;
use reqwest::Client;
use scraper::Html;
use std::time::Duration;
use url::Url;

/// Builds the HTTP client used for page fetches
///
/// # Arguments
///
/// * `config` - The scraper configuration carrying the user agent string
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_page_client(config: &ScraperConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// A browser over plain HTTP fetches with an explicit history stack.
pub struct HttpBrowser {
    client: Client,
    /// Visited URLs; the last entry is the current page.
    history: Vec<Url>,
    /// Body of the current page.
    body: String,
    /// Render epoch; bumped on every navigation.
    epoch: u64,
    settle_delay: Duration,
    poll_interval: Duration,
}

impl HttpBrowser {
    /// Creates a browser from the scraper configuration.
    pub fn new(config: &ScraperConfig) -> BusgridResult<Self> {
        let client = build_page_client(config)?;
        Ok(Self {
            client,
            history: Vec::new(),
            body: String::new(),
            epoch: 0,
            settle_delay: Duration::from_millis(config.settle_delay_ms),
            poll_interval: Duration::from_millis(config.poll_interval_ms),
        })
    }

    /// URL of the current page, if any navigation has happened.
    pub fn current_url(&self) -> Option<&Url> {
        self.history.last()
    }

    /// Fetches `url` and installs the response body as the current render.
    async fn load(&mut self, url: Url) -> BrowserResult<()> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| classify_request_error(url.as_str(), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BrowserError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| classify_request_error(url.as_str(), e))?;

        self.body = body;
        self.epoch += 1;

        if !self.settle_delay.is_zero() {
            tokio::time::sleep(self.settle_delay).await;
        }

        Ok(())
    }

    /// Checks whether the current render has a match for `selector`.
    fn selector_present(&self, selector: &str) -> BrowserResult<bool> {
        let document = Html::parse_document(&self.body);
        let parsed = super::parse_selector(selector)?;
        Ok(document.select(&parsed).next().is_some())
    }

    fn check_fresh(&self, element: &Element) -> BrowserResult<()> {
        if element.epoch() != self.epoch {
            return Err(BrowserError::StaleElement);
        }
        Ok(())
    }
}

/// Maps a reqwest failure to the browser error taxonomy
fn classify_request_error(url: &str, error: reqwest::Error) -> BrowserError {
    if error.is_timeout() {
        BrowserError::RequestTimeout {
            url: url.to_string(),
        }
    } else {
        BrowserError::Navigation {
            url: url.to_string(),
            source: error,
        }
    }
}

impl PageView for HttpBrowser {
    fn find_elements(&self, selector: &str) -> BrowserResult<Vec<Element>> {
        let document = Html::parse_document(&self.body);
        select_from(&document, selector, self.epoch)
    }

    fn find_within(&self, scope: &Element, selector: &str) -> BrowserResult<Vec<Element>> {
        self.check_fresh(scope)?;
        let fragment = Html::parse_fragment(&scope.html);
        select_from(&fragment, selector, scope.epoch())
    }
}

#[async_trait]
impl Browser for HttpBrowser {
    async fn navigate(&mut self, url: &str) -> BrowserResult<()> {
        let parsed = match self.current_url() {
            // Resolve relative targets against the current page
            Some(base) => base.join(url),
            None => Url::parse(url),
        }
        .map_err(|e| BrowserError::LinkTarget {
            target: url.to_string(),
            source: e,
        })?;

        self.load(parsed.clone()).await?;
        self.history.push(parsed);
        Ok(())
    }

    async fn wait_until_present(&mut self, selector: &str, timeout: Duration) -> BrowserResult<()> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if self.selector_present(selector)? {
                return Ok(());
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(BrowserError::WaitTimeout {
                    selector: selector.to_string(),
                });
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    async fn click(&mut self, element: &Element) -> BrowserResult<()> {
        self.check_fresh(element)?;

        let target = element
            .attr("href")
            .or_else(|| element.attr("data-url"))
            .ok_or(BrowserError::NoLinkTarget)?
            .to_string();

        self.navigate(&target).await
    }

    async fn back(&mut self) -> BrowserResult<()> {
        // Current page plus at least one predecessor
        if self.history.len() < 2 {
            return Err(BrowserError::NoHistory);
        }
        self.history.pop();
        let previous = self
            .history
            .last()
            .cloned()
            .ok_or(BrowserError::NoHistory)?;
        self.load(previous).await
    }

    async fn quit(&mut self) -> BrowserResult<()> {
        self.history.clear();
        self.body.clear();
        Ok(())
    }
}
