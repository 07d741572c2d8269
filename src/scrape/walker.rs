//! Route walker
//!
//! Drives the browser over a region's listing index: every pagination tab,
//! every route link, every operator sub-panel, invoking the extractor once
//! per visited page and forwarding the batches to the assembler.
//!
//! Element handles are invalidated by any navigation, so collections are
//! re-resolved from the live page immediately before each indexed access.
//! Failure on one route never aborts the remaining routes; failure on one
//! region never aborts the remaining regions.

use crate::browser::Browser;
use crate::config::{RegionEntry, ScraperConfig};
use crate::scrape::assembler::DatasetAssembler;
use crate::scrape::extractor::{extract_route_page, RouteContext};
use crate::scrape::selectors;
use crate::{BusgridError, Result};
use std::time::Duration;

/// Walks regions route by route, feeding extracted batches to the assembler.
pub struct RouteWalker<'a, B: Browser> {
    browser: &'a mut B,
    wait_timeout: Duration,
}

impl<'a, B: Browser> RouteWalker<'a, B> {
    pub fn new(browser: &'a mut B, scraper: &ScraperConfig) -> Self {
        Self {
            browser,
            wait_timeout: Duration::from_millis(scraper.wait_timeout_ms),
        }
    }

    /// Visits every route of one region, including all pagination tabs.
    ///
    /// Route-scope failures are logged and skipped; an error return means
    /// the region itself could not be walked (index unreachable or the
    /// navigation state could not be unwound).
    pub async fn walk_region(
        &mut self,
        region: &RegionEntry,
        assembler: &mut DatasetAssembler,
    ) -> Result<()> {
        tracing::info!("Walking region {}", region.name);
        let before = assembler.len();

        self.browser.navigate(&region.url).await?;
        self.browser
            .wait_until_present(selectors::ROUTE_LINK, self.wait_timeout)
            .await?;

        let tabs = self.browser.find_elements(selectors::PAGE_TAB)?;
        if tabs.is_empty() {
            // No pagination: the whole index is a single implicit page
            self.walk_index_page(region, assembler).await?;
        } else {
            let tab_count = tabs.len();
            for i in 0..tab_count {
                // Re-resolve tab handles: the previous iteration navigated
                let tabs = self.browser.find_elements(selectors::PAGE_TAB)?;
                if i >= tabs.len() {
                    tracing::warn!(
                        "Pagination shrank to {} tabs on {}, stopping at tab {}",
                        tabs.len(),
                        region.name,
                        i
                    );
                    break;
                }
                self.browser.click(&tabs[i]).await?;
                self.browser
                    .wait_until_present(selectors::ROUTE_LINK, self.wait_timeout)
                    .await?;
                self.walk_index_page(region, assembler).await?;
            }
        }

        tracing::info!(
            "Region {} yielded {} listings",
            region.name,
            assembler.len() - before
        );
        Ok(())
    }

    /// Visits every route link on the current index page.
    async fn walk_index_page(
        &mut self,
        region: &RegionEntry,
        assembler: &mut DatasetAssembler,
    ) -> Result<()> {
        let route_count = self.browser.find_elements(selectors::ROUTE_LINK)?.len();
        tracing::debug!("{} route links on {} index page", route_count, region.name);

        for i in 0..route_count {
            if let Err(e) = self.walk_route(region, i, assembler).await {
                tracing::warn!(
                    "Skipping route {} of {}: {}",
                    i + 1,
                    region.name,
                    e
                );
            }
        }

        Ok(())
    }

    /// Visits the i-th route link of the current index page and extracts
    /// every operator sub-panel plus the route page itself.
    async fn walk_route(
        &mut self,
        region: &RegionEntry,
        index: usize,
        assembler: &mut DatasetAssembler,
    ) -> Result<()> {
        // Handles from before the last navigation are stale: re-resolve now
        let links = self.browser.find_elements(selectors::ROUTE_LINK)?;
        if index >= links.len() {
            tracing::warn!(
                "Route list shrank to {} entries, skipping index {}",
                links.len(),
                index
            );
            return Ok(());
        }

        let link = &links[index];
        let route_link = link
            .attr("href")
            .ok_or(BusgridError::Browser(
                crate::browser::BrowserError::NoLinkTarget,
            ))?
            .to_string();
        let route_name = link
            .attr("title")
            .map(str::to_string)
            .unwrap_or_else(|| link.text().to_string());

        let ctx = RouteContext {
            region: region.name.clone(),
            route_link,
            route_name,
        };

        self.browser.navigate(&ctx.route_link).await?;
        let outcome = self.scrape_route_page(&ctx, assembler).await;

        // Unwind to the index page whether or not extraction succeeded
        self.browser.back().await?;
        self.browser
            .wait_until_present(selectors::ROUTE_LINK, self.wait_timeout)
            .await?;

        outcome
    }

    /// Extracts the freshly navigated route page: each operator sub-panel
    /// first, then the page's own listings.
    async fn scrape_route_page(
        &mut self,
        ctx: &RouteContext,
        assembler: &mut DatasetAssembler,
    ) -> Result<()> {
        self.browser
            .wait_until_present(selectors::BUS_ITEM, self.wait_timeout)
            .await?;

        let panel_count = self.browser.find_elements(selectors::OPERATOR_PANEL)?.len();
        for j in 0..panel_count {
            let panels = self.browser.find_elements(selectors::OPERATOR_PANEL)?;
            if j >= panels.len() {
                break;
            }
            self.browser.click(&panels[j]).await?;

            let outcome = self.scrape_panel(ctx, assembler).await;

            // Return to the route page so the next panel opens from the
            // same render
            self.browser.back().await?;
            self.browser
                .wait_until_present(selectors::BUS_ITEM, self.wait_timeout)
                .await?;

            outcome?;
        }

        let batch = extract_route_page(&*self.browser, ctx)?;
        assembler.push_batch(batch);
        Ok(())
    }

    async fn scrape_panel(
        &mut self,
        ctx: &RouteContext,
        assembler: &mut DatasetAssembler,
    ) -> Result<()> {
        self.browser
            .wait_until_present(selectors::BUS_ITEM, self.wait_timeout)
            .await?;
        let batch = extract_route_page(&*self.browser, ctx)?;
        assembler.push_batch(batch);
        Ok(())
    }
}
