//! Scrape pipeline: region walking, record extraction, dataset assembly
//!
//! The pipeline is strictly sequential: one region, one route, one operator
//! panel at a time. Page waits are the suspension points. Route- and
//! region-scope failures are logged and skipped; only storage and coercion
//! failures abort a run.

mod assembler;
mod extractor;
pub mod selectors;
mod walker;

pub use assembler::DatasetAssembler;
pub use extractor::{extract_route_page, RouteContext};
pub use walker::RouteWalker;

use crate::browser::{Browser, HttpBrowser};
use crate::config::Config;
use crate::storage::{SqliteStorage, Storage};
use crate::Result;
use std::path::Path;

/// Runs a complete scrape: walk every configured region, then atomically
/// replace the persisted dataset with the accumulated records.
///
/// # Arguments
///
/// * `config` - The loaded configuration
///
/// # Returns
///
/// * `Ok(usize)` - Number of rows in the freshly committed dataset
/// * `Err(BusgridError)` - Storage or coercion failure; per-region and
///   per-route failures are logged and skipped instead
pub async fn run_scrape(config: &Config) -> Result<usize> {
    let mut storage = SqliteStorage::new(Path::new(&config.output.database_path))?;
    let mut browser = HttpBrowser::new(&config.scraper)?;

    let count = scrape_into(&mut browser, &mut storage, config).await?;

    browser.quit().await?;
    Ok(count)
}

/// Scrapes every configured region with the given browser and commits the
/// dataset to the given storage.
///
/// Split out from [`run_scrape`] so tests can supply their own collaborators.
pub async fn scrape_into<B, S>(browser: &mut B, storage: &mut S, config: &Config) -> Result<usize>
where
    B: Browser,
    S: Storage,
{
    let mut assembler = DatasetAssembler::new();

    {
        let mut walker = RouteWalker::new(browser, &config.scraper);
        for region in &config.regions {
            if let Err(e) = walker.walk_region(region, &mut assembler).await {
                tracing::warn!("Skipping region {}: {}", region.name, e);
            }
        }
    }

    tracing::info!(
        "Scrape finished with {} raw listings across {} regions",
        assembler.len(),
        config.regions.len()
    );

    assembler.commit(storage)
}
