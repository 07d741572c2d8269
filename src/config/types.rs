use serde::Deserialize;

/// Main configuration structure for BusGrid
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub scraper: ScraperConfig,
    pub output: OutputConfig,
    #[serde(default, rename = "region")]
    pub regions: Vec<RegionEntry>,
}

/// Scraper behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ScraperConfig {
    /// Maximum time to wait for expected elements after a navigation (milliseconds)
    #[serde(rename = "wait-timeout-ms")]
    pub wait_timeout_ms: u64,

    /// Interval between element-presence checks while waiting (milliseconds)
    #[serde(rename = "poll-interval-ms")]
    pub poll_interval_ms: u64,

    /// Delay after each navigation before touching the page (milliseconds)
    #[serde(rename = "settle-delay-ms")]
    pub settle_delay_ms: u64,

    /// User agent string sent with every page request
    #[serde(rename = "user-agent")]
    pub user_agent: String,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the SQLite database file
    #[serde(rename = "database-path")]
    pub database_path: String,
}

/// One administrative region and its listing-index URL
#[derive(Debug, Clone, Deserialize)]
pub struct RegionEntry {
    /// Region name as it will appear in the dataset (e.g. "Kerala")
    pub name: String,

    /// Listing-index URL for the region's transport corporation
    pub url: String,
}
