//! BusGrid: a bus-route listings scraper with a filterable dataset
//!
//! This crate scrapes public bus-route listings for a fixed set of regional
//! transport corporations, persists the results into a SQLite table with
//! declared column types, and answers parameterized filter queries over
//! that table for an interactive dashboard.

pub mod browser;
pub mod config;
pub mod filter;
pub mod output;
pub mod records;
pub mod scrape;
pub mod storage;

use thiserror::Error;

/// Main error type for BusGrid operations
#[derive(Debug, Error)]
pub enum BusgridError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Browser error: {0}")]
    Browser(#[from] browser::BrowserError),

    #[error("Misaligned listing fields on {route_link}: {detail}")]
    MisalignedFields { route_link: String, detail: String },

    #[error("Coercion error: {0}")]
    Coercion(#[from] records::CoercionError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] storage::StorageError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for BusGrid operations
pub type Result<T> = std::result::Result<T, BusgridError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use filter::{Facet, FacetSelection};
pub use records::{BusRouteRecord, Rating, RawBusRecord};
