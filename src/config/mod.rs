//! Configuration module for BusGrid
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use busgrid::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("busgrid.toml")).unwrap();
//! println!("Scraping {} regions", config.regions.len());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, OutputConfig, RegionEntry, ScraperConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
