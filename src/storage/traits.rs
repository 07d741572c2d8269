//! Storage trait and error types

use crate::filter::RouteQuery;
use crate::records::BusRouteRecord;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The dataset table does not exist: a reader landed inside the
    /// replace window, or no scrape has run yet. Distinct from an empty
    /// result.
    #[error("dataset unavailable: no bus_routes table (scrape in progress or never run)")]
    DatasetUnavailable,

    #[error("corrupt dataset row: {0}")]
    CorruptRow(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Trait for the tabular storage collaborator
///
/// One production implementation (SQLite); the trait keeps the scrape and
/// query layers off any engine specifics.
pub trait Storage {
    /// Atomically replaces the persisted dataset with the given rows.
    ///
    /// Drop, create, and bulk-load run inside one transaction, so a
    /// failure mid-load leaves the previous dataset in place rather than
    /// a silently short one.
    fn replace_dataset(&mut self, rows: &[BusRouteRecord]) -> StorageResult<()>;

    /// Runs one bounded dashboard query, rows ordered by departure time.
    fn query_routes(&self, query: &RouteQuery) -> StorageResult<Vec<BusRouteRecord>>;

    /// Distinct regions present in the dataset, sorted.
    fn list_regions(&self) -> StorageResult<Vec<String>>;

    /// Distinct route names for one region, sorted.
    fn list_routes(&self, region: &str) -> StorageResult<Vec<String>>;

    /// Minimum and maximum price for one region/route, if any rows match.
    fn price_range(&self, region: &str, route_name: &str) -> StorageResult<Option<(f64, f64)>>;

    /// Total number of rows in the dataset.
    fn count_rows(&self) -> StorageResult<u64>;

    /// Row counts per region, sorted by region.
    fn region_counts(&self) -> StorageResult<Vec<(String, u64)>>;

    /// Number of rows without a rating.
    fn count_unrated(&self) -> StorageResult<u64>;
}
