//! Dataset statistics for the --stats mode

use crate::storage::{Storage, StorageResult};

/// Summary of the persisted dataset
#[derive(Debug, Clone)]
pub struct DatasetStatistics {
    /// Total number of rows
    pub total_rows: u64,

    /// Row counts per region
    pub region_counts: Vec<(String, u64)>,

    /// Number of rows without a rating
    pub unrated_rows: u64,
}

/// Loads statistics from storage
///
/// # Arguments
///
/// * `storage` - The storage backend to query
pub fn load_statistics<S: Storage + ?Sized>(storage: &S) -> StorageResult<DatasetStatistics> {
    let total_rows = storage.count_rows()?;
    let region_counts = storage.region_counts()?;
    let unrated_rows = storage.count_unrated()?;

    Ok(DatasetStatistics {
        total_rows,
        region_counts,
        unrated_rows,
    })
}

/// Prints statistics to stdout
pub fn print_statistics(stats: &DatasetStatistics) {
    println!("=== Dataset Statistics ===\n");
    println!("Total listings: {}", stats.total_rows);
    println!("Unrated listings: {}", stats.unrated_rows);
    println!("\nListings per region:");
    for (region, count) in &stats.region_counts {
        println!("  {:<20} {}", region, count);
    }
}
