//! Output module: dashboard-facing formatting and dataset statistics
//!
//! The dashboard consumes formatted rows (12-hour AM/PM times, rating to
//! one decimal, price to two decimals, seats as an integer) plus a count
//! line. An empty result ("no matching buses") and a storage failure
//! ("could not reach the dataset") are different outcomes and are reported
//! differently.

mod table;
pub mod stats;

pub use stats::{load_statistics, print_statistics, DatasetStatistics};
pub use table::{display_row, format_time_12h, render_table, DisplayRow};

use crate::records::BusRouteRecord;
use crate::storage::StorageError;

/// Prints one dashboard query outcome to stdout/stderr.
///
/// Success prints the count line and the table (or the no-match message);
/// failure prints a storage-error line. The two are never conflated.
pub fn print_query_result(result: Result<Vec<BusRouteRecord>, StorageError>) {
    match result {
        Ok(rows) if rows.is_empty() => {
            println!("No buses matched the selected filters.");
        }
        Ok(rows) => {
            println!("{} buses found within the selected price range.\n", rows.len());
            println!("{}", render_table(&rows));
        }
        Err(e) => {
            eprintln!("Could not read the dataset: {}", e);
        }
    }
}
