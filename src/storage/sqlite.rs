//! SQLite storage implementation

use crate::filter::{Predicate, RouteQuery};
use crate::records::{BusRouteRecord, Rating};
use crate::storage::schema::{create_dataset_table, drop_dataset_table, DATASET_TABLE};
use crate::storage::traits::{Storage, StorageError, StorageResult};
use chrono::NaiveTime;
use rusqlite::{params, params_from_iter, Connection};
use std::path::Path;

/// Format used for the TIME columns.
const TIME_FORMAT: &str = "%H:%M:%S";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Opens (or creates) the database file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened database
    /// * `Err(StorageError)` - Failed to open database
    pub fn new(path: &Path) -> StorageResult<Self> {
        let conn = Connection::open(path)?;

        // Configure SQLite for better performance
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> StorageResult<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Whether the dataset table currently exists.
    ///
    /// A missing table is how a reader observes the replace window (or a
    /// database no scrape has ever written to).
    fn dataset_exists(&self) -> StorageResult<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            params![DATASET_TABLE],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn require_dataset(&self) -> StorageResult<()> {
        if self.dataset_exists()? {
            Ok(())
        } else {
            Err(StorageError::DatasetUnavailable)
        }
    }
}

/// One row as stored, before time-of-day parsing.
struct StoredRow {
    region: String,
    route_link: String,
    route_name: String,
    operator_name: String,
    vehicle_class: String,
    departure_time: String,
    duration: String,
    arrival_time: String,
    star_rating: Option<f64>,
    price: f64,
    seats_available: i64,
}

impl StoredRow {
    fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            region: row.get(0)?,
            route_link: row.get(1)?,
            route_name: row.get(2)?,
            operator_name: row.get(3)?,
            vehicle_class: row.get(4)?,
            departure_time: row.get(5)?,
            duration: row.get(6)?,
            arrival_time: row.get(7)?,
            star_rating: row.get(8)?,
            price: row.get(9)?,
            seats_available: row.get(10)?,
        })
    }

    fn into_record(self) -> StorageResult<BusRouteRecord> {
        let departure_time = parse_stored_time(&self.departure_time)?;
        let arrival_time = parse_stored_time(&self.arrival_time)?;
        Ok(BusRouteRecord {
            region: self.region,
            route_link: self.route_link,
            route_name: self.route_name,
            operator_name: self.operator_name,
            vehicle_class: self.vehicle_class,
            departure_time,
            duration: self.duration,
            arrival_time,
            rating: Rating::from(self.star_rating),
            price: self.price,
            seats_available: self.seats_available as u32,
        })
    }
}

fn parse_stored_time(value: &str) -> StorageResult<NaiveTime> {
    NaiveTime::parse_from_str(value, TIME_FORMAT)
        .map_err(|_| StorageError::CorruptRow(format!("bad time value {:?}", value)))
}

impl Storage for SqliteStorage {
    fn replace_dataset(&mut self, rows: &[BusRouteRecord]) -> StorageResult<()> {
        let tx = self.conn.transaction()?;

        drop_dataset_table(&tx)?;
        create_dataset_table(&tx)?;

        {
            let mut stmt = tx.prepare(
                "INSERT INTO bus_routes (
                    region, route_link, route_name, operator_name, vehicle_class,
                    departure_time, duration, arrival_time, star_rating, price,
                    seats_available
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            )?;

            for row in rows {
                stmt.execute(params![
                    row.region,
                    row.route_link,
                    row.route_name,
                    row.operator_name,
                    row.vehicle_class,
                    row.departure_time.format(TIME_FORMAT).to_string(),
                    row.duration,
                    row.arrival_time.format(TIME_FORMAT).to_string(),
                    row.rating.value(),
                    row.price,
                    row.seats_available as i64,
                ])?;
            }
        }

        tx.commit()?;
        tracing::debug!("Replaced dataset with {} rows", rows.len());
        Ok(())
    }

    fn query_routes(&self, query: &RouteQuery) -> StorageResult<Vec<BusRouteRecord>> {
        self.require_dataset()?;

        let predicate = Predicate::build(query);
        let sql = format!(
            "SELECT region, route_link, route_name, operator_name, vehicle_class,
                    departure_time, duration, arrival_time, star_rating, price,
                    seats_available
             FROM bus_routes
             WHERE {}
             ORDER BY departure_time",
            predicate.where_clause()
        );

        let mut stmt = self.conn.prepare(&sql)?;
        let stored = stmt
            .query_map(params_from_iter(predicate.params()), StoredRow::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        stored.into_iter().map(StoredRow::into_record).collect()
    }

    fn list_regions(&self) -> StorageResult<Vec<String>> {
        self.require_dataset()?;

        let mut stmt = self
            .conn
            .prepare("SELECT DISTINCT region FROM bus_routes ORDER BY region")?;
        let regions = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(regions)
    }

    fn list_routes(&self, region: &str) -> StorageResult<Vec<String>> {
        self.require_dataset()?;

        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT route_name FROM bus_routes WHERE region = ?1 ORDER BY route_name",
        )?;
        let routes = stmt
            .query_map(params![region], |row| row.get(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(routes)
    }

    fn price_range(&self, region: &str, route_name: &str) -> StorageResult<Option<(f64, f64)>> {
        self.require_dataset()?;

        let (min, max): (Option<f64>, Option<f64>) = self.conn.query_row(
            "SELECT MIN(price), MAX(price) FROM bus_routes
             WHERE region = ?1 AND route_name = ?2",
            params![region, route_name],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        Ok(match (min, max) {
            (Some(min), Some(max)) => Some((min, max)),
            _ => None,
        })
    }

    fn count_rows(&self) -> StorageResult<u64> {
        self.require_dataset()?;

        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM bus_routes", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    fn region_counts(&self) -> StorageResult<Vec<(String, u64)>> {
        self.require_dataset()?;

        let mut stmt = self.conn.prepare(
            "SELECT region, COUNT(*) FROM bus_routes GROUP BY region ORDER BY region",
        )?;
        let counts = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as u64))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(counts)
    }

    fn count_unrated(&self) -> StorageResult<u64> {
        self.require_dataset()?;

        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM bus_routes WHERE star_rating IS NULL",
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}
