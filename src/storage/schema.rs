//! Dataset schema definition
//!
//! The bus_routes table is dropped and recreated on every scrape run, so
//! the DDL here is the authority on column types: TIME for the departure
//! and arrival columns, DECIMAL(2,1) for the rating, DECIMAL(10,2) for the
//! price, INTEGER for the seat count, and a synthetic autoincrement id as
//! primary key.

/// Name of the dataset table.
pub const DATASET_TABLE: &str = "bus_routes";

/// DDL for one fresh dataset table
pub const CREATE_SQL: &str = r#"
CREATE TABLE bus_routes (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    region TEXT NOT NULL,
    route_link TEXT NOT NULL,
    route_name TEXT NOT NULL,
    operator_name TEXT NOT NULL,
    vehicle_class TEXT NOT NULL,
    departure_time TIME NOT NULL,
    duration TEXT NOT NULL,
    arrival_time TIME NOT NULL,
    star_rating DECIMAL(2,1),
    price DECIMAL(10,2) NOT NULL,
    seats_available INTEGER NOT NULL
);

CREATE INDEX idx_bus_routes_region_route ON bus_routes(region, route_name);
CREATE INDEX idx_bus_routes_departure ON bus_routes(departure_time);
"#;

/// Drops any previous dataset table
pub const DROP_SQL: &str = "DROP TABLE IF EXISTS bus_routes;";

/// Creates a fresh, empty dataset table
///
/// # Arguments
///
/// * `conn` - The database connection
pub fn create_dataset_table(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(CREATE_SQL)?;
    Ok(())
}

/// Drops the dataset table if it exists
pub fn drop_dataset_table(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(DROP_SQL)?;
    Ok(())
}
