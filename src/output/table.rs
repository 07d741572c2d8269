//! Dashboard row formatting and table rendering

use crate::records::{BusRouteRecord, Rating};
use chrono::{NaiveTime, Timelike};

/// One row formatted for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    pub operator_name: String,
    pub vehicle_class: String,
    pub departure: String,
    pub duration: String,
    pub arrival: String,
    pub rating: String,
    pub price: String,
    pub seats: String,
}

/// Formats a time-of-day as 12-hour AM/PM ("11:30 PM", "12:05 AM").
pub fn format_time_12h(time: NaiveTime) -> String {
    let hours = time.hour();
    let minutes = time.minute();
    let period = if hours < 12 { "AM" } else { "PM" };
    let display_hours = match hours % 12 {
        0 => 12,
        h => h,
    };
    format!("{}:{:02} {}", display_hours, minutes, period)
}

fn format_rating(rating: Rating) -> String {
    match rating.value() {
        Some(v) => format!("{:.1}", v),
        None => "unrated".to_string(),
    }
}

/// Formats one dataset row for the dashboard.
pub fn display_row(record: &BusRouteRecord) -> DisplayRow {
    DisplayRow {
        operator_name: record.operator_name.clone(),
        vehicle_class: record.vehicle_class.clone(),
        departure: format_time_12h(record.departure_time),
        duration: record.duration.clone(),
        arrival: format_time_12h(record.arrival_time),
        rating: format_rating(record.rating),
        price: format!("{:.2}", record.price),
        seats: record.seats_available.to_string(),
    }
}

const HEADERS: [&str; 8] = [
    "OPERATOR", "CLASS", "DEPARTS", "DURATION", "ARRIVES", "RATING", "PRICE", "SEATS",
];

/// Renders query rows as an aligned text table.
pub fn render_table(records: &[BusRouteRecord]) -> String {
    let rows: Vec<DisplayRow> = records.iter().map(display_row).collect();

    let mut widths: Vec<usize> = HEADERS.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (i, cell) in cells(row).iter().enumerate() {
            widths[i] = widths[i].max(cell.len());
        }
    }

    let mut out = String::new();
    for (i, header) in HEADERS.iter().enumerate() {
        if i > 0 {
            out.push_str("  ");
        }
        out.push_str(&format!("{:<width$}", header, width = widths[i]));
    }
    out.push('\n');

    for row in &rows {
        for (i, cell) in cells(row).iter().enumerate() {
            if i > 0 {
                out.push_str("  ");
            }
            out.push_str(&format!("{:<width$}", cell, width = widths[i]));
        }
        out.push('\n');
    }

    out
}

fn cells(row: &DisplayRow) -> [&str; 8] {
    [
        &row.operator_name,
        &row.vehicle_class,
        &row.departure,
        &row.duration,
        &row.arrival,
        &row.rating,
        &row.price,
        &row.seats,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(departure: &str, rating: Rating) -> BusRouteRecord {
        BusRouteRecord {
            region: "Kerala".to_string(),
            route_link: "https://example.com/route/1".to_string(),
            route_name: "Kochi to Trivandrum".to_string(),
            operator_name: "KSRTC Swift".to_string(),
            vehicle_class: "A/C Sleeper".to_string(),
            departure_time: NaiveTime::parse_from_str(departure, "%H:%M:%S").unwrap(),
            duration: "5h 45m".to_string(),
            arrival_time: NaiveTime::parse_from_str("04:00:00", "%H:%M:%S").unwrap(),
            rating,
            price: 1250.0,
            seats_available: 32,
        }
    }

    #[test]
    fn test_12h_formatting() {
        let time = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
        assert_eq!(format_time_12h(time(0, 5)), "12:05 AM");
        assert_eq!(format_time_12h(time(6, 0)), "6:00 AM");
        assert_eq!(format_time_12h(time(12, 0)), "12:00 PM");
        assert_eq!(format_time_12h(time(23, 30)), "11:30 PM");
    }

    #[test]
    fn test_display_row_formats_fields() {
        let row = display_row(&record("21:30:00", Rating::Rated(4.25)));
        assert_eq!(row.departure, "9:30 PM");
        assert_eq!(row.arrival, "4:00 AM");
        assert_eq!(row.rating, "4.2");
        assert_eq!(row.price, "1250.00");
        assert_eq!(row.seats, "32");
    }

    #[test]
    fn test_unrated_shows_marker_not_zero() {
        let row = display_row(&record("21:30:00", Rating::Unrated));
        assert_eq!(row.rating, "unrated");
    }

    #[test]
    fn test_table_has_header_and_one_line_per_row() {
        let records = vec![
            record("21:30:00", Rating::Rated(4.3)),
            record("09:15:00", Rating::Unrated),
        ];
        let table = render_table(&records);
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("OPERATOR"));
        assert!(lines[1].contains("9:30 PM"));
        assert!(lines[2].contains("unrated"));
    }
}
