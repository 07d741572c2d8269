//! Bus-route record types and load-time coercion
//!
//! The extractor produces [`RawBusRecord`]s: one listing exactly as it was
//! scraped, every field still text. At commit time the assembler coerces
//! each raw record into a typed [`BusRouteRecord`]. A coercion failure for
//! any row is a run-level error (the page shape changed under us), never a
//! per-row skip.

use chrono::NaiveTime;
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// Characters that are not part of a numeric price value.
static PRICE_SCRUB: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^0-9.]").unwrap());

/// One bus listing as scraped, all fields raw text.
///
/// `rating` is `None` when the listing carried no rating element at all;
/// the listing itself is still kept so the record count stays aligned
/// with the operator count on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBusRecord {
    pub region: String,
    pub route_link: String,
    pub route_name: String,
    pub operator_name: String,
    pub vehicle_class: String,
    pub departure_time: String,
    pub duration: String,
    pub arrival_time: String,
    pub rating: Option<String>,
    pub price: String,
    pub seats_available: String,
}

/// Star rating of a listing: a value in 0.0..=5.0, or explicitly unrated.
///
/// Unrated is a first-class value, not an exception path; it is stored as
/// SQL NULL so rating comparisons never match unrated rows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rating {
    Rated(f64),
    Unrated,
}

impl Rating {
    /// Returns the numeric value, or `None` for unrated.
    pub fn value(&self) -> Option<f64> {
        match self {
            Rating::Rated(v) => Some(*v),
            Rating::Unrated => None,
        }
    }

    pub fn is_unrated(&self) -> bool {
        matches!(self, Rating::Unrated)
    }
}

impl From<Option<f64>> for Rating {
    fn from(value: Option<f64>) -> Self {
        match value {
            Some(v) => Rating::Rated(v),
            None => Rating::Unrated,
        }
    }
}

/// One typed row of the bus_routes dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct BusRouteRecord {
    pub region: String,
    pub route_link: String,
    pub route_name: String,
    pub operator_name: String,
    /// Free-text class descriptor (AC/Non-AC/Sleeper/...). Listings never
    /// standardize this field, so classification happens downstream via
    /// substring matching, never a closed enum.
    pub vehicle_class: String,
    pub departure_time: NaiveTime,
    pub duration: String,
    pub arrival_time: NaiveTime,
    pub rating: Rating,
    pub price: f64,
    pub seats_available: u32,
}

/// Errors produced while coercing raw scraped text into typed fields
#[derive(Debug, Error)]
pub enum CoercionError {
    #[error("invalid {field} value {value:?}")]
    InvalidTime { field: &'static str, value: String },

    #[error("invalid rating value {value:?}")]
    InvalidRating { value: String },

    #[error("rating {value} outside 0.0..=5.0")]
    RatingOutOfRange { value: f64 },

    #[error("invalid price value {value:?}")]
    InvalidPrice { value: String },

    #[error("invalid seat count {value:?}")]
    InvalidSeats { value: String },
}

/// Strips the currency symbol and thousands separators from a scraped
/// price string, leaving only digits and the decimal point.
pub fn strip_currency(text: &str) -> String {
    PRICE_SCRUB.replace_all(text, "").into_owned()
}

/// Parses a scraped time-of-day string.
///
/// Listings show `HH:MM`; the database round-trips `HH:MM:SS`.
pub fn parse_time_of_day(field: &'static str, value: &str) -> Result<NaiveTime, CoercionError> {
    let trimmed = value.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map_err(|_| CoercionError::InvalidTime {
            field,
            value: value.to_string(),
        })
}

impl RawBusRecord {
    /// Coerces this raw record into a typed [`BusRouteRecord`].
    ///
    /// # Returns
    ///
    /// * `Ok(BusRouteRecord)` - All fields coerced to their declared types
    /// * `Err(CoercionError)` - A field did not match its declared type;
    ///   the caller must treat this as fatal for the whole load
    pub fn coerce(&self) -> Result<BusRouteRecord, CoercionError> {
        let departure_time = parse_time_of_day("departure_time", &self.departure_time)?;
        let arrival_time = parse_time_of_day("arrival_time", &self.arrival_time)?;

        let rating = match &self.rating {
            None => Rating::Unrated,
            Some(text) => {
                let value: f64 =
                    text.trim()
                        .parse()
                        .map_err(|_| CoercionError::InvalidRating {
                            value: text.clone(),
                        })?;
                if !(0.0..=5.0).contains(&value) {
                    return Err(CoercionError::RatingOutOfRange { value });
                }
                Rating::Rated(value)
            }
        };

        let scrubbed = strip_currency(&self.price);
        let price: f64 = scrubbed.parse().map_err(|_| CoercionError::InvalidPrice {
            value: self.price.clone(),
        })?;

        let seats_available: u32 =
            self.seats_available
                .trim()
                .parse()
                .map_err(|_| CoercionError::InvalidSeats {
                    value: self.seats_available.clone(),
                })?;

        Ok(BusRouteRecord {
            region: self.region.clone(),
            route_link: self.route_link.clone(),
            route_name: self.route_name.clone(),
            operator_name: self.operator_name.clone(),
            vehicle_class: self.vehicle_class.clone(),
            departure_time,
            duration: self.duration.clone(),
            arrival_time,
            rating,
            price,
            seats_available,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_record() -> RawBusRecord {
        RawBusRecord {
            region: "Kerala".to_string(),
            route_link: "https://example.com/route/1".to_string(),
            route_name: "Kochi to Trivandrum".to_string(),
            operator_name: "KSRTC Swift".to_string(),
            vehicle_class: "A/C Sleeper (2+1)".to_string(),
            departure_time: "21:30".to_string(),
            duration: "5h 45m".to_string(),
            arrival_time: "03:15".to_string(),
            rating: Some("4.3".to_string()),
            price: "₹1,250".to_string(),
            seats_available: "32".to_string(),
        }
    }

    #[test]
    fn test_coerce_full_record() {
        let record = raw_record().coerce().unwrap();
        assert_eq!(record.departure_time, NaiveTime::from_hms_opt(21, 30, 0).unwrap());
        assert_eq!(record.arrival_time, NaiveTime::from_hms_opt(3, 15, 0).unwrap());
        assert_eq!(record.rating, Rating::Rated(4.3));
        assert_eq!(record.price, 1250.0);
        assert_eq!(record.seats_available, 32);
    }

    #[test]
    fn test_missing_rating_becomes_unrated() {
        let mut raw = raw_record();
        raw.rating = None;
        let record = raw.coerce().unwrap();
        assert!(record.rating.is_unrated());
        assert_eq!(record.rating.value(), None);
    }

    #[test]
    fn test_rating_out_of_range_is_error() {
        let mut raw = raw_record();
        raw.rating = Some("7.5".to_string());
        let err = raw.coerce().unwrap_err();
        assert!(matches!(err, CoercionError::RatingOutOfRange { .. }));
    }

    #[test]
    fn test_strip_currency() {
        assert_eq!(strip_currency("₹1,250"), "1250");
        assert_eq!(strip_currency("₹ 980.50"), "980.50");
        assert_eq!(strip_currency("450"), "450");
    }

    #[test]
    fn test_price_with_decimal() {
        let mut raw = raw_record();
        raw.price = "₹980.50".to_string();
        assert_eq!(raw.coerce().unwrap().price, 980.5);
    }

    #[test]
    fn test_garbage_price_is_error() {
        let mut raw = raw_record();
        raw.price = "call us".to_string();
        assert!(matches!(
            raw.coerce().unwrap_err(),
            CoercionError::InvalidPrice { .. }
        ));
    }

    #[test]
    fn test_time_with_seconds_accepted() {
        let mut raw = raw_record();
        raw.departure_time = "06:00:01".to_string();
        let record = raw.coerce().unwrap();
        assert_eq!(
            record.departure_time,
            NaiveTime::from_hms_opt(6, 0, 1).unwrap()
        );
    }

    #[test]
    fn test_malformed_time_is_error() {
        let mut raw = raw_record();
        raw.arrival_time = "late evening".to_string();
        let err = raw.coerce().unwrap_err();
        assert!(matches!(
            err,
            CoercionError::InvalidTime {
                field: "arrival_time",
                ..
            }
        ));
    }

    #[test]
    fn test_seats_must_be_integer() {
        let mut raw = raw_record();
        raw.seats_available = "many".to_string();
        assert!(matches!(
            raw.coerce().unwrap_err(),
            CoercionError::InvalidSeats { .. }
        ));
    }
}
