//! Structural selectors for the listing site
//!
//! The site ships class names with build-hash suffixes (`travelsName___ab12`),
//! so every listing selector matches on a class-substring. Update this file
//! when the site changes its markup; extraction failures point here first.

/// Operator name on one listing; the count of these is the expected record
/// count for the page.
pub const OPERATOR_NAME: &str = "div[class*='travelsName']";

/// Vehicle class descriptor (free text).
pub const VEHICLE_CLASS: &str = "p[class*='busType']";

/// Departure time of a listing.
pub const DEPARTURE_TIME: &str = "p[class*='boardingTime']";

/// Journey duration of a listing.
pub const DURATION: &str = "p[class*='duration']";

/// Arrival time of a listing.
pub const ARRIVAL_TIME: &str = "p[class*='droppingTime']";

/// Fare container of one listing; the rating lookup is scoped inside it.
pub const FARE_CONTAINER: &str = "div[class*='timeFareBoWrap']";

/// Star rating, queried within a fare container. Optional per listing.
pub const RATING: &str = "div[class*='rating']";

/// Final fare with currency symbol.
pub const PRICE: &str = "p[class*='finalFare']";

/// Seat availability text ("32 Seats available").
pub const SEATS: &str = "p[class*='totalSeats']";

/// Route link on a region's listing-index page.
pub const ROUTE_LINK: &str = "a.route";

/// One bus listing item; used as the loaded-page marker after navigation.
pub const BUS_ITEM: &str = "li[class*='tupleWrapper']";

/// Operator-specific sub-panel on a route page.
pub const OPERATOR_PANEL: &str = "div[class*='rtcInfoWrap']";

/// Pagination tab on a listing-index page.
pub const PAGE_TAB: &str = "div[class*='pageTabs']";
