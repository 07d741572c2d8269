//! Record extractor
//!
//! Turns one rendered route-listing page into a batch of raw bus records.
//! The operator-element count fixes the expected record count; every other
//! attribute is pulled as a parallel sequence and must line up with it.
//! A count mismatch means the page changed shape mid-extraction, and the
//! whole page is discarded rather than committed with misaligned fields.

use crate::browser::PageView;
use crate::records::{strip_currency, RawBusRecord};
use crate::scrape::selectors;
use crate::{BusgridError, Result};

/// Constant context for every record extracted from one route page.
#[derive(Debug, Clone)]
pub struct RouteContext {
    pub region: String,
    pub route_link: String,
    pub route_name: String,
}

/// Extracts all bus listings from the current page render.
///
/// # Arguments
///
/// * `page` - View of the rendered route-listing page
/// * `ctx` - The (region, route_link, route_name) context replicated into
///   every record
///
/// # Returns
///
/// * `Ok(Vec<RawBusRecord>)` - One record per operator element, index-aligned;
///   empty when the page has no listings
/// * `Err(BusgridError)` - The page could not be read as a coherent listing;
///   the caller must discard the page and move on
pub fn extract_route_page(page: &dyn PageView, ctx: &RouteContext) -> Result<Vec<RawBusRecord>> {
    let operators = texts(page, selectors::OPERATOR_NAME)?;
    let expected = operators.len();
    if expected == 0 {
        tracing::debug!("No listings on {}", ctx.route_link);
        return Ok(Vec::new());
    }

    let classes = texts(page, selectors::VEHICLE_CLASS)?;
    let departures = texts(page, selectors::DEPARTURE_TIME)?;
    let durations = texts(page, selectors::DURATION)?;
    let arrivals = texts(page, selectors::ARRIVAL_TIME)?;
    let ratings = extract_ratings(page)?;

    let prices = page
        .find_elements(selectors::PRICE)?
        .iter()
        .map(|el| strip_currency(el.text()))
        .collect::<Vec<_>>();

    let seats = page
        .find_elements(selectors::SEATS)?
        .iter()
        .map(|el| first_token(el.text()))
        .collect::<Vec<_>>();

    check_alignment(ctx, expected, "vehicle_class", classes.len())?;
    check_alignment(ctx, expected, "departure_time", departures.len())?;
    check_alignment(ctx, expected, "duration", durations.len())?;
    check_alignment(ctx, expected, "arrival_time", arrivals.len())?;
    check_alignment(ctx, expected, "rating", ratings.len())?;
    check_alignment(ctx, expected, "price", prices.len())?;
    check_alignment(ctx, expected, "seats_available", seats.len())?;

    let mut records = Vec::with_capacity(expected);
    for i in 0..expected {
        records.push(RawBusRecord {
            region: ctx.region.clone(),
            route_link: ctx.route_link.clone(),
            route_name: ctx.route_name.clone(),
            operator_name: operators[i].clone(),
            vehicle_class: classes[i].clone(),
            departure_time: departures[i].clone(),
            duration: durations[i].clone(),
            arrival_time: arrivals[i].clone(),
            rating: ratings[i].clone(),
            price: prices[i].clone(),
            seats_available: seats[i].clone(),
        });
    }

    tracing::debug!("Extracted {} listings from {}", records.len(), ctx.route_link);
    Ok(records)
}

/// Pulls the rating of each listing by scoping a sub-query to the listing's
/// fare container. A container with no rating element yields `None` at that
/// index; the listing is never dropped.
fn extract_ratings(page: &dyn PageView) -> Result<Vec<Option<String>>> {
    let containers = page.find_elements(selectors::FARE_CONTAINER)?;
    let mut ratings = Vec::with_capacity(containers.len());
    for container in &containers {
        let found = page.find_within(container, selectors::RATING)?;
        ratings.push(found.first().map(|el| el.text().to_string()));
    }
    Ok(ratings)
}

fn texts(page: &dyn PageView, selector: &str) -> Result<Vec<String>> {
    Ok(page
        .find_elements(selector)?
        .iter()
        .map(|el| el.text().to_string())
        .collect())
}

fn first_token(text: &str) -> String {
    text.split_whitespace().next().unwrap_or_default().to_string()
}

fn check_alignment(
    ctx: &RouteContext,
    expected: usize,
    field: &str,
    found: usize,
) -> Result<()> {
    if found != expected {
        return Err(BusgridError::MisalignedFields {
            route_link: ctx.route_link.clone(),
            detail: format!("{} operators but {} {} values", expected, found, field),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::StaticPage;

    fn ctx() -> RouteContext {
        RouteContext {
            region: "Kerala".to_string(),
            route_link: "https://example.com/route/1".to_string(),
            route_name: "Kochi to Trivandrum".to_string(),
        }
    }

    fn listing(operator: &str, class: &str, rating: Option<&str>) -> String {
        let rating_html = rating
            .map(|r| format!(r#"<div class="rating___x">{}</div>"#, r))
            .unwrap_or_default();
        format!(
            r#"<li class="tupleWrapper___x">
                <div class="travelsName___x">{operator}</div>
                <p class="busType___x">{class}</p>
                <p class="boardingTime___x">21:30</p>
                <p class="duration___x">5h 45m</p>
                <p class="droppingTime___x">03:15</p>
                <div class="timeFareBoWrap___x">{rating_html}<p class="finalFare___x">₹1,250</p></div>
                <p class="totalSeats___x">32 Seats available</p>
            </li>"#
        )
    }

    fn page_with(listings: &[String]) -> StaticPage {
        StaticPage::new(format!(
            "<html><body><ul>{}</ul></body></html>",
            listings.join("\n")
        ))
    }

    #[test]
    fn test_extracts_one_record_per_operator() {
        let page = page_with(&[
            listing("KSRTC Swift", "A/C Sleeper", Some("4.3")),
            listing("Orange Tours", "Non AC Seater", Some("3.9")),
        ]);
        let records = extract_route_page(&page, &ctx()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].operator_name, "KSRTC Swift");
        assert_eq!(records[1].vehicle_class, "Non AC Seater");
        // Context fields replicated into every record
        assert!(records.iter().all(|r| r.region == "Kerala"));
    }

    #[test]
    fn test_missing_rating_yields_none_at_that_index() {
        let page = page_with(&[
            listing("KSRTC Swift", "A/C Sleeper", Some("4.3")),
            listing("No Stars Travels", "Seater", None),
            listing("Orange Tours", "Sleeper", Some("3.9")),
        ]);
        let records = extract_route_page(&page, &ctx()).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].rating.as_deref(), Some("4.3"));
        assert_eq!(records[1].rating, None);
        assert_eq!(records[2].rating.as_deref(), Some("3.9"));
    }

    #[test]
    fn test_price_is_currency_stripped() {
        let page = page_with(&[listing("KSRTC Swift", "A/C Sleeper", Some("4.3"))]);
        let records = extract_route_page(&page, &ctx()).unwrap();
        assert_eq!(records[0].price, "1250");
    }

    #[test]
    fn test_seats_take_first_token() {
        let page = page_with(&[listing("KSRTC Swift", "A/C Sleeper", Some("4.3"))]);
        let records = extract_route_page(&page, &ctx()).unwrap();
        assert_eq!(records[0].seats_available, "32");
    }

    #[test]
    fn test_empty_page_yields_no_records() {
        let page = StaticPage::new("<html><body><p>No services found</p></body></html>");
        let records = extract_route_page(&page, &ctx()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_misaligned_counts_discard_whole_page() {
        // Two operators but only one bus-type element
        let broken = format!(
            "{}{}",
            listing("KSRTC Swift", "A/C Sleeper", Some("4.3")),
            r#"<li class="tupleWrapper___x">
                <div class="travelsName___x">Orange Tours</div>
                <p class="boardingTime___x">22:00</p>
                <p class="duration___x">6h</p>
                <p class="droppingTime___x">04:00</p>
                <div class="timeFareBoWrap___x"><p class="finalFare___x">₹900</p></div>
                <p class="totalSeats___x">12 Seats available</p>
            </li>"#
        );
        let page = StaticPage::new(format!("<html><body><ul>{}</ul></body></html>", broken));
        let result = extract_route_page(&page, &ctx());
        assert!(matches!(
            result,
            Err(BusgridError::MisalignedFields { .. })
        ));
    }
}
