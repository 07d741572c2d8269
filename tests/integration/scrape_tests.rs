//! End-to-end scrape tests
//!
//! These tests use wiremock to serve fixture listing pages and run the full
//! pipeline: walk the region index, extract every route and operator panel,
//! commit the dataset, then query it through the filter layer.

use busgrid::config::{Config, OutputConfig, RegionEntry, ScraperConfig};
use busgrid::filter::{Facet, FacetSelection, RouteQuery};
use busgrid::scrape::run_scrape;
use busgrid::storage::{SqliteStorage, Storage, StorageError};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// One bus listing fragment in the site's markup shape
fn listing(operator: &str, class: &str, departure: &str, rating: Option<&str>, price: &str) -> String {
    let rating_html = rating
        .map(|r| format!(r#"<div class="rating___c2a7f">{}</div>"#, r))
        .unwrap_or_default();
    format!(
        r#"<li class="tupleWrapper___9a3e1">
            <div class="travelsName___d01fa">{operator}</div>
            <p class="busType___f8c22">{class}</p>
            <p class="boardingTime___1b2c3">{departure}</p>
            <p class="duration___77aa0">5h 45m</p>
            <p class="droppingTime___4d5e6">03:15</p>
            <div class="timeFareBoWrap___8e9f0">{rating_html}<p class="finalFare___5a6b7">₹{price}</p></div>
            <p class="totalSeats___2c3d4">32 Seats available</p>
        </li>"#
    )
}

fn route_page(listings: &[String], panel_url: Option<&str>) -> String {
    let panel = panel_url
        .map(|u| format!(r#"<div class="rtcInfoWrap___e5f60" data-url="{}">State buses</div>"#, u))
        .unwrap_or_default();
    format!(
        "<html><body>{}<ul>{}</ul></body></html>",
        panel,
        listings.join("\n")
    )
}

fn index_page(routes: &[(&str, &str)]) -> String {
    let links: String = routes
        .iter()
        .map(|(href, title)| {
            format!(r#"<a class="route" href="{}" title="{}">{}</a>"#, href, title, title)
        })
        .collect();
    format!("<html><body>{}</body></html>", links)
}

fn test_config(regions: Vec<RegionEntry>, db_path: &str) -> Config {
    Config {
        scraper: ScraperConfig {
            wait_timeout_ms: 1000,
            poll_interval_ms: 50,
            settle_delay_ms: 0,
            user_agent: "busgrid-test/1.0".to_string(),
        },
        output: OutputConfig {
            database_path: db_path.to_string(),
        },
        regions,
    }
}

async fn mount_page(server: &MockServer, page_path: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

/// Serves one region with two routes; the first route has a government
/// operator panel and one unrated listing.
async fn mount_kerala_fixtures(server: &MockServer) {
    mount_page(
        server,
        "/region/kerala",
        index_page(&[
            ("/route/kochi-trivandrum", "Kochi to Trivandrum"),
            ("/route/kochi-kannur", "Kochi to Kannur"),
        ]),
    )
    .await;

    mount_page(
        server,
        "/route/kochi-trivandrum",
        route_page(
            &[
                listing("Orange Tours", "A/C Sleeper (2+1)", "23:00", Some("4.3"), "1,250"),
                listing("Fresh Wheels", "Non AC Seater", "12:00", None, "600"),
            ],
            Some("/route/kochi-trivandrum/rtc"),
        ),
    )
    .await;

    mount_page(
        server,
        "/route/kochi-trivandrum/rtc",
        route_page(
            &[listing("KSRTC Swift Deluxe", "AC Seater", "06:30", Some("4.1"), "890")],
            None,
        ),
    )
    .await;

    mount_page(
        server,
        "/route/kochi-kannur",
        route_page(
            &[listing("Luxe Lines", "Luxury AC Sleeper", "21:15", Some("4.7"), "1,500")],
            None,
        ),
    )
    .await;
}

fn kerala_query(ceiling: f64, facets: &[Facet]) -> RouteQuery {
    let mut selection = FacetSelection::new(ceiling);
    for facet in facets {
        selection = selection.with(*facet);
    }
    RouteQuery {
        region: "Kerala".to_string(),
        route_name: "Kochi to Trivandrum".to_string(),
        selection,
    }
}

#[tokio::test]
async fn test_full_scrape_lands_typed_rows() {
    let server = MockServer::start().await;
    mount_kerala_fixtures(&server).await;

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("busgrid.db");
    let config = test_config(
        vec![RegionEntry {
            name: "Kerala".to_string(),
            url: format!("{}/region/kerala", server.uri()),
        }],
        db_path.to_str().unwrap(),
    );

    let count = run_scrape(&config).await.unwrap();
    // Panel listing + 2 main-page listings + 1 from the second route
    assert_eq!(count, 4);

    let storage = SqliteStorage::new(&db_path).unwrap();
    let rows = storage.query_routes(&kerala_query(5000.0, &[])).unwrap();
    assert_eq!(rows.len(), 3);

    // Ordered by departure time: 06:30, 12:00, 23:00
    assert_eq!(rows[0].operator_name, "KSRTC Swift Deluxe");
    assert_eq!(rows[2].operator_name, "Orange Tours");

    // Currency and separators stripped at load time
    assert_eq!(rows[2].price, 1250.0);
    assert_eq!(rows[2].seats_available, 32);

    // The unrated listing kept its slot
    let unrated = rows.iter().find(|r| r.operator_name == "Fresh Wheels").unwrap();
    assert!(unrated.rating.is_unrated());
}

#[tokio::test]
async fn test_facet_queries_over_scraped_dataset() {
    let server = MockServer::start().await;
    mount_kerala_fixtures(&server).await;

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("busgrid.db");
    let config = test_config(
        vec![RegionEntry {
            name: "Kerala".to_string(),
            url: format!("{}/region/kerala", server.uri()),
        }],
        db_path.to_str().unwrap(),
    );
    run_scrape(&config).await.unwrap();

    let storage = SqliteStorage::new(&db_path).unwrap();

    // Government facet matches only the authority operator
    let government = storage
        .query_routes(&kerala_query(5000.0, &[Facet::Government]))
        .unwrap();
    assert_eq!(government.len(), 1);
    assert_eq!(government[0].operator_name, "KSRTC Swift Deluxe");

    // Government + Private collapse to all operators
    let both = storage
        .query_routes(&kerala_query(5000.0, &[Facet::Government, Facet::Private]))
        .unwrap();
    assert_eq!(both.len(), 3);

    // Night travel matches the 23:00 departure only
    let night = storage
        .query_routes(&kerala_query(5000.0, &[Facet::NightTravel]))
        .unwrap();
    assert_eq!(night.len(), 1);
    assert_eq!(night[0].operator_name, "Orange Tours");

    // Price ceiling bounds every returned row
    let cheap = storage.query_routes(&kerala_query(900.0, &[])).unwrap();
    assert!(!cheap.is_empty());
    assert!(cheap.iter().all(|r| r.price <= 900.0));
}

#[tokio::test]
async fn test_rescrape_fully_replaces_dataset() {
    let server = MockServer::start().await;
    mount_kerala_fixtures(&server).await;

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("busgrid.db");
    let config = test_config(
        vec![RegionEntry {
            name: "Kerala".to_string(),
            url: format!("{}/region/kerala", server.uri()),
        }],
        db_path.to_str().unwrap(),
    );

    run_scrape(&config).await.unwrap();
    let count = run_scrape(&config).await.unwrap();
    assert_eq!(count, 4);

    // Old rows are gone, not appended to
    let storage = SqliteStorage::new(&db_path).unwrap();
    assert_eq!(storage.count_rows().unwrap(), 4);
}

#[tokio::test]
async fn test_unreachable_region_does_not_abort_run() {
    let server = MockServer::start().await;
    mount_kerala_fixtures(&server).await;

    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("busgrid.db");
    let config = test_config(
        vec![
            RegionEntry {
                name: "Goa".to_string(),
                url: format!("{}/region/goa", server.uri()), // not mounted: 404
            },
            RegionEntry {
                name: "Kerala".to_string(),
                url: format!("{}/region/kerala", server.uri()),
            },
        ],
        db_path.to_str().unwrap(),
    );

    let count = run_scrape(&config).await.unwrap();
    assert_eq!(count, 4);

    let storage = SqliteStorage::new(&db_path).unwrap();
    assert_eq!(storage.list_regions().unwrap(), vec!["Kerala".to_string()]);
}

#[tokio::test]
async fn test_reader_before_first_scrape_sees_unavailable_not_empty() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("busgrid.db");

    let storage = SqliteStorage::new(&db_path).unwrap();
    let result = storage.query_routes(&kerala_query(5000.0, &[]));
    assert!(matches!(result, Err(StorageError::DatasetUnavailable)));
}
