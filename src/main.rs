//! BusGrid main entry point
//!
//! Command-line interface for the BusGrid scraper and dashboard query layer.

use anyhow::Context;
use busgrid::config::load_config_with_hash;
use busgrid::filter::{FacetSelection, RouteQuery};
use busgrid::output::{load_statistics, print_query_result, print_statistics};
use busgrid::scrape::run_scrape;
use busgrid::storage::{SqliteStorage, Storage};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// BusGrid: bus-route listings scraper with a filterable dataset
///
/// The default mode scrapes every configured region and replaces the
/// persisted dataset. The query modes read the dataset the way the
/// dashboard does: bounded by region, route, and price ceiling, narrowed
/// by facet toggles.
#[derive(Parser, Debug)]
#[command(name = "busgrid")]
#[command(version = "1.0.0")]
#[command(about = "Bus-route listings scraper and filter dashboard", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be scraped without scraping
    #[arg(long, conflicts_with_all = ["stats", "query", "regions", "routes"])]
    dry_run: bool,

    /// Show dataset statistics and exit
    #[arg(long, conflicts_with_all = ["dry_run", "query", "regions", "routes"])]
    stats: bool,

    /// List regions present in the dataset and exit
    #[arg(long, conflicts_with_all = ["dry_run", "stats", "query", "routes"])]
    regions: bool,

    /// List routes for the selected --region and exit
    #[arg(long, conflicts_with_all = ["dry_run", "stats", "query", "regions"])]
    routes: bool,

    /// Run one dashboard query (requires --region and --route)
    #[arg(long)]
    query: bool,

    /// Region to query
    #[arg(long)]
    region: Option<String>,

    /// Route name to query
    #[arg(long)]
    route: Option<String>,

    /// Price ceiling; defaults to the route's maximum observed price
    #[arg(long)]
    max_price: Option<f64>,

    /// Comma-separated facet labels (e.g. "AC,Sleeper,Night-Travel")
    #[arg(long, value_delimiter = ',')]
    facets: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    // Handle different modes
    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else if cli.regions {
        handle_list_regions(&config)?;
    } else if cli.routes {
        handle_list_routes(&config, &cli)?;
    } else if cli.query {
        handle_query(&config, &cli)?;
    } else {
        handle_scrape(&config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("busgrid=info,warn"),
            1 => EnvFilter::new("busgrid=debug,info"),
            2 => EnvFilter::new("busgrid=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows what would be scraped
fn handle_dry_run(config: &busgrid::config::Config) {
    println!("=== BusGrid Dry Run ===\n");

    println!("Scraper Configuration:");
    println!("  Wait timeout: {}ms", config.scraper.wait_timeout_ms);
    println!("  Poll interval: {}ms", config.scraper.poll_interval_ms);
    println!("  Settle delay: {}ms", config.scraper.settle_delay_ms);
    println!("  User agent: {}", config.scraper.user_agent);

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);

    println!("\nRegions ({}):", config.regions.len());
    for region in &config.regions {
        println!("  - {} ({})", region.name, region.url);
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would scrape {} regions", config.regions.len());
}

/// Handles the --stats mode: shows statistics from the dataset
fn handle_stats(config: &busgrid::config::Config) -> anyhow::Result<()> {
    println!("Database: {}\n", config.output.database_path);

    let storage = open_storage(config)?;
    let stats = load_statistics(&storage).context("failed to load dataset statistics")?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the --regions mode: lists regions present in the dataset
fn handle_list_regions(config: &busgrid::config::Config) -> anyhow::Result<()> {
    let storage = open_storage(config)?;
    for region in storage.list_regions().context("failed to list regions")? {
        println!("{}", region);
    }
    Ok(())
}

/// Handles the --routes mode: lists routes for the selected region
fn handle_list_routes(config: &busgrid::config::Config, cli: &Cli) -> anyhow::Result<()> {
    let region = cli
        .region
        .as_deref()
        .context("--routes requires --region")?;

    let storage = open_storage(config)?;
    for route in storage
        .list_routes(region)
        .context("failed to list routes")?
    {
        println!("{}", route);
    }
    Ok(())
}

/// Handles the --query mode: runs one dashboard query
///
/// Query-layer failures are reported as a visible error state, distinct
/// from an empty result; neither is retried.
fn handle_query(config: &busgrid::config::Config, cli: &Cli) -> anyhow::Result<()> {
    let region = cli.region.clone().context("--query requires --region")?;
    let route_name = cli.route.clone().context("--query requires --route")?;

    let storage = open_storage(config)?;

    // Default the ceiling to the maximum observed price, matching the
    // dashboard slider's initial position
    let price_ceiling = match cli.max_price {
        Some(ceiling) => ceiling,
        None => match storage.price_range(&region, &route_name) {
            Ok(Some((_, max))) => max,
            Ok(None) => {
                print_query_result(Ok(Vec::new()));
                return Ok(());
            }
            Err(e) => {
                print_query_result(Err(e));
                return Ok(());
            }
        },
    };

    let selection = FacetSelection::from_labels(&cli.facets, price_ceiling)
        .map_err(|e| anyhow::anyhow!("{} (known facets: AC, Non-AC, Sleeper, Seater, Luxury, Electric, Government, Private, Highly-Rated, Day-Travel, Night-Travel)", e))?;

    let query = RouteQuery {
        region,
        route_name,
        selection,
    };

    print_query_result(storage.query_routes(&query));
    Ok(())
}

/// Handles the default mode: a full scrape run
async fn handle_scrape(config: &busgrid::config::Config) -> anyhow::Result<()> {
    tracing::info!("Starting scrape of {} regions", config.regions.len());

    match run_scrape(config).await {
        Ok(count) => {
            tracing::info!("Scrape completed successfully");
            println!("Dataset replaced: {} listings", count);
            Ok(())
        }
        Err(e) => {
            tracing::error!("Scrape failed: {}", e);
            Err(e.into())
        }
    }
}

fn open_storage(config: &busgrid::config::Config) -> anyhow::Result<SqliteStorage> {
    SqliteStorage::new(Path::new(&config.output.database_path))
        .context("failed to open the dataset database")
}
