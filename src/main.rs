//! Memoria main entry point
//!
//! Command-line interface for the memorial-site record harvester. The default
//! mode crawls every configured collection; `--clean` reconciles persisted
//! records against downloaded images and `--download` fetches missing images.

use clap::Parser;
use memoria::config::load_config_with_hash;
use memoria::crawler::crawl_collections;
use memoria::download::download_all;
use memoria::reconcile::clean_all;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Memoria: a memorial-site record harvester
///
/// Crawls paginated listing pages of configured collections, persists one
/// record set per collection, reconciles record sets against downloaded
/// images, and downloads the images themselves.
#[derive(Parser, Debug)]
#[command(name = "memoria")]
#[command(version)]
#[command(about = "A memorial-site record harvester", long_about = None)]
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

    /// Reconcile persisted record sets against downloaded images and exit
    #[arg(long, conflicts_with_all = ["download", "dry_run"])]
    clean: bool,

    /// Download missing images for all persisted record sets and exit
    #[arg(long, conflicts_with_all = ["clean", "dry_run"])]
    download: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long, conflicts_with_all = ["clean", "download"])]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, _config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    // Handle different modes
    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.clean {
        clean_all(Path::new(&config.output.data_root), &config.site.media_prefix)?;
    } else if cli.download {
        let stats = download_all(Path::new(&config.output.data_root), &config).await?;
        println!(
            "Downloaded {} images ({} skipped, {} failed)",
            stats.fetched, stats.skipped, stats.failed
        );
    } else {
        crawl_collections(&config).await?;
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
            0 => EnvFilter::new("memoria=info,warn"),
            1 => EnvFilter::new("memoria=debug,info"),
            2 => EnvFilter::new("memoria=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &memoria::config::Config) {
    println!("=== Memoria Dry Run ===\n");

    println!("Site:");
    println!("  Listing URL: {}", config.site.listing_url);
    println!("  Collection URL: {}", config.site.collection_url);
    println!("  Page base: {}", config.site.page_base);
    println!("  Media prefix: {}", config.site.media_prefix);
    println!("  Sort order: {}", config.site.sort_order);

    println!("\nCrawler:");
    println!(
        "  Detail delay: {}-{}ms",
        config.crawler.detail_delay_ms[0], config.crawler.detail_delay_ms[1]
    );
    println!(
        "  Download delay: {}-{}ms",
        config.crawler.download_delay_ms[0], config.crawler.download_delay_ms[1]
    );
    println!(
        "  Max concurrent sets: {}",
        config.crawler.max_concurrent_sets
    );

    println!("\nOutput:");
    println!("  Data root: {}", config.output.data_root);

    println!("\nCollections ({}):", config.collections.len());
    for id in &config.collections {
        println!("  - {}", id);
    }

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would crawl {} collections",
        config.collections.len()
    );
}
