#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the relief map data platform.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use clap::{Parser, Subcommand};
use relief_map_ai::providers::create_provider_from_env;
use relief_map_ai::summarizer::ChatAssistant;
use relief_map_disaster_models::DisasterRecord;
use relief_map_extract::CategoryKeywords;
use relief_map_feed::registry::{all_feeds, enabled_feeds};
use relief_map_index::{MemoryIndex, SearchIndex};
use relief_map_ingest::{
    coverage_report, enhance_disasters, publish_disasters, publish_shelters, sync_all, sync_feed,
    IngestTargets,
};
use relief_map_reconcile::store::JsonFileStore;
use relief_map_shelter_models::ShelterRecord;

#[derive(Parser)]
#[command(name = "relief_map", about = "Relief map data platform tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List all configured data feeds
    Feeds,
    /// Sync data from a specific feed
    Sync {
        /// Feed identifier (e.g., "`gdacs`")
        feed: String,
        /// Maximum number of records to fetch
        #[arg(long)]
        limit: Option<u64>,
    },
    /// Sync data from all enabled feeds
    SyncAll {
        /// Maximum number of records per feed (for testing)
        #[arg(long)]
        limit: Option<u64>,
        /// Comma-separated list of feed IDs to sync (overrides `RELIEF_MAP_FEEDS` env var)
        #[arg(long)]
        feeds: Option<String>,
    },
    /// Fill missing fields on stored disasters using the extractors
    Enhance,
    /// Report field coverage across stored disasters
    Coverage,
    /// Ask the chat assistant a question
    Chat {
        /// The question to ask
        message: String,
    },
    /// Run the API server
    Serve,
}

/// Opens both JSON stores under the data directory
/// (`RELIEF_MAP_DATA_DIR`, default `data/`).
fn open_stores() -> Result<
    (JsonFileStore<DisasterRecord>, JsonFileStore<ShelterRecord>),
    Box<dyn std::error::Error>,
> {
    let data_dir = std::env::var("RELIEF_MAP_DATA_DIR").unwrap_or_else(|_| "data".to_string());
    let dir = Path::new(&data_dir);
    let disasters = JsonFileStore::open(&dir.join("disasters.json"))?;
    let shelters = JsonFileStore::open(&dir.join("shelters.json"))?;
    Ok((disasters, shelters))
}

#[allow(clippy::too_many_lines)]
#[actix_rt::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Feeds => {
            let feeds = all_feeds();
            println!("{:<16} {:<10} NAME", "ID", "KIND");
            println!("{}", "-".repeat(60));
            for feed in &feeds {
                println!("{:<16} {:<10?} {}", feed.id, feed.kind, feed.name);
            }
        }
        Commands::Sync { feed, limit } => {
            let feeds = all_feeds();
            let def = feeds
                .iter()
                .find(|f| f.id == feed)
                .ok_or_else(|| format!("Unknown feed: {feed}"))?;

            let (disaster_store, shelter_store) = open_stores()?;
            let disaster_index = MemoryIndex::new();
            let shelter_index = MemoryIndex::new();
            let targets = IngestTargets {
                disaster_store: &disaster_store,
                shelter_store: &shelter_store,
                disaster_index: &disaster_index,
                shelter_index: &shelter_index,
            };

            let start = Instant::now();
            let stats = sync_feed(def, &targets, limit).await?;
            println!(
                "{}: {} added, {} updated, {} skipped, {} malformed in {:.1}s",
                def.id,
                stats.added,
                stats.updated,
                stats.skipped,
                stats.malformed,
                start.elapsed().as_secs_f64()
            );
        }
        Commands::SyncAll { limit, feeds } => {
            let feeds = enabled_feeds(feeds);
            log::info!(
                "Syncing {} feed(s): {}",
                feeds.len(),
                feeds
                    .iter()
                    .map(|f| f.id.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            );

            let (disaster_store, shelter_store) = open_stores()?;
            let disaster_index = MemoryIndex::new();
            let shelter_index = MemoryIndex::new();
            let targets = IngestTargets {
                disaster_store: &disaster_store,
                shelter_store: &shelter_store,
                disaster_index: &disaster_index,
                shelter_index: &shelter_index,
            };

            let start = Instant::now();
            let stats = sync_all(&feeds, &targets, limit).await?;
            println!(
                "Sync complete: {} added, {} updated, {} skipped, {} malformed in {:.1}s",
                stats.added,
                stats.updated,
                stats.skipped,
                stats.malformed,
                start.elapsed().as_secs_f64()
            );
        }
        Commands::Enhance => {
            let (disaster_store, _) = open_stores()?;
            let stats =
                enhance_disasters(&disaster_store, &CategoryKeywords::default(), Utc::now())?;
            println!(
                "Enhanced {}/{} disasters ({} coords, {} times, {} populations, {} categories)",
                stats.enriched,
                stats.examined,
                stats.coordinates_filled,
                stats.times_filled,
                stats.populations_filled,
                stats.categories_filled
            );
            let report = coverage_report(&disaster_store)?;
            println!(
                "Remaining gaps: {} coords, {} times, {} populations, {} categories",
                report.missing_coordinates,
                report.missing_time,
                report.missing_population,
                report.unknown_category
            );
        }
        Commands::Coverage => {
            let (disaster_store, _) = open_stores()?;
            let report = coverage_report(&disaster_store)?;
            println!("Stored disasters:      {}", report.total);
            println!("Missing coordinates:   {}", report.missing_coordinates);
            println!("Missing event time:    {}", report.missing_time);
            println!("Missing population:    {}", report.missing_population);
            println!("Unknown category:      {}", report.unknown_category);
            println!("Missing description:   {}", report.missing_description);
        }
        Commands::Chat { message } => {
            let (disaster_store, shelter_store) = open_stores()?;
            let disaster_index: Arc<dyn SearchIndex> = Arc::new(MemoryIndex::new());
            let shelter_index: Arc<dyn SearchIndex> = Arc::new(MemoryIndex::new());
            publish_disasters(&disaster_store, disaster_index.as_ref())?;
            publish_shelters(&shelter_store, shelter_index.as_ref())?;

            let provider = create_provider_from_env()?;
            let assistant = ChatAssistant::new(provider, disaster_index, shelter_index);
            let answer = assistant.answer(&message).await?;
            println!("{answer}");
        }
        Commands::Serve => {
            relief_map_server::run_server().await?;
        }
    }

    Ok(())
}
