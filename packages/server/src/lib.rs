#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the relief map application.
//!
//! Serves the chat assistant endpoint plus read-only listings of the
//! stored disasters and shelters. On startup the stores are loaded from
//! the data directory and both search indexes are built in process, so
//! the server is self-contained once an ingest run has populated the
//! JSON stores.

pub mod handlers;

use std::path::Path;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware, web};
use relief_map_ai::providers::create_provider_from_env;
use relief_map_ai::summarizer::ChatAssistant;
use relief_map_disaster_models::DisasterRecord;
use relief_map_index::{MemoryIndex, SearchIndex};
use relief_map_ingest::{publish_disasters, publish_shelters};
use relief_map_reconcile::store::{JsonFileStore, RecordStore};
use relief_map_shelter_models::ShelterRecord;

/// Shared application state.
pub struct AppState {
    /// The chat assistant (provider + indexes).
    pub assistant: ChatAssistant,
    /// Disaster record store.
    pub disaster_store: Arc<dyn RecordStore<DisasterRecord>>,
    /// Shelter record store.
    pub shelter_store: Arc<dyn RecordStore<ShelterRecord>>,
}

/// Starts the relief map API server.
///
/// Opens the JSON stores under the data directory (`RELIEF_MAP_DATA_DIR`,
/// default `data/`), publishes both in-process search indexes from them,
/// and serves the API. This is a regular async function — the caller is
/// responsible for providing the async runtime (e.g. via
/// `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind
/// or encounters a runtime error.
///
/// # Panics
///
/// Panics if a store cannot be opened, an index cannot be published, or
/// no LLM provider is configured.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    if pretty_env_logger::try_init_custom_env("RUST_LOG").is_err() {
        log::debug!("Logger already initialized");
    }

    let data_dir =
        std::env::var("RELIEF_MAP_DATA_DIR").unwrap_or_else(|_| "data".to_string());

    log::info!("Opening record stores in {data_dir}...");
    let disaster_store: Arc<dyn RecordStore<DisasterRecord>> = Arc::new(
        JsonFileStore::open(&Path::new(&data_dir).join("disasters.json"))
            .expect("Failed to open disaster store"),
    );
    let shelter_store: Arc<dyn RecordStore<ShelterRecord>> = Arc::new(
        JsonFileStore::open(&Path::new(&data_dir).join("shelters.json"))
            .expect("Failed to open shelter store"),
    );

    log::info!("Building search indexes...");
    let disaster_index: Arc<dyn SearchIndex> = Arc::new(MemoryIndex::new());
    let shelter_index: Arc<dyn SearchIndex> = Arc::new(MemoryIndex::new());
    publish_disasters(disaster_store.as_ref(), disaster_index.as_ref())
        .expect("Failed to publish disaster index");
    publish_shelters(shelter_store.as_ref(), shelter_index.as_ref())
        .expect("Failed to publish shelter index");

    let provider = create_provider_from_env().expect("No LLM provider configured");
    let assistant = ChatAssistant::new(provider, disaster_index, shelter_index);

    let state = web::Data::new(AppState {
        assistant,
        disaster_store,
        shelter_store,
    });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(handlers::health))
                    .route("/disasters", web::get().to(handlers::disasters))
                    .route("/shelters", web::get().to(handlers::shelters))
                    .route("/chat", web::post().to(handlers::chat)),
            )
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
