pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use deckconfig_core::{DECK_CONFIGS_FOR_UPDATE_PATH, UPDATE_DECK_CONFIGS_PATH};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::db::Database;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
}

/// Build the router with all routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/decks", get(routes::decks::list).post(routes::decks::add))
        .route(
            "/api/decks/current",
            get(routes::decks::current).put(routes::decks::set_current),
        )
        .route("/api/decks/reparent", post(routes::decks::reparent))
        .route("/api/decks/remove", post(routes::decks::remove))
        .route("/api/decks/:id/name", put(routes::decks::rename))
        .route(
            DECK_CONFIGS_FOR_UPDATE_PATH,
            post(routes::deck_config::configs_for_update),
        )
        .route(UPDATE_DECK_CONFIGS_PATH, post(routes::deck_config::update))
        .with_state(state)
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Initializing collection...");
    let state = AppState {
        db: Arc::new(Database::new()),
    };

    let app = build_router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("{}:{}", host, port);

    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health_check() -> &'static str {
    "OK"
}
