//! Common test utilities and fixtures for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - TestContext for setting up a fresh collection and router
//! - A live server for tests that go through the HTTP client

pub mod fixtures;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;

use deckconfig_backend::db::Database;
use deckconfig_backend::models::Deck;
use deckconfig_backend::{build_router, AppState};

/// Test context containing a fresh in-memory collection.
pub struct TestContext {
    pub db: Arc<Database>,
    app: Router,
}

impl TestContext {
    /// Create a new test context with only the default deck and preset.
    pub fn new() -> Self {
        let db = Arc::new(Database::new());
        let state = AppState { db: db.clone() };
        let app = build_router(state);
        Self { db, app }
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    /// Create a deck (and its parents) directly in the collection.
    pub async fn create_deck(&self, name: &str) -> Deck {
        self.db
            .add_deck(name)
            .await
            .expect("Failed to create test deck")
    }

    /// Serve the router on an ephemeral port and return its base URL.
    pub async fn spawn_server(&self) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr: SocketAddr = listener.local_addr().expect("listener address");
        let app = self.router();
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("test server failed");
        });
        format!("http://{}", addr)
    }
}
