//! Deck API tests.

mod common;

use axum::http::StatusCode;
use axum_test::TestServer;

use common::fixtures;
use common::TestContext;

/// Test health endpoint.
#[tokio::test]
async fn test_health() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router()).unwrap();

    let response = server.get("/health").await;

    response.assert_status_ok();
    response.assert_text("OK");
}

/// Test a fresh collection lists only the default deck.
#[tokio::test]
async fn test_list_decks_default() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router()).unwrap();

    let response = server.get("/api/decks").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let decks = body["decks"].as_array().unwrap();
    assert_eq!(decks.len(), 1);
    assert_eq!(decks[0]["name"], "Default");
    assert_eq!(decks[0]["config_id"], 1);
}

/// Test adding a nested deck creates its parents.
#[tokio::test]
async fn test_add_nested_deck() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router()).unwrap();

    let response = server
        .post("/api/decks")
        .json(&fixtures::add_deck_request("Science::Physics"))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["name"], "Science::Physics");

    let list: serde_json::Value = server.get("/api/decks").await.json();
    let names: Vec<&str> = list["decks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Default", "Science", "Science::Physics"]);
}

/// Test blank deck names are rejected.
#[tokio::test]
async fn test_add_deck_blank_name() {
    let ctx = TestContext::new();
    let server = TestServer::new(ctx.router()).unwrap();

    let response = server
        .post("/api/decks")
        .json(&fixtures::add_deck_request("   "))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "bad_request");
}

fn deck_names(body: &serde_json::Value) -> Vec<String> {
    body["decks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["name"].as_str().unwrap().to_string())
        .collect()
}

/// Test renaming a deck carries its children along.
#[tokio::test]
async fn test_rename_deck() {
    let ctx = TestContext::new();
    let child = ctx.create_deck("Lang::Spanish").await;
    let parent_id = child.id - 1;
    let server = TestServer::new(ctx.router()).unwrap();

    let response = server
        .put(&format!("/api/decks/{}/name", parent_id))
        .json(&fixtures::rename_deck_request("Languages"))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["name"], "Languages");
    let list: serde_json::Value = server.get("/api/decks").await.json();
    assert_eq!(
        deck_names(&list),
        vec!["Default", "Languages", "Languages::Spanish"]
    );
}

/// Test renaming onto an existing name is rejected.
#[tokio::test]
async fn test_rename_deck_clash() {
    let ctx = TestContext::new();
    let deck = ctx.create_deck("Physics").await;
    let server = TestServer::new(ctx.router()).unwrap();

    let response = server
        .put(&format!("/api/decks/{}/name", deck.id))
        .json(&fixtures::rename_deck_request("Default"))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

/// Test reparenting reports how many decks moved.
#[tokio::test]
async fn test_reparent_decks() {
    let ctx = TestContext::new();
    let lang = ctx.create_deck("Lang").await;
    let solo = ctx.create_deck("Solo").await;
    let server = TestServer::new(ctx.router()).unwrap();

    let response = server
        .post("/api/decks/reparent")
        .json(&fixtures::reparent_request(vec![solo.id], Some(lang.id)))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["count"], 1);
    let list: serde_json::Value = server.get("/api/decks").await.json();
    assert_eq!(deck_names(&list), vec!["Default", "Lang", "Lang::Solo"]);

    let response = server
        .post("/api/decks/reparent")
        .json(&fixtures::reparent_request(vec![solo.id], None))
        .await;
    let body: serde_json::Value = response.json();
    assert_eq!(body["count"], 1);
}

/// Test removing a deck removes its subtree.
#[tokio::test]
async fn test_remove_decks() {
    let ctx = TestContext::new();
    let child = ctx.create_deck("Lang::Spanish").await;
    let server = TestServer::new(ctx.router()).unwrap();

    let response = server
        .post("/api/decks/remove")
        .json(&fixtures::remove_decks_request(vec![child.id - 1]))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["count"], 2);
    let list: serde_json::Value = server.get("/api/decks").await.json();
    assert_eq!(deck_names(&list), vec!["Default"]);
}

/// Test selecting the current deck.
#[tokio::test]
async fn test_current_deck() {
    let ctx = TestContext::new();
    let deck = ctx.create_deck("Physics").await;
    let server = TestServer::new(ctx.router()).unwrap();

    let body: serde_json::Value = server.get("/api/decks/current").await.json();
    assert_eq!(body["id"], 1);

    let response = server
        .put("/api/decks/current")
        .json(&serde_json::json!({ "deck_id": deck.id }))
        .await;
    response.assert_status_ok();

    let body: serde_json::Value = server.get("/api/decks/current").await.json();
    assert_eq!(body["name"], "Physics");

    let response = server
        .put("/api/decks/current")
        .json(&serde_json::json!({ "deck_id": 999 }))
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}
