//! Test fixtures and factory functions for creating test data.

use serde_json::json;

use deckconfig_backend::models::{DeckConfig, DeckConfigInner};

/// Create a deckConfigsForUpdate request body.
pub fn configs_for_update_request(deck_id: i64) -> serde_json::Value {
    json!({ "deck_id": deck_id })
}

/// Create an add deck request body.
pub fn add_deck_request(name: &str) -> serde_json::Value {
    json!({ "name": name })
}

/// Create a rename deck request body.
pub fn rename_deck_request(name: &str) -> serde_json::Value {
    json!({ "name": name })
}

/// Create a reparent request body. `None` moves the decks to the top level.
pub fn reparent_request(deck_ids: Vec<i64>, new_parent: Option<i64>) -> serde_json::Value {
    json!({ "deck_ids": deck_ids, "new_parent": new_parent })
}

/// Create a remove decks request body.
pub fn remove_decks_request(deck_ids: Vec<i64>) -> serde_json::Value {
    json!({ "deck_ids": deck_ids })
}

/// Create an unsaved preset with the given daily limits.
pub fn new_preset(name: &str, new_per_day: u32, reviews_per_day: u32) -> DeckConfig {
    DeckConfig::new(
        name,
        DeckConfigInner {
            new_per_day,
            reviews_per_day,
            ..DeckConfigInner::default()
        },
    )
}

/// Create an updateDeckConfigs request body.
pub fn update_request(
    target_deck_id: i64,
    removed_config_ids: Vec<i64>,
    configs: Vec<DeckConfig>,
    apply_to_children: bool,
) -> serde_json::Value {
    json!({
        "target_deck_id": target_deck_id,
        "removed_config_ids": removed_config_ids,
        "configs": configs,
        "apply_to_children": apply_to_children,
    })
}
