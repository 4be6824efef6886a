//! Collection models and API types

use serde::{Deserialize, Serialize};

// Re-export shared types from deckconfig-core
pub use deckconfig_core::types::{
    ConfigWithCount, CurrentDeck, DeckConfig, DeckConfigId, DeckConfigInner, DeckConfigsForUpdate,
    DeckConfigsForUpdateIn, UpdateDeckConfigsIn, DEFAULT_DECK_CONFIG_ID,
};

/// Deck id of the built-in "Default" deck.
pub const DEFAULT_DECK_ID: i64 = 1;

/// A normal deck. Hierarchy is expressed through `::` separated names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deck {
    pub id: i64,
    pub name: String,
    pub config_id: DeckConfigId,
    pub mtime_secs: i64,
}

// === API Request/Response Types ===

#[derive(Debug, Deserialize)]
pub struct AddDeckRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct RenameDeckRequest {
    pub name: String,
}

/// Move decks under `new_parent`, or to the top level when it is absent.
#[derive(Debug, Deserialize)]
pub struct ReparentDecksRequest {
    pub deck_ids: Vec<i64>,
    #[serde(default)]
    pub new_parent: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct RemoveDecksRequest {
    pub deck_ids: Vec<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SetCurrentDeckRequest {
    pub deck_id: i64,
}

/// Number of decks a bulk operation touched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpChangesWithCount {
    pub count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeckListResponse {
    pub decks: Vec<Deck>,
}

/// Acknowledgement for `/_anki/updateDeckConfigs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateDeckConfigsOut {
    /// Ids of the written presets, in request order.
    pub config_ids: Vec<DeckConfigId>,
    /// Decks now using the last preset.
    pub updated_decks: usize,
}
