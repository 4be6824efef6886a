//! Deck options state shared by the editor front-end and the backend.
//!
//! Provides:
//! - Preset and snapshot types exchanged with the backend
//! - `DeckConfigState`, which tracks edits to the preset list and builds the save diff
//! - Observable views (preset listing, parent limits, current payload)
//! - A request/response client for loading and saving presets

pub mod client;
pub mod error;
pub mod observable;
pub mod state;
pub mod types;

pub use client::{
    get_deck_config_info, save_deck_config, HttpTransport, Transport, DECK_CONFIGS_FOR_UPDATE_PATH,
    UPDATE_DECK_CONFIGS_PATH,
};
pub use error::{ConfigError, Result, TransportError};
pub use observable::{Observable, Subscription, View};
pub use state::DeckConfigState;
pub use types::{
    ConfigListEntry, ConfigWithCount, CurrentDeck, DeckConfig, DeckConfigId, DeckConfigInner,
    DeckConfigsForUpdate, DeckConfigsForUpdateIn, LeechAction, ParentLimits, UpdateDeckConfigsIn,
    DEFAULT_DECK_CONFIG_ID, UNLIMITED,
};
