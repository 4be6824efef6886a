pub mod deck_config;
pub mod decks;
