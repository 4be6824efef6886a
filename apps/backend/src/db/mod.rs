//! In-memory collection of decks and presets

use std::collections::{BTreeMap, HashMap};

use chrono::Utc;
use tokio::sync::RwLock;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::services::decks::{
    base_name, is_descendant, normalize_deck_name, parent_names, replace_prefix, SEPARATOR,
};

/// Decks, presets and the schema flag.
#[derive(Debug, Clone)]
struct Collection {
    decks: BTreeMap<i64, Deck>,
    current_deck_id: i64,
    configs: BTreeMap<DeckConfigId, DeckConfig>,
    schema_modified: bool,
    next_deck_id: i64,
    next_config_id: DeckConfigId,
}

impl Collection {
    fn new() -> Self {
        let now = Utc::now().timestamp();
        let mut decks = BTreeMap::new();
        decks.insert(
            DEFAULT_DECK_ID,
            Deck {
                id: DEFAULT_DECK_ID,
                name: "Default".to_string(),
                config_id: DEFAULT_DECK_CONFIG_ID,
                mtime_secs: now,
            },
        );
        let mut configs = BTreeMap::new();
        configs.insert(
            DEFAULT_DECK_CONFIG_ID,
            DeckConfig {
                id: DEFAULT_DECK_CONFIG_ID,
                name: "Default".to_string(),
                mtime_secs: now,
                usn: 0,
                config: DeckConfigInner::default(),
            },
        );
        Self {
            decks,
            current_deck_id: DEFAULT_DECK_ID,
            configs,
            schema_modified: false,
            next_deck_id: DEFAULT_DECK_ID + 1,
            next_config_id: DEFAULT_DECK_CONFIG_ID + 1,
        }
    }

    fn deck_by_name(&self, name: &str) -> Option<&Deck> {
        self.decks.values().find(|d| d.name == name)
    }

    fn add_deck(&mut self, name: &str) -> Deck {
        if let Some(existing) = self.deck_by_name(name) {
            return existing.clone();
        }
        let deck = Deck {
            id: self.next_deck_id,
            name: name.to_string(),
            config_id: DEFAULT_DECK_CONFIG_ID,
            mtime_secs: Utc::now().timestamp(),
        };
        self.next_deck_id += 1;
        self.decks.insert(deck.id, deck.clone());
        deck
    }

    /// Rename `old` and everything below it, then create any missing parents
    /// of `new`.
    fn rename_subtree(&mut self, old: &str, new: &str, now: i64) {
        for deck in self.decks.values_mut() {
            if deck.name == old || is_descendant(&deck.name, old) {
                deck.name = replace_prefix(&deck.name, old, new);
                deck.mtime_secs = now;
            }
        }
        for parent in parent_names(new).iter().rev() {
            self.add_deck(parent);
        }
    }

    /// Preset name not used by any preset other than `id`.
    fn unique_config_name(&self, id: DeckConfigId, name: &str) -> String {
        let taken = |candidate: &str| {
            self.configs
                .values()
                .any(|c| c.id != id && c.name == candidate)
        };
        if !taken(name) {
            return name.to_string();
        }
        (2..)
            .map(|n| format!("{} ({})", name, n))
            .find(|candidate| !taken(candidate))
            .unwrap_or_else(|| name.to_string())
    }

    fn write_config(&mut self, mut config: DeckConfig, now: i64) -> Result<DeckConfigId> {
        if config.id == 0 {
            config.id = self.next_config_id;
            self.next_config_id += 1;
            config.mtime_secs = now;
        } else {
            let existing = self
                .configs
                .get(&config.id)
                .ok_or_else(|| ApiError::NotFound(format!("deck config {}", config.id)))?;
            if config.mtime_secs == 0 || existing.config != config.config {
                config.mtime_secs = now;
            }
        }
        config.name = self.unique_config_name(config.id, &config.name);
        let id = config.id;
        self.configs.insert(id, config);
        Ok(id)
    }
}

/// Shared collection guarded by an async lock
pub struct Database {
    collection: RwLock<Collection>,
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}

impl Database {
    /// Create a collection holding only the default deck and preset
    pub fn new() -> Self {
        Self {
            collection: RwLock::new(Collection::new()),
        }
    }

    // === Deck Repository ===

    /// Add a normal deck, creating missing parents. Returns the existing deck
    /// if the name is already in use.
    pub async fn add_deck(&self, name: &str) -> Result<Deck> {
        let name = normalize_deck_name(name)
            .ok_or_else(|| ApiError::BadRequest("deck name cannot be empty".to_string()))?;

        let mut col = self.collection.write().await;
        for parent in parent_names(&name).iter().rev() {
            col.add_deck(parent);
        }
        let deck = col.add_deck(&name);
        tracing::debug!(id = deck.id, name = %deck.name, "deck added");
        Ok(deck)
    }

    /// All decks sorted by name
    pub async fn get_all_decks(&self) -> Vec<Deck> {
        let col = self.collection.read().await;
        let mut decks: Vec<Deck> = col.decks.values().cloned().collect();
        decks.sort_by(|a, b| a.name.cmp(&b.name));
        decks
    }

    pub async fn get_deck(&self, deck_id: i64) -> Option<Deck> {
        self.collection.read().await.decks.get(&deck_id).cloned()
    }

    /// Rename a deck. Its descendants move with it.
    pub async fn rename_deck(&self, deck_id: i64, new_name: &str) -> Result<Deck> {
        let new_name = normalize_deck_name(new_name)
            .ok_or_else(|| ApiError::BadRequest("deck name cannot be empty".to_string()))?;

        let mut guard = self.collection.write().await;
        let old_name = guard
            .decks
            .get(&deck_id)
            .map(|d| d.name.clone())
            .ok_or_else(|| ApiError::NotFound(format!("deck {}", deck_id)))?;

        if new_name != old_name {
            if is_descendant(&new_name, &old_name) {
                return Err(ApiError::BadRequest(format!(
                    "cannot move {} under itself",
                    old_name
                )));
            }
            if guard.deck_by_name(&new_name).is_some() {
                return Err(ApiError::BadRequest(format!(
                    "deck {} already exists",
                    new_name
                )));
            }
            let mut col = guard.clone();
            col.rename_subtree(&old_name, &new_name, Utc::now().timestamp());
            *guard = col;
            tracing::info!(deck_id, from = %old_name, to = %new_name, "deck renamed");
        }

        guard
            .decks
            .get(&deck_id)
            .cloned()
            .ok_or_else(|| ApiError::Internal(format!("deck {} vanished", deck_id)))
    }

    /// Move decks under `new_parent` (top level when `None`). Moves that would
    /// put a deck under itself or clash with an existing name are skipped.
    /// Returns how many decks were moved.
    pub async fn reparent_decks(
        &self,
        deck_ids: &[i64],
        new_parent: Option<i64>,
    ) -> Result<usize> {
        let mut guard = self.collection.write().await;
        let mut col = guard.clone();
        let now = Utc::now().timestamp();

        let parent_name = match new_parent {
            Some(id) => Some(
                col.decks
                    .get(&id)
                    .map(|d| d.name.clone())
                    .ok_or_else(|| ApiError::NotFound(format!("deck {}", id)))?,
            ),
            None => None,
        };

        let mut count = 0;
        for deck_id in deck_ids {
            let Some(old_name) = col.decks.get(deck_id).map(|d| d.name.clone()) else {
                continue;
            };
            let new_name = match &parent_name {
                Some(parent) => {
                    if *parent == old_name || is_descendant(parent, &old_name) {
                        tracing::debug!(deck_id, "skipping move under itself");
                        continue;
                    }
                    format!("{}{}{}", parent, SEPARATOR, base_name(&old_name))
                }
                None => base_name(&old_name).to_string(),
            };
            if new_name == old_name || col.deck_by_name(&new_name).is_some() {
                continue;
            }
            col.rename_subtree(&old_name, &new_name, now);
            count += 1;
        }

        *guard = col;
        tracing::info!(?new_parent, count, "decks reparented");
        Ok(count)
    }

    /// Remove decks and everything below them. The default deck is kept.
    /// Returns how many decks were removed.
    pub async fn remove_decks(&self, deck_ids: &[i64]) -> Result<usize> {
        let mut guard = self.collection.write().await;
        let mut col = guard.clone();

        let mut count = 0;
        for deck_id in deck_ids {
            if *deck_id == DEFAULT_DECK_ID {
                continue;
            }
            let Some(name) = col.decks.get(deck_id).map(|d| d.name.clone()) else {
                continue;
            };
            let before = col.decks.len();
            col.decks.retain(|id, d| {
                *id == DEFAULT_DECK_ID || (d.name != name && !is_descendant(&d.name, &name))
            });
            count += before - col.decks.len();
        }
        if !col.decks.contains_key(&col.current_deck_id) {
            col.current_deck_id = DEFAULT_DECK_ID;
        }

        *guard = col;
        tracing::info!(count, "decks removed");
        Ok(count)
    }

    /// Deck currently selected for study.
    pub async fn current_deck(&self) -> Result<Deck> {
        let col = self.collection.read().await;
        col.decks
            .get(&col.current_deck_id)
            .cloned()
            .ok_or_else(|| ApiError::Internal("current deck missing".to_string()))
    }

    pub async fn set_current_deck(&self, deck_id: i64) -> Result<Deck> {
        let mut col = self.collection.write().await;
        let deck = col
            .decks
            .get(&deck_id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("deck {}", deck_id)))?;
        col.current_deck_id = deck_id;
        tracing::debug!(deck_id, "current deck set");
        Ok(deck)
    }

    // === Deck Config Repository ===

    pub async fn get_deck_config(&self, id: DeckConfigId) -> Option<DeckConfig> {
        self.collection.read().await.configs.get(&id).cloned()
    }

    pub async fn schema_modified(&self) -> bool {
        self.collection.read().await.schema_modified
    }

    /// Snapshot for editing the options of `deck_id`
    pub async fn deck_configs_for_update(&self, deck_id: i64) -> Result<DeckConfigsForUpdate> {
        let col = self.collection.read().await;
        let deck = col
            .decks
            .get(&deck_id)
            .ok_or_else(|| ApiError::NotFound(format!("deck {}", deck_id)))?;

        let mut use_counts: HashMap<DeckConfigId, u32> = HashMap::new();
        for d in col.decks.values() {
            *use_counts.entry(d.config_id).or_default() += 1;
        }

        let all_config = col
            .configs
            .values()
            .map(|config| ConfigWithCount {
                config: config.clone(),
                use_count: use_counts.get(&config.id).copied().unwrap_or(0),
            })
            .collect();

        let mut parent_config_ids = Vec::new();
        for parent in parent_names(&deck.name) {
            if let Some(parent) = col.deck_by_name(&parent) {
                if !parent_config_ids.contains(&parent.config_id) {
                    parent_config_ids.push(parent.config_id);
                }
            }
        }

        Ok(DeckConfigsForUpdate {
            all_config,
            current_deck: CurrentDeck {
                name: deck.name.clone(),
                config_id: deck.config_id,
                parent_config_ids,
            },
            defaults: DeckConfigInner::default(),
            schema_modified: col.schema_modified,
        })
    }

    /// Apply an editing session's changes.
    ///
    /// Removals run first, then presets are written in order. The last preset
    /// is assigned to the target deck, and to its descendants when requested.
    /// Nothing is applied if any part of the request is invalid.
    pub async fn update_deck_configs(
        &self,
        input: UpdateDeckConfigsIn,
    ) -> Result<UpdateDeckConfigsOut> {
        if input.configs.is_empty() {
            return Err(ApiError::BadRequest("no deck configs provided".to_string()));
        }
        if input.removed_config_ids.contains(&DEFAULT_DECK_CONFIG_ID) {
            return Err(ApiError::BadRequest(
                "the default deck config cannot be removed".to_string(),
            ));
        }

        let mut guard = self.collection.write().await;
        let mut col = guard.clone();
        let now = Utc::now().timestamp();

        let target_name = col
            .decks
            .get(&input.target_deck_id)
            .map(|d| d.name.clone())
            .ok_or_else(|| ApiError::NotFound(format!("deck {}", input.target_deck_id)))?;

        for removed in &input.removed_config_ids {
            if col.configs.remove(removed).is_some() {
                for deck in col.decks.values_mut().filter(|d| d.config_id == *removed) {
                    deck.config_id = DEFAULT_DECK_CONFIG_ID;
                    deck.mtime_secs = now;
                }
            }
        }
        if !input.removed_config_ids.is_empty() {
            col.schema_modified = true;
        }

        let mut config_ids = Vec::with_capacity(input.configs.len());
        for config in input.configs {
            config_ids.push(col.write_config(config, now)?);
        }

        let selected = *config_ids
            .last()
            .ok_or_else(|| ApiError::Internal("no preset written".to_string()))?;
        let mut updated_decks = 0;
        for deck in col.decks.values_mut() {
            let in_scope = deck.id == input.target_deck_id
                || (input.apply_to_children && is_descendant(&deck.name, &target_name));
            if in_scope {
                if deck.config_id != selected {
                    deck.config_id = selected;
                    deck.mtime_secs = now;
                }
                updated_decks += 1;
            }
        }

        *guard = col;
        tracing::info!(
            target_deck_id = input.target_deck_id,
            selected,
            written = config_ids.len(),
            removed = input.removed_config_ids.len(),
            updated_decks,
            "deck configs updated"
        );

        Ok(UpdateDeckConfigsOut {
            config_ids,
            updated_decks,
        })
    }
}
