//! Editing session over the collection's presets.
//!
//! `DeckConfigState` is built from a backend snapshot, applies the editor's
//! changes in memory, keeps the derived views current, and produces the
//! minimal update to send back.

use std::collections::HashSet;

use chrono::Utc;
use unicode_casefold::{Locale, UnicodeCaseFold, Variant};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::client::{save_deck_config, Transport};
use crate::error::{ConfigError, Result, TransportError};
use crate::observable::{Observable, View};
use crate::types::{
    ConfigListEntry, ConfigWithCount, CurrentDeck, DeckConfig, DeckConfigId, DeckConfigInner,
    DeckConfigsForUpdate, ParentLimits, UpdateDeckConfigsIn, DEFAULT_DECK_CONFIG_ID,
};

/// In-memory state of the deck options screen.
pub struct DeckConfigState {
    current_deck: CurrentDeck,
    defaults: DeckConfigInner,
    target_deck_id: i64,
    configs: Vec<ConfigWithCount>,
    selected_idx: usize,
    modified_configs: HashSet<DeckConfigId>,
    removed_configs: Vec<DeckConfigId>,
    schema_modified: bool,
    current_config: Observable<DeckConfigInner>,
    config_list: Observable<Vec<ConfigListEntry>>,
    parent_limits: Observable<ParentLimits>,
}

impl DeckConfigState {
    /// Start a session for `target_deck_id` from a loaded snapshot.
    ///
    /// # Errors
    ///
    /// Returns `EmptySnapshot` if the snapshot has no presets.
    pub fn new(target_deck_id: i64, data: DeckConfigsForUpdate) -> Result<Self> {
        let DeckConfigsForUpdate {
            all_config,
            current_deck,
            defaults,
            schema_modified,
        } = data;
        if all_config.is_empty() {
            return Err(ConfigError::EmptySnapshot);
        }

        let mut configs = all_config;
        let selected_idx = configs
            .iter()
            .position(|c| c.config.id == current_deck.config_id)
            .unwrap_or(0);

        // The selected preset gets +1 at display time.
        configs[selected_idx].use_count = configs[selected_idx].use_count.saturating_sub(1);

        let current_config = Observable::new(configs[selected_idx].config.config.clone());
        let config_list = Observable::new(build_config_list(&configs, selected_idx));
        let parent_limits = Observable::new(compute_parent_limits(&configs, &current_deck));

        tracing::debug!(
            target_deck_id,
            presets = configs.len(),
            selected = configs[selected_idx].config.id,
            "deck options session started"
        );

        Ok(Self {
            current_deck,
            defaults,
            target_deck_id,
            configs,
            selected_idx,
            modified_configs: HashSet::new(),
            removed_configs: Vec::new(),
            schema_modified,
            current_config,
            config_list,
            parent_limits,
        })
    }

    pub fn target_deck_id(&self) -> i64 {
        self.target_deck_id
    }

    pub fn current_deck(&self) -> &CurrentDeck {
        &self.current_deck
    }

    /// Template new presets are seeded from.
    pub fn defaults(&self) -> &DeckConfigInner {
        &self.defaults
    }

    pub fn schema_modified(&self) -> bool {
        self.schema_modified
    }

    pub fn removed_configs(&self) -> &[DeckConfigId] {
        &self.removed_configs
    }

    pub fn current_index(&self) -> usize {
        self.selected_idx
    }

    /// Presets in load order.
    pub fn configs(&self) -> impl Iterator<Item = &DeckConfig> {
        self.configs.iter().map(|c| &c.config)
    }

    /// The preset being edited.
    pub fn current(&self) -> &DeckConfig {
        &self.configs[self.selected_idx].config
    }

    /// Copy of the selected preset's settings.
    pub fn current_config(&self) -> DeckConfigInner {
        self.current().config.clone()
    }

    /// Presets sorted by name, with use counts.
    pub fn config_list(&self) -> Vec<ConfigListEntry> {
        self.config_list.get()
    }

    pub fn parent_limits(&self) -> ParentLimits {
        self.parent_limits.get()
    }

    /// Settings of the selected preset. Edits go through `set_current_config`.
    pub fn current_config_view(&self) -> View<DeckConfigInner> {
        self.current_config.view()
    }

    pub fn config_list_view(&self) -> View<Vec<ConfigListEntry>> {
        self.config_list.view()
    }

    pub fn parent_limits_view(&self) -> View<ParentLimits> {
        self.parent_limits.view()
    }

    /// Select the preset at `index` (load order).
    pub fn set_current_index(&mut self, index: usize) -> Result<()> {
        if index >= self.configs.len() {
            return Err(ConfigError::IndexOutOfRange {
                index,
                len: self.configs.len(),
            });
        }
        self.selected_idx = index;
        self.update_current_config();
        // use counts have changed
        self.update_config_list();
        Ok(())
    }

    pub fn current_name(&self) -> &str {
        &self.current().name
    }

    /// Rename the selected preset, suffixing a timestamp if the name is taken.
    pub fn set_current_name(&mut self, name: &str) {
        if self.current_name() == name {
            return;
        }
        let unique_name = self.ensure_new_name_unique(name);
        let config = &mut self.configs[self.selected_idx].config;
        tracing::debug!(id = config.id, from = %config.name, to = %unique_name, "renaming preset");
        config.name = unique_name;
        if config.id != 0 {
            self.modified_configs.insert(config.id);
        }
        self.update_config_list();
    }

    /// Add a preset seeded from the defaults and make it current.
    pub fn add_config(&mut self, name: &str) {
        let unique_name = self.ensure_new_name_unique(name);
        tracing::debug!(name = %unique_name, "adding preset");
        self.configs.push(ConfigWithCount {
            config: DeckConfig::new(unique_name, self.defaults.clone()),
            use_count: 0,
        });
        self.selected_idx = self.configs.len() - 1;
        self.update_current_config();
        self.update_config_list();
    }

    /// True if removing the selected preset would require a one-way sync.
    pub fn removal_will_force_full_sync(&self) -> bool {
        !self.schema_modified && self.current().id != 0
    }

    pub fn default_config_selected(&self) -> bool {
        self.current().id == DEFAULT_DECK_CONFIG_ID
    }

    /// Remove the selected preset and select the one before it.
    ///
    /// # Errors
    ///
    /// Returns `RemoveDefault` when the default preset is selected.
    pub fn remove_current_config(&mut self) -> Result<()> {
        let current_id = self.current().id;
        if current_id == DEFAULT_DECK_CONFIG_ID {
            return Err(ConfigError::RemoveDefault);
        }
        if self.configs.len() == 1 {
            return Err(ConfigError::RemoveLast);
        }
        if current_id != 0 {
            self.removed_configs.push(current_id);
            self.schema_modified = true;
        }
        self.modified_configs.remove(&current_id);
        tracing::debug!(id = current_id, "removing preset");

        self.configs.remove(self.selected_idx);
        self.selected_idx = self.selected_idx.saturating_sub(1);
        self.update_current_config();
        self.update_config_list();
        Ok(())
    }

    /// Replace the selected preset's settings.
    ///
    /// An identical payload leaves the preset untouched. Parent limits are
    /// republished either way.
    pub fn set_current_config(&mut self, config: DeckConfigInner) {
        let current = &mut self.configs[self.selected_idx].config;
        if current.config != config {
            current.config = config;
            current.mtime_secs = 0;
            if current.id != 0 {
                self.modified_configs.insert(current.id);
            }
            self.current_config.set(current.config.clone());
        }
        self.parent_limits
            .set(compute_parent_limits(&self.configs, &self.current_deck));
    }

    /// Build the update: new and modified presets, with the selected one last.
    pub fn data_for_saving(&self, apply_to_children: bool) -> UpdateDeckConfigsIn {
        let mut configs: Vec<DeckConfig> = self
            .configs
            .iter()
            .enumerate()
            .filter(|(idx, c)| {
                *idx != self.selected_idx
                    && (c.config.id == 0 || self.modified_configs.contains(&c.config.id))
            })
            .map(|(_, c)| c.config.clone())
            .collect();
        // current must come last, even if unmodified
        configs.push(self.current().clone());

        UpdateDeckConfigsIn {
            target_deck_id: self.target_deck_id,
            removed_config_ids: self.removed_configs.clone(),
            configs,
            apply_to_children,
        }
    }

    /// Send the update. State is left as-is, so a failed save can be retried.
    pub async fn save<T>(
        &self,
        transport: &T,
        apply_to_children: bool,
    ) -> std::result::Result<(), TransportError>
    where
        T: Transport + ?Sized,
    {
        let input = self.data_for_saving(apply_to_children);
        tracing::info!(
            target_deck_id = input.target_deck_id,
            configs = input.configs.len(),
            removed = input.removed_config_ids.len(),
            apply_to_children,
            "saving deck options"
        );
        save_deck_config(transport, &input).await
    }

    fn ensure_new_name_unique(&self, name: &str) -> String {
        if self.configs.iter().any(|c| c.config.name == name) {
            // Whole seconds, truncated.
            format!("{}{}", name, Utc::now().timestamp())
        } else {
            name.to_string()
        }
    }

    fn update_current_config(&self) {
        self.current_config.set(self.current_config());
        self.parent_limits
            .set(compute_parent_limits(&self.configs, &self.current_deck));
    }

    fn update_config_list(&self) {
        self.config_list
            .set(build_config_list(&self.configs, self.selected_idx));
    }
}

fn build_config_list(configs: &[ConfigWithCount], selected_idx: usize) -> Vec<ConfigListEntry> {
    let mut list: Vec<ConfigListEntry> = configs
        .iter()
        .enumerate()
        .map(|(idx, c)| ConfigListEntry {
            idx,
            name: c.config.name.clone(),
            use_count: c.use_count + u32::from(idx == selected_idx),
            current: idx == selected_idx,
        })
        .collect();
    list.sort_by_cached_key(|entry| (name_sort_key(&entry.name), entry.idx));
    list
}

/// Key that ignores case and accents, so "Über" sorts with "u" and "ß" matches "ss".
fn name_sort_key(name: &str) -> String {
    let stripped: String = name.nfd().filter(|c| !is_combining_mark(*c)).collect();
    stripped
        .as_str()
        .case_fold_with(Variant::Full, Locale::NonTurkic)
        .collect()
}

fn compute_parent_limits(configs: &[ConfigWithCount], current_deck: &CurrentDeck) -> ParentLimits {
    configs
        .iter()
        .map(|c| &c.config)
        .filter(|c| current_deck.parent_config_ids.contains(&c.id))
        .fold(ParentLimits::default(), |limits, c| ParentLimits {
            new_cards: limits.new_cards.min(c.config.new_per_day),
            reviews: limits.reviews.min(c.config.reviews_per_day),
        })
}
