//! Preset and snapshot types exchanged with the backend.

use serde::{Deserialize, Serialize};

/// Preset identifier. `0` marks a preset that has not been persisted yet.
pub type DeckConfigId = i64;

/// The built-in preset every collection has. It can never be removed.
pub const DEFAULT_DECK_CONFIG_ID: DeckConfigId = 1;

/// Limit reported when no ancestor constrains a deck.
pub const UNLIMITED: u32 = 1 << 31;

/// What happens to a card once it reaches the leech threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeechAction {
    Suspend,
    TagOnly,
}

impl Default for LeechAction {
    fn default() -> Self {
        Self::TagOnly
    }
}

/// Scheduling settings carried by a preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeckConfigInner {
    pub new_per_day: u32,
    pub reviews_per_day: u32,
    /// Learning steps in minutes.
    pub learn_steps: Vec<f32>,
    /// Relearning steps in minutes.
    pub relearn_steps: Vec<f32>,
    pub graduating_interval_good: u32,
    pub graduating_interval_easy: u32,
    pub initial_ease: f32,
    pub easy_multiplier: f32,
    pub hard_multiplier: f32,
    pub lapse_multiplier: f32,
    pub interval_multiplier: f32,
    pub maximum_review_interval: u32,
    pub minimum_lapse_interval: u32,
    pub leech_action: LeechAction,
    pub leech_threshold: u32,
    pub disable_autoplay: bool,
    pub cap_answer_time_to_secs: u32,
    pub show_timer: bool,
    pub bury_new: bool,
    pub bury_reviews: bool,
}

impl Default for DeckConfigInner {
    fn default() -> Self {
        Self {
            new_per_day: 20,
            reviews_per_day: 200,
            learn_steps: vec![1.0, 10.0],
            relearn_steps: vec![10.0],
            graduating_interval_good: 1,
            graduating_interval_easy: 4,
            initial_ease: 2.5,
            easy_multiplier: 1.3,
            hard_multiplier: 1.2,
            lapse_multiplier: 0.0,
            interval_multiplier: 1.0,
            maximum_review_interval: 36_500,
            minimum_lapse_interval: 1,
            leech_action: LeechAction::default(),
            leech_threshold: 8,
            disable_autoplay: false,
            cap_answer_time_to_secs: 60,
            show_timer: false,
            bury_new: false,
            bury_reviews: false,
        }
    }
}

/// A named, shareable preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckConfig {
    pub id: DeckConfigId,
    pub name: String,
    /// `0` asks the backend to stamp a fresh modification time on save.
    pub mtime_secs: i64,
    pub usn: i32,
    pub config: DeckConfigInner,
}

impl DeckConfig {
    /// Create an unsaved preset.
    pub fn new(name: impl Into<String>, config: DeckConfigInner) -> Self {
        Self {
            id: 0,
            name: name.into(),
            mtime_secs: 0,
            usn: 0,
            config,
        }
    }
}

/// A preset with the number of decks using it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigWithCount {
    pub config: DeckConfig,
    pub use_count: u32,
}

/// Linkage info for the deck whose options are being edited.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentDeck {
    pub name: String,
    pub config_id: DeckConfigId,
    /// Presets used by the deck's ancestors.
    pub parent_config_ids: Vec<DeckConfigId>,
}

/// Body sent to `/_anki/deckConfigsForUpdate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckConfigsForUpdateIn {
    pub deck_id: i64,
}

/// Snapshot returned by `/_anki/deckConfigsForUpdate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckConfigsForUpdate {
    pub all_config: Vec<ConfigWithCount>,
    pub current_deck: CurrentDeck,
    /// Template used to seed new presets.
    pub defaults: DeckConfigInner,
    pub schema_modified: bool,
}

/// Body sent to `/_anki/updateDeckConfigs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateDeckConfigsIn {
    pub target_deck_id: i64,
    pub removed_config_ids: Vec<DeckConfigId>,
    /// Changed presets; the one to assign to the target deck comes last.
    pub configs: Vec<DeckConfig>,
    pub apply_to_children: bool,
}

/// Info for showing the preset selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigListEntry {
    /// Position in load order.
    pub idx: usize,
    pub name: String,
    pub use_count: u32,
    pub current: bool,
}

/// Tightest daily limits among the deck's ancestors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentLimits {
    pub new_cards: u32,
    pub reviews: u32,
}

impl Default for ParentLimits {
    fn default() -> Self {
        Self {
            new_cards: UNLIMITED,
            reviews: UNLIMITED,
        }
    }
}
