//! Mutable player and world state owned by the interpreter.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use crate::constants::{EVENT_FLAG_PREFIX, MAX_HINTS, START_HEALTH};

/// A world flag value: authored content uses booleans, counters use ints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlagValue {
    Bool(bool),
    Int(i64),
}

impl FlagValue {
    /// Truthiness across both representations (`Int(0)` is false).
    #[must_use]
    pub const fn is_truthy(self) -> bool {
        match self {
            Self::Bool(value) => value,
            Self::Int(value) => value != 0,
        }
    }

    /// Integer view; booleans coerce to 0/1.
    #[must_use]
    pub const fn as_int(self) -> i64 {
        match self {
            Self::Bool(value) => value as i64,
            Self::Int(value) => value,
        }
    }
}

impl From<bool> for FlagValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for FlagValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

/// Open-ended string-keyed flag store shared by gameplay flags and the
/// reserved synthetic one-shot event namespace.
pub type FlagMap = BTreeMap<String, FlagValue>;

/// Synthetic flag key tracking a one-shot random event per playthrough.
#[must_use]
pub fn event_flag_key(scene_id: &str, event_id: &str) -> String {
    format!("{EVENT_FLAG_PREFIX}{scene_id}_{event_id}")
}

/// Terminal classification of a playthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Ending {
    Win,
    Bad,
    Secret,
    Quit,
}

impl Ending {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Win => "win",
            Self::Bad => "bad",
            Self::Secret => "secret",
            Self::Quit => "quit",
        }
    }
}

impl fmt::Display for Ending {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Ending {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "win" => Ok(Self::Win),
            "bad" => Ok(Self::Bad),
            "secret" => Ok(Self::Secret),
            "quit" => Ok(Self::Quit),
            _ => Err(()),
        }
    }
}

/// Mutable player state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    pub health: i32,
    /// Ordered, duplicate-free item ids; insertion order is display order.
    pub inventory: Vec<String>,
    pub score: i32,
    pub hints_left: i32,
}

impl Player {
    /// Fresh player with starting health and a full hint budget.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            health: START_HEALTH,
            inventory: Vec::new(),
            score: 0,
            hints_left: MAX_HINTS,
        }
    }

    #[must_use]
    pub fn has_item(&self, item_id: &str) -> bool {
        self.inventory.iter().any(|item| item == item_id)
    }

    /// Add an item if missing. Returns true when the item was added.
    pub fn add_item(&mut self, item_id: &str) -> bool {
        if self.has_item(item_id) {
            return false;
        }
        self.inventory.push(item_id.to_string());
        true
    }

    /// Remove an item if present. Returns true when removed.
    pub fn remove_item(&mut self, item_id: &str) -> bool {
        let before = self.inventory.len();
        self.inventory.retain(|item| item != item_id);
        self.inventory.len() != before
    }
}

/// Mutable world state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub current_scene_id: String,
    #[serde(default)]
    pub flags: FlagMap,
    /// Serialized sorted; membership is what matters.
    #[serde(default)]
    pub visited_scenes: BTreeSet<String>,
    /// Append-only visit log; repeats are expected.
    #[serde(default)]
    pub history: Vec<String>,
    #[serde(default)]
    pub game_over: bool,
    #[serde(default)]
    pub ending: Option<Ending>,
    #[serde(default)]
    pub ending_text: String,
}

impl GameState {
    /// Fresh world state positioned at the given scene.
    #[must_use]
    pub fn new(scene_id: impl Into<String>) -> Self {
        Self {
            current_scene_id: scene_id.into(),
            flags: FlagMap::new(),
            visited_scenes: BTreeSet::new(),
            history: Vec::new(),
            game_over: false,
            ending: None,
            ending_text: String::new(),
        }
    }

    #[must_use]
    pub fn flag(&self, name: &str) -> Option<FlagValue> {
        self.flags.get(name).copied()
    }

    /// Truthiness of a flag; absent flags are false.
    #[must_use]
    pub fn flag_truthy(&self, name: &str) -> bool {
        self.flag(name).is_some_and(FlagValue::is_truthy)
    }

    /// Integer value of a flag; absent flags are 0.
    #[must_use]
    pub fn flag_int(&self, name: &str) -> i64 {
        self.flag(name).map_or(0, FlagValue::as_int)
    }

    pub fn set_flag(&mut self, name: impl Into<String>, value: impl Into<FlagValue>) {
        self.flags.insert(name.into(), value.into());
    }

    /// Terminate the playthrough with the given ending.
    pub fn finish(&mut self, ending: Ending, text: impl Into<String>) {
        self.game_over = true;
        self.ending = Some(ending);
        self.ending_text = text.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_item_is_idempotent_and_ordered() {
        let mut player = Player::new("Ada");
        assert!(player.add_item("mesale"));
        assert!(player.add_item("bakir_para"));
        assert!(!player.add_item("mesale"));
        assert_eq!(player.inventory, vec!["mesale", "bakir_para"]);
        assert!(player.remove_item("mesale"));
        assert!(!player.remove_item("mesale"));
        assert_eq!(player.inventory, vec!["bakir_para"]);
    }

    #[test]
    fn flag_coercions_match_counter_use() {
        let mut state = GameState::new("camp");
        state.set_flag("knows_code", true);
        state.set_flag("wrong_code_attempts", 2_i64);
        assert!(state.flag_truthy("knows_code"));
        assert!(!state.flag_truthy("vault_solved"));
        assert_eq!(state.flag_int("wrong_code_attempts"), 2);
        assert_eq!(state.flag_int("knows_code"), 1);
        assert_eq!(state.flag_int("missing"), 0);
    }

    #[test]
    fn ending_serializes_lowercase() {
        let value = serde_json::to_value(Ending::Secret).unwrap();
        assert_eq!(value, serde_json::json!("secret"));
        assert_eq!("quit".parse::<Ending>(), Ok(Ending::Quit));
        assert!("weird".parse::<Ending>().is_err());
    }

    #[test]
    fn visited_scenes_serialize_sorted() {
        let mut state = GameState::new("camp");
        state.visited_scenes.insert("marsh".to_string());
        state.visited_scenes.insert("camp".to_string());
        state.visited_scenes.insert("library".to_string());
        let value = serde_json::to_value(&state).unwrap();
        assert_eq!(
            value["visited_scenes"],
            serde_json::json!(["camp", "library", "marsh"])
        );
    }

    #[test]
    fn event_flag_key_uses_reserved_namespace() {
        assert_eq!(
            event_flag_key("marsh", "swamp_gas"),
            "_event_marsh_swamp_gas"
        );
    }
}
