//! Scene-graph data model: actions, random events, scenes, and the catalog.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::state::{Ending, FlagMap};

/// Effects applied when an action fires, a scene is entered, or a random
/// event triggers. Each field is applied independently, in a fixed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Effects {
    #[serde(default)]
    pub score: i32,
    #[serde(default)]
    pub add_items: Vec<String>,
    #[serde(default)]
    pub remove_items: Vec<String>,
    #[serde(default)]
    pub health: i32,
    /// Merged into world flags, overwriting existing values.
    #[serde(default)]
    pub flags: FlagMap,
    /// Presence terminates the game.
    #[serde(default)]
    pub end: Option<Ending>,
    #[serde(default)]
    pub ending_text: Option<String>,
}

impl Effects {
    /// An all-default bag is skipped entirely, including the post-apply
    /// death check.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.score == 0
            && self.health == 0
            && self.add_items.is_empty()
            && self.remove_items.is_empty()
            && self.flags.is_empty()
            && self.end.is_none()
            && self.ending_text.is_none()
    }
}

fn default_blocked_text() -> String {
    "You cannot do that right now.".to_string()
}

/// A command the player can execute inside a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Canonical token matched against normalized input.
    pub command: String,
    /// Display text shown beside the command.
    pub label: String,
    /// Scene id to transition to on success.
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Item ids that must all be owned.
    #[serde(default)]
    pub required_items: Vec<String>,
    /// Flags that must equal their expected value.
    #[serde(default)]
    pub required_flags: FlagMap,
    /// Shown when requirements are unmet.
    #[serde(default = "default_blocked_text")]
    pub blocked_text: String,
    #[serde(default)]
    pub effects: Effects,
    /// Shown on success, before any transition.
    #[serde(default)]
    pub result_text: String,
}

impl Action {
    /// True when the token equals the command or one of its aliases.
    #[must_use]
    pub fn matches(&self, command: &str) -> bool {
        self.command == command || self.aliases.iter().any(|alias| alias == command)
    }
}

fn default_once() -> bool {
    true
}

/// A probabilistic event evaluated on scene entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RandomEvent {
    pub id: String,
    pub text: String,
    /// Firing probability in [0, 1].
    pub chance: f64,
    #[serde(default)]
    pub effects: Effects,
    /// One probabilistic trial per playthrough when true.
    #[serde(default = "default_once")]
    pub once: bool,
}

/// Puzzle handler a scene can declare; dispatched by the core ahead of
/// regular scene actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialHandler {
    VaultCode,
}

/// A location in the world graph. Edges are plain scene ids resolved at
/// traversal time; an unresolvable id is a runtime condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub actions: Vec<Action>,
    #[serde(default)]
    pub hint_text: String,
    /// Applied immediately on entry, before random events.
    #[serde(default)]
    pub on_enter_effects: Effects,
    /// Evaluated in declared order on entry.
    #[serde(default)]
    pub random_events: Vec<RandomEvent>,
    #[serde(default)]
    pub special_handler: Option<SpecialHandler>,
}

impl Scene {
    /// First action matching the normalized command, in declared order.
    #[must_use]
    pub fn find_action(&self, command: &str) -> Option<&Action> {
        self.actions.iter().find(|action| action.matches(command))
    }
}

#[derive(Debug, Clone, Deserialize)]
struct SceneList {
    scenes: Vec<Scene>,
}

/// Immutable id -> scene table, constructed once. All mutable state lives
/// in `Player`/`GameState`; scene definitions never change at runtime.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SceneCatalog {
    scenes: HashMap<String, Scene>,
}

impl SceneCatalog {
    /// Empty catalog (useful for tests).
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a catalog from a JSON document of the shape `{"scenes": [...]}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into valid scene data.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let list: SceneList = serde_json::from_str(json)?;
        Ok(Self::from_scenes(list.scenes))
    }

    /// Key pre-built scenes by id. A later duplicate id replaces an earlier one.
    #[must_use]
    pub fn from_scenes(scenes: Vec<Scene>) -> Self {
        let scenes = scenes
            .into_iter()
            .map(|scene| (scene.id.clone(), scene))
            .collect();
        Self { scenes }
    }

    #[must_use]
    pub fn get(&self, scene_id: &str) -> Option<&Scene> {
        self.scenes.get(scene_id)
    }

    #[must_use]
    pub fn contains(&self, scene_id: &str) -> bool {
        self.scenes.contains_key(scene_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    pub fn scenes(&self) -> impl Iterator<Item = &Scene> {
        self.scenes.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::FlagValue;

    #[test]
    fn action_matches_command_and_aliases() {
        let action = Action {
            command: "proceed".to_string(),
            label: "Step onto the trail.".to_string(),
            target: Some("crossroad".to_string()),
            aliases: vec!["go".to_string(), "walk".to_string()],
            required_items: Vec::new(),
            required_flags: FlagMap::new(),
            blocked_text: default_blocked_text(),
            effects: Effects::default(),
            result_text: String::new(),
        };
        assert!(action.matches("proceed"));
        assert!(action.matches("walk"));
        assert!(!action.matches("run"));
    }

    #[test]
    fn catalog_parses_defaults_from_json() {
        let json = r#"{
            "scenes": [
                {
                    "id": "cove",
                    "title": "Hidden Cove",
                    "description": "Waves lap at black sand.",
                    "actions": [
                        {
                            "command": "dig",
                            "label": "Dig beneath the driftwood.",
                            "required_flags": {"found_map": true},
                            "effects": {"score": 3, "add_items": ["bakir_para"]}
                        }
                    ],
                    "random_events": [
                        {"id": "crab", "text": "A crab nips your boot.", "chance": 0.2,
                         "effects": {"health": -1}}
                    ]
                }
            ]
        }"#;
        let catalog = SceneCatalog::from_json(json).unwrap();
        assert_eq!(catalog.len(), 1);
        let scene = catalog.get("cove").unwrap();
        assert!(scene.special_handler.is_none());
        assert!(scene.on_enter_effects.is_empty());
        let action = &scene.actions[0];
        assert_eq!(action.blocked_text, "You cannot do that right now.");
        assert_eq!(
            action.required_flags.get("found_map"),
            Some(&FlagValue::Bool(true))
        );
        assert_eq!(action.effects.score, 3);
        assert!(action.target.is_none());
        let event = &scene.random_events[0];
        assert!(event.once, "events default to one-shot");
        assert_eq!(event.effects.health, -1);
    }

    #[test]
    fn effects_emptiness_tracks_every_field() {
        assert!(Effects::default().is_empty());
        let scored = Effects {
            score: 2,
            ..Effects::default()
        };
        assert!(!scored.is_empty());
        let ending_only = Effects {
            end: Some(Ending::Bad),
            ..Effects::default()
        };
        assert!(!ending_only.is_empty());
    }
}
