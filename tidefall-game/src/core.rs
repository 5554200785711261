//! Command interpreter and state holder: the UI-independent game core.

use rand::Rng;
use thiserror::Error;

#[cfg(debug_assertions)]
use crate::constants::DEBUG_ENV_VAR;
use crate::constants::{
    COLLAPSE_ENDING_TEXT, DEFAULT_BOOL_FLAGS, DEFAULT_ENDING_TEXT,
    DEFAULT_PLAYER_NAME, FLAG_KNOWS_CODE, FLAG_VAULT_SOLVED, FLAG_WRONG_CODE_ATTEMPTS,
    GAP_ENDING_TEXT, HEALING_HERB_ID, MAX_HEALTH, MAX_HINTS, NOT_STARTED_TEXT,
    PATH_HIGHLIGHT_LIMIT, QUIT_ENDING_TEXT, START_SCENE_ID, TREASURE_SCENE_ID,
    UNKNOWN_COMMAND_TEXT, VAULT_CODE, VAULT_CODE_LEN, VAULT_COLLAPSE_TEXT, VAULT_FORMAT_TEXT,
    VAULT_OPEN_TEXT, VAULT_REWARD_BASE, VAULT_REWARD_INFORMED, VAULT_WRONG_TEXT, WELCOME_TEXT,
    WRONG_CODE_ATTEMPT_LIMIT, WRONG_CODE_HEALTH_PENALTY, WRONG_CODE_SCORE_PENALTY,
};
use crate::data::{Action, Effects, Scene, SceneCatalog, SpecialHandler};
use crate::persistence::{self, JsonFileStorage, LoadedGame, SaveStorage};
use crate::rng::EventRng;
use crate::scenes::build_scenes;
use crate::state::{Ending, FlagValue, GameState, Player, event_flag_key};
use crate::util::{clamp, dedupe_preserve_order, format_inventory, item_label, normalize_command};
use crate::view::{GameView, PathHighlights, StatusView, ViewAction};

#[cfg(debug_assertions)]
fn debug_log_enabled() -> bool {
    matches!(std::env::var(DEBUG_ENV_VAR), Ok(val) if val != "0")
}

#[cfg(not(debug_assertions))]
const fn debug_log_enabled() -> bool {
    false
}

/// Invariant violations surfaced to adapters as typed errors, distinct
/// from gameplay failures which always arrive as queued messages.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// No session is active; call `new_game` or `load_game` first.
    #[error("no active session")]
    NotStarted,
    /// The current scene id has no catalog entry.
    #[error("unknown scene: {0}")]
    UnknownScene(String),
}

/// UI-independent game core.
///
/// Adapters call [`GameCore::new_game`] or [`GameCore::load_game`] once,
/// then alternate [`GameCore::view`] to render and [`GameCore::submit`] to
/// advance. The core never reads input or prints output; everything the
/// player should see travels through the returned snapshots and their
/// drained message queue.
pub struct GameCore<S: SaveStorage = JsonFileStorage> {
    scenes: SceneCatalog,
    player: Option<Player>,
    state: Option<GameState>,
    rng: EventRng,
    messages: Vec<String>,
    storage: S,
}

impl GameCore<JsonFileStorage> {
    /// Core with the built-in island content and file-backed saves.
    #[must_use]
    pub fn new() -> Self {
        Self::with_storage(JsonFileStorage::default())
    }
}

impl Default for GameCore<JsonFileStorage> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: SaveStorage> GameCore<S> {
    /// Core with the built-in island content and the given storage backend.
    #[must_use]
    pub fn with_storage(storage: S) -> Self {
        Self::with_catalog(build_scenes(), storage)
    }

    /// Core over an arbitrary catalog; the starting scene id must resolve
    /// once `new_game` is called.
    #[must_use]
    pub fn with_catalog(scenes: SceneCatalog, storage: S) -> Self {
        Self {
            scenes,
            player: None,
            state: None,
            rng: EventRng::from_entropy(),
            messages: Vec::new(),
            storage,
        }
    }

    /// Pin the event stream to a user seed for reproducible runs.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = EventRng::from_user_seed(seed);
    }

    #[must_use]
    pub fn player(&self) -> Option<&Player> {
        self.player.as_ref()
    }

    #[must_use]
    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    #[must_use]
    pub fn catalog(&self) -> &SceneCatalog {
        &self.scenes
    }

    /// Number of random draws performed so far; one per evaluated event.
    #[must_use]
    pub const fn event_draws(&self) -> u64 {
        self.rng.draws()
    }

    /// Initialize a fresh game and enter the starting scene.
    pub fn new_game(&mut self, player_name: &str) {
        let trimmed = player_name.trim();
        let name = if trimmed.is_empty() {
            DEFAULT_PLAYER_NAME
        } else {
            trimmed
        };
        self.player = Some(Player::new(name));
        self.state = Some(GameState::new(START_SCENE_ID));
        self.ensure_default_flags();
        self.enter_scene(START_SCENE_ID);
        self.push(WELCOME_TEXT);
    }

    /// Load the saved session, replacing the live one only on success.
    pub fn load_game(&mut self) -> (bool, String) {
        let loaded = match persistence::load_game(&self.storage) {
            Ok(loaded) => loaded,
            Err(err) => return (false, err.to_string()),
        };
        let LoadedGame {
            mut player,
            mut state,
            message,
        } = loaded;
        if !self.scenes.contains(&state.current_scene_id) {
            return (false, "Save invalid: unknown scene id.".to_string());
        }

        player.health = clamp(player.health, 0, MAX_HEALTH);
        player.hints_left = clamp(player.hints_left, 0, MAX_HINTS);
        state.visited_scenes.insert(state.current_scene_id.clone());
        if state.history.is_empty() {
            state.history.push(state.current_scene_id.clone());
        }

        self.player = Some(player);
        self.state = Some(state);
        self.ensure_default_flags();
        self.push(&message);
        (true, message)
    }

    /// Persist the live session.
    pub fn save_game(&mut self) -> (bool, String) {
        let (Some(player), Some(state)) = (self.player.as_ref(), self.state.as_ref()) else {
            return (false, "Nothing to save.".to_string());
        };
        match persistence::save_game(&self.storage, player, state) {
            Ok(message) => {
                self.push(&message);
                (true, message)
            }
            Err(err) => {
                let message = err.to_string();
                self.push(&format!("Save failed: {message}"));
                (false, message)
            }
        }
    }

    /// Build a display snapshot and drain queued messages into it.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotStarted`] before a session exists and
    /// [`CoreError::UnknownScene`] when the current scene id has no
    /// catalog entry.
    pub fn view(&mut self) -> Result<GameView, CoreError> {
        let Some(player) = self.player.as_ref() else {
            return Err(CoreError::NotStarted);
        };
        let scene = self.current_scene()?;
        let actions = self.build_actions_view(scene);
        let status = StatusView {
            name: player.name.clone(),
            health: player.health,
            score: player.score,
            hints_left: player.hints_left,
            inventory: player.inventory.clone(),
            inventory_text: format_inventory(&player.inventory),
            location_title: scene.title.clone(),
            visited_count: self.state.as_ref().map_or(0, |s| s.visited_scenes.len()),
            path_highlights: self.path_highlights(),
        };
        let scene_id = scene.id.clone();
        let title = scene.title.clone();
        let description = scene.description.clone();
        let (game_over, ending_type, ending_text) = self
            .state
            .as_ref()
            .map_or((false, None, String::new()), |state| {
                (state.game_over, state.ending, state.ending_text.clone())
            });

        let new_messages = std::mem::take(&mut self.messages);
        Ok(GameView {
            scene_id,
            title,
            description,
            actions,
            status,
            game_over,
            ending_type,
            ending_text,
            new_messages,
        })
    }

    /// Return and clear queued messages without building a snapshot.
    pub fn take_messages(&mut self) -> Vec<String> {
        std::mem::take(&mut self.messages)
    }

    /// Process exactly one command to completion.
    pub fn submit(&mut self, raw_command: &str) {
        if self.player.is_none() || self.state.is_none() {
            self.push(NOT_STARTED_TEXT);
            return;
        }
        let command = normalize_command(raw_command);
        if command.is_empty() {
            return;
        }

        let current_id = self
            .state
            .as_ref()
            .map_or_else(String::new, |state| state.current_scene_id.clone());
        let Some(scene) = self.scenes.get(&current_id).cloned() else {
            // A live state pointing at a missing scene is a graph gap;
            // contained as the narrative dead end.
            if let Some(state) = self.state.as_mut() {
                state.finish(Ending::Bad, GAP_ENDING_TEXT);
            }
            return;
        };

        if debug_log_enabled() {
            println!("Command dispatch | scene:{} input:{command}", scene.id);
        }

        if self.handle_global(&command, &scene) {
            return;
        }

        if scene.special_handler == Some(SpecialHandler::VaultCode) && command.starts_with("code") {
            self.handle_vault_code(&command);
            return;
        }

        let Some(action) = scene.find_action(&command) else {
            self.push(UNKNOWN_COMMAND_TEXT);
            return;
        };
        if !self.requirements_met(action) {
            self.push(&action.blocked_text);
            return;
        }
        if !action.effects.is_empty() {
            self.apply_effects(&action.effects);
            if self.game_over() {
                return;
            }
        }
        if !action.result_text.is_empty() {
            self.push(&action.result_text);
        }
        if let Some(target) = action.target.as_deref() {
            if !self.game_over() {
                self.enter_scene(target);
            }
        }
    }

    fn push(&mut self, text: &str) {
        self.messages.push(text.to_string());
    }

    fn game_over(&self) -> bool {
        self.state.as_ref().is_some_and(|state| state.game_over)
    }

    /// Seed flags referenced by scene requirements, never overwriting an
    /// existing value (relevant after `load_game` repairs).
    fn ensure_default_flags(&mut self) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        for flag in DEFAULT_BOOL_FLAGS {
            state
                .flags
                .entry(flag.to_string())
                .or_insert(FlagValue::Bool(false));
        }
        state
            .flags
            .entry(FLAG_WRONG_CODE_ATTEMPTS.to_string())
            .or_insert(FlagValue::Int(0));
    }

    fn current_scene(&self) -> Result<&Scene, CoreError> {
        let state = self.state.as_ref().ok_or(CoreError::NotStarted)?;
        self.scenes
            .get(&state.current_scene_id)
            .ok_or_else(|| CoreError::UnknownScene(state.current_scene_id.clone()))
    }

    fn build_actions_view(&self, scene: &Scene) -> Vec<ViewAction> {
        let mut actions: Vec<ViewAction> = scene
            .actions
            .iter()
            .map(|action| {
                let enabled = self.requirements_met(action);
                ViewAction {
                    command: action.command.clone(),
                    label: action.label.clone(),
                    enabled,
                    blocked_reason: (!enabled).then(|| action.blocked_text.clone()),
                }
            })
            .collect();
        if scene.special_handler == Some(SpecialHandler::VaultCode) {
            actions.push(ViewAction {
                command: "code XXX".to_string(),
                label: "Enter a 3-digit code (example: code 274)".to_string(),
                enabled: true,
                blocked_reason: None,
            });
        }
        actions
    }

    fn requirements_met(&self, action: &Action) -> bool {
        let (Some(player), Some(state)) = (self.player.as_ref(), self.state.as_ref()) else {
            return false;
        };
        action
            .required_items
            .iter()
            .all(|item| player.has_item(item))
            && action
                .required_flags
                .iter()
                .all(|(name, expected)| state.flag(name) == Some(*expected))
    }

    /// Apply an effects bag field by field, queueing per-field messages.
    /// Not transactional: an ending mid-bag leaves earlier fields applied.
    fn apply_effects(&mut self, effects: &Effects) {
        let Self {
            player: Some(player),
            state: Some(state),
            messages,
            ..
        } = self
        else {
            return;
        };

        if effects.score != 0 {
            player.score += effects.score;
        }
        for item in &effects.add_items {
            if player.add_item(item) {
                messages.push(format!("Item acquired: {}", item_label(item)));
            }
        }
        for item in &effects.remove_items {
            if player.remove_item(item) {
                messages.push(format!("Item used: {}", item_label(item)));
            }
        }
        if effects.health != 0 {
            let before = player.health;
            player.health = clamp(player.health + effects.health, 0, MAX_HEALTH);
            let diff = player.health - before;
            if diff > 0 {
                messages.push(format!("Health +{diff}"));
            } else if diff < 0 {
                messages.push(format!("Health {diff}"));
            }
        }
        for (name, value) in &effects.flags {
            state.flags.insert(name.clone(), *value);
        }
        if let Some(ending) = effects.end {
            let text = effects
                .ending_text
                .clone()
                .unwrap_or_else(|| DEFAULT_ENDING_TEXT.to_string());
            state.finish(ending, text);
            return;
        }
        if player.health <= 0 && !state.game_over {
            state.finish(Ending::Bad, COLLAPSE_ENDING_TEXT);
        }
    }

    /// Record entry into a scene, then run its entry effects and random
    /// events in declared order.
    fn enter_scene(&mut self, scene_id: &str) {
        let Some(scene) = self.scenes.get(scene_id).cloned() else {
            if let Some(state) = self.state.as_mut() {
                state.finish(Ending::Bad, GAP_ENDING_TEXT);
            }
            return;
        };
        if debug_log_enabled() {
            println!(
                "Scene entry | {} events:{}",
                scene.id,
                scene.random_events.len()
            );
        }
        let Some(state) = self.state.as_mut() else {
            return;
        };
        state.current_scene_id = scene.id.clone();
        state.visited_scenes.insert(scene.id.clone());
        state.history.push(scene.id.clone());

        if !scene.on_enter_effects.is_empty() {
            self.apply_effects(&scene.on_enter_effects);
            if self.game_over() {
                return;
            }
        }

        for event in &scene.random_events {
            let flag_key = event_flag_key(&scene.id, &event.id);
            if event.once
                && self
                    .state
                    .as_ref()
                    .is_some_and(|state| state.flag_truthy(&flag_key))
            {
                continue;
            }
            if self.rng.r#gen::<f64>() < event.chance {
                self.push(&event.text);
                self.apply_effects(&event.effects);
                if self.game_over() {
                    return;
                }
            }
            if event.once {
                if let Some(state) = self.state.as_mut() {
                    state.set_flag(flag_key, true);
                }
            }
        }
    }

    /// Puzzle handler: `code NNN` against the vault panel.
    fn handle_vault_code(&mut self, command: &str) {
        let parts: Vec<&str> = command.split_whitespace().collect();
        let well_formed = parts.len() == 2
            && parts[1].len() == VAULT_CODE_LEN
            && parts[1].chars().all(|c| c.is_ascii_digit());
        if !well_formed {
            self.push(VAULT_FORMAT_TEXT);
            return;
        }

        if parts[1] == VAULT_CODE {
            let informed = self
                .state
                .as_ref()
                .is_some_and(|state| state.flag_truthy(FLAG_KNOWS_CODE));
            let bonus = if informed {
                VAULT_REWARD_INFORMED
            } else {
                VAULT_REWARD_BASE
            };
            let mut unlock = Effects {
                score: bonus,
                ..Effects::default()
            };
            unlock
                .flags
                .insert(FLAG_VAULT_SOLVED.to_string(), FlagValue::Bool(true));
            self.apply_effects(&unlock);
            self.push(VAULT_OPEN_TEXT);
            self.enter_scene(TREASURE_SCENE_ID);
            return;
        }

        let attempts = self
            .state
            .as_ref()
            .map_or(0, |state| state.flag_int(FLAG_WRONG_CODE_ATTEMPTS))
            + 1;
        if let Some(state) = self.state.as_mut() {
            state.set_flag(FLAG_WRONG_CODE_ATTEMPTS, attempts);
        }
        self.push(VAULT_WRONG_TEXT);
        self.apply_effects(&Effects {
            health: WRONG_CODE_HEALTH_PENALTY,
            score: WRONG_CODE_SCORE_PENALTY,
            ..Effects::default()
        });
        if !self.game_over() && attempts >= WRONG_CODE_ATTEMPT_LIMIT {
            if let Some(state) = self.state.as_mut() {
                state.finish(Ending::Bad, VAULT_COLLAPSE_TEXT);
            }
        }
    }

    /// Handle the always-available commands. Returns true when handled.
    fn handle_global(&mut self, command: &str, scene: &Scene) -> bool {
        match command {
            "help" => {
                let mut lines = vec![
                    format!("Help - {}", scene.title),
                    "Scene commands:".to_string(),
                ];
                for action in self.build_actions_view(scene) {
                    let mut line = format!(" - {}: {}", action.command, action.label);
                    if !action.enabled {
                        line.push_str(&format!(
                            " [blocked: {}]",
                            action.blocked_reason.as_deref().unwrap_or("Unavailable")
                        ));
                    }
                    lines.push(line);
                }
                lines.extend(
                    [
                        "Global commands:",
                        " - help",
                        " - status",
                        " - hint",
                        " - save",
                        " - load",
                        " - quit",
                        " - use <item>",
                    ]
                    .map(ToString::to_string),
                );
                self.push(&lines.join("\n"));
                true
            }
            "status" => {
                let path = self.path_highlights();
                let (Some(player), Some(state)) = (self.player.as_ref(), self.state.as_ref())
                else {
                    return false;
                };
                let mut lines = vec![
                    "STATUS".to_string(),
                    format!("Name: {}", player.name),
                    format!("Health: {}", player.health),
                    format!("Score: {}", player.score),
                    format!("Hints left: {}", player.hints_left),
                    format!("Location: {}", scene.title),
                    format!("Inventory: {}", format_inventory(&player.inventory)),
                    format!("Visited areas: {}", state.visited_scenes.len()),
                ];
                if !path.is_empty() {
                    lines.push(format!("Path Summary: {}", path.join(" -> ")));
                }
                let text = lines.join("\n");
                self.push(&text);
                true
            }
            "hint" => {
                let hints_left = self.player.as_ref().map_or(0, |player| player.hints_left);
                if hints_left <= 0 {
                    self.push("You have no hints left.");
                    return true;
                }
                if scene.hint_text.is_empty() {
                    self.push("No hint is available for this area.");
                    return true;
                }
                if let Some(player) = self.player.as_mut() {
                    player.hints_left -= 1;
                }
                let remaining = self.player.as_ref().map_or(0, |player| player.hints_left);
                self.push(&format!(
                    "Hint: {}\nHints remaining: {remaining}",
                    scene.hint_text
                ));
                true
            }
            "save" => {
                self.save_game();
                true
            }
            "load" => {
                let (loaded, message) = self.load_game();
                if loaded {
                    self.push("Save loaded. Adventure resumed.");
                } else {
                    self.push(&message);
                }
                true
            }
            "quit" => {
                if let Some(state) = self.state.as_mut() {
                    state.finish(Ending::Quit, QUIT_ENDING_TEXT);
                }
                self.push("Closing game...");
                true
            }
            _ if command == "use" || command.starts_with("use ") => {
                self.handle_use(command);
                true
            }
            _ => false,
        }
    }

    /// `use <item>`: only the healing herb is usable today, under two
    /// aliases; the match leaves room for further usable items.
    fn handle_use(&mut self, command: &str) {
        let argument = command.strip_prefix("use").map_or("", str::trim);
        if argument.is_empty() {
            self.push("Usage: use healing_herb");
            return;
        }
        let item_key = match argument.replace(' ', "_").as_str() {
            "healing_herb" | "herb" => HEALING_HERB_ID.to_string(),
            other => other.to_string(),
        };
        if item_key != HEALING_HERB_ID {
            self.push("That item cannot be used here.");
            return;
        }
        let Self {
            player: Some(player),
            messages,
            ..
        } = self
        else {
            return;
        };
        if !player.has_item(HEALING_HERB_ID) {
            messages.push("You do not have a healing herb.".to_string());
            return;
        }
        player.remove_item(HEALING_HERB_ID);
        let previous = player.health;
        player.health = clamp(player.health + 1, 0, MAX_HEALTH);
        let gained = player.health - previous;
        messages.push(format!("You used a healing herb. Health +{gained}."));
    }

    /// Titles of first-visit scenes, in visit order, capped for display.
    fn path_highlights(&self) -> PathHighlights {
        let mut titles = PathHighlights::new();
        let Some(state) = self.state.as_ref() else {
            return titles;
        };
        for scene_id in dedupe_preserve_order(&state.history) {
            if let Some(scene) = self.scenes.get(scene_id) {
                titles.push(scene.title.clone());
            }
            if titles.len() >= PATH_HIGHLIGHT_LIMIT {
                break;
            }
        }
        titles
    }
}
