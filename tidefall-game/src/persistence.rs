//! Save/load plumbing for the versioned JSON save document.
//!
//! Loading is defensive: a structurally valid document always decodes,
//! with type-mismatched fields collapsing to safe defaults. Semantic
//! repair (clamping, history seeding) is the core's job after a load.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::constants::{
    FALLBACK_SAVE_NAME, MAX_HINTS, SAVE_FILE_NAME, SAVE_FORMAT_VERSION, START_HEALTH,
    START_SCENE_ID,
};
use crate::numbers::{round_f64_to_i32, saturate_i64_to_i32};
use crate::state::{Ending, FlagMap, FlagValue, GameState, Player};

/// Storage backend for the serialized save document.
/// Platform-specific implementations should provide this.
pub trait SaveStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Persist the serialized document.
    ///
    /// # Errors
    ///
    /// Returns an error when the document cannot be written.
    fn persist(&self, payload: &str) -> Result<(), Self::Error>;

    /// Retrieve the serialized document, or `None` when no save exists.
    ///
    /// # Errors
    ///
    /// Returns an error when an existing document cannot be read.
    fn retrieve(&self) -> Result<Option<String>, Self::Error>;

    /// Human-readable label used in save/load messages.
    fn label(&self) -> String {
        SAVE_FILE_NAME.to_string()
    }
}

/// File-backed storage writing a pretty-printed document.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for JsonFileStorage {
    fn default() -> Self {
        Self::new(SAVE_FILE_NAME)
    }
}

impl SaveStorage for JsonFileStorage {
    type Error = std::io::Error;

    fn persist(&self, payload: &str) -> Result<(), Self::Error> {
        fs::write(&self.path, payload)
    }

    fn retrieve(&self) -> Result<Option<String>, Self::Error> {
        if !self.path.exists() {
            return Ok(None);
        }
        fs::read_to_string(&self.path).map(Some)
    }

    fn label(&self) -> String {
        self.path
            .file_name()
            .map_or_else(|| SAVE_FILE_NAME.to_string(), |name| {
                name.to_string_lossy().into_owned()
            })
    }
}

/// Shared in-memory storage for tests and adapters without a filesystem.
/// Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop any stored document.
    pub fn clear(&self) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl SaveStorage for MemoryStorage {
    type Error = std::convert::Infallible;

    fn persist(&self, payload: &str) -> Result<(), Self::Error> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(payload.to_string());
        Ok(())
    }

    fn retrieve(&self) -> Result<Option<String>, Self::Error> {
        Ok(self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }
}

/// Failure writing the save document.
#[derive(Debug, Error)]
pub enum SaveError {
    /// Backend refused the write; the cause is kept for diagnostics.
    #[error("Save file could not be written.")]
    Write(anyhow::Error),
}

/// Failure producing a usable save document. The `Display` strings are the
/// user-facing reasons reported by the core.
#[derive(Debug, Error)]
pub enum LoadError {
    /// No save document exists.
    #[error("Save file was not found.")]
    Missing,
    /// The document could not be read or parsed as JSON.
    #[error("Save file is corrupted or unreadable.")]
    Unreadable(anyhow::Error),
    /// The payload is not a JSON object.
    #[error("Save file format is invalid.")]
    InvalidFormat,
    /// The `player`/`state` sub-objects are missing or mistyped.
    #[error("Save file is missing required fields.")]
    MissingFields,
}

#[derive(Debug, Serialize)]
struct SaveDocument<'a> {
    version: u32,
    player: &'a Player,
    state: &'a GameState,
}

/// Result of a successful load; the message is ready for the queue.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedGame {
    pub player: Player,
    pub state: GameState,
    pub message: String,
}

/// Persist player and game state as a versioned JSON document.
///
/// # Errors
///
/// Returns [`SaveError`] when the document cannot be written.
pub fn save_game<S: SaveStorage>(
    storage: &S,
    player: &Player,
    state: &GameState,
) -> Result<String, SaveError> {
    let document = SaveDocument {
        version: SAVE_FORMAT_VERSION,
        player,
        state,
    };
    let payload =
        serde_json::to_string_pretty(&document).map_err(|err| SaveError::Write(err.into()))?;
    storage
        .persist(&payload)
        .map_err(|err| SaveError::Write(anyhow::Error::new(err)))?;
    Ok(format!("Game saved: {}", storage.label()))
}

/// Load player and game state from the storage backend.
///
/// # Errors
///
/// Returns [`LoadError`] for a missing, unreadable, or structurally
/// invalid document. Type-mismatched fields inside a valid structure are
/// coerced, never rejected.
pub fn load_game<S: SaveStorage>(storage: &S) -> Result<LoadedGame, LoadError> {
    let raw = storage
        .retrieve()
        .map_err(|err| LoadError::Unreadable(anyhow::Error::new(err)))?
        .ok_or(LoadError::Missing)?;
    let payload: Value =
        serde_json::from_str(&raw).map_err(|err| LoadError::Unreadable(err.into()))?;
    let Value::Object(payload) = payload else {
        return Err(LoadError::InvalidFormat);
    };
    let Some(Value::Object(player)) = payload.get("player") else {
        return Err(LoadError::MissingFields);
    };
    let Some(Value::Object(state)) = payload.get("state") else {
        return Err(LoadError::MissingFields);
    };
    Ok(LoadedGame {
        player: decode_player(player),
        state: decode_state(state),
        message: format!("Save loaded: {}", storage.label()),
    })
}

fn decode_player(map: &Map<String, Value>) -> Player {
    let name = coerce_string(map.get("name"), FALLBACK_SAVE_NAME);
    let name = if name.is_empty() {
        FALLBACK_SAVE_NAME.to_string()
    } else {
        name
    };
    Player {
        name,
        health: coerce_i32(map.get("health"), START_HEALTH),
        inventory: coerce_string_list(map.get("inventory")),
        score: coerce_i32(map.get("score"), 0),
        hints_left: coerce_i32(map.get("hints_left"), MAX_HINTS),
    }
}

fn decode_state(map: &Map<String, Value>) -> GameState {
    GameState {
        current_scene_id: coerce_string(map.get("current_scene_id"), START_SCENE_ID),
        flags: coerce_flag_map(map.get("flags")),
        visited_scenes: coerce_string_list(map.get("visited_scenes"))
            .into_iter()
            .collect(),
        history: coerce_string_list(map.get("history")),
        game_over: coerce_bool(map.get("game_over")),
        ending: coerce_ending(map.get("ending")),
        ending_text: coerce_string(map.get("ending_text"), ""),
    }
}

fn coerce_string(value: Option<&Value>, fallback: &str) -> String {
    match value {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        _ => fallback.to_string(),
    }
}

fn coerce_i32(value: Option<&Value>, fallback: i32) -> i32 {
    match value {
        Some(Value::Number(number)) => number
            .as_i64()
            .map(saturate_i64_to_i32)
            .or_else(|| number.as_f64().map(round_f64_to_i32))
            .unwrap_or(fallback),
        Some(Value::Bool(flag)) => i32::from(*flag),
        Some(Value::String(text)) => text.trim().parse().unwrap_or(fallback),
        _ => fallback,
    }
}

fn coerce_bool(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(number)) => number.as_f64().is_some_and(|n| n != 0.0),
        _ => false,
    }
}

fn coerce_string_list(value: Option<&Value>) -> Vec<String> {
    let Some(Value::Array(items)) = value else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match item {
            Value::String(text) => Some(text.clone()),
            Value::Number(number) => Some(number.to_string()),
            _ => None,
        })
        .collect()
}

fn coerce_flag_map(value: Option<&Value>) -> FlagMap {
    let Some(Value::Object(entries)) = value else {
        return FlagMap::new();
    };
    entries
        .iter()
        .filter_map(|(key, value)| {
            let flag = match value {
                Value::Bool(flag) => FlagValue::Bool(*flag),
                Value::Number(number) => FlagValue::Int(
                    number
                        .as_i64()
                        .or_else(|| number.as_f64().map(|n| i64::from(round_f64_to_i32(n))))?,
                ),
                _ => return None,
            };
            Some((key.clone(), flag))
        })
        .collect()
}

fn coerce_ending(value: Option<&Value>) -> Option<Ending> {
    match value {
        Some(Value::String(text)) => text.parse().ok(),
        _ => None,
    }
}
