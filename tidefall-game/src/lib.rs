//! Tidefall Game Engine
//!
//! Platform-agnostic gameplay core for the Tidefall branching text
//! adventure. This crate tracks player and world state, interprets single
//! text commands against a data-driven scene graph, applies deterministic
//! and probabilistic effects, and projects display-ready snapshots — all
//! without UI or platform-specific dependencies.
//!
//! Adapters (console, windowed) drive the core through five operations:
//! `new_game`, `load_game`, `save_game`, `view`, and `submit`, rendering
//! the returned [`view::GameView`] and its drained messages.

pub mod constants;
pub mod core;
pub mod data;
pub mod numbers;
pub mod persistence;
pub mod rng;
pub mod scenes;
pub mod state;
pub mod util;
pub mod view;

// Re-export commonly used types
pub use crate::core::{CoreError, GameCore};
pub use constants::{MAX_HEALTH, MAX_HINTS, PATH_HIGHLIGHT_LIMIT, SAVE_FILE_NAME, START_SCENE_ID};
pub use data::{Action, Effects, RandomEvent, Scene, SceneCatalog, SpecialHandler};
pub use persistence::{
    JsonFileStorage, LoadError, LoadedGame, MemoryStorage, SaveError, SaveStorage, load_game,
    save_game,
};
pub use rng::{CountingRng, EventRng, derive_stream_seed};
pub use scenes::build_scenes;
pub use state::{Ending, FlagMap, FlagValue, GameState, Player, event_flag_key};
pub use view::{GameView, PathHighlights, StatusView, ViewAction};
