//! Centralized balance and narrative constants for the Tidefall core.
//!
//! These values define the deterministic math and the reused narrative
//! strings of the interpreter. Keeping them together ensures that gameplay
//! can only be adjusted via code changes reviewed in version control,
//! rather than through external assets.

// Player bounds ------------------------------------------------------------
pub const MAX_HEALTH: i32 = 5;
pub const MAX_HINTS: i32 = 3;
pub(crate) const START_HEALTH: i32 = 3;

// Session defaults ---------------------------------------------------------
pub const START_SCENE_ID: &str = "camp";
pub const SAVE_FILE_NAME: &str = "savegame.json";
pub(crate) const SAVE_FORMAT_VERSION: u32 = 1;
pub(crate) const DEFAULT_PLAYER_NAME: &str = "Explorer";
pub(crate) const FALLBACK_SAVE_NAME: &str = "Wanderer";

// Vault puzzle tuning ------------------------------------------------------
pub(crate) const VAULT_CODE: &str = "274";
pub(crate) const VAULT_CODE_LEN: usize = 3;
pub(crate) const VAULT_REWARD_BASE: i32 = 6;
pub(crate) const VAULT_REWARD_INFORMED: i32 = 12;
pub(crate) const WRONG_CODE_HEALTH_PENALTY: i32 = -1;
pub(crate) const WRONG_CODE_SCORE_PENALTY: i32 = -2;
pub(crate) const WRONG_CODE_ATTEMPT_LIMIT: i64 = 3;
pub(crate) const TREASURE_SCENE_ID: &str = "treasure_room";

// Flags --------------------------------------------------------------------
pub(crate) const EVENT_FLAG_PREFIX: &str = "_event_";
pub(crate) const FLAG_KNOWS_CODE: &str = "knows_code";
pub(crate) const FLAG_VAULT_SOLVED: &str = "vault_solved";
pub(crate) const FLAG_WRONG_CODE_ATTEMPTS: &str = "wrong_code_attempts";

/// Author-facing flags seeded to `false` when absent. Scene requirements
/// rely on these existing from the first command onward.
pub(crate) const DEFAULT_BOOL_FLAGS: [&str; 12] = [
    "camp_chest_opened",
    "rested_once",
    "torch_taken",
    "read_riddle",
    "desk_checked",
    "took_key",
    "moon_phrase",
    "gate_unlocked",
    "took_disk",
    "saw_mirror_signal",
    FLAG_KNOWS_CODE,
    FLAG_VAULT_SOLVED,
];

// Items --------------------------------------------------------------------
pub(crate) const HEALING_HERB_ID: &str = "sifali_ot";

// View ---------------------------------------------------------------------
pub const PATH_HIGHLIGHT_LIMIT: usize = 8;

// Narrative strings reused across the core ---------------------------------
pub(crate) const WELCOME_TEXT: &str =
    "Welcome to Treasure Island. Your mission is to find the treasure.";
pub(crate) const UNKNOWN_COMMAND_TEXT: &str = "Unknown command. Type 'help' to see options.";
pub(crate) const NOT_STARTED_TEXT: &str = "Game not started.";
pub(crate) const DEFAULT_ENDING_TEXT: &str = "The story ends here.";
pub(crate) const COLLAPSE_ENDING_TEXT: &str =
    "You collapse from your wounds. The island falls silent.";
pub(crate) const GAP_ENDING_TEXT: &str = "You wander into a path that shouldn't exist.";
pub(crate) const QUIT_ENDING_TEXT: &str =
    "You leave the island before its secrets are revealed.";
pub(crate) const VAULT_FORMAT_TEXT: &str = "Invalid format. Example: code 274";
pub(crate) const VAULT_OPEN_TEXT: &str = "The rune panel trembles. The lock clicks open.";
pub(crate) const VAULT_WRONG_TEXT: &str = "Wrong code. Needles snap out of the panel.";
pub(crate) const VAULT_COLLAPSE_TEXT: &str =
    "After three failures, the mechanism detonates and the chamber collapses.";

// Debug logging ------------------------------------------------------------
pub(crate) const DEBUG_ENV_VAR: &str = "TIDEFALL_DEBUG_LOGS";
