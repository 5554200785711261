//! Display-ready projection consumed by rendering adapters.
//!
//! Adapters render these snapshots verbatim and never hold their own
//! mutable copy of player or world state.

use serde::Serialize;
use smallvec::SmallVec;

use crate::constants::PATH_HIGHLIGHT_LIMIT;
use crate::state::Ending;

/// Path summary entries kept inline for the status block.
pub type PathHighlights = SmallVec<[String; PATH_HIGHLIGHT_LIMIT]>;

/// One scene action as presented to the player.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewAction {
    pub command: String,
    pub label: String,
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked_reason: Option<String>,
}

/// Player status block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusView {
    pub name: String,
    pub health: i32,
    pub score: i32,
    pub hints_left: i32,
    pub inventory: Vec<String>,
    pub inventory_text: String,
    pub location_title: String,
    pub visited_count: usize,
    pub path_highlights: PathHighlights,
}

/// Snapshot of everything an adapter needs to render one frame.
/// `new_messages` holds the messages drained by this projection; each
/// message appears in exactly one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameView {
    pub scene_id: String,
    pub title: String,
    pub description: String,
    pub actions: Vec<ViewAction>,
    pub status: StatusView,
    pub game_over: bool,
    pub ending_type: Option<Ending>,
    pub ending_text: String,
    pub new_messages: Vec<String>,
}
