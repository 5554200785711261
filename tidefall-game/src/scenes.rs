//! Built-in island campaign content.
//!
//! The world graph is declarative data embedded at compile time; the
//! interpreter never mutates it.

use crate::data::SceneCatalog;

const SCENES_JSON: &str = include_str!("../assets/scenes.json");

/// Build the built-in scene catalog.
///
/// # Panics
///
/// Panics when the embedded scene data is malformed; the content shape is
/// pinned by tests.
#[must_use]
pub fn build_scenes() -> SceneCatalog {
    SceneCatalog::from_json(SCENES_JSON).expect("embedded scene data is valid")
}
