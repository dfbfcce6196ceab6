use serde::{Deserialize, Serialize};

use crate::model::tone::Tone;

/// Player choice that means "no prior turn".
pub const START_GAME: &str = "start_game";

/// Number of suggested actions on every valid snapshot.
pub const CHOICE_COUNT: usize = 3;

/// One immutable snapshot of the narrative.
/// Replaced wholesale every turn, never edited in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub story_text: String,
    pub choices: Vec<String>,

    /// Ordered for display, treated as a set.
    pub inventory: Vec<String>,

    pub current_quest: String,

    /// Either a `data:` URI with the rendered scene or a placeholder URL.
    pub image_url: String,

    pub tone: Tone,
}

/// Past `story_text` values, oldest first.
pub type StoryHistory = Vec<String>;
