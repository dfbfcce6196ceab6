use serde::{Deserialize, Serialize};

use crate::model::game_state::{GameState, StoryHistory};

/// The only thing that gets persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveData {
    pub game_state: GameState,
    pub story_history: StoryHistory,
}
