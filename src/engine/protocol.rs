use crate::error::GenerationError;
use crate::model::game_state::GameState;

/// Monotonic id tying a response to the request that caused it.
pub type TurnId = u64;

pub enum EngineCommand {
    Advance {
        turn: TurnId,
        choice: String,
        history: Vec<String>,
        inventory: Vec<String>,
        quest: String,
    },
    Shutdown,
}

#[derive(Debug)]
pub enum EngineResponse {
    TurnReady {
        turn: TurnId,
        state: GameState,
    },
    TurnFailed {
        turn: TurnId,
        error: GenerationError,
    },
}
