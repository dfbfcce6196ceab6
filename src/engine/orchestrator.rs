use std::time::{Duration, Instant};

use crate::engine::persistence::SaveSlot;
use crate::engine::protocol::{EngineCommand, EngineResponse, TurnId};
use crate::model::game_save::SaveData;
use crate::model::game_state::{GameState, StoryHistory, START_GAME};

pub const OPENING_FAILED: &str =
    "No se pudo iniciar la aventura. Por favor, comprueba tu clave de API e inténtalo de nuevo.";
pub const TURN_FAILED: &str = "La historia dio un giro inesperado y no pudo continuar. Intenta tomar una decisión diferente o reiniciar.";
pub const SAVE_FAILED: &str =
    "No se pudo guardar el progreso. Es posible que el almacenamiento esté lleno.";
pub const SAVED_NOTICE: &str = "¡Guardado!";
pub const NOTICE_DURATION: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnKind {
    Opening,
    Continue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Loading { turn: TurnId, kind: TurnKind },
    Ready,
    /// Last action failed. The previous snapshot, if any, stays playable.
    Failed(String),
}

/// Owns the current snapshot and history, and decides what the engine runs.
///
/// Never does I/O on the network itself: methods that start a turn hand
/// back the `EngineCommand` to dispatch, and the result comes back through
/// `handle_response`.
pub struct Orchestrator {
    phase: Phase,
    game_state: Option<GameState>,
    history: StoryHistory,
    save_slot: SaveSlot,
    next_turn: TurnId,
    notice: Option<(&'static str, Instant)>,
}

impl Orchestrator {
    pub fn new(save_slot: SaveSlot) -> Self {
        Self {
            phase: Phase::Uninitialized,
            game_state: None,
            history: Vec::new(),
            save_slot,
            next_turn: 1,
            notice: None,
        }
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn game_state(&self) -> Option<&GameState> {
        self.game_state.as_ref()
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, Phase::Loading { .. })
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.phase {
            Phase::Failed(msg) => Some(msg),
            _ => None,
        }
    }

    pub fn can_save(&self) -> bool {
        !self.is_loading() && self.game_state.is_some()
    }

    pub fn can_restart(&self) -> bool {
        !self.is_loading()
    }

    /// First-launch flow: restore the save, or ask for an opening scene.
    pub fn start(&mut self) -> Option<EngineCommand> {
        if self.phase != Phase::Uninitialized {
            return None;
        }

        match self.save_slot.load() {
            Some(data) => {
                self.game_state = Some(data.game_state);
                self.history = data.story_history;
                self.phase = Phase::Ready;
                None
            }
            None => Some(self.begin_turn(TurnKind::Opening, START_GAME.to_string())),
        }
    }

    /// Ignored with no snapshot, while a turn is in flight, or for blank input.
    pub fn submit_choice(&mut self, text: &str) -> Option<EngineCommand> {
        if self.game_state.is_none() || self.is_loading() {
            return None;
        }
        let choice = text.trim();
        if choice.is_empty() {
            return None;
        }

        Some(self.begin_turn(TurnKind::Continue, choice.to_string()))
    }

    pub fn handle_response(&mut self, resp: EngineResponse) {
        let (turn, kind) = match self.phase {
            Phase::Loading { turn, kind } => (turn, kind),
            _ => {
                tracing::debug!("response with no turn in flight, ignoring");
                return;
            }
        };

        match resp {
            EngineResponse::TurnReady { turn: id, state } if id == turn => {
                self.history.push(state.story_text.clone());
                self.game_state = Some(state);
                self.phase = Phase::Ready;
            }
            EngineResponse::TurnFailed { turn: id, error } if id == turn => {
                tracing::warn!(turn, error = %error, "keeping previous state after failed turn");
                let msg = match kind {
                    TurnKind::Opening => OPENING_FAILED,
                    TurnKind::Continue => TURN_FAILED,
                };
                self.phase = Phase::Failed(msg.to_string());
            }
            _ => tracing::debug!(expected = turn, "stale engine response, ignoring"),
        }
    }

    /// Drops the save and all progress, then starts a fresh story.
    /// No-op while a turn is in flight.
    pub fn restart(&mut self) -> Option<EngineCommand> {
        if self.is_loading() {
            return None;
        }

        tracing::info!("restarting adventure");
        self.save_slot.clear();
        self.game_state = None;
        self.history.clear();
        self.notice = None;

        Some(self.begin_turn(TurnKind::Opening, START_GAME.to_string()))
    }

    /// No-op while a turn is in flight.
    pub fn save(&mut self, now: Instant) {
        if self.is_loading() {
            return;
        }
        let Some(game_state) = &self.game_state else {
            return;
        };
        if self.history.is_empty() {
            return;
        }

        let data = SaveData {
            game_state: game_state.clone(),
            story_history: self.history.clone(),
        };

        match self.save_slot.save(&data) {
            Ok(()) => self.notice = Some((SAVED_NOTICE, now)),
            Err(e) => {
                tracing::error!(error = %e, "failed to save game");
                self.phase = Phase::Failed(SAVE_FAILED.to_string());
            }
        }
    }

    /// Transient confirmation, visible for `NOTICE_DURATION` after a save.
    pub fn notice(&self, now: Instant) -> Option<&'static str> {
        self.notice
            .filter(|(_, at)| now.saturating_duration_since(*at) < NOTICE_DURATION)
            .map(|(msg, _)| msg)
    }

    fn begin_turn(&mut self, kind: TurnKind, choice: String) -> EngineCommand {
        let turn = self.next_turn;
        self.next_turn += 1;
        self.phase = Phase::Loading { turn, kind };

        let (inventory, quest) = match &self.game_state {
            Some(s) if kind == TurnKind::Continue => (s.inventory.clone(), s.current_quest.clone()),
            _ => (Vec::new(), String::new()),
        };
        let history = match kind {
            TurnKind::Continue => self.history.clone(),
            TurnKind::Opening => Vec::new(),
        };

        EngineCommand::Advance {
            turn,
            choice,
            history,
            inventory,
            quest,
        }
    }
}
