use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::JoinHandle;

use crate::engine::narrator::Narrator;
use crate::engine::protocol::{EngineCommand, EngineResponse};

/// Worker that runs turns off the UI thread, one at a time.
pub struct Engine {
    rx: Receiver<EngineCommand>,
    tx: Sender<EngineResponse>,
    narrator: Narrator,
}

impl Engine {
    pub fn new(
        rx: Receiver<EngineCommand>,
        tx: Sender<EngineResponse>,
        narrator: Narrator,
    ) -> Self {
        Self { rx, tx, narrator }
    }

    /// Spawns the worker thread and returns both channel ends for the caller.
    pub fn spawn(
        narrator: Narrator,
    ) -> (Sender<EngineCommand>, Receiver<EngineResponse>, JoinHandle<()>) {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();

        let handle = std::thread::spawn(move || {
            let mut engine = Engine::new(cmd_rx, resp_tx, narrator);
            engine.run();
        });

        (cmd_tx, resp_rx, handle)
    }

    pub fn run(&mut self) {
        while let Ok(cmd) = self.rx.recv() {
            match cmd {
                EngineCommand::Advance {
                    turn,
                    choice,
                    history,
                    inventory,
                    quest,
                } => {
                    let resp = match self.narrator.advance(&choice, &history, &inventory, &quest) {
                        Ok(state) => EngineResponse::TurnReady { turn, state },
                        Err(error) => {
                            tracing::error!(turn, error = %error, "turn failed");
                            EngineResponse::TurnFailed { turn, error }
                        }
                    };

                    if self.tx.send(resp).is_err() {
                        break;
                    }
                }

                EngineCommand::Shutdown => break,
            }
        }

        tracing::debug!("engine stopped");
    }
}
