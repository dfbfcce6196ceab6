use std::path::PathBuf;
use std::sync::mpsc;
use std::thread::JoinHandle;
use std::time::Instant;

use eframe::egui;

use crate::audio::music_player::{MusicPlayer, FADE_STEP};
use crate::audio::output::{AudioOutput, NullOutput, RodioOutput};
use crate::config::AppConfig;
use crate::engine::clock::SystemClock;
use crate::engine::engine::Engine;
use crate::engine::llm_client::GeminiClient;
use crate::engine::narrator::Narrator;
use crate::engine::orchestrator::Orchestrator;
use crate::engine::persistence::{FileStore, SaveSlot};
use crate::engine::protocol::{EngineCommand, EngineResponse};
use crate::error::GenerationError;
use crate::ui::scene_image::SceneImage;
use crate::ui::settings::{UiSettings, MAX_SCALE, MIN_SCALE};
use crate::ui::settings_io::{load_settings, save_settings, settings_path};
use crate::ui::sidebar::draw_sidebar;
use crate::ui::story_panel::draw_story_panel;

pub struct AdventureApp {
    orchestrator: Orchestrator,
    music: MusicPlayer,
    scene: SceneImage,

    settings: UiSettings,
    settings_path: PathBuf,
    input_text: String,

    cmd_tx: mpsc::Sender<EngineCommand>,
    resp_rx: mpsc::Receiver<EngineResponse>,
    _engine: JoinHandle<()>,
}

impl AdventureApp {
    pub fn new(config: AppConfig, client: GeminiClient) -> Self {
        let narrator = Narrator::new(
            Box::new(client.clone()),
            Box::new(client),
            Box::new(SystemClock),
        );
        let (cmd_tx, resp_rx, engine) = Engine::spawn(narrator);

        tracing::info!(dir = %config.save_dir.display(), "using save directory");
        let save_slot = SaveSlot::new(Box::new(FileStore::new(config.save_dir)));

        let output: Box<dyn AudioOutput> = match RodioOutput::try_new() {
            Some(out) => Box::new(out),
            None => Box::new(NullOutput),
        };

        let settings_path = settings_path();
        let settings = load_settings(&settings_path);
        let mut music = MusicPlayer::new(output);
        music.set_muted(settings.muted);

        let mut app = Self {
            orchestrator: Orchestrator::new(save_slot),
            music,
            scene: SceneImage::default(),
            settings,
            settings_path,
            input_text: String::new(),
            cmd_tx,
            resp_rx,
            _engine: engine,
        };

        let cmd = app.orchestrator.start();
        app.dispatch(cmd);
        app
    }

    fn dispatch(&mut self, cmd: Option<EngineCommand>) {
        let Some(cmd) = cmd else {
            return;
        };
        let turn = match &cmd {
            EngineCommand::Advance { turn, .. } => Some(*turn),
            EngineCommand::Shutdown => None,
        };

        if self.cmd_tx.send(cmd).is_err() {
            tracing::error!("engine thread is gone");
            if let Some(turn) = turn {
                self.orchestrator.handle_response(EngineResponse::TurnFailed {
                    turn,
                    error: GenerationError::Request("engine stopped".into()),
                });
            }
        }
    }

    fn draw_header(&mut self, ctx: &egui::Context, now: Instant) {
        let mut save = false;
        let mut restart = false;
        let mut settings_changed = false;

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.label(
                    egui::RichText::new("Aventura Infinita")
                        .size(28.0)
                        .strong()
                        .color(egui::Color32::from_rgb(251, 191, 36)),
                );

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let mute_label = if self.settings.muted { "🔇" } else { "🔊" };
                    if ui.button(mute_label).clicked() {
                        self.settings.muted = !self.settings.muted;
                        settings_changed = true;
                    }

                    if ui
                        .add_enabled(
                            self.orchestrator.can_restart(),
                            egui::Button::new("Reiniciar"),
                        )
                        .clicked()
                    {
                        restart = true;
                    }

                    let save_label = self.orchestrator.notice(now).unwrap_or("Guardar");
                    if ui
                        .add_enabled(self.orchestrator.can_save(), egui::Button::new(save_label))
                        .clicked()
                    {
                        save = true;
                    }

                    let scale = ui.add(
                        egui::Slider::new(&mut self.settings.ui_scale, MIN_SCALE..=MAX_SCALE)
                            .text("Escala"),
                    );
                    if scale.drag_stopped() || (scale.changed() && !scale.dragged()) {
                        settings_changed = true;
                    }
                });
            });
            ui.add_space(6.0);
        });

        if save {
            self.orchestrator.save(now);
        }
        if restart {
            self.input_text.clear();
            let cmd = self.orchestrator.restart();
            self.dispatch(cmd);
        }
        if settings_changed {
            self.music.set_muted(self.settings.muted);
            save_settings(&self.settings_path, &self.settings);
        }
    }
}

impl eframe::App for AdventureApp {
    fn update(&mut self, ctx: &egui::Context, _: &mut eframe::Frame) {
        ctx.set_zoom_factor(self.settings.ui_scale);

        while let Ok(resp) = self.resp_rx.try_recv() {
            self.orchestrator.handle_response(resp);
        }

        let now = Instant::now();
        let tone = self.orchestrator.game_state().map(|s| s.tone);
        self.music.set_tone(tone, now);
        self.music.update(now);

        let image_url = self.orchestrator.game_state().map(|s| s.image_url.clone());
        self.scene.sync(ctx, image_url.as_deref());

        self.draw_header(ctx, now);

        draw_sidebar(
            ctx,
            self.orchestrator.game_state(),
            self.orchestrator.is_loading(),
        );

        let picked = draw_story_panel(
            ctx,
            self.orchestrator.game_state(),
            self.orchestrator.error_message(),
            self.orchestrator.is_loading(),
            &self.scene,
            &mut self.input_text,
        );

        if let Some(choice) = picked {
            let cmd = self.orchestrator.submit_choice(&choice);
            self.dispatch(cmd);
        }

        if self.orchestrator.is_loading()
            || self.music.is_fading()
            || self.scene.is_pending()
            || self.orchestrator.notice(now).is_some()
        {
            ctx.request_repaint_after(FADE_STEP);
        }
    }
}

impl Drop for AdventureApp {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(EngineCommand::Shutdown);
    }
}
