use eframe::egui;

use crate::model::game_state::GameState;
use crate::ui::scene_image::SceneImage;

pub const OPENING_TEXT: &str = "Tejiendo el comienzo de tu aventura…";
/// Shown when there is no scene and nothing is loading, e.g. after a failed opening.
pub const IDLE_TEXT: &str = "La aventura te espera.";

/// Draws the scene and returns the action the player picked this frame, if any.
pub fn draw_story_panel(
    ctx: &egui::Context,
    game_state: Option<&GameState>,
    error: Option<&str>,
    is_loading: bool,
    scene: &SceneImage,
    input_text: &mut String,
) -> Option<String> {
    let mut picked = None;
    let input_id = egui::Id::new("free_text_choice");

    // ---------- Input bar ----------
    egui::TopBottomPanel::bottom("choices").show(ctx, |ui| {
        ui.add_space(6.0);
        let enabled = game_state.is_some() && !is_loading;

        if let Some(state) = game_state {
            ui.horizontal_wrapped(|ui| {
                for choice in &state.choices {
                    if ui.add_enabled(enabled, egui::Button::new(choice.as_str())).clicked() {
                        picked = Some(choice.clone());
                    }
                }
            });
            ui.add_space(4.0);
        }

        let mut send_now = false;
        ui.horizontal(|ui| {
            let response = ui.add_enabled(
                enabled,
                egui::TextEdit::singleline(&mut *input_text)
                    .id(input_id)
                    .hint_text("O escribe tu propia acción…")
                    .desired_width(ui.available_width() - 80.0),
            );

            if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                send_now = true;
            }

            if ui.add_enabled(enabled, egui::Button::new("Enviar")).clicked() {
                send_now = true;
            }
        });

        if send_now && enabled {
            let text = input_text.trim().to_string();
            if !text.is_empty() {
                picked = Some(text);
                input_text.clear();
            }
            ui.memory_mut(|m| m.request_focus(input_id));
        }
        ui.add_space(6.0);
    });

    // ---------- Scene ----------
    egui::CentralPanel::default().show(ctx, |ui| {
        if let Some(msg) = error {
            error_banner(ui, msg);
            ui.add_space(8.0);
        }

        egui::ScrollArea::vertical().show(ui, |ui| {
            let Some(state) = game_state else {
                ui.horizontal(|ui| {
                    if is_loading {
                        ui.spinner();
                    }
                    ui.label(empty_scene_text(is_loading));
                });
                return;
            };

            match scene.texture() {
                Some(texture) => {
                    ui.add(
                        egui::Image::new(texture)
                            .max_width(ui.available_width())
                            .maintain_aspect_ratio(true),
                    );
                }
                None if scene.is_pending() => {
                    ui.spinner();
                }
                None => {}
            }

            ui.add_space(10.0);
            ui.add(egui::Label::new(egui::RichText::new(&state.story_text).size(17.0)).wrap());

            if is_loading {
                ui.add_space(10.0);
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label("La historia continúa…");
                });
            }
        });
    });

    picked
}

fn empty_scene_text(is_loading: bool) -> &'static str {
    if is_loading {
        OPENING_TEXT
    } else {
        IDLE_TEXT
    }
}

fn error_banner(ui: &mut egui::Ui, msg: &str) {
    egui::Frame::group(ui.style())
        .fill(egui::Color32::from_rgb(110, 30, 30))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.label(egui::RichText::new(msg).color(egui::Color32::WHITE));
        });
}
