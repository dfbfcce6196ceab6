use eframe::egui;

use crate::model::game_state::GameState;

pub fn draw_sidebar(ctx: &egui::Context, game_state: Option<&GameState>, is_loading: bool) {
    egui::SidePanel::right("sidebar")
        .resizable(true)
        .default_width(280.0)
        .min_width(220.0)
        .show(ctx, |ui| {
            ui.set_width(ui.available_width());

            ui.heading("Misión actual");
            ui.group(|ui| {
                ui.set_width(ui.available_width());
                match game_state.map(|s| s.current_quest.as_str()) {
                    Some(quest) if !quest.is_empty() => {
                        ui.add(egui::Label::new(quest).wrap());
                    }
                    _ if is_loading => {
                        ui.spinner();
                    }
                    _ => {
                        ui.label("Sin misión.");
                    }
                }
            });

            ui.add_space(12.0);

            let inventory = game_state.map(|s| s.inventory.as_slice()).unwrap_or_default();
            list(ui, "Inventario", inventory);

            if let Some(state) = game_state {
                ui.add_space(12.0);
                ui.weak(format!("Ambiente: {}", state.tone));
            }
        });
}

fn list(ui: &mut egui::Ui, label: &str, items: &[String]) {
    ui.heading(label);
    egui::ScrollArea::vertical()
        .id_salt(label)
        .max_height(320.0)
        .show(ui, |ui| {
            if items.is_empty() {
                ui.label("Vacío");
            } else {
                for i in items {
                    ui.label(format!("• {i}"));
                }
            }
        });
}
