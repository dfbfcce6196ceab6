mod audio;
mod config;
mod engine;
mod error;
mod model;
mod ui;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::AppConfig;
use crate::engine::llm_client::GeminiClient;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "infinite_adventure=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env().context("could not start the adventure")?;
    let client = GeminiClient::new(&config).context("could not start the adventure")?;
    tracing::info!(text_model = %config.text_model, image_model = %config.image_model, "starting");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title("Aventura Infinita"),
        ..Default::default()
    };

    eframe::run_native(
        "Aventura Infinita",
        options,
        Box::new(move |_cc| Ok(Box::new(ui::app::AdventureApp::new(config, client)))),
    )
    .map_err(|e| anyhow::anyhow!("ui error: {e}"))
}
