use std::fs;
use std::path::{Path, PathBuf};

use crate::ui::settings::UiSettings;

pub fn settings_path() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("infinite_adventure");
    path.push("ui_settings.json");
    path
}

pub fn load_settings(path: &Path) -> UiSettings {
    fs::read_to_string(path)
        .ok()
        .and_then(|s| serde_json::from_str::<UiSettings>(&s).ok())
        .unwrap_or_default()
        .sanitized()
}

pub fn save_settings(path: &Path, settings: &UiSettings) {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).ok();
    }
    match serde_json::to_string_pretty(settings) {
        Ok(json) => {
            if let Err(e) = fs::write(path, json) {
                tracing::warn!(error = %e, "could not write ui settings");
            }
        }
        Err(e) => tracing::warn!(error = %e, "could not serialize ui settings"),
    }
}
