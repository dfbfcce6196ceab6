use serde::{Deserialize, Serialize};

pub const MIN_SCALE: f32 = 0.75;
pub const MAX_SCALE: f32 = 2.0;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct UiSettings {
    pub ui_scale: f32,
    pub muted: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            ui_scale: 1.0,
            muted: false,
        }
    }
}

impl UiSettings {
    /// Clamps values a hand-edited settings file might have broken.
    pub fn sanitized(mut self) -> Self {
        if !self.ui_scale.is_finite() {
            self.ui_scale = 1.0;
        }
        self.ui_scale = self.ui_scale.clamp(MIN_SCALE, MAX_SCALE);
        self
    }
}
