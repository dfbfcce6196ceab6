use serde::{Deserialize, Serialize};
use std::fmt;

/// Mood tag of a scene. Drives music selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Mysterious,
    Action,
    Suspenseful,
    Somber,
    Calm,
}

impl Tone {
    pub const ALL: [Tone; 5] = [
        Tone::Mysterious,
        Tone::Action,
        Tone::Suspenseful,
        Tone::Somber,
        Tone::Calm,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tone::Mysterious => "mysterious",
            Tone::Action => "action",
            Tone::Suspenseful => "suspenseful",
            Tone::Somber => "somber",
            Tone::Calm => "calm",
        }
    }

    /// Strict parse. Case-insensitive, surrounding whitespace ignored.
    pub fn parse(raw: &str) -> Option<Tone> {
        let raw = raw.trim();
        Tone::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(raw))
    }

    /// Parse model output, falling back to `Calm` for anything outside the enum.
    pub fn from_model(raw: &str) -> Tone {
        Tone::parse(raw).unwrap_or_else(|| {
            tracing::warn!(tone = raw, "unrecognized scene tone, using calm");
            Tone::Calm
        })
    }
}

impl fmt::Display for Tone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
