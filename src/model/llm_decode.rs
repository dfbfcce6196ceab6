use serde_json::{Map, Value};

use crate::error::GenerationError;
use crate::model::game_state::CHOICE_COUNT;
use crate::model::tone::Tone;

/// Validated text half of a turn. The narrator adds the image.
#[derive(Debug, Clone, PartialEq)]
pub struct StoryPayload {
    pub story_text: String,
    pub choices: Vec<String>,
    pub inventory: Vec<String>,
    pub current_quest: String,
    pub tone: Tone,
}

/// Decode raw model JSON into a typed payload.
pub fn decode_story_payload(raw: &str) -> Result<StoryPayload, GenerationError> {
    let value: Value = serde_json::from_str(raw.trim()).map_err(|e| {
        tracing::error!(error = %e, raw, "model returned unparseable story JSON");
        GenerationError::InvalidFormat
    })?;

    let Value::Object(obj) = value else {
        return Err(malformed("payload is not a JSON object"));
    };

    let story_text = required_text(&obj, "storyText")?;
    let current_quest = required_text(&obj, "currentQuest")?;
    let tone = Tone::from_model(&required_text(&obj, "tone")?);

    let mut choices = string_list(&obj, "choices")?;
    if choices.len() < CHOICE_COUNT {
        return Err(malformed(format!(
            "expected {CHOICE_COUNT} choices, got {}",
            choices.len()
        )));
    }
    choices.truncate(CHOICE_COUNT);

    let mut inventory: Vec<String> = Vec::new();
    for item in string_list(&obj, "inventory")? {
        if !inventory.contains(&item) {
            inventory.push(item);
        }
    }

    Ok(StoryPayload {
        story_text,
        choices,
        inventory,
        current_quest,
        tone,
    })
}

fn malformed(reason: impl Into<String>) -> GenerationError {
    GenerationError::MalformedOutput(reason.into())
}

fn required_text(obj: &Map<String, Value>, key: &str) -> Result<String, GenerationError> {
    match obj.get(key) {
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Some(Value::String(_)) => Err(malformed(format!("`{key}` is empty"))),
        Some(_) => Err(malformed(format!("`{key}` must be a string"))),
        None => Err(malformed(format!("missing `{key}`"))),
    }
}

/// Trimmed, non-empty string entries of an array field.
fn string_list(obj: &Map<String, Value>, key: &str) -> Result<Vec<String>, GenerationError> {
    let Some(value) = obj.get(key) else {
        return Err(malformed(format!("missing `{key}`")));
    };
    let Value::Array(items) = value else {
        return Err(malformed(format!("`{key}` must be an array")));
    };

    let mut out = Vec::with_capacity(items.len());
    for item in items {
        let Value::String(s) = item else {
            return Err(malformed(format!("`{key}` must only contain strings")));
        };
        let s = s.trim();
        if !s.is_empty() {
            out.push(s.to_string());
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload_json() -> Value {
        serde_json::json!({
            "storyText": "La puerta cruje al abrirse.",
            "choices": ["Entrar", "Esperar", "Huir"],
            "inventory": ["antorcha"],
            "currentQuest": "Encontrar la llave",
            "tone": "suspenseful"
        })
    }

    #[test]
    fn decodes_a_complete_payload() {
        let payload = decode_story_payload(&payload_json().to_string()).unwrap();
        assert_eq!(payload.story_text, "La puerta cruje al abrirse.");
        assert_eq!(payload.choices.len(), 3);
        assert_eq!(payload.inventory, vec!["antorcha".to_string()]);
        assert_eq!(payload.tone, Tone::Suspenseful);
    }

    #[test]
    fn non_json_is_invalid_format() {
        let err = decode_story_payload("Había una vez...").unwrap_err();
        assert_eq!(err, GenerationError::InvalidFormat);
        assert_eq!(err.to_string(), "invalid format");
    }

    #[test]
    fn every_required_field_is_enforced() {
        for key in ["storyText", "choices", "inventory", "currentQuest", "tone"] {
            let mut json = payload_json();
            json.as_object_mut().unwrap().remove(key);
            let err = decode_story_payload(&json.to_string()).unwrap_err();
            assert!(
                matches!(err, GenerationError::MalformedOutput(_)),
                "removing {key} gave {err:?}"
            );
            assert!(err.to_string().starts_with("malformed model output"));
        }
    }

    #[test]
    fn empty_story_text_is_rejected() {
        let mut json = payload_json();
        json["storyText"] = Value::String("   ".into());
        assert!(matches!(
            decode_story_payload(&json.to_string()),
            Err(GenerationError::MalformedOutput(_))
        ));
    }

    #[test]
    fn choices_are_held_to_three() {
        let mut json = payload_json();
        json["choices"] = serde_json::json!(["a", "b", "c", "d"]);
        let payload = decode_story_payload(&json.to_string()).unwrap();
        assert_eq!(payload.choices, vec!["a", "b", "c"]);

        json["choices"] = serde_json::json!(["a", "  ", "c"]);
        assert!(decode_story_payload(&json.to_string()).is_err());
    }

    #[test]
    fn inventory_keeps_first_occurrence_order() {
        let mut json = payload_json();
        json["inventory"] = serde_json::json!(["cuerda", "antorcha", "cuerda", ""]);
        let payload = decode_story_payload(&json.to_string()).unwrap();
        assert_eq!(payload.inventory, vec!["cuerda", "antorcha"]);
    }

    #[test]
    fn unknown_tone_falls_back_to_calm() {
        let mut json = payload_json();
        json["tone"] = Value::String("festive".into());
        let payload = decode_story_payload(&json.to_string()).unwrap();
        assert_eq!(payload.tone, Tone::Calm);
    }
}
