use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::config::AppConfig;
use crate::error::{GenerationError, ImageError, StartupError};
use crate::model::tone::Tone;

pub const TEMPERATURE: f32 = 0.8;

/// Schema-constrained story generation. Returns the raw JSON text.
pub trait TextGenerator: Send {
    fn generate_json(&self, prompt: &str) -> Result<String, GenerationError>;
}

/// Scene illustration. Returns a `data:` URI.
pub trait ImageGenerator: Send {
    fn generate_image(&self, prompt: &str) -> Result<String, ImageError>;
}

/* =========================
   Wire types
   ========================= */

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Serialize, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_mime_type: String,
    pub response_schema: Value,
    pub temperature: f32,
}

#[derive(Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
pub struct Candidate {
    pub content: Option<Content>,
}

#[derive(Serialize)]
pub struct PredictRequest {
    pub instances: Vec<ImageInstance>,
    pub parameters: ImageParameters,
}

#[derive(Serialize)]
pub struct ImageInstance {
    pub prompt: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageParameters {
    pub sample_count: u32,
    pub aspect_ratio: String,
    pub output_options: OutputOptions,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputOptions {
    pub mime_type: String,
}

#[derive(Deserialize)]
pub struct PredictResponse {
    #[serde(default)]
    pub predictions: Vec<Prediction>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub bytes_base64_encoded: Option<String>,
    pub mime_type: Option<String>,
}

/// The structured-output schema the text model must follow.
pub fn story_schema() -> Value {
    let tones: Vec<&str> = Tone::ALL.iter().map(|t| t.as_str()).collect();
    json!({
        "type": "OBJECT",
        "properties": {
            "storyText": {
                "type": "STRING",
                "description": "La siguiente parte de la historia. Debe ser atractiva y descriptiva."
            },
            "choices": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "minItems": 3,
                "maxItems": 3,
                "description": "Un array de 3 opciones distintas para que el jugador elija."
            },
            "inventory": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "El inventario actual del jugador. Actualízalo basándote en los eventos de la historia."
            },
            "currentQuest": {
                "type": "STRING",
                "description": "La misión u objetivo principal actual del jugador. Actualízala si la historia progresa."
            },
            "tone": {
                "type": "STRING",
                "enum": tones,
                "description": "El tono emocional o la atmósfera de la escena."
            }
        },
        "required": ["storyText", "choices", "inventory", "currentQuest", "tone"]
    })
}

/* =========================
   Client
   ========================= */

/// Generative Language REST client for both story text and scene images.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: String,
    text_model: String,
    image_model: String,
}

impl GeminiClient {
    pub fn new(config: &AppConfig) -> Result<Self, StartupError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| StartupError::HttpClient(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            text_model: config.text_model.clone(),
            image_model: config.image_model.clone(),
        })
    }

    fn endpoint(&self, model: &str, method: &str) -> String {
        format!("{}/models/{}:{}", self.base_url, model, method)
    }
}

impl TextGenerator for GeminiClient {
    fn generate_json(&self, prompt: &str) -> Result<String, GenerationError> {
        let req = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".into(),
                response_schema: story_schema(),
                temperature: TEMPERATURE,
            },
        };

        tracing::debug!(model = %self.text_model, "requesting story text");

        let resp = self
            .client
            .post(self.endpoint(&self.text_model, "generateContent"))
            .header("x-goog-api-key", &self.api_key)
            .json(&req)
            .send()
            .map_err(|e| GenerationError::Request(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().unwrap_or_default();
            return Err(GenerationError::Request(format!("{status}: {body}")));
        }

        let resp: GenerateContentResponse = resp
            .json()
            .map_err(|e| GenerationError::Request(e.to_string()))?;

        let text: String = resp
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(GenerationError::MalformedOutput("empty response".into()));
        }

        Ok(text)
    }
}

impl ImageGenerator for GeminiClient {
    fn generate_image(&self, prompt: &str) -> Result<String, ImageError> {
        let req = PredictRequest {
            instances: vec![ImageInstance {
                prompt: prompt.to_string(),
            }],
            parameters: ImageParameters {
                sample_count: 1,
                aspect_ratio: "16:9".into(),
                output_options: OutputOptions {
                    mime_type: "image/jpeg".into(),
                },
            },
        };

        tracing::debug!(model = %self.image_model, "requesting scene image");

        let resp = self
            .client
            .post(self.endpoint(&self.image_model, "predict"))
            .header("x-goog-api-key", &self.api_key)
            .json(&req)
            .send()
            .map_err(|e| ImageError::Request(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().unwrap_or_default();
            return Err(ImageError::Request(format!("{status}: {body}")));
        }

        let resp: PredictResponse = resp.json().map_err(|e| ImageError::Request(e.to_string()))?;

        let prediction = resp.predictions.into_iter().next().ok_or(ImageError::Empty)?;
        let bytes = prediction
            .bytes_base64_encoded
            .filter(|b| !b.is_empty())
            .ok_or(ImageError::Empty)?;
        let mime = prediction.mime_type.unwrap_or_else(|| "image/jpeg".into());

        Ok(format!("data:{mime};base64,{bytes}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_requires_all_story_fields() {
        let schema = story_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|v| v.as_str())
            .collect();
        assert_eq!(
            required,
            vec!["storyText", "choices", "inventory", "currentQuest", "tone"]
        );
        assert_eq!(schema["properties"]["tone"]["enum"].as_array().unwrap().len(), 5);
    }

    #[test]
    fn text_request_serializes_with_camel_case_config() {
        let req = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some("hola".into()),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".into(),
                response_schema: story_schema(),
                temperature: TEMPERATURE,
            },
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["contents"][0]["parts"][0]["text"], "hola");
        assert_eq!(
            value["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert!(value["generationConfig"]["responseSchema"].is_object());
    }

    #[test]
    fn client_targets_configured_models() {
        let config = AppConfig::from_lookup(|key: &str| match key {
            "API_KEY" => Some("k".to_string()),
            "GEMINI_BASE_URL" => Some("http://localhost:9000/".to_string()),
            _ => None,
        })
        .unwrap();
        let client = GeminiClient::new(&config).unwrap();
        assert_eq!(
            client.endpoint(&client.text_model, "generateContent"),
            format!("http://localhost:9000/models/{}:generateContent", config.text_model)
        );
    }

    #[test]
    fn image_request_asks_for_one_wide_jpeg() {
        let req = PredictRequest {
            instances: vec![ImageInstance {
                prompt: "p".into(),
            }],
            parameters: ImageParameters {
                sample_count: 1,
                aspect_ratio: "16:9".into(),
                output_options: OutputOptions {
                    mime_type: "image/jpeg".into(),
                },
            },
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["parameters"]["sampleCount"], 1);
        assert_eq!(value["parameters"]["aspectRatio"], "16:9");
        assert_eq!(value["parameters"]["outputOptions"]["mimeType"], "image/jpeg");
    }
}
