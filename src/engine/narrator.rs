use crate::engine::clock::Clock;
use crate::engine::llm_client::{ImageGenerator, TextGenerator};
use crate::engine::prompt_builder::PromptBuilder;
use crate::error::GenerationError;
use crate::model::game_state::GameState;
use crate::model::llm_decode::decode_story_payload;

/// Turns one player choice into the next snapshot.
///
/// Two sequential calls per turn: story text first, then the scene image
/// built from the new text. Only the text call can fail the turn.
pub struct Narrator {
    text: Box<dyn TextGenerator>,
    image: Box<dyn ImageGenerator>,
    clock: Box<dyn Clock>,
}

impl Narrator {
    pub fn new(
        text: Box<dyn TextGenerator>,
        image: Box<dyn ImageGenerator>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self { text, image, clock }
    }

    pub fn advance(
        &self,
        choice: &str,
        history: &[String],
        inventory: &[String],
        quest: &str,
    ) -> Result<GameState, GenerationError> {
        let opening = PromptBuilder::is_opening(choice);
        tracing::info!(opening, history_len = history.len(), "advancing story");

        let prompt = PromptBuilder::build(choice, history, inventory, quest);
        let raw = self.text.generate_json(&prompt)?;
        let payload = decode_story_payload(&raw)?;

        let image_url = self.scene_image(&payload.story_text);

        Ok(GameState {
            story_text: payload.story_text,
            choices: payload.choices,
            inventory: payload.inventory,
            current_quest: payload.current_quest,
            image_url,
            tone: payload.tone,
        })
    }

    fn scene_image(&self, story_text: &str) -> String {
        match self.image.generate_image(&PromptBuilder::image(story_text)) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(error = %e, "scene image failed, using placeholder");
                placeholder_image_url(self.clock.now().timestamp_millis())
            }
        }
    }
}

pub fn placeholder_image_url(seed: i64) -> String {
    format!("https://picsum.photos/seed/{seed}/1280/720")
}

#[cfg(test)]
pub(crate) mod fakes {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::error::ImageError;

    /// Replays queued responses and records every prompt it was given.
    #[derive(Clone, Default)]
    pub struct ScriptedText {
        pub replies: Arc<Mutex<VecDeque<Result<String, GenerationError>>>>,
        pub prompts: Arc<Mutex<Vec<String>>>,
    }

    impl ScriptedText {
        pub fn push(&self, reply: Result<String, GenerationError>) {
            self.replies.lock().unwrap().push_back(reply);
        }
    }

    impl TextGenerator for ScriptedText {
        fn generate_json(&self, prompt: &str) -> Result<String, GenerationError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(GenerationError::Request("no scripted reply".into())))
        }
    }

    #[derive(Clone)]
    pub struct StaticImage(pub Result<String, ImageError>);

    impl ImageGenerator for StaticImage {
        fn generate_image(&self, _prompt: &str) -> Result<String, ImageError> {
            self.0.clone()
        }
    }

    pub fn story_json(text: &str, inventory: &[&str], quest: &str, tone: &str) -> String {
        serde_json::json!({
            "storyText": text,
            "choices": ["Avanzar", "Esconderse", "Gritar"],
            "inventory": inventory,
            "currentQuest": quest,
            "tone": tone,
        })
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::fakes::*;
    use super::*;
    use crate::engine::clock::FixedClock;
    use crate::error::ImageError;
    use crate::model::game_state::START_GAME;
    use crate::model::tone::Tone;

    fn narrator(text: &ScriptedText, image: Result<String, ImageError>) -> Narrator {
        let clock = FixedClock(chrono::Utc.timestamp_millis_opt(1_700_000_000_000).unwrap());
        Narrator::new(
            Box::new(text.clone()),
            Box::new(StaticImage(image)),
            Box::new(clock),
        )
    }

    #[test]
    fn builds_snapshot_from_text_and_image() {
        let text = ScriptedText::default();
        text.push(Ok(story_json("Una cripta.", &[], "Escapar", "mysterious")));
        let n = narrator(&text, Ok("data:image/jpeg;base64,AAAA".into()));

        let state = n.advance(START_GAME, &[], &[], "").unwrap();
        assert_eq!(state.story_text, "Una cripta.");
        assert_eq!(state.choices.len(), 3);
        assert!(state.inventory.is_empty());
        assert_eq!(state.tone, Tone::Mysterious);
        assert_eq!(state.image_url, "data:image/jpeg;base64,AAAA");
        assert_eq!(text.prompts.lock().unwrap()[0], PromptBuilder::opening());
    }

    #[test]
    fn image_failure_falls_back_to_placeholder() {
        let text = ScriptedText::default();
        text.push(Ok(story_json("Lluvia.", &["antorcha"], "Seguir", "somber")));
        let n = narrator(&text, Err(ImageError::Empty));

        let state = n
            .advance("open the door", &["x".into()], &["torch".into()], "find the key")
            .unwrap();
        assert_eq!(
            state.image_url,
            "https://picsum.photos/seed/1700000000000/1280/720"
        );
    }

    #[test]
    fn text_failure_aborts_without_retry() {
        let text = ScriptedText::default();
        text.push(Err(GenerationError::Request("503".into())));
        text.push(Ok(story_json("never", &[], "q", "calm")));
        let n = narrator(&text, Ok("data:".into()));

        let err = n.advance("open the door", &[], &[], "q").unwrap_err();
        assert_eq!(err, GenerationError::Request("503".into()));
        assert_eq!(text.prompts.lock().unwrap().len(), 1);
    }

    #[test]
    fn bad_payload_surfaces_generation_error() {
        let text = ScriptedText::default();
        text.push(Ok("not json".into()));
        let n = narrator(&text, Ok("data:".into()));
        assert_eq!(
            n.advance(START_GAME, &[], &[], "").unwrap_err(),
            GenerationError::InvalidFormat
        );
    }

    #[test]
    fn continuation_prompt_carries_player_context() {
        let text = ScriptedText::default();
        text.push(Ok(story_json("Sigue.", &["torch"], "find the key", "action")));
        let n = narrator(&text, Ok("data:".into()));

        n.advance("open the door", &["Una sala.".into()], &["torch".into()], "find the key")
            .unwrap();
        let prompt = text.prompts.lock().unwrap()[0].clone();
        assert!(prompt.contains("open the door"));
        assert!(prompt.contains("[torch]"));
        assert!(prompt.contains("find the key"));
        assert!(prompt.contains("Una sala."));
    }
}
