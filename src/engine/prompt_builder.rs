use crate::model::game_state::START_GAME;

/// Prepended to every image prompt so scenes share one visual style.
pub const ART_STYLE_PROMPT: &str = "Al estilo de un cómic de fantasía oscura y cruda, con tintas pesadas, sombras dinámicas y una paleta de colores apagados. ";

const HISTORY_SEPARATOR: &str = " -> ";

/// Builds the prompts sent to the generation backend.
/// Only formats text. No parsing, no networking.
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn is_opening(choice: &str) -> bool {
        choice == START_GAME
    }

    pub fn build(choice: &str, history: &[String], inventory: &[String], quest: &str) -> String {
        if Self::is_opening(choice) {
            Self::opening()
        } else {
            Self::continuation(choice, history, inventory, quest)
        }
    }

    pub fn opening() -> String {
        "Inicia una historia de elige tu propia aventura. Proporciona la escena inicial, \
         3 opciones, un inventario vacío, la primera misión y el tono inicial de la escena \
         ('mysterious'). El tema es fantasía oscura."
            .to_string()
    }

    pub fn continuation(
        choice: &str,
        history: &[String],
        inventory: &[String],
        quest: &str,
    ) -> String {
        let mut prompt = String::new();

        prompt.push_str("Eres un maestro narrador para un juego infinito de elige tu propia aventura.\n");
        prompt.push_str(&format!(
            "La historia hasta ahora es: \"{}\".\n",
            history.join(HISTORY_SEPARATOR)
        ));
        prompt.push_str(&format!(
            "El inventario actual del jugador es: [{}].\n",
            inventory.join(", ")
        ));
        prompt.push_str(&format!("La misión actual es: \"{quest}\".\n"));
        prompt.push_str(&format!("El jugador acaba de elegir: \"{choice}\".\n\n"));

        prompt.push_str("Continúa la historia. La elección del usuario debe alterar genuinamente la trama.\n");
        prompt.push_str("Actualiza el inventario y la misión si es necesario basándose en los nuevos eventos de la historia.\n");
        prompt.push_str("Determina el tono emocional de la escena (elige uno de: 'mysterious', 'action', 'suspenseful', 'somber', 'calm').\n");
        prompt.push_str("Proporciona la siguiente parte de la historia, 3 nuevas opciones, la lista de inventario actualizada, la descripción de la misión actualizada y el tono de la escena.\n");
        prompt.push_str("Mantén un tono de fantasía oscura consistente.\n");
        prompt.push_str("Asegúrate de que la historia sea atractiva y avance.\n");

        prompt
    }

    pub fn image(story_text: &str) -> String {
        format!("{ART_STYLE_PROMPT}{story_text}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_sentinel_selects_opening_prompt() {
        let prompt = PromptBuilder::build(START_GAME, &["ignored".into()], &[], "");
        assert_eq!(prompt, PromptBuilder::opening());
        assert!(prompt.contains("inventario vacío"));
        assert!(prompt.contains("'mysterious'"));
        assert!(!prompt.contains("ignored"));
    }

    #[test]
    fn continuation_embeds_turn_context() {
        let history = vec!["Despiertas en una cripta.".to_string(), "Ves una puerta.".to_string()];
        let inventory = vec!["antorcha".to_string(), "cuerda".to_string()];
        let prompt = PromptBuilder::build("open the door", &history, &inventory, "find the key");

        assert!(prompt.contains("\"Despiertas en una cripta. -> Ves una puerta.\""));
        assert!(prompt.contains("[antorcha, cuerda]"));
        assert!(prompt.contains("\"find the key\""));
        assert!(prompt.contains("\"open the door\""));
    }

    #[test]
    fn image_prompt_has_style_prefix() {
        let prompt = PromptBuilder::image("Un dragón duerme.");
        assert!(prompt.starts_with(ART_STYLE_PROMPT));
        assert!(prompt.ends_with("Un dragón duerme."));
    }
}
