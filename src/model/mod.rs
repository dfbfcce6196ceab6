pub mod game_save;
pub mod game_state;
pub mod llm_decode;
pub mod tone;
