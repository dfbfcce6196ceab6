pub mod clock;
pub mod engine;
pub mod protocol;

pub mod llm_client;
pub mod narrator;
pub mod orchestrator;
pub mod persistence;
pub mod prompt_builder;
