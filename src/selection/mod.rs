pub mod cue_client;
pub mod engine;
