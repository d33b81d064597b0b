//! Language model collaborator

pub mod client;
pub mod prompts;

pub use client::{LanguageModel, OpenAiClient};
