//! OpenAI-compatible chat completion client
//!
//! The scoring and feedback components talk to the language model through
//! the `LanguageModel` trait so that tests can inject fixed responses.
//! Every call carries an explicit timeout; callers treat failures as a
//! signal to fall back, never as a fatal error.

use crate::config::LlmConfig;
use crate::error::{JobFitError, Result};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

pub trait LanguageModel: Send + Sync {
    /// Run one chat completion and return the assistant text.
    fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String>;
}

pub struct OpenAiClient {
    http: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: String,
}

impl OpenAiClient {
    pub fn new(api_key: String, config: &LlmConfig) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            model: config.model.clone(),
        })
    }
}

impl LanguageModel for OpenAiClient {
    fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String> {
        let body = json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": system_prompt },
                { "role": "user", "content": user_prompt },
            ],
            "max_tokens": max_tokens,
            "temperature": temperature,
        });

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(JobFitError::LanguageModel(format!(
                "chat completion failed with status {}",
                status
            )));
        }

        let parsed: ChatResponse = response.json()?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| JobFitError::LanguageModel("empty completion response".to_string()))?;

        Ok(content.trim().to_string())
    }
}

/// Parse the first 0-1 score token from a model reply, clamped to [0, 1].
/// Returns `None` when the reply contains no recognizable number.
pub fn parse_score_reply(reply: &str) -> Option<f64> {
    // Matches 0.8, .8, 0, 1 -- the formats models actually produce for
    // "return only a number between 0 and 1"
    let pattern = regex::Regex::new(r"0?\.\d+|0|1").expect("score pattern is valid");
    let token = pattern.find(reply)?;
    let value: f64 = token.as_str().parse().ok()?;
    Some(value.clamp(0.0, 1.0))
}
