//! Configuration management for jobfit
//!
//! The configuration is loaded once at startup and passed by reference into
//! the scoring pipeline; it is never mutated after construction.

use crate::error::{JobFitError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub scoring: ScoringConfig,
    pub llm: LlmConfig,
    pub embedding: EmbeddingConfig,
    pub storage: StorageConfig,
}

/// Weights for the two fused component scores and the six keyword
/// sub-scores. The keyword sub-weights sum to 1.0, as do the fusion weights.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub keyword_weight: f64,
    pub embedding_weight: f64,
    pub skill_weight: f64,
    pub role_weight: f64,
    pub experience_weight: f64,
    pub language_weight: f64,
    pub education_weight: f64,
    pub notes_weight: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Chat-completions endpoint base URL (OpenAI-compatible)
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
    pub max_tokens: u32,
    pub temperature: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Local directory holding a Model2Vec static embedding model.
    /// When absent or unloadable the scorer falls back to token overlap.
    pub model_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub profiles_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let profiles_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("jobfit")
            .join("profiles");

        Self {
            scoring: ScoringConfig {
                keyword_weight: 0.7,
                embedding_weight: 0.3,
                skill_weight: 0.25,
                role_weight: 0.30,
                experience_weight: 0.15,
                language_weight: 0.10,
                education_weight: 0.10,
                notes_weight: 0.10,
            },
            llm: LlmConfig {
                base_url: "https://api.openai.com/v1".to_string(),
                model: "gpt-4o-mini".to_string(),
                timeout_secs: 30,
                max_tokens: 1000,
                temperature: 0.3,
            },
            embedding: EmbeddingConfig { model_dir: None },
            storage: StorageConfig { profiles_dir },
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = toml::from_str(&content)
                .map_err(|e| JobFitError::Configuration(format!("Failed to parse config: {}", e)))?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path();

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| JobFitError::Configuration(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(&config_path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("jobfit")
            .join("config.toml")
    }

    pub fn profiles_dir(&self) -> &PathBuf {
        &self.storage.profiles_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_fusion_weights_sum_to_one() {
        let config = Config::default();
        let sum = config.scoring.keyword_weight + config.scoring.embedding_weight;
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_default_keyword_weights_sum_to_one() {
        let s = Config::default().scoring;
        let sum = s.skill_weight
            + s.role_weight
            + s.experience_weight
            + s.language_weight
            + s.education_weight
            + s.notes_weight;
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_config_roundtrip_toml() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed.llm.model, config.llm.model);
        assert_eq!(parsed.scoring.role_weight, config.scoring.role_weight);
    }
}
