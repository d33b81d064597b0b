//! Holistic profile-to-posting similarity
//!
//! Primary path embeds the profile's descriptive text and the job text
//! with a Model2Vec static model and takes the cosine similarity. When no
//! model is available the scorer falls back to token-set Jaccard overlap,
//! scaled and capped. Both paths are deterministic given their inputs.

use crate::config::EmbeddingConfig;
use crate::profile::CandidateProfile;
use model2vec_rs::model::StaticModel;
use std::collections::HashSet;
use unicode_segmentation::UnicodeSegmentation;

pub struct SemanticScorer {
    model: Option<StaticModel>,
}

impl SemanticScorer {
    /// Attempt to load the configured embedding model once. Load failure is
    /// not an error: the scorer records the absence and uses the fallback.
    pub fn new(config: &EmbeddingConfig) -> Self {
        let model = match &config.model_dir {
            Some(dir) => match StaticModel::from_pretrained(dir, None, None, None) {
                Ok(model) => {
                    log::info!("loaded embedding model from {}", dir.display());
                    Some(model)
                }
                Err(e) => {
                    log::warn!(
                        "embedding model unavailable ({}), using token-overlap fallback",
                        e
                    );
                    None
                }
            },
            None => {
                log::debug!("no embedding model configured, using token-overlap fallback");
                None
            }
        };

        Self { model }
    }

    /// Scorer with no embedding model, always on the fallback path.
    pub fn without_model() -> Self {
        Self { model: None }
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    /// Similarity between the whole profile and the job text, in [0, 1].
    pub fn similarity(&self, profile: &CandidateProfile, job_text: &str) -> f64 {
        let profile_text = profile.to_descriptive_text();

        if let Some(model) = &self.model {
            let profile_embedding = model.encode_single(&profile_text);
            let job_embedding = model.encode_single(job_text);
            let score = cosine_similarity(&profile_embedding, &job_embedding);
            return score.clamp(0.0, 1.0);
        }

        self.token_overlap_similarity(&profile_text, job_text)
    }

    /// Jaccard similarity over lowercased word sets, scaled by 3 and capped
    /// at 1.0 to land in a range comparable to embedding cosine scores.
    fn token_overlap_similarity(&self, text_a: &str, text_b: &str) -> f64 {
        let a_lower = text_a.to_lowercase();
        let b_lower = text_b.to_lowercase();

        let words_a: HashSet<&str> = a_lower.unicode_words().collect();
        let words_b: HashSet<&str> = b_lower.unicode_words().collect();

        if words_a.is_empty() || words_b.is_empty() {
            return 0.0;
        }

        let intersection = words_a.intersection(&words_b).count();
        let union = words_a.union(&words_b).count();
        let jaccard = intersection as f64 / union as f64;

        (jaccard * 3.0).min(1.0)
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        (dot / (norm_a * norm_b)) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_identical_vectors() {
        let v = vec![0.5, 0.3, 0.2];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_orthogonal_vectors() {
        let a = vec![1.0, 0.0];
        let b = vec![0.0, 1.0];
        assert!(cosine_similarity(&a, &b).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_mismatched_dimensions() {
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
    }

    #[test]
    fn test_fallback_similarity_range() {
        let scorer = SemanticScorer::without_model();
        let mut profile = CandidateProfile::default_profile();
        profile.target_roles = vec!["Data Engineer".to_string()];
        profile.skills = vec!["Python".to_string(), "Spark".to_string()];

        let similarity = scorer.similarity(&profile, "Data Engineer with Python and Spark");
        assert!(similarity > 0.0);
        assert!(similarity <= 1.0);
    }

    #[test]
    fn test_fallback_no_overlap_is_zero() {
        let scorer = SemanticScorer::without_model();
        let similarity = scorer.token_overlap_similarity("alpha beta", "gamma delta");
        assert_eq!(similarity, 0.0);
    }

    #[test]
    fn test_fallback_empty_text_is_zero() {
        let scorer = SemanticScorer::without_model();
        assert_eq!(scorer.token_overlap_similarity("", "anything"), 0.0);
    }

    #[test]
    fn test_fallback_scaled_and_capped() {
        let scorer = SemanticScorer::without_model();
        // Identical token sets: jaccard 1.0, tripled then capped at 1.0
        let similarity = scorer.token_overlap_similarity("python sql", "sql python");
        assert!((similarity - 1.0).abs() < 1e-9);

        // 1 shared of 3 distinct: jaccard 1/3, tripled to 1.0 exactly
        let similarity = scorer.token_overlap_similarity("python sql", "python aws");
        assert!((similarity - 1.0).abs() < 1e-9);

        // 1 shared of 5 distinct: 0.2 * 3 = 0.6
        let similarity = scorer.token_overlap_similarity("python sql spark", "python aws gcp");
        assert!((similarity - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_fallback_is_deterministic() {
        let scorer = SemanticScorer::without_model();
        let mut profile = CandidateProfile::default_profile();
        profile.skills = vec!["Python".to_string()];
        profile
            .experience_by_industry
            .insert("AI".to_string(), 2.0);
        profile
            .experience_by_industry
            .insert("Finance".to_string(), 3.0);

        let job = "Python developer for a finance AI team";
        let first = scorer.similarity(&profile, job);
        let second = scorer.similarity(&profile, job);
        assert_eq!(first, second);
    }
}
