//! Score fusion and gap analysis
//!
//! Combines the keyword composite (70%) with the semantic similarity (30%)
//! into one overall percentage, and derives the matched/missing skill
//! lists. The engine is built once from configuration and holds only
//! read-only state, so concurrent scoring calls need no locking.

use crate::config::Config;
use crate::llm::{prompts, LanguageModel};
use crate::profile::CandidateProfile;
use crate::scoring::keyword::KeywordScorer;
use crate::scoring::semantic::SemanticScorer;
use crate::scoring::vocabulary::SkillVocabulary;
use aho_corasick::AhoCorasick;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// At most this many missing skills are reported.
pub const MISSING_SKILLS_CAP: usize = 5;

/// Common technologies scanned when no language model is available to
/// infer missing skills, in reporting order.
pub const REFERENCE_SKILLS: &[&str] = &[
    "Python",
    "Java",
    "JavaScript",
    "SQL",
    "TensorFlow",
    "PyTorch",
    "AWS",
    "Docker",
    "Kubernetes",
    "React",
    "Vue.js",
    "Node.js",
    "MongoDB",
    "PostgreSQL",
    "MySQL",
    "RAG",
    "MCP",
    "Power BI",
    "Excel",
];

/// Checklist of technology keywords surfaced in the feedback digest when
/// they appear in a job posting.
pub const TECHNOLOGY_CHECKLIST: &[&str] = &[
    "python",
    "java",
    "javascript",
    "sql",
    "tensorflow",
    "pytorch",
    "aws",
    "docker",
    "kubernetes",
    "react",
    "vue",
    "node.js",
    "mongodb",
    "postgresql",
    "mysql",
    "rag",
    "mcp",
    "power bi",
    "excel",
    "tableau",
    "machine learning",
    "deep learning",
    "ai",
    "nlp",
    "data science",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Fused score, 0-100, one decimal
    pub overall_score: f64,
    /// Keyword composite, 0-100, one decimal
    pub keyword_score: f64,
    /// Semantic similarity, 0-100, one decimal
    pub embedding_similarity: f64,
    /// The six weighted keyword sub-scores (each already multiplied by its
    /// weight, so they sum toward keyword_score / 100)
    pub detailed_scores: BTreeMap<String, f64>,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
}

pub struct MatchEngine {
    vocabulary: SkillVocabulary,
    keyword_scorer: KeywordScorer,
    semantic_scorer: SemanticScorer,
    llm: Option<Box<dyn LanguageModel>>,
    keyword_weight: f64,
    embedding_weight: f64,
    technology_matcher: AhoCorasick,
}

impl MatchEngine {
    pub fn new(config: &Config, llm: Option<Box<dyn LanguageModel>>) -> Self {
        Self::with_semantic_scorer(config, llm, SemanticScorer::new(&config.embedding))
    }

    /// Engine on the deterministic fallback paths only. Used by tests and
    /// by hosts that configure neither an API key nor an embedding model.
    pub fn deterministic(config: &Config) -> Self {
        Self::with_semantic_scorer(config, None, SemanticScorer::without_model())
    }

    fn with_semantic_scorer(
        config: &Config,
        llm: Option<Box<dyn LanguageModel>>,
        semantic_scorer: SemanticScorer,
    ) -> Self {
        let technology_matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(TECHNOLOGY_CHECKLIST)
            .expect("technology checklist patterns are valid");

        Self {
            vocabulary: SkillVocabulary::new(),
            keyword_scorer: KeywordScorer::new(config.scoring.clone()),
            semantic_scorer,
            llm,
            keyword_weight: config.scoring.keyword_weight,
            embedding_weight: config.scoring.embedding_weight,
            technology_matcher,
        }
    }

    pub fn has_llm(&self) -> bool {
        self.llm.is_some()
    }

    /// The configured language model, shared with the feedback synthesizer.
    pub fn language_model(&self) -> Option<&dyn LanguageModel> {
        self.llm.as_deref()
    }

    pub fn has_embedding_model(&self) -> bool {
        self.semantic_scorer.has_model()
    }

    /// Score one profile against one job posting.
    pub fn score(&self, profile: &CandidateProfile, job_text: &str) -> MatchResult {
        let llm = self.llm.as_deref();

        let detailed_scores = self
            .keyword_scorer
            .score(profile, job_text, &self.vocabulary, llm);
        let keyword_total: f64 = detailed_scores.values().sum();

        let embedding_similarity = self.semantic_scorer.similarity(profile, job_text);

        let final_score =
            keyword_total * self.keyword_weight + embedding_similarity * self.embedding_weight;

        log::debug!(
            "keyword total {:.4}, embedding similarity {:.4}, final {:.4}",
            keyword_total,
            embedding_similarity,
            final_score
        );

        MatchResult {
            overall_score: to_percent(final_score),
            keyword_score: to_percent(keyword_total),
            embedding_similarity: to_percent(embedding_similarity),
            detailed_scores,
            matched_skills: self
                .keyword_scorer
                .matched_skills(profile, job_text, &self.vocabulary),
            missing_skills: self.missing_skills(profile, job_text),
        }
    }

    /// Technology checklist entries appearing in the job text, in checklist
    /// order. Feeds the feedback digest.
    pub fn technologies_in_posting(&self, job_text: &str) -> Vec<String> {
        let job_lower = job_text.to_lowercase();
        let mut found: Vec<usize> = self
            .technology_matcher
            .find_iter(&job_lower)
            .map(|m| m.pattern().as_usize())
            .collect();
        found.sort();
        found.dedup();
        found
            .into_iter()
            .map(|i| TECHNOLOGY_CHECKLIST[i].to_string())
            .collect()
    }

    /// Skills the posting asks for that the candidate does not hold under
    /// any variant spelling. Capped at `MISSING_SKILLS_CAP`.
    fn missing_skills(&self, profile: &CandidateProfile, job_text: &str) -> Vec<String> {
        if let Some(llm) = self.llm.as_deref() {
            match self.ai_missing_skills(profile, job_text, llm) {
                Ok(skills) => return skills,
                Err(e) => {
                    log::warn!("AI missing-skill analysis failed, using reference scan: {}", e)
                }
            }
        }
        self.reference_missing_skills(profile, job_text)
    }

    fn ai_missing_skills(
        &self,
        profile: &CandidateProfile,
        job_text: &str,
        llm: &dyn LanguageModel,
    ) -> crate::error::Result<Vec<String>> {
        let owned = profile.all_skills();
        let prompt = prompts::missing_skills_prompt(&owned, job_text);
        let reply = llm.complete(prompts::MISSING_SKILLS_SYSTEM, &prompt, 200, 0.3)?;

        let reply_trimmed = reply.trim();
        if reply_trimmed.is_empty()
            || reply_trimmed.eq_ignore_ascii_case("none")
            || reply_trimmed == "없음"
            || reply_trimmed.eq_ignore_ascii_case("no missing skills")
        {
            return Ok(Vec::new());
        }

        // The model is told not to list owned skills, but enforce the
        // variant-equivalence rule locally as well
        let missing: Vec<String> = reply_trimmed
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .filter(|candidate| {
                !owned
                    .iter()
                    .any(|skill| self.vocabulary.equivalent(skill, candidate))
            })
            .map(|s| s.to_string())
            .take(MISSING_SKILLS_CAP)
            .collect();

        Ok(missing)
    }

    fn reference_missing_skills(&self, profile: &CandidateProfile, job_text: &str) -> Vec<String> {
        let job_lower = job_text.to_lowercase();
        let owned = profile.all_skills();

        REFERENCE_SKILLS
            .iter()
            .filter(|reference| self.vocabulary.matches_text(reference, &job_lower))
            .filter(|reference| {
                !owned
                    .iter()
                    .any(|skill| self.vocabulary.equivalent(skill, reference))
            })
            .map(|s| s.to_string())
            .take(MISSING_SKILLS_CAP)
            .collect()
    }
}

/// Scale a [0, 1] score to a percentage rounded to one decimal.
fn to_percent(value: f64) -> f64 {
    (value * 1000.0).round() / 10.0
}
