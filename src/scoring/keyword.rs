//! Rule-based keyword scoring
//!
//! Six independently weighted sub-scores summed into a keyword composite.
//! The role and additional-notes sub-scores delegate to the language model
//! when one is configured; any failure there downgrades to the keyword
//! fallback for that sub-score and never aborts the overall scoring.

use crate::config::ScoringConfig;
use crate::llm::client::parse_score_reply;
use crate::llm::{prompts, LanguageModel};
use crate::profile::CandidateProfile;
use crate::scoring::vocabulary::SkillVocabulary;
use regex::Regex;
use std::collections::{BTreeMap, HashSet};
use unicode_segmentation::UnicodeSegmentation;

/// Sub-score names as they appear in `MatchResult::detailed_scores`.
pub const SKILL_MATCH: &str = "skill_match";
pub const ROLE_MATCH: &str = "role_match";
pub const EXPERIENCE_MATCH: &str = "experience_match";
pub const LANGUAGE_REQUIREMENT: &str = "language_requirement";
pub const EDUCATION_MATCH: &str = "education_match";
pub const ADDITIONAL_NOTES_MATCH: &str = "additional_notes_match";

pub struct KeywordScorer {
    weights: ScoringConfig,
    experience_patterns: Vec<Regex>,
}

impl KeywordScorer {
    pub fn new(weights: ScoringConfig) -> Self {
        let experience_patterns = vec![
            // 3+ years, 5 years
            Regex::new(r"(\d+)\+?\s*years?").expect("experience pattern is valid"),
            // 3년 이상 ("3+ years")
            Regex::new(r"(\d+)년\s*이상").expect("experience pattern is valid"),
            // 3년 경력 ("3 years experience")
            Regex::new(r"(\d+)년\s*경력").expect("experience pattern is valid"),
        ];
        Self {
            weights,
            experience_patterns,
        }
    }

    /// Compute the six weighted sub-scores. Each entry is already
    /// multiplied by its weight, so the values sum toward the keyword
    /// composite in [0, 1].
    pub fn score(
        &self,
        profile: &CandidateProfile,
        job_text: &str,
        vocabulary: &SkillVocabulary,
        llm: Option<&dyn LanguageModel>,
    ) -> BTreeMap<String, f64> {
        let job_lower = job_text.to_lowercase();
        let mut scores = BTreeMap::new();

        let skill_ratio = self.skill_match_ratio(profile, &job_lower, vocabulary);
        scores.insert(
            SKILL_MATCH.to_string(),
            skill_ratio * self.weights.skill_weight,
        );

        let role_ratio = self.role_match_ratio(profile, job_text, &job_lower, llm);
        scores.insert(ROLE_MATCH.to_string(), role_ratio * self.weights.role_weight);

        let experience_ratio = self.experience_match_ratio(profile, &job_lower);
        scores.insert(
            EXPERIENCE_MATCH.to_string(),
            experience_ratio * self.weights.experience_weight,
        );

        let language_ratio = self.language_requirement_ratio(profile, &job_lower);
        scores.insert(
            LANGUAGE_REQUIREMENT.to_string(),
            language_ratio * self.weights.language_weight,
        );

        let education_ratio = self.education_match_ratio(profile, &job_lower);
        scores.insert(
            EDUCATION_MATCH.to_string(),
            education_ratio * self.weights.education_weight,
        );

        let notes_ratio = self.notes_match_ratio(profile, job_text, &job_lower, llm);
        scores.insert(
            ADDITIONAL_NOTES_MATCH.to_string(),
            notes_ratio * self.weights.notes_weight,
        );

        log::debug!("keyword sub-scores: {:?}", scores);
        scores
    }

    /// Declared skills literally or variant-matched in the job text, in
    /// declaration order.
    pub fn matched_skills(
        &self,
        profile: &CandidateProfile,
        job_text: &str,
        vocabulary: &SkillVocabulary,
    ) -> Vec<String> {
        let job_lower = job_text.to_lowercase();
        profile
            .all_skills()
            .into_iter()
            .filter(|skill| vocabulary.matches_text(skill, &job_lower))
            .map(|skill| skill.to_string())
            .collect()
    }

    fn skill_match_ratio(
        &self,
        profile: &CandidateProfile,
        job_lower: &str,
        vocabulary: &SkillVocabulary,
    ) -> f64 {
        let all_skills = profile.all_skills();
        if all_skills.is_empty() {
            return 0.0;
        }

        let hits = all_skills
            .iter()
            .filter(|skill| vocabulary.matches_text(skill, job_lower))
            .count();

        hits as f64 / all_skills.len() as f64
    }

    fn role_match_ratio(
        &self,
        profile: &CandidateProfile,
        job_text: &str,
        job_lower: &str,
        llm: Option<&dyn LanguageModel>,
    ) -> f64 {
        if profile.target_roles.is_empty() {
            return 0.0;
        }

        if let Some(llm) = llm {
            let prompt = prompts::role_match_prompt(&profile.target_roles, job_text);
            match llm.complete(prompts::ROLE_MATCH_SYSTEM, &prompt, 50, 0.3) {
                Ok(reply) => {
                    if let Some(score) = parse_score_reply(&reply) {
                        log::debug!("AI role match score: {}", score);
                        return score;
                    }
                    log::warn!("AI returned unparseable role score: {:?}", reply);
                }
                Err(e) => log::warn!("AI role analysis failed, using keyword fallback: {}", e),
            }
        }

        self.literal_role_ratio(&profile.target_roles, job_lower)
    }

    fn literal_role_ratio(&self, target_roles: &[String], job_lower: &str) -> f64 {
        let hits = target_roles
            .iter()
            .filter(|role| job_lower.contains(&role.to_lowercase()))
            .count();
        hits as f64 / target_roles.len() as f64
    }

    fn experience_match_ratio(&self, profile: &CandidateProfile, job_lower: &str) -> f64 {
        let mut required_years = 0u32;
        for pattern in &self.experience_patterns {
            let years: Vec<u32> = pattern
                .captures_iter(job_lower)
                .filter_map(|cap| cap.get(1))
                .filter_map(|m| m.as_str().parse().ok())
                .collect();
            if let Some(max) = years.into_iter().max() {
                required_years = max;
                break;
            }
        }

        if required_years == 0 {
            // No stated requirement: neutral score
            return 0.5;
        }

        let total_experience = profile.total_experience_years();
        (total_experience / required_years as f64).min(1.0)
    }

    fn language_requirement_ratio(&self, profile: &CandidateProfile, job_lower: &str) -> f64 {
        // Binary: any language name or proficiency level mentioned counts
        for (language, level) in &profile.languages {
            if job_lower.contains(&language.to_lowercase())
                || job_lower.contains(&level.to_lowercase())
            {
                return 1.0;
            }
        }
        0.0
    }

    fn education_match_ratio(&self, profile: &CandidateProfile, job_lower: &str) -> f64 {
        let own_keywords = [
            profile.education_level.to_lowercase(),
            profile.major.to_lowercase(),
            profile.university.to_lowercase(),
        ];
        for keyword in &own_keywords {
            if !keyword.is_empty() && job_lower.contains(keyword.as_str()) {
                return 1.0;
            }
        }

        // Partial credit when the posting asks for a degree in general and
        // the candidate holds one
        let degree_keywords = [
            "bachelor", "master", "phd", "학사", "석사", "박사", "대학교", "대학원",
        ];
        let posting_wants_degree = degree_keywords.iter().any(|k| job_lower.contains(k));
        if posting_wants_degree {
            let own_level = profile.education_level.to_lowercase();
            let own_degrees = ["bachelor", "master", "phd", "학사", "석사", "박사"];
            if own_degrees.iter().any(|deg| own_level.contains(deg)) {
                return 0.7;
            }
        }

        0.0
    }

    fn notes_match_ratio(
        &self,
        profile: &CandidateProfile,
        job_text: &str,
        job_lower: &str,
        llm: Option<&dyn LanguageModel>,
    ) -> f64 {
        let notes = profile.additional_notes.trim();
        if notes.is_empty() {
            return 0.0;
        }

        if let Some(llm) = llm {
            let prompt = prompts::notes_relevance_prompt(notes, job_text);
            match llm.complete(prompts::NOTES_SYSTEM, &prompt, 50, 0.3) {
                Ok(reply) => {
                    if let Some(score) = parse_score_reply(&reply) {
                        log::debug!("AI additional notes score: {}", score);
                        return score;
                    }
                    log::warn!("AI returned unparseable notes score: {:?}", reply);
                }
                Err(e) => log::warn!("AI notes analysis failed, using keyword fallback: {}", e),
            }
        }

        self.notes_overlap_ratio(notes, job_lower)
    }

    fn notes_overlap_ratio(&self, notes: &str, job_lower: &str) -> f64 {
        let notes_lower = notes.to_lowercase();
        let note_words: HashSet<&str> = notes_lower.unicode_words().collect();
        let job_words: HashSet<&str> = job_lower.unicode_words().collect();

        if note_words.is_empty() || job_words.is_empty() {
            return 0.0;
        }

        let common = note_words.intersection(&job_words).count();
        let ratio = common as f64 / note_words.len() as f64;
        (ratio * 2.0).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::{JobFitError, Result};

    fn scorer() -> KeywordScorer {
        KeywordScorer::new(Config::default().scoring)
    }

    fn profile_with_skills(skills: &[&str]) -> CandidateProfile {
        let mut profile = CandidateProfile::default_profile();
        profile.name = "Test".to_string();
        profile.skills = skills.iter().map(|s| s.to_string()).collect();
        profile
    }

    struct FixedReply(String);
    impl LanguageModel for FixedReply {
        fn complete(&self, _: &str, _: &str, _: u32, _: f32) -> Result<String> {
            Ok(self.0.clone())
        }
    }

    struct AlwaysFails;
    impl LanguageModel for AlwaysFails {
        fn complete(&self, _: &str, _: &str, _: u32, _: f32) -> Result<String> {
            Err(JobFitError::LanguageModel("simulated timeout".to_string()))
        }
    }

    #[test]
    fn test_reference_scenario() {
        // Candidate with Python+SQL, 2 years, against a 3+ years posting
        let scorer = scorer();
        let vocab = SkillVocabulary::new();
        let mut profile = profile_with_skills(&["Python", "SQL"]);
        profile
            .experience_by_industry
            .insert("General".to_string(), 2.0);
        profile.languages.clear();

        let job = "Looking for a Python developer with SQL and AWS experience, 3+ years required";
        let scores = scorer.score(&profile, job, &vocab, None);

        let skill = scores[SKILL_MATCH];
        assert!((skill - 0.25).abs() < 1e-9, "skill weighted = {}", skill);

        let experience = scores[EXPERIENCE_MATCH];
        let expected = (2.0 / 3.0) * 0.15;
        assert!((experience - expected).abs() < 1e-9);
    }

    #[test]
    fn test_sub_score_ratios_in_range() {
        let scorer = scorer();
        let vocab = SkillVocabulary::new();
        let mut profile = profile_with_skills(&["Python", "Rust", "Tableau"]);
        profile.target_roles = vec!["Engineer".to_string()];
        profile.education_level = "Master".to_string();
        profile.additional_notes = "I like distributed systems".to_string();

        let job = "Engineer needed. Master degree, 5+ years, Python and distributed systems.";
        let scores = scorer.score(&profile, job, &vocab, None);

        assert_eq!(scores.len(), 6);
        let weights = Config::default().scoring;
        let bounds = [
            (SKILL_MATCH, weights.skill_weight),
            (ROLE_MATCH, weights.role_weight),
            (EXPERIENCE_MATCH, weights.experience_weight),
            (LANGUAGE_REQUIREMENT, weights.language_weight),
            (EDUCATION_MATCH, weights.education_weight),
            (ADDITIONAL_NOTES_MATCH, weights.notes_weight),
        ];
        for (name, weight) in bounds {
            let value = scores[name];
            assert!(value >= 0.0 && value <= weight + 1e-12, "{} = {}", name, value);
        }
    }

    #[test]
    fn test_skill_variant_matching() {
        let scorer = scorer();
        let vocab = SkillVocabulary::new();
        let profile = profile_with_skills(&["Kubernetes"]);

        let job = "Operate our k8s clusters";
        let scores = scorer.score(&profile, job, &vocab, None);
        assert!((scores[SKILL_MATCH] - 0.25).abs() < 1e-9);
    }

    #[test]
    fn test_no_declared_skills_is_zero() {
        let scorer = scorer();
        let vocab = SkillVocabulary::new();
        let mut profile = profile_with_skills(&[]);
        profile.programming_languages.clear();

        let scores = scorer.score(&profile, "Python needed", &vocab, None);
        assert_eq!(scores[SKILL_MATCH], 0.0);
    }

    #[test]
    fn test_experience_no_pattern_is_neutral() {
        let scorer = scorer();
        let vocab = SkillVocabulary::new();
        let profile = profile_with_skills(&["Python"]);

        let scores = scorer.score(&profile, "Python developer wanted", &vocab, None);
        let expected = 0.5 * 0.15;
        assert!((scores[EXPERIENCE_MATCH] - expected).abs() < 1e-9);
    }

    #[test]
    fn test_experience_korean_pattern() {
        let scorer = scorer();
        let mut profile = profile_with_skills(&["Python"]);
        profile
            .experience_by_industry
            .insert("AI".to_string(), 5.0);

        let ratio = scorer.experience_match_ratio(&profile, "경력 3년 이상 우대");
        assert!((ratio - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_experience_takes_max_required() {
        let scorer = scorer();
        let mut profile = profile_with_skills(&[]);
        profile
            .experience_by_industry
            .insert("General".to_string(), 4.0);

        // Two figures in the posting: the larger one governs
        let ratio = scorer.experience_match_ratio(&profile, "2 years in sql, 8+ years overall");
        assert!((ratio - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_language_requirement_binary() {
        let scorer = scorer();
        let mut profile = profile_with_skills(&[]);
        profile.languages.clear();
        profile
            .languages
            .insert("Korean".to_string(), "Native".to_string());

        assert_eq!(
            scorer.language_requirement_ratio(&profile, "korean speaking team"),
            1.0
        );
        // Proficiency level counts too
        assert_eq!(
            scorer.language_requirement_ratio(&profile, "native fluency preferred"),
            1.0
        );
        assert_eq!(
            scorer.language_requirement_ratio(&profile, "german only"),
            0.0
        );
    }

    #[test]
    fn test_education_ladder() {
        let scorer = scorer();
        let mut profile = profile_with_skills(&[]);
        profile.education_level = "Master".to_string();
        profile.major = "Statistics".to_string();

        // Direct mention of the candidate's own credential
        assert_eq!(
            scorer.education_match_ratio(&profile, "statistics background required"),
            1.0
        );
        // Generic degree ask matched by a degree holder
        assert_eq!(
            scorer.education_match_ratio(&profile, "bachelor degree or above"),
            0.7
        );
        // No education signal at all
        assert_eq!(scorer.education_match_ratio(&profile, "no requirements"), 0.0);

        profile.education_level.clear();
        profile.major.clear();
        assert_eq!(
            scorer.education_match_ratio(&profile, "bachelor degree or above"),
            0.0
        );
    }

    #[test]
    fn test_empty_notes_is_exactly_zero() {
        let scorer = scorer();
        let vocab = SkillVocabulary::new();
        let mut profile = profile_with_skills(&["Python"]);
        profile.additional_notes = "   ".to_string();

        // Zero regardless of AI configuration
        let ai = FixedReply("0.9".to_string());
        let scores = scorer.score(&profile, "Python", &vocab, Some(&ai));
        assert_eq!(scores[ADDITIONAL_NOTES_MATCH], 0.0);

        let scores = scorer.score(&profile, "Python", &vocab, None);
        assert_eq!(scores[ADDITIONAL_NOTES_MATCH], 0.0);
    }

    #[test]
    fn test_ai_role_score_parsed_and_weighted() {
        let scorer = scorer();
        let vocab = SkillVocabulary::new();
        let mut profile = profile_with_skills(&[]);
        profile.target_roles = vec!["NLP Engineer".to_string()];

        let ai = FixedReply("0.8".to_string());
        let scores = scorer.score(&profile, "AI Research Scientist wanted", &vocab, Some(&ai));
        assert!((scores[ROLE_MATCH] - 0.8 * 0.30).abs() < 1e-9);
    }

    #[test]
    fn test_ai_failure_matches_fallback() {
        let scorer = scorer();
        let vocab = SkillVocabulary::new();
        let mut profile = profile_with_skills(&["Python"]);
        profile.target_roles = vec!["Data Scientist".to_string()];
        profile.additional_notes = "machine learning and data pipelines".to_string();

        let job = "Data Scientist role: machine learning pipelines in Python";
        let failing = AlwaysFails;
        let with_failing_ai = scorer.score(&profile, job, &vocab, Some(&failing));
        let without_ai = scorer.score(&profile, job, &vocab, None);

        assert_eq!(with_failing_ai, without_ai);
    }

    #[test]
    fn test_unparseable_ai_reply_falls_back() {
        let scorer = scorer();
        let vocab = SkillVocabulary::new();
        let mut profile = profile_with_skills(&[]);
        profile.target_roles = vec!["Data Scientist".to_string()];

        let job = "Data Scientist role";
        let garbage = FixedReply("cannot assess".to_string());
        let with_garbage = scorer.score(&profile, job, &vocab, Some(&garbage));
        let without_ai = scorer.score(&profile, job, &vocab, None);
        assert_eq!(with_garbage[ROLE_MATCH], without_ai[ROLE_MATCH]);
    }

    #[test]
    fn test_notes_overlap_doubled_and_capped() {
        let scorer = scorer();
        // All three note words present: 3/3 * 2 capped at 1.0
        let ratio = scorer.notes_overlap_ratio("python data pipelines", "python data pipelines at scale");
        assert!((ratio - 1.0).abs() < 1e-9);

        // One of four note words present: 1/4 * 2 = 0.5
        let ratio = scorer.notes_overlap_ratio("alpha beta gamma delta", "alpha omega");
        assert!((ratio - 0.5).abs() < 1e-9);
    }
}
