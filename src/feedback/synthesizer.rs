//! Structured feedback from a match result
//!
//! The AI path sends one prompt carrying the full profile, the truncated
//! job text and a pre-computed keyword-analysis digest, then parses the
//! reply into six labeled sections. Any failure along that path degrades
//! to the deterministic template, so `synthesize` always returns a
//! complete result.

use crate::llm::{prompts, LanguageModel};
use crate::profile::CandidateProfile;
use crate::scoring::MatchResult;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedbackResult {
    pub overall_assessment: String,
    pub strengths: String,
    pub improvements: String,
    pub recommendations: String,
    pub action_plan: String,
    pub matching_evidence: String,
    /// The unparsed model reply, or the assembled template text
    pub raw_feedback: String,
}

/// Section labels recognized when parsing a model reply. Matching is a
/// case-insensitive substring test, so both the English labels the prompt
/// requests and their Korean equivalents are accepted.
const SECTION_MARKERS: &[(&[&str], Section)] = &[
    (&["overall assessment", "전체 평가"], Section::OverallAssessment),
    (&["strengths", "강점"], Section::Strengths),
    (&["improvements", "개선점"], Section::Improvements),
    (&["recommendations", "추천사항"], Section::Recommendations),
    (
        &["action plan", "액션 플랜", "실행 계획"],
        Section::ActionPlan,
    ),
    (&["matching evidence", "매칭 근거"], Section::MatchingEvidence),
];

#[derive(Debug, Clone, Copy, PartialEq)]
enum Section {
    OverallAssessment,
    Strengths,
    Improvements,
    Recommendations,
    ActionPlan,
    MatchingEvidence,
}

pub struct FeedbackSynthesizer<'a> {
    llm: Option<&'a dyn LanguageModel>,
}

impl<'a> FeedbackSynthesizer<'a> {
    pub fn new(llm: Option<&'a dyn LanguageModel>) -> Self {
        Self { llm }
    }

    /// Produce structured feedback for one scored posting.
    /// `technologies_in_posting` is the checklist scan from the engine and
    /// only feeds the digest shown to the model.
    pub fn synthesize(
        &self,
        profile: &CandidateProfile,
        job_text: &str,
        job_title: &str,
        result: &MatchResult,
        technologies_in_posting: &[String],
    ) -> FeedbackResult {
        if let Some(llm) = self.llm {
            let digest = keyword_analysis_digest(result, technologies_in_posting);
            let prompt = prompts::feedback_prompt(profile, job_text, job_title, &digest);
            match llm.complete(prompts::FEEDBACK_SYSTEM, &prompt, 1000, 0.3) {
                Ok(reply) => return parse_feedback_reply(&reply),
                Err(e) => {
                    log::warn!("feedback generation failed, using template: {}", e);
                }
            }
        }

        template_feedback(result)
    }
}

/// Pre-computed analysis summary embedded in the feedback prompt so the
/// model grounds its claims in the actual scoring outcome.
pub fn keyword_analysis_digest(result: &MatchResult, technologies: &[String]) -> String {
    let sub_percent = |name: &str| result.detailed_scores.get(name).copied().unwrap_or(0.0) * 100.0;

    let list_or = |items: &[String], fallback: &str| {
        if items.is_empty() {
            fallback.to_string()
        } else {
            items.join(", ")
        }
    };

    format!(
        "Skill match: {skill:.1}%\n\
         - Matched skills: {matched}\n\
         - Additional skills needed: {missing}\n\
         Role match: {role:.1}%\n\
         Experience match: {experience:.1}%\n\
         Technologies mentioned in the posting: {techs}\n\
         Overall fit: {overall:.1}%",
        skill = sub_percent(crate::scoring::keyword::SKILL_MATCH),
        matched = list_or(&result.matched_skills, "none"),
        missing = list_or(&result.missing_skills, "none"),
        role = sub_percent(crate::scoring::keyword::ROLE_MATCH),
        experience = sub_percent(crate::scoring::keyword::EXPERIENCE_MATCH),
        techs = list_or(technologies, "none in particular"),
        overall = result.overall_score,
    )
}

/// Split the reply on the bold markers the prompt requests and assign each
/// text run to the section whose marker most recently preceded it. A reply
/// with no recognizable markers lands whole in the overall assessment.
fn parse_feedback_reply(reply: &str) -> FeedbackResult {
    let mut feedback = FeedbackResult {
        raw_feedback: reply.to_string(),
        ..FeedbackResult::default()
    };

    let mut current: Option<Section> = None;
    let mut assigned_any = false;

    for chunk in reply.split("**") {
        let chunk = chunk.trim();
        if chunk.is_empty() {
            continue;
        }

        if let Some(section) = marker_section(chunk) {
            current = Some(section);
            continue;
        }

        if let Some(section) = current {
            let slot = match section {
                Section::OverallAssessment => &mut feedback.overall_assessment,
                Section::Strengths => &mut feedback.strengths,
                Section::Improvements => &mut feedback.improvements,
                Section::Recommendations => &mut feedback.recommendations,
                Section::ActionPlan => &mut feedback.action_plan,
                Section::MatchingEvidence => &mut feedback.matching_evidence,
            };
            *slot = chunk.to_string();
            assigned_any = true;
        }
    }

    if !assigned_any {
        feedback.overall_assessment = reply.to_string();
    }

    feedback
}

fn marker_section(chunk: &str) -> Option<Section> {
    // Markers are short headers; long runs are content even if they happen
    // to mention a label
    if chunk.chars().count() > 40 {
        return None;
    }
    let chunk_lower = chunk.to_lowercase();
    for (labels, section) in SECTION_MARKERS {
        if labels.iter().any(|label| chunk_lower.contains(label)) {
            return Some(*section);
        }
    }
    None
}

/// Deterministic feedback keyed to score brackets. Same inputs, same text.
fn template_feedback(result: &MatchResult) -> FeedbackResult {
    let score = result.overall_score;

    let overall_assessment = if score >= 80.0 {
        format!(
            "Very high match ({:.1}%). This posting lines up closely with your experience and skill set.",
            score
        )
    } else if score >= 60.0 {
        format!(
            "Good match ({:.1}%). This posting is worth considering an application for.",
            score
        )
    } else if score >= 40.0 {
        format!(
            "Moderate match ({:.1}%). You meet some of the requirements but additional preparation is needed.",
            score
        )
    } else {
        format!(
            "Low match ({:.1}%). This posting differs substantially from your current skill set.",
            score
        )
    };

    let mut strengths = Vec::new();
    if !result.matched_skills.is_empty() {
        strengths.push(format!(
            "These skills of yours fit this role well: {}",
            result.matched_skills.join(", ")
        ));
    }
    if result.keyword_score > 60.0 {
        strengths.push("Your current technology stack aligns well with the posted requirements.".to_string());
    }
    if result.embedding_similarity > 60.0 {
        strengths.push("Your overall work experience matches the substance of this role.".to_string());
    }
    let strengths = join_or(strengths, "No particular strengths stand out.");

    let mut improvements = Vec::new();
    if !result.missing_skills.is_empty() {
        improvements.push(format!(
            "Learning the additional technologies this role asks for would help: {}",
            result.missing_skills.join(", ")
        ));
    }
    if result.keyword_score < 50.0 {
        improvements.push(
            "There is a gap between your current technologies and what the posting requires. Consider studying the relevant stack.".to_string(),
        );
    }
    if result.embedding_similarity < 50.0 {
        improvements.push(
            "Your experience so far points in a somewhat different direction from this role. Building experience in the field is recommended.".to_string(),
        );
    }
    let improvements = join_or(improvements, "No particular gaps stand out.");

    let recommendations = if score >= 70.0 {
        "Applying is strongly recommended. Your current skill set is competitive for this role."
    } else if score >= 50.0 {
        "Applying is worth considering. Closing the identified gaps would make this a good opportunity."
    } else {
        "Applying is not recommended at the current match level. Revisit after building the relevant skills or experience."
    }
    .to_string();

    let first_missing = result.missing_skills.first().map(String::as_str);
    let action_items: [String; 3] = if score >= 70.0 {
        [
            "Prepare the application and portfolio".to_string(),
            "Rehearse likely interview questions".to_string(),
            "Research the company".to_string(),
        ]
    } else if score >= 50.0 {
        [
            match first_missing {
                Some(skill) => format!("Start learning {}", skill),
                None => "Complete one related project".to_string(),
            },
            "Update your portfolio".to_string(),
            "Draft the application".to_string(),
        ]
    } else {
        [
            match first_missing {
                Some(skill) => format!("Take an introductory {} course", skill),
                None => "Build experience in the target field".to_string(),
            },
            "Strengthen the fundamental skills this field expects".to_string(),
            "Revisit this posting in six months".to_string(),
        ]
    };
    let action_plan = action_items
        .iter()
        .enumerate()
        .map(|(i, step)| format!("{}. {}", i + 1, step))
        .collect::<Vec<_>>()
        .join("\n");

    let matching_evidence = format!(
        "Skill fit: {:.1}%, Experience relevance: {:.1}%",
        result.keyword_score, result.embedding_similarity
    );

    let raw_feedback = format!(
        "{}\n\nStrengths:\n{}\n\nImprovements:\n{}\n\nRecommendations:\n{}\n\nAction Plan:\n{}",
        overall_assessment, strengths, improvements, recommendations, action_plan
    );

    FeedbackResult {
        overall_assessment,
        strengths,
        improvements,
        recommendations,
        action_plan,
        matching_evidence,
        raw_feedback,
    }
}

fn join_or(lines: Vec<String>, fallback: &str) -> String {
    if lines.is_empty() {
        fallback.to_string()
    } else {
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{JobFitError, Result};
    use std::collections::BTreeMap;

    struct FixedReply(String);
    impl LanguageModel for FixedReply {
        fn complete(&self, _: &str, _: &str, _: u32, _: f32) -> Result<String> {
            Ok(self.0.clone())
        }
    }

    struct AlwaysFails;
    impl LanguageModel for AlwaysFails {
        fn complete(&self, _: &str, _: &str, _: u32, _: f32) -> Result<String> {
            Err(JobFitError::LanguageModel("simulated outage".to_string()))
        }
    }

    fn result_with_score(overall: f64) -> MatchResult {
        let mut detailed_scores = BTreeMap::new();
        detailed_scores.insert(crate::scoring::keyword::SKILL_MATCH.to_string(), 0.2);
        detailed_scores.insert(crate::scoring::keyword::ROLE_MATCH.to_string(), 0.15);
        detailed_scores.insert(crate::scoring::keyword::EXPERIENCE_MATCH.to_string(), 0.1);
        MatchResult {
            overall_score: overall,
            keyword_score: overall,
            embedding_similarity: overall,
            detailed_scores,
            matched_skills: vec!["Python".to_string()],
            missing_skills: vec!["Docker".to_string(), "AWS".to_string()],
        }
    }

    #[test]
    fn test_parse_labeled_reply() {
        let reply = "**Overall Assessment:**\nStrong fit for the role.\n\
                     **Strengths:**\nPython depth.\n\
                     **Improvements:**\nNo container experience.\n\
                     **Recommendations:**\nApply now.\n\
                     **Action Plan:**\n1. Polish portfolio\n\
                     **Matching Evidence:**\nPosting asks for Python; candidate has it.";
        let feedback = parse_feedback_reply(reply);

        assert_eq!(feedback.overall_assessment, "Strong fit for the role.");
        assert_eq!(feedback.strengths, "Python depth.");
        assert_eq!(feedback.improvements, "No container experience.");
        assert_eq!(feedback.recommendations, "Apply now.");
        assert_eq!(feedback.action_plan, "1. Polish portfolio");
        assert!(feedback.matching_evidence.starts_with("Posting asks"));
        assert_eq!(feedback.raw_feedback, reply);
    }

    #[test]
    fn test_parse_korean_markers() {
        let reply = "**전체 평가:**\n높은 적합도입니다.\n**강점:**\n파이썬 역량.";
        let feedback = parse_feedback_reply(reply);
        assert_eq!(feedback.overall_assessment, "높은 적합도입니다.");
        assert_eq!(feedback.strengths, "파이썬 역량.");
    }

    #[test]
    fn test_parse_unlabeled_reply_goes_to_assessment() {
        let reply = "The candidate seems like a reasonable fit overall.";
        let feedback = parse_feedback_reply(reply);
        assert_eq!(feedback.overall_assessment, reply);
        assert_eq!(feedback.raw_feedback, reply);
        assert!(feedback.strengths.is_empty());
    }

    #[test]
    fn test_long_chunk_mentioning_label_is_content() {
        let reply = "**Strengths:**\nThe overall assessment of peers confirms strong collaboration skills across teams.";
        let feedback = parse_feedback_reply(reply);
        assert!(feedback.strengths.contains("collaboration"));
        assert!(feedback.overall_assessment.is_empty());
    }

    #[test]
    fn test_template_brackets() {
        let high = template_feedback(&result_with_score(85.0));
        assert!(high.overall_assessment.starts_with("Very high match (85.0%)"));
        assert!(high.recommendations.starts_with("Applying is strongly recommended"));
        assert!(high.action_plan.starts_with("1. Prepare the application"));

        let good = template_feedback(&result_with_score(65.0));
        assert!(good.overall_assessment.starts_with("Good match (65.0%)"));

        let moderate = template_feedback(&result_with_score(45.0));
        assert!(moderate.overall_assessment.starts_with("Moderate match (45.0%)"));

        let low = template_feedback(&result_with_score(20.0));
        assert!(low.overall_assessment.starts_with("Low match (20.0%)"));
        assert!(low.recommendations.starts_with("Applying is not recommended"));
    }

    #[test]
    fn test_template_threshold_strengths_and_improvements() {
        let high = template_feedback(&result_with_score(75.0));
        assert!(high.strengths.contains("Python"));
        assert!(high.strengths.contains("technology stack aligns"));
        assert!(high.strengths.contains("work experience matches"));
        assert!(high.improvements.contains("Docker, AWS"));
        assert!(!high.improvements.contains("gap between"));

        let low = template_feedback(&result_with_score(30.0));
        assert!(low.improvements.contains("gap between"));
        assert!(low.improvements.contains("different direction"));
    }

    #[test]
    fn test_template_action_plan_substitutes_first_missing_skill() {
        let mid = template_feedback(&result_with_score(55.0));
        assert!(mid.action_plan.contains("Start learning Docker"));

        let mut no_missing = result_with_score(55.0);
        no_missing.missing_skills.clear();
        let feedback = template_feedback(&no_missing);
        assert!(feedback.action_plan.contains("Complete one related project"));
    }

    #[test]
    fn test_template_matching_evidence_format() {
        let feedback = template_feedback(&result_with_score(62.5));
        assert_eq!(
            feedback.matching_evidence,
            "Skill fit: 62.5%, Experience relevance: 62.5%"
        );
    }

    #[test]
    fn test_synthesize_without_llm_uses_template() {
        let synthesizer = FeedbackSynthesizer::new(None);
        let profile = CandidateProfile::default_profile();
        let result = result_with_score(70.0);
        let feedback = synthesizer.synthesize(&profile, "Python role", "", &result, &[]);
        assert_eq!(feedback, template_feedback(&result));
    }

    #[test]
    fn test_synthesize_llm_failure_degrades_to_template() {
        let failing = AlwaysFails;
        let synthesizer = FeedbackSynthesizer::new(Some(&failing));
        let profile = CandidateProfile::default_profile();
        let result = result_with_score(70.0);
        let feedback = synthesizer.synthesize(&profile, "Python role", "", &result, &[]);
        assert_eq!(feedback, template_feedback(&result));
    }

    #[test]
    fn test_synthesize_llm_reply_is_parsed() {
        let model = FixedReply("**Strengths:**\nSolid Python.".to_string());
        let synthesizer = FeedbackSynthesizer::new(Some(&model));
        let profile = CandidateProfile::default_profile();
        let result = result_with_score(70.0);
        let feedback = synthesizer.synthesize(&profile, "Python role", "", &result, &[]);
        assert_eq!(feedback.strengths, "Solid Python.");
    }

    #[test]
    fn test_digest_contents() {
        let result = result_with_score(72.5);
        let digest = keyword_analysis_digest(&result, &["python".to_string(), "docker".to_string()]);
        assert!(digest.contains("Skill match: 20.0%"));
        assert!(digest.contains("Matched skills: Python"));
        assert!(digest.contains("Additional skills needed: Docker, AWS"));
        assert!(digest.contains("python, docker"));
        assert!(digest.contains("Overall fit: 72.5%"));
    }
}
