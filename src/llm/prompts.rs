//! Prompt construction for the language-model assisted paths
//!
//! Each scoring prompt asks for a bare 0-1 number; the feedback prompt asks
//! for six labeled sections under hard tone constraints. Job text is
//! truncated to its first 1500 characters before embedding in a prompt.

use crate::profile::CandidateProfile;

/// Character budget for job text embedded in prompts.
pub const JOB_TEXT_PROMPT_LIMIT: usize = 1500;

pub const ROLE_MATCH_SYSTEM: &str = "You are an expert career counselor. Analyze the relevance \
between the candidate's target roles and the job posting. Consider semantic similarity, not just \
exact keyword matches. Return only a number between 0 and 1.";

pub const NOTES_SYSTEM: &str = "You are an expert career counselor. Analyze the relevance between \
the candidate's additional notes and the job posting. Return only a number between 0 and 1.";

pub const MISSING_SKILLS_SYSTEM: &str = "You are an expert technical recruiter. Analyze job \
postings to identify required skills that candidates lack. Be precise and avoid false positives.";

pub const FEEDBACK_SYSTEM: &str = "Quote the job posting's concrete requirements and evaluate the \
candidate's actual capabilities against them. Never use matching-algorithm jargon, never describe \
a skill the candidate already has as lacking, and ground the provided keyword analysis summary in \
3-5 short, concrete action steps.";

pub fn truncate_job_text(job_text: &str) -> String {
    job_text.chars().take(JOB_TEXT_PROMPT_LIMIT).collect()
}

pub fn role_match_prompt(target_roles: &[String], job_text: &str) -> String {
    format!(
        r#"Rate how well the candidate's target roles match the role in the job posting, as a score between 0 and 1.

**Candidate target roles:**
{roles}

**Job posting (excerpt):**
{job}

Evaluation criteria:
1. Even when titles differ, are the duties and required competencies similar?
2. How related is the core work of the target role to the posted role?
3. Is there a plausible career-path connection?

Example: "NLP Engineer" and "AI Research Scientist" are highly related.
Example: "Data Scientist" and "Machine Learning Engineer" are highly related.
Example: "Frontend Developer" and "Backend Developer" are moderately related.

Response format: return only a number (e.g. 0.8)"#,
        roles = target_roles.join(", "),
        job = truncate_job_text(job_text),
    )
}

pub fn notes_relevance_prompt(additional_notes: &str, job_text: &str) -> String {
    format!(
        r#"Rate the relevance between the candidate's additional notes and the job posting, as a score between 0 and 1.

**Candidate additional notes:**
{notes}

**Job posting (excerpt):**
{job}

Evaluation criteria:
1. How related are the candidate's interests, experience and goals to the posting's requirements and duties?
2. How well do the mentioned projects, technologies and experience fit this role?
3. How aligned are the candidate's career goals with this company and role?

Response format: return only a number (e.g. 0.7)"#,
        notes = additional_notes,
        job = truncate_job_text(job_text),
    )
}

pub fn missing_skills_prompt(owned_skills: &[&str], job_text: &str) -> String {
    let owned = if owned_skills.is_empty() {
        "none".to_string()
    } else {
        owned_skills.join(", ")
    };

    format!(
        r#"From the following job posting, identify required technologies the candidate does not already have.

**Candidate's skills:**
{owned}

**Job posting (excerpt):**
{job}

Important rules:
1. Identify technologies the posting explicitly requires or mentions.
2. Never include a technology the candidate already has.
3. Treat equivalent spellings as the same technology:
   - "RAG" = "Retrieval Augmented Generation"
   - "MCP" = "Model Context Protocol"
   - "Power BI" = "PowerBI"
   - "Excel" = "Microsoft Excel"
   - "Python" = "파이썬"
   - "SQL" = "Structured Query Language"
4. Ignore case and punctuation differences.
5. Anything overlapping the candidate's own skills must never be listed as missing.

Response format: return only a comma-separated list of technology names (e.g. Docker, Kubernetes, React).
If the candidate already has every required technology, return "none"."#,
        owned = owned,
        job = truncate_job_text(job_text),
    )
}

pub fn feedback_prompt(
    profile: &CandidateProfile,
    job_text: &str,
    job_title: &str,
    keyword_analysis: &str,
) -> String {
    let experience = if profile.experience_by_industry.is_empty() {
        "none".to_string()
    } else {
        profile
            .experience_by_industry
            .iter()
            .map(|(industry, years)| format!("{}({} years)", industry, years))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let languages = profile
        .languages
        .iter()
        .map(|(lang, level)| format!("{}({})", lang, level))
        .collect::<Vec<_>>()
        .join(", ");

    let projects = if profile.projects.is_empty() {
        "none".to_string()
    } else {
        profile
            .projects
            .iter()
            .map(|p| p.describe())
            .collect::<Vec<_>>()
            .join(", ")
    };

    format!(
        r#"Based on the following information, provide detailed feedback on the candidate's fit for the job posting.

**Candidate:**
- Name: {name}
- Target roles: {roles}
- Experience: {experience}
- Key skills: {skills}
- Programming languages: {languages_prog}
- Language proficiency: {languages}
- Degree/major: {education} {major}
- Projects: {projects}
- Certifications: {certifications}
- Preferred locations: {locations}
- Work preference: {work_pref}
- Additional notes: {notes}

**Job posting:**
- Title: {title}
- Body: {job}

**Pre-computed analysis summary:**
{analysis}

Hard constraints:
1. Tie every evaluation directly to concrete requirements quoted from the posting.
2. Never describe a skill the candidate possesses as lacking.
3. Never use technical jargon such as keyword matching, embedding similarity or match score.
4. Limit the action plan to 3-5 short, concrete steps; no generic advice like "study more" or "gain experience".

Respond in this format:

**Overall Assessment:**
[Concrete evaluation of the candidate's fit against the posting's requirements]

**Strengths:**
[The posted requirements the candidate explicitly satisfies]

**Improvements:**
[The posted requirements the candidate should work on, concretely]

**Recommendations:**
[A clear judgement on whether to apply and how to prepare]

**Action Plan:**
[3-5 short, concrete steps only]

**Matching Evidence:**
[The concrete correspondence between posted requirements and the candidate's capabilities]"#,
        name = profile.name,
        roles = profile.target_roles.join(", "),
        experience = experience,
        skills = profile.skills.join(", "),
        languages_prog = non_empty_or(&profile.programming_languages.join(", "), "none"),
        languages = languages,
        education = profile.education_level,
        major = profile.major,
        projects = projects,
        certifications = non_empty_or(&profile.certifications.join(", "), "none"),
        locations = non_empty_or(&profile.location_preference.join(", "), "none"),
        work_pref = profile.work_preference.join(", "),
        notes = non_empty_or(&profile.additional_notes, "none"),
        title = non_empty_or(job_title, "untitled"),
        job = truncate_job_text(job_text),
        analysis = keyword_analysis,
    )
}

fn non_empty_or<'a>(value: &'a str, fallback: &'a str) -> &'a str {
    if value.trim().is_empty() {
        fallback
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_text_truncation() {
        let long = "x".repeat(5000);
        assert_eq!(truncate_job_text(&long).chars().count(), JOB_TEXT_PROMPT_LIMIT);
        assert_eq!(truncate_job_text("short"), "short");
    }

    #[test]
    fn test_role_prompt_contents() {
        let prompt = role_match_prompt(
            &["NLP Engineer".to_string()],
            "We are hiring an AI Research Scientist",
        );
        assert!(prompt.contains("NLP Engineer"));
        assert!(prompt.contains("AI Research Scientist"));
        assert!(prompt.contains("return only a number"));
    }

    #[test]
    fn test_missing_skills_prompt_lists_owned() {
        let prompt = missing_skills_prompt(&["Python", "SQL"], "Looking for AWS experience");
        assert!(prompt.contains("Python, SQL"));
        assert!(prompt.contains("AWS"));
    }
}
