//! Structured candidate profile with backward-compatible deserialization
//!
//! Stored profiles from older releases used a handful of retired field
//! names; `from_stored` migrates each known legacy shape onto the current
//! schema before typed deserialization, so loading never fails on a
//! legally-shaped document.

use crate::error::{JobFitError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A candidate profile. All collection fields default to empty rather than
/// absent; ordered maps keep deterministic scoring paths byte-stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub name: String,
    #[serde(default)]
    pub target_roles: Vec<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub programming_languages: Vec<String>,
    /// Language name -> proficiency level, e.g. "Korean" -> "Native"
    #[serde(default)]
    pub languages: BTreeMap<String, String>,
    /// Remote / Hybrid / On-site
    #[serde(default)]
    pub work_preference: Vec<String>,

    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub current_position: String,
    #[serde(default)]
    pub current_role: String,
    #[serde(default)]
    pub current_company: String,
    #[serde(default)]
    pub education_level: String,
    #[serde(default)]
    pub major: String,
    #[serde(default)]
    pub university: String,
    #[serde(default)]
    pub graduation_year: u32,
    /// Industry -> years of experience
    #[serde(default)]
    pub experience_by_industry: BTreeMap<String, f64>,
    #[serde(default)]
    pub experience_details: Vec<ExperienceDetail>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default)]
    pub location_preference: Vec<String>,
    #[serde(default)]
    pub salary_expectation: String,
    #[serde(default)]
    pub additional_notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceDetail {
    pub industry: String,
    pub role: String,
    pub years: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tech_stack: String,
    #[serde(default)]
    pub organization: String,
}

impl CandidateProfile {
    /// A blank profile with the historical defaults for a new user.
    pub fn default_profile() -> Self {
        let mut languages = BTreeMap::new();
        languages.insert("Korean".to_string(), "Native".to_string());
        languages.insert("English".to_string(), "Fluent".to_string());

        Self {
            name: String::new(),
            target_roles: Vec::new(),
            skills: Vec::new(),
            programming_languages: Vec::new(),
            languages,
            work_preference: vec!["Remote".to_string(), "Hybrid".to_string()],
            email: String::new(),
            current_position: String::new(),
            current_role: String::new(),
            current_company: String::new(),
            education_level: String::new(),
            major: String::new(),
            university: String::new(),
            graduation_year: 0,
            experience_by_industry: BTreeMap::new(),
            experience_details: Vec::new(),
            projects: Vec::new(),
            certifications: Vec::new(),
            location_preference: Vec::new(),
            salary_expectation: String::new(),
            additional_notes: String::new(),
        }
    }

    /// Deserialize a stored profile document, migrating legacy shapes.
    ///
    /// Fails only on documents that are not a JSON object or cannot be
    /// coerced to the current schema at all; missing optional keys and
    /// retired field names are repaired, never rejected.
    pub fn from_stored(data: Value) -> Result<Self> {
        let mut map = match data {
            Value::Object(map) => map,
            other => {
                return Err(JobFitError::Profile(format!(
                    "expected a JSON object, got {}",
                    json_type_name(&other)
                )))
            }
        };

        migrate_legacy_fields(&mut map);

        let profile: CandidateProfile = serde_json::from_value(Value::Object(map))?;
        Ok(profile)
    }

    /// Serialize the profile to its stored JSON form. Lossless: the result
    /// round-trips through `from_stored`.
    pub fn to_stored(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Filename-safe identity derived from the profile name.
    pub fn storage_key(&self) -> String {
        format!("{}.json", self.name.trim().replace(char::is_whitespace, "_"))
    }

    /// Union of declared skills and programming languages, in declaration
    /// order. This is the skill set the keyword scorer matches against.
    pub fn all_skills(&self) -> Vec<&str> {
        self.skills
            .iter()
            .chain(self.programming_languages.iter())
            .map(|s| s.as_str())
            .collect()
    }

    /// Total years of experience summed across industries.
    pub fn total_experience_years(&self) -> f64 {
        self.experience_by_industry.values().sum()
    }

    /// Render the profile to one descriptive text block for semantic
    /// similarity, each attribute as a labeled clause.
    pub fn to_descriptive_text(&self) -> String {
        let mut parts: Vec<String> = Vec::new();

        parts.push(format!("Target roles: {}", self.target_roles.join(", ")));

        if !self.experience_by_industry.is_empty() {
            let experience = self
                .experience_by_industry
                .iter()
                .map(|(industry, years)| format!("{}({} years)", industry, years))
                .collect::<Vec<_>>()
                .join(", ");
            parts.push(format!("Experience: {}", experience));
        }

        parts.push(format!("Skills: {}", self.skills.join(", ")));

        if !self.programming_languages.is_empty() {
            parts.push(format!(
                "Programming languages: {}",
                self.programming_languages.join(", ")
            ));
        }

        let languages = self
            .languages
            .iter()
            .map(|(lang, level)| format!("{}({})", lang, level))
            .collect::<Vec<_>>()
            .join(", ");
        parts.push(format!("Languages: {}", languages));
        parts.push(format!("Work preference: {}", self.work_preference.join(", ")));

        if !self.education_level.is_empty() {
            parts.push(format!("Education: {} in {}", self.education_level, self.major));
        }

        if !self.projects.is_empty() {
            let projects = self
                .projects
                .iter()
                .map(Project::describe)
                .collect::<Vec<_>>()
                .join(", ");
            parts.push(format!("Projects: {}", projects));
        }

        if !self.certifications.is_empty() {
            parts.push(format!("Certifications: {}", self.certifications.join(", ")));
        }

        if !self.location_preference.is_empty() {
            parts.push(format!(
                "Location preference: {}",
                self.location_preference.join(", ")
            ));
        }

        if !self.additional_notes.is_empty() {
            parts.push(format!("Additional notes: {}", self.additional_notes));
        }

        parts.join(" ")
    }
}

impl Project {
    pub fn describe(&self) -> String {
        let mut text = self.name.clone();
        if !self.description.is_empty() {
            text.push_str(&format!(": {}", self.description));
        }
        if !self.tech_stack.is_empty() {
            text.push_str(&format!(" (tech: {})", self.tech_stack));
        }
        if !self.organization.is_empty() {
            text.push_str(&format!(" @ {}", self.organization));
        }
        text
    }
}

/// Rewrite retired field names onto the current schema, in place.
fn migrate_legacy_fields(map: &mut serde_json::Map<String, Value>) {
    // experience_years (flat number) -> experience_by_industry under a
    // generic bucket
    if !map.contains_key("experience_by_industry") {
        if let Some(years) = map.remove("experience_years") {
            let years = years.as_f64().unwrap_or(0.0);
            let mut by_industry = serde_json::Map::new();
            if years > 0.0 {
                by_industry.insert("General".to_string(), years.into());
            }
            map.insert(
                "experience_by_industry".to_string(),
                Value::Object(by_industry),
            );
        }
    } else {
        map.remove("experience_years");
    }

    // extra_notes -> additional_notes
    if !map.contains_key("additional_notes") {
        if let Some(notes) = map.remove("extra_notes") {
            map.insert("additional_notes".to_string(), notes);
        }
    } else {
        map.remove("extra_notes");
    }

    // frameworks was folded into skills and retired
    if map.remove("frameworks").is_some() {
        log::debug!("dropped retired profile field 'frameworks'");
    }

    // Plain string projects become structured records
    if let Some(Value::Array(projects)) = map.get_mut("projects") {
        for project in projects.iter_mut() {
            if let Value::String(name) = project {
                let mut record = serde_json::Map::new();
                record.insert("name".to_string(), Value::String(name.clone()));
                record.insert("description".to_string(), Value::String(String::new()));
                record.insert("tech_stack".to_string(), Value::String(String::new()));
                record.insert("organization".to_string(), Value::String(String::new()));
                *project = Value::Object(record);
            }
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
