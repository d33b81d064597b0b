//! Report structure for one scored posting

use crate::feedback::FeedbackResult;
use crate::scoring::MatchResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    pub job_title: String,
    pub profile_name: String,
    pub generated_at: DateTime<Utc>,
    pub match_result: MatchResult,
    pub feedback: FeedbackResult,
}

impl MatchReport {
    pub fn new(
        job_title: impl Into<String>,
        profile_name: impl Into<String>,
        match_result: MatchResult,
        feedback: FeedbackResult,
    ) -> Self {
        Self {
            job_title: job_title.into(),
            profile_name: profile_name.into(),
            generated_at: Utc::now(),
            match_result,
            feedback,
        }
    }

    /// One-word verdict used in report headers.
    pub fn verdict(&self) -> &'static str {
        let score = self.match_result.overall_score;
        if score >= 80.0 {
            "Excellent"
        } else if score >= 60.0 {
            "Good"
        } else if score >= 40.0 {
            "Fair"
        } else {
            "Poor"
        }
    }
}
