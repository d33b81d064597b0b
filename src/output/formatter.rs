//! Report formatters

use crate::error::Result;
use crate::output::report::MatchReport;
use colored::{Color, Colorize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
}

pub trait ReportFormatter {
    fn format_report(&self, report: &MatchReport) -> Result<String>;
}

/// Console output with optional colors.
pub struct ConsoleFormatter {
    use_colors: bool,
}

/// Pretty-printed JSON for piping into other tools.
pub struct JsonFormatter {
    pretty: bool,
}

/// Markdown suitable for saving as a report file.
pub struct MarkdownFormatter;

pub fn render_report(report: &MatchReport, format: OutputFormat, use_colors: bool) -> Result<String> {
    match format {
        OutputFormat::Console => ConsoleFormatter::new(use_colors).format_report(report),
        OutputFormat::Json => JsonFormatter::new(true).format_report(report),
        OutputFormat::Markdown => MarkdownFormatter.format_report(report),
    }
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn score_color(score: f64) -> Color {
        if score >= 80.0 {
            Color::Green
        } else if score >= 60.0 {
            Color::Cyan
        } else if score >= 40.0 {
            Color::Yellow
        } else {
            Color::Red
        }
    }

    fn push_section(&self, output: &mut String, title: &str, body: &str) {
        if body.trim().is_empty() {
            return;
        }
        output.push_str(&format!("{}\n{}\n\n", self.colorize(title, Color::Cyan), body));
    }
}

impl ReportFormatter for ConsoleFormatter {
    fn format_report(&self, report: &MatchReport) -> Result<String> {
        let result = &report.match_result;
        let mut output = String::new();

        output.push_str(&format!(
            "{}\n",
            self.colorize("=== JOB MATCH ANALYSIS ===", Color::White)
        ));
        if !report.job_title.is_empty() {
            output.push_str(&format!("Posting: {}\n", report.job_title));
        }
        output.push_str(&format!("Candidate: {}\n", report.profile_name));
        output.push_str(&format!(
            "Generated: {}\n\n",
            report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));

        let overall = format!("{:.1}%", result.overall_score);
        output.push_str(&format!(
            "Overall Score: {} ({})\n",
            self.colorize(&overall, Self::score_color(result.overall_score)),
            report.verdict()
        ));
        output.push_str(&format!("Keyword Score: {:.1}%\n", result.keyword_score));
        output.push_str(&format!(
            "Semantic Similarity: {:.1}%\n\n",
            result.embedding_similarity
        ));

        if !result.detailed_scores.is_empty() {
            output.push_str(&format!("{}\n", self.colorize("Score Breakdown", Color::Cyan)));
            for (name, value) in &result.detailed_scores {
                output.push_str(&format!("  {}: {:.1}%\n", name, value * 100.0));
            }
            output.push('\n');
        }

        if !result.matched_skills.is_empty() {
            output.push_str(&format!(
                "{} {}\n",
                self.colorize("Matched skills:", Color::Green),
                result.matched_skills.join(", ")
            ));
        }
        if !result.missing_skills.is_empty() {
            output.push_str(&format!(
                "{} {}\n",
                self.colorize("Missing skills:", Color::Yellow),
                result.missing_skills.join(", ")
            ));
        }
        if !result.matched_skills.is_empty() || !result.missing_skills.is_empty() {
            output.push('\n');
        }

        let feedback = &report.feedback;
        self.push_section(&mut output, "Overall Assessment", &feedback.overall_assessment);
        self.push_section(&mut output, "Strengths", &feedback.strengths);
        self.push_section(&mut output, "Improvements", &feedback.improvements);
        self.push_section(&mut output, "Recommendations", &feedback.recommendations);
        self.push_section(&mut output, "Action Plan", &feedback.action_plan);
        self.push_section(&mut output, "Matching Evidence", &feedback.matching_evidence);

        Ok(output)
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl ReportFormatter for JsonFormatter {
    fn format_report(&self, report: &MatchReport) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(report)?
        } else {
            serde_json::to_string(report)?
        };
        Ok(json)
    }
}

impl ReportFormatter for MarkdownFormatter {
    fn format_report(&self, report: &MatchReport) -> Result<String> {
        let result = &report.match_result;
        let mut output = String::new();

        output.push_str("# Job Match Report\n\n");
        if !report.job_title.is_empty() {
            output.push_str(&format!("**Posting:** {}\n\n", report.job_title));
        }
        output.push_str(&format!("**Candidate:** {}\n\n", report.profile_name));
        output.push_str(&format!(
            "**Generated:** {}\n\n",
            report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));

        output.push_str("## Scores\n\n");
        output.push_str(&format!(
            "| Metric | Value |\n|---|---|\n| Overall | {:.1}% ({}) |\n| Keyword | {:.1}% |\n| Semantic | {:.1}% |\n\n",
            result.overall_score,
            report.verdict(),
            result.keyword_score,
            result.embedding_similarity
        ));

        if !result.detailed_scores.is_empty() {
            output.push_str("### Breakdown\n\n");
            for (name, value) in &result.detailed_scores {
                output.push_str(&format!("- {}: {:.1}%\n", name, value * 100.0));
            }
            output.push('\n');
        }

        if !result.matched_skills.is_empty() {
            output.push_str(&format!(
                "**Matched skills:** {}\n\n",
                result.matched_skills.join(", ")
            ));
        }
        if !result.missing_skills.is_empty() {
            output.push_str(&format!(
                "**Missing skills:** {}\n\n",
                result.missing_skills.join(", ")
            ));
        }

        let feedback = &report.feedback;
        for (title, body) in [
            ("Overall Assessment", &feedback.overall_assessment),
            ("Strengths", &feedback.strengths),
            ("Improvements", &feedback.improvements),
            ("Recommendations", &feedback.recommendations),
            ("Action Plan", &feedback.action_plan),
            ("Matching Evidence", &feedback.matching_evidence),
        ] {
            if !body.trim().is_empty() {
                output.push_str(&format!("## {}\n\n{}\n\n", title, body));
            }
        }

        Ok(output)
    }
}
