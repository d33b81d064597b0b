//! Report rendering
//!
//! A `MatchReport` bundles the scores and feedback for one posting; the
//! formatters render it for the console, as JSON, or as markdown.

pub mod formatter;
pub mod report;

pub use formatter::{render_report, ConsoleFormatter, JsonFormatter, MarkdownFormatter, OutputFormat, ReportFormatter};
pub use report::MatchReport;
