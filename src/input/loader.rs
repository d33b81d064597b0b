//! Job posting text loading

use crate::error::{JobFitError, Result};
use pulldown_cmark::{html, Parser};
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub enum FileType {
    Text,
    Markdown,
    Unknown,
}

impl FileType {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "txt" | "text" => FileType::Text,
            "md" | "markdown" => FileType::Markdown,
            _ => FileType::Unknown,
        }
    }

    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(FileType::from_extension)
            .unwrap_or(FileType::Unknown)
    }
}

/// Read a job posting from disk. Markdown is flattened to plain text so
/// formatting syntax never leaks into keyword matching.
pub fn load_job_text(path: &Path) -> Result<String> {
    let text = match FileType::from_path(path) {
        FileType::Text => std::fs::read_to_string(path)?,
        FileType::Markdown => {
            let markdown = std::fs::read_to_string(path)?;
            markdown_to_text(&markdown)
        }
        FileType::Unknown => {
            return Err(JobFitError::UnsupportedFormat(format!(
                "unsupported job posting format: {}",
                path.display()
            )))
        }
    };

    if text.trim().is_empty() {
        return Err(JobFitError::InvalidInput(format!(
            "job posting file is empty: {}",
            path.display()
        )));
    }

    Ok(text)
}

fn markdown_to_text(markdown: &str) -> String {
    let parser = Parser::new(markdown);
    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);
    html_to_text(&html_output)
}

fn html_to_text(html: &str) -> String {
    let text = html
        .replace("<br>", "\n")
        .replace("</p>", "\n\n")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");

    let tag_pattern = regex::Regex::new(r"<[^>]*>").expect("tag pattern is valid");
    let clean = tag_pattern.replace_all(&text, "");

    clean
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
