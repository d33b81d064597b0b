//! Job posting input
//!
//! Loads posting text from plain-text or markdown files.

pub mod loader;

pub use loader::{load_job_text, FileType};
