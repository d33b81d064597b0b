//! Feedback synthesis
//!
//! Turns a match result into structured prose, either through the language
//! model under hard tone constraints or through a deterministic template.

pub mod synthesizer;

pub use synthesizer::{FeedbackResult, FeedbackSynthesizer};
