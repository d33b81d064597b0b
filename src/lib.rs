//! Job posting to candidate matching
//!
//! Given a structured candidate profile and free-text job posting, this
//! crate produces a fused compatibility score and structured feedback.
//! Keyword matching with synonym expansion carries 70% of the score and
//! embedding similarity the remaining 30%; an OpenAI-compatible language
//! model can refine individual judgments, with every AI call degrading to
//! a deterministic fallback on failure.

pub mod cli;
pub mod config;
pub mod error;
pub mod feedback;
pub mod input;
pub mod llm;
pub mod output;
pub mod profile;
pub mod scoring;

pub use config::Config;
pub use error::{JobFitError, Result};
pub use feedback::{FeedbackResult, FeedbackSynthesizer};
pub use profile::{CandidateProfile, ProfileStore};
pub use scoring::{MatchEngine, MatchResult};
