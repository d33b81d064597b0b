//! Profile-to-posting scoring
//!
//! `MatchEngine` fuses the six-part keyword composite from `keyword` with
//! the semantic similarity from `semantic`, consulting the synonym
//! `vocabulary` throughout.

pub mod engine;
pub mod keyword;
pub mod semantic;
pub mod vocabulary;

pub use engine::{MatchEngine, MatchResult, MISSING_SKILLS_CAP, REFERENCE_SKILLS};
pub use keyword::KeywordScorer;
pub use semantic::SemanticScorer;
pub use vocabulary::SkillVocabulary;
