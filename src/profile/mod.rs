//! Candidate profile model and persistence

pub mod model;
pub mod store;

pub use model::{CandidateProfile, ExperienceDetail, Project};
pub use store::ProfileStore;
