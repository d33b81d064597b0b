//! Flat-file JSON profile storage
//!
//! Profiles are stored one document per file, keyed by a filename derived
//! from the profile name. Legacy documents are migrated transparently on
//! load; only unreadable or corrupt files are hard failures.

use crate::error::{JobFitError, Result};
use crate::profile::CandidateProfile;
use std::path::{Path, PathBuf};

pub struct ProfileStore {
    dir: PathBuf,
}

impl ProfileStore {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    /// Save a profile, returning its storage key. The key is derived from
    /// the profile name unless an explicit filename is given.
    pub fn save(&self, profile: &CandidateProfile, filename: Option<&str>) -> Result<String> {
        let key = match filename {
            Some(name) => ensure_json_extension(name),
            None => profile.storage_key(),
        };

        std::fs::create_dir_all(&self.dir)?;

        let stored = profile.to_stored()?;
        let content = serde_json::to_string_pretty(&stored)?;
        std::fs::write(self.dir.join(&key), content)?;

        log::info!("saved profile '{}' as {}", profile.name, key);
        Ok(key)
    }

    /// Load a profile by storage key. Returns `Ok(None)` when absent.
    pub fn load(&self, key: &str) -> Result<Option<CandidateProfile>> {
        let path = self.dir.join(ensure_json_extension(key));
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&path)?;
        let data: serde_json::Value = serde_json::from_str(&content).map_err(|e| {
            JobFitError::Profile(format!("corrupt profile file {}: {}", path.display(), e))
        })?;

        Ok(Some(CandidateProfile::from_stored(data)?))
    }

    /// Ordered list of storage keys.
    pub fn list(&self) -> Result<Vec<String>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut keys: Vec<String> = std::fs::read_dir(&self.dir)?
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| name.ends_with(".json"))
            .collect();
        keys.sort();
        Ok(keys)
    }

    pub fn delete(&self, key: &str) -> Result<()> {
        let path = self.dir.join(ensure_json_extension(key));
        if !path.exists() {
            return Err(JobFitError::ProfileNotFound(key.to_string()));
        }
        std::fs::remove_file(path)?;
        Ok(())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

fn ensure_json_extension(name: &str) -> String {
    if name.ends_with(".json") {
        name.to_string()
    } else {
        format!("{}.json", name)
    }
}
