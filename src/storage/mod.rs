//! Local key-value storage backed by one JSON file per key.
//!
//! Every failure is logged and contained: writers return `false`, readers
//! return `None`. Callers treat storage as unreliable but never fatal.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const AUTH_KEY: &str = "late_check_auth";
pub const DRAFT_KEY: &str = "late_check_draft";
pub const CACHE_STUDENTS_KEY: &str = "late_check_cache_students";
pub const CACHE_SUMMARY_KEY: &str = "late_check_cache_summary";
pub const CACHE_TIMESTAMP_KEY: &str = "late_check_cache_timestamp";

#[derive(Debug, Clone)]
pub struct Storage {
    dir: PathBuf,
}

impl Storage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Option<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            tracing::warn!("Rejected storage key '{}'", key);
            return None;
        }
        Some(self.dir.join(format!("{}.json", key)))
    }

    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        let Some(path) = self.path_for(key) else {
            return false;
        };

        let content = match serde_json::to_string(value) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Error serializing '{}' for storage: {}", key, e);
                return false;
            }
        };

        if let Err(e) = fs::create_dir_all(&self.dir) {
            tracing::warn!("Error creating storage dir {}: {}", self.dir.display(), e);
            return false;
        }

        match fs::write(&path, content) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!("Error saving '{}' to storage: {}", key, e);
                false
            }
        }
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.path_for(key)?;
        if !path.exists() {
            return None;
        }

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Error reading '{}' from storage: {}", key, e);
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("Error parsing '{}' from storage: {}", key, e);
                None
            }
        }
    }

    pub fn remove(&self, key: &str) -> bool {
        let Some(path) = self.path_for(key) else {
            return false;
        };

        match fs::remove_file(&path) {
            Ok(()) => true,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => true,
            Err(e) => {
                tracing::warn!("Error removing '{}' from storage: {}", key, e);
                false
            }
        }
    }

    pub fn has(&self, key: &str) -> bool {
        self.path_for(key).map(|p| p.is_file()).unwrap_or(false)
    }

    /// Remove every stored key. Non-JSON files in the directory are left alone.
    pub fn clear(&self) -> bool {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return true,
            Err(e) => {
                tracing::warn!("Error clearing storage: {}", e);
                return false;
            }
        };

        let mut ok = true;
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Err(e) = fs::remove_file(&path) {
                tracing::warn!("Error removing {}: {}", path.display(), e);
                ok = false;
            }
        }
        ok
    }
}
