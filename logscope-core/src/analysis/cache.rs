//! On-disk cache of analysis records
//!
//! One JSON file per log file, named by the SHA-256 of the log file's
//! absolute path:
//!
//! ```text
//! ~/.local/share/logscope/analyses/
//!   3f5a...e9.json    # { "sessionFilePath": ..., "analyzedAt": ..., "suggestions": [...] }
//! ```
//!
//! Writes land in a temporary file in the same directory and are renamed
//! over the slot, so concurrent readers see either the old or the new record.

use super::types::{AnalysisRecord, AnalysisSuggestion};
use crate::config::Config;
use crate::error::{Error, Result};
use chrono::Utc;
use sha2::{Digest, Sha256};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Persists the latest analysis per log file.
#[derive(Debug, Clone)]
pub struct AnalysisCache {
    dir: PathBuf,
}

impl AnalysisCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Cache in the configured directory.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config.analysis.cache_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Store `suggestions` for `log_path`, replacing any earlier record.
    pub fn save(
        &self,
        suggestions: &[AnalysisSuggestion],
        log_path: &Path,
    ) -> Result<AnalysisRecord> {
        let record = AnalysisRecord {
            session_file_path: absolute(log_path).to_string_lossy().into_owned(),
            analyzed_at: Utc::now(),
            suggestions: suggestions.to_vec(),
        };

        std::fs::create_dir_all(&self.dir)?;
        let slot = self.slot_path(log_path);

        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        serde_json::to_writer_pretty(&mut tmp, &record)?;
        tmp.write_all(b"\n")?;
        tmp.as_file().sync_all()?;
        tmp.persist(&slot)
            .map_err(|e| Error::Cache(format!("failed to replace {:?}: {}", slot, e.error)))?;

        tracing::debug!(
            log = %log_path.display(),
            slot = %slot.display(),
            suggestions = record.suggestions.len(),
            "Saved analysis"
        );
        Ok(record)
    }

    /// Latest record for `log_path`, or `None` when there is none.
    ///
    /// Unreadable or corrupt slots count as absent.
    pub fn load(&self, log_path: &Path) -> Option<AnalysisRecord> {
        let slot = self.slot_path(log_path);
        let raw = match std::fs::read_to_string(&slot) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(slot = %slot.display(), error = %e, "Failed to read analysis");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(slot = %slot.display(), error = %e, "Ignoring corrupt analysis");
                None
            }
        }
    }

    pub fn exists(&self, log_path: &Path) -> bool {
        self.slot_path(log_path).is_file()
    }

    /// Remove the record for `log_path`; absent records are fine.
    pub fn delete(&self, log_path: &Path) -> Result<()> {
        let slot = self.slot_path(log_path);
        match std::fs::remove_file(&slot) {
            Ok(()) => {
                tracing::debug!(slot = %slot.display(), "Deleted analysis");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Cache(format!("failed to delete {:?}: {}", slot, e))),
        }
    }

    /// File backing the record for `log_path`.
    pub fn slot_path(&self, log_path: &Path) -> PathBuf {
        self.dir.join(format!("{}.json", cache_key(log_path)))
    }
}

/// Lowercase hex SHA-256 of the absolute form of `log_path`.
pub fn cache_key(log_path: &Path) -> String {
    let mut hasher = Sha256::new();
    hasher.update(absolute(log_path).to_string_lossy().as_bytes());
    hex::encode(hasher.finalize())
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
