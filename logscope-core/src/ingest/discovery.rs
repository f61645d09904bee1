//! Transcript file discovery
//!
//! Transcripts live two levels below the root:
//!
//! ```text
//! ~/.claude/projects/
//!   -Users-you-project-a/
//!     abc123.jsonl           # Session transcript
//!     agent-1f2e3d.jsonl     # Sub-agent transcript (excluded)
//!   -Users-you-project-b/
//!     def456.jsonl
//! ```

use crate::error::{Error, Result};
use crate::types::LogFile;
use chrono::{DateTime, Utc};
use glob::MatchOptions;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

/// Extension of transcript files.
pub const LOG_EXTENSION: &str = "jsonl";

/// File name prefix reserved for sub-agent transcripts.
pub const SUBAGENT_PREFIX: &str = "agent-";

/// Find every eligible transcript under `root`, newest first.
///
/// A missing root yields an empty list. Only a failure to read the root
/// itself is an error; unreadable project folders are logged and skipped.
pub fn discover_log_files(root: &Path) -> Result<Vec<LogFile>> {
    if !root.exists() {
        tracing::debug!(root = %root.display(), "Log root does not exist");
        return Ok(Vec::new());
    }
    if !root.is_dir() {
        return Err(Error::Discovery {
            root: root.to_path_buf(),
            message: "not a directory".to_string(),
        });
    }

    let pattern = format!(
        "{}/*/*.{}",
        glob::Pattern::escape(&root.to_string_lossy()),
        LOG_EXTENSION
    );
    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: true,
    };

    let entries = glob::glob_with(&pattern, options).map_err(|e| Error::Discovery {
        root: root.to_path_buf(),
        message: format!("Invalid glob pattern: {}", e),
    })?;

    let mut files = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) => {
                if let Some(file) = eligible_log_file(path) {
                    files.push(file);
                }
            }
            Err(e) if e.path() == root => {
                return Err(Error::Discovery {
                    root: root.to_path_buf(),
                    message: e.error().to_string(),
                });
            }
            Err(e) => {
                tracing::warn!(
                    path = %e.path().display(),
                    error = %e.error(),
                    "Skipping unreadable project directory"
                );
            }
        }
    }

    files.sort_by(|a, b| b.modified_at.cmp(&a.modified_at));

    tracing::info!(root = %root.display(), count = files.len(), "Discovered log files");
    Ok(files)
}

fn eligible_log_file(path: PathBuf) -> Option<LogFile> {
    let name = path.file_name()?.to_str()?;
    if name.starts_with(SUBAGENT_PREFIX) {
        return None;
    }

    let modified_at = match std::fs::metadata(&path) {
        Ok(metadata) if !metadata.is_file() => return None,
        Ok(metadata) => metadata
            .modified()
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| DateTime::<Utc>::from(UNIX_EPOCH)),
        Err(_) => DateTime::<Utc>::from(UNIX_EPOCH),
    };

    Some(LogFile { path, modified_at })
}
