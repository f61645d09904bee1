//! Lightweight per-file summaries for listing
//!
//! A summary never parses the whole transcript: the start time comes from a
//! bounded window at the head of the file and the turn count from a raw
//! substring scan.

use crate::error::Result;
use crate::ingest::transcript::parse_timestamp;
use crate::types::{project_name, LogFile, SessionSummary};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::fs::File;
use std::io::Read;

/// Marker counted once per line when computing the turn count.
const HUMAN_RECORD_MARKER: &str = r#""type":"user""#;

/// Build the listing record for one log file.
///
/// Any I/O failure fails the whole summary so the caller can skip the file.
pub fn extract_summary(file: &LogFile, window_bytes: usize) -> Result<SessionSummary> {
    let timestamp = start_timestamp(file, window_bytes)?;

    let content = std::fs::read_to_string(&file.path)?;
    let turn_count = count_human_records(&content);

    let project_identifier = file.project_identifier();
    Ok(SessionSummary {
        id: SessionSummary::id_for(&file.path),
        project_name: project_name(&project_identifier),
        project_identifier,
        timestamp,
        turn_count,
        source_path: file.path.clone(),
    })
}

/// Count lines containing the human-record marker.
///
/// This is a raw text test, so records serialized with spaces around the
/// colon are not counted.
pub fn count_human_records(content: &str) -> usize {
    content
        .lines()
        .filter(|line| line.contains(HUMAN_RECORD_MARKER))
        .count()
}

fn start_timestamp(file: &LogFile, window_bytes: usize) -> Result<DateTime<Utc>> {
    let mut head = Vec::new();
    File::open(&file.path)?
        .take(window_bytes as u64)
        .read_to_end(&mut head)?;

    Ok(first_timestamp(&String::from_utf8_lossy(&head)).unwrap_or_else(|| {
        tracing::debug!(
            path = %file.path.display(),
            "No start timestamp in head window, using mtime"
        );
        file.modified_at
    }))
}

/// Timestamp of the first record that carries one.
///
/// Stops at the first string `timestamp` field even when it fails to parse.
fn first_timestamp(head: &str) -> Option<DateTime<Utc>> {
    head.lines()
        .filter_map(|line| serde_json::from_str::<Value>(line).ok())
        .find_map(|record| {
            record
                .get("timestamp")
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .and_then(|raw| parse_timestamp(&raw))
}
