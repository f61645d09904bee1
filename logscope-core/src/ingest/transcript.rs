//! Transcript JSONL parser
//!
//! Turns the text of one transcript file into an ordered list of
//! [`Message`]s.
//!
//! # Error Handling
//!
//! The parser is designed to be resilient and recover from errors at the
//! smallest possible granularity:
//!
//! - **Malformed JSON lines**: skipped, parsing continues with the next line.
//!
//! - **Records that are not conversation turns** (summaries, snapshots, ...):
//!   skipped. Only `user` and `assistant` records carrying `message.role` and
//!   a `message.content` array are kept.
//!
//! - **Malformed content blocks**: a `tool_use` without `id`, `name` or an
//!   object `input`, or a `tool_result` without `tool_use_id`, drops only that
//!   block. Unknown block types are ignored.
//!
//! - **Empty messages**: a record whose blocks all get dropped produces no
//!   message at all.
//!
//! - **Bad ids and timestamps**: a missing or malformed `uuid` is replaced by a
//!   fresh one, a malformed `parentUuid` becomes `None`, and a missing or
//!   malformed `timestamp` falls back to `Utc::now()`.
//!
//! Only failing to read the file as UTF-8 text fails the whole parse.

use crate::error::{Error, Result};
use crate::types::{ContentBlock, Message, Role, ToolCall, ToolResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::path::Path;
use uuid::Uuid;

// ============================================
// Raw JSONL record types (serde deserialization)
// ============================================

/// Represents a single line from a transcript.
///
/// Uses `#[serde(default)]` liberally to handle missing fields gracefully.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct RawRecord {
    #[serde(rename = "type", deserialize_with = "lenient_string")]
    record_type: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    uuid: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    parent_uuid: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    timestamp: Option<String>,
    message: Option<RawMessage>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct RawMessage {
    #[serde(deserialize_with = "lenient_string")]
    role: Option<String>,
    // Blocks stay untyped here so one bad block cannot sink its siblings
    content: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum RawBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "tool_use")]
    ToolUse {
        id: String,
        name: String,
        input: serde_json::Map<String, Value>,
    },
    #[serde(rename = "tool_result")]
    ToolResult {
        tool_use_id: String,
        #[serde(default)]
        content: Value,
        #[serde(default, deserialize_with = "lenient_bool")]
        is_error: bool,
    },
    // Catch-all for unknown block types
    #[serde(other)]
    Unknown,
}

/// Accept any JSON value, keeping it only when it is a string.
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// Accept any JSON value, treating everything but `true` as `false`.
fn lenient_bool<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(matches!(Value::deserialize(deserializer)?, Value::Bool(true)))
}

// ============================================
// Parsing
// ============================================

/// Read and parse a transcript file.
///
/// Fails only when the file cannot be read as UTF-8 text.
pub fn parse_transcript_file(path: &Path) -> Result<Vec<Message>> {
    let content = std::fs::read_to_string(path).map_err(|source| Error::SessionLoad {
        path: path.to_path_buf(),
        source,
    })?;

    let messages = parse_transcript(&content);
    tracing::debug!(
        path = %path.display(),
        messages = messages.len(),
        "Parsed transcript"
    );
    Ok(messages)
}

/// Parse transcript text, one JSON record per line.
pub fn parse_transcript(content: &str) -> Vec<Message> {
    let mut messages = Vec::new();
    let mut skipped = 0usize;

    for line in content.lines() {
        if line.trim().is_empty() {
            continue;
        }
        match parse_record(line) {
            Some(message) => messages.push(message),
            None => skipped += 1,
        }
    }

    if skipped > 0 {
        tracing::debug!(skipped, kept = messages.len(), "Skipped non-message lines");
    }

    messages
}

/// Parse one line into a message, or `None` if the line carries no turn.
pub fn parse_record(line: &str) -> Option<Message> {
    let raw_json: Value = serde_json::from_str(line).ok()?;
    if !raw_json.is_object() {
        return None;
    }
    let record: RawRecord = serde_json::from_value(raw_json).ok()?;

    match record.record_type.as_deref() {
        Some("user") | Some("assistant") => {}
        _ => return None,
    }

    let message = record.message?;
    let role = match message.role?.as_str() {
        "user" => Role::Human,
        _ => Role::Agent,
    };
    let blocks = message.content?;

    let content: Vec<ContentBlock> = blocks.into_iter().filter_map(parse_block).collect();
    if content.is_empty() {
        return None;
    }

    let id = record
        .uuid
        .as_deref()
        .and_then(|s| Uuid::parse_str(s).ok())
        .unwrap_or_else(Uuid::new_v4);

    let parent_id = record
        .parent_uuid
        .as_deref()
        .and_then(|s| Uuid::parse_str(s).ok());

    let timestamp = record
        .timestamp
        .as_deref()
        .and_then(parse_timestamp)
        .unwrap_or_else(Utc::now);

    Some(Message {
        id,
        role,
        content,
        timestamp,
        parent_id,
    })
}

/// Parse an RFC 3339 / ISO-8601 timestamp into UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn parse_block(value: Value) -> Option<ContentBlock> {
    match serde_json::from_value::<RawBlock>(value).ok()? {
        RawBlock::Text { text } if !text.is_empty() => Some(ContentBlock::Text(text)),
        RawBlock::Text { .. } => None,
        RawBlock::ToolUse { id, name, input } => {
            Some(ContentBlock::ToolInvocation(ToolCall { id, name, input }))
        }
        RawBlock::ToolResult {
            tool_use_id,
            content,
            is_error,
        } => Some(ContentBlock::ToolOutcome(ToolResult {
            id: Uuid::new_v4(),
            tool_call_id: tool_use_id,
            content: tool_result_text(&content),
            is_error,
        })),
        RawBlock::Unknown => None,
    }
}

/// Tool output is either a plain string or a list of sub-blocks whose text
/// fragments are joined by newlines.
fn tool_result_text(content: &Value) -> String {
    match content {
        Value::String(s) => s.clone(),
        Value::Array(parts) => parts
            .iter()
            .filter_map(|part| part.get("text").and_then(Value::as_str))
            .collect::<Vec<_>>()
            .join("\n"),
        _ => String::new(),
    }
}
