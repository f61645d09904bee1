//! Core domain types for logscope
//!
//! These types describe what the ingestion pipeline produces from transcript
//! files on disk.
//!
//! ## Terminology
//!
//! | Term | Definition |
//! |------|------------|
//! | **LogFile** | One discovered `*.jsonl` transcript and its modification time |
//! | **SessionSummary** | Lightweight listing record for one log file |
//! | **Session** | A fully parsed transcript with derived [`SessionStats`] |
//! | **Message** | One conversation turn made of ordered [`ContentBlock`]s |
//! | **Human** | The person driving the agent (transcripts call this role "user") |
//! | **Agent** | The coding agent (transcripts call this role "assistant") |

use crate::stats::SessionStats;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use uuid::Uuid;

// ============================================
// Source Files
// ============================================

/// A transcript file found during discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFile {
    /// Path to the `.jsonl` file
    pub path: PathBuf,
    /// Last modification time (Unix epoch when unreadable)
    pub modified_at: DateTime<Utc>,
}

impl LogFile {
    /// Directory name of the project folder containing this file.
    pub fn project_identifier(&self) -> String {
        project_identifier(&self.path)
    }
}

/// Name of the directory a transcript lives in, e.g. `-Users-alice-Code-widget`.
pub fn project_identifier(path: &Path) -> String {
    path.parent()
        .and_then(|p| p.file_name())
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
        .to_string()
}

/// Decode a project folder name into a short display name.
///
/// Folder names encode the project path with `/` replaced by `-`, so the
/// display name is the last dash-delimited component:
/// `-Users-alice-Code-widget` becomes `widget`.
pub fn project_name(identifier: &str) -> String {
    let decoded = identifier.replace('-', "/");
    decoded
        .trim_matches('/')
        .split('/')
        .last()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| identifier.to_string())
}

// ============================================
// Summaries
// ============================================

/// Listing record for one transcript file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    /// Deterministic id derived from `source_path`
    pub id: String,
    /// Encoded project folder name
    pub project_identifier: String,
    /// Decoded project name for display
    pub project_name: String,
    /// When the conversation started
    pub timestamp: DateTime<Utc>,
    /// Number of human-authored records in the whole file
    pub turn_count: usize,
    /// Transcript location
    pub source_path: PathBuf,
}

impl SessionSummary {
    /// Generate a deterministic session ID from the file path using SHA256.
    pub fn id_for(path: &Path) -> String {
        let mut hasher = Sha256::new();
        hasher.update(path.to_string_lossy().as_bytes());
        let hash = hasher.finalize();
        hex::encode(hash)[..16].to_string()
    }
}

// ============================================
// Messages
// ============================================

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Human,
    Agent,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Human => "human",
            Role::Agent => "agent",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One conversation turn.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    /// Record uuid, or a fresh v4 uuid when the record had none
    pub id: Uuid,
    pub role: Role,
    /// Blocks in document order; never empty
    pub content: Vec<ContentBlock>,
    pub timestamp: DateTime<Utc>,
    /// Causal link to an earlier message
    pub parent_id: Option<Uuid>,
}

impl Message {
    /// All text blocks joined by newlines.
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Tool invocations in this message, in order.
    pub fn tool_calls(&self) -> impl Iterator<Item = &ToolCall> {
        self.content.iter().filter_map(|block| match block {
            ContentBlock::ToolInvocation(call) => Some(call),
            _ => None,
        })
    }

    /// Tool outcomes in this message, in order.
    pub fn tool_results(&self) -> impl Iterator<Item = &ToolResult> {
        self.content.iter().filter_map(|block| match block {
            ContentBlock::ToolOutcome(result) => Some(result),
            _ => None,
        })
    }
}

/// One unit of message content.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentBlock {
    Text(String),
    ToolInvocation(ToolCall),
    ToolOutcome(ToolResult),
}

/// A tool invocation issued by the agent.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    /// Arguments in source order
    pub input: serde_json::Map<String, serde_json::Value>,
}

impl ToolCall {
    /// Short one-line description of the input.
    pub fn input_summary(&self) -> String {
        if let Some((key, serde_json::Value::String(value))) = self.input.iter().next() {
            let truncated: String = value.chars().take(50).collect();
            let ellipsis = if value.chars().count() > 50 { "..." } else { "" };
            return format!("{}: {}{}", key, truncated, ellipsis);
        }
        format!("{} parameters", self.input.len())
    }

    /// Pretty-printed input.
    pub fn input_json(&self) -> String {
        serde_json::to_string_pretty(&self.input).unwrap_or_else(|_| "{}".to_string())
    }
}

/// The outcome of a tool invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolResult {
    /// Fresh id; not taken from the transcript
    pub id: Uuid,
    /// Id of the [`ToolCall`] this answers
    pub tool_call_id: String,
    pub content: String,
    pub is_error: bool,
}

impl ToolResult {
    /// First five lines of output, with a trailing `...` when truncated.
    pub fn content_preview(&self) -> String {
        let lines: Vec<&str> = self.content.lines().collect();
        if lines.len() > 5 {
            format!("{}\n...", lines[..5].join("\n"))
        } else {
            self.content.clone()
        }
    }
}

// ============================================
// Sessions
// ============================================

/// A fully materialized transcript.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: String,
    /// Encoded project folder name
    pub project_path: String,
    pub project_name: String,
    pub messages: Vec<Message>,
    pub stats: SessionStats,
}

impl Session {
    /// Build a session, deriving the project name and stats up front.
    pub fn new(
        id: impl Into<String>,
        project_path: impl Into<String>,
        messages: Vec<Message>,
    ) -> Self {
        let project_path = project_path.into();
        let stats = SessionStats::from_messages(&messages);
        Self {
            id: id.into(),
            project_name: project_name(&project_path),
            project_path,
            messages,
            stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_project_name_simple() {
        assert_eq!(project_name("-Users-alice-Code-widget"), "widget");
    }

    #[test]
    fn test_project_name_takes_last_component() {
        assert_eq!(
            project_name("-Users-alice-Repos-alice-agent-log-scanner"),
            "scanner"
        );
    }

    #[test]
    fn test_project_name_degenerate() {
        assert_eq!(project_name("---"), "---");
        assert_eq!(project_name("plain"), "plain");
    }

    #[test]
    fn test_project_identifier_from_path() {
        let path = PathBuf::from("/root/projects/-Users-alice-Code-widget/abc.jsonl");
        assert_eq!(project_identifier(&path), "-Users-alice-Code-widget");
    }

    #[test]
    fn test_summary_id_is_stable() {
        let path = PathBuf::from("/root/projects/-p/abc.jsonl");
        let first = SessionSummary::id_for(&path);
        assert_eq!(first, SessionSummary::id_for(&path));
        assert_eq!(first.len(), 16);
        assert_ne!(first, SessionSummary::id_for(Path::new("/root/projects/-p/def.jsonl")));
    }

    #[test]
    fn test_input_summary() {
        let mut input = serde_json::Map::new();
        input.insert("command".to_string(), json!("ls -la"));
        input.insert("timeout".to_string(), json!(10));
        let call = ToolCall {
            id: "toolu_1".to_string(),
            name: "Bash".to_string(),
            input,
        };
        assert_eq!(call.input_summary(), "command: ls -la");

        let mut input = serde_json::Map::new();
        input.insert("limit".to_string(), json!(10));
        let call = ToolCall {
            id: "toolu_2".to_string(),
            name: "Read".to_string(),
            input,
        };
        assert_eq!(call.input_summary(), "1 parameters");
    }

    #[test]
    fn test_input_summary_truncates() {
        let mut input = serde_json::Map::new();
        input.insert("pattern".to_string(), json!("x".repeat(60)));
        let call = ToolCall {
            id: "toolu_1".to_string(),
            name: "Grep".to_string(),
            input,
        };
        assert_eq!(call.input_summary(), format!("pattern: {}...", "x".repeat(50)));
    }

    #[test]
    fn test_input_json_keeps_order() {
        let mut input = serde_json::Map::new();
        input.insert("path".to_string(), json!("src"));
        input.insert("glob".to_string(), json!("*.rs"));
        let call = ToolCall {
            id: "toolu_1".to_string(),
            name: "Glob".to_string(),
            input,
        };
        assert_eq!(
            call.input_json(),
            "{\n  \"path\": \"src\",\n  \"glob\": \"*.rs\"\n}"
        );
    }

    #[test]
    fn test_content_preview() {
        let result = ToolResult {
            id: Uuid::new_v4(),
            tool_call_id: "toolu_1".to_string(),
            content: "1\n2\n3\n4\n5\n6\n7".to_string(),
            is_error: false,
        };
        assert_eq!(result.content_preview(), "1\n2\n3\n4\n5\n...");

        let short = ToolResult {
            content: "only line".to_string(),
            ..result
        };
        assert_eq!(short.content_preview(), "only line");
    }

    #[test]
    fn test_text_content_joins_text_blocks() {
        let message = Message {
            id: Uuid::new_v4(),
            role: Role::Agent,
            content: vec![
                ContentBlock::Text("first".to_string()),
                ContentBlock::ToolInvocation(ToolCall {
                    id: "toolu_1".to_string(),
                    name: "Read".to_string(),
                    input: serde_json::Map::new(),
                }),
                ContentBlock::Text("second".to_string()),
            ],
            timestamp: Utc::now(),
            parent_id: None,
        };
        assert_eq!(message.text_content(), "first\nsecond");
        assert_eq!(message.tool_calls().count(), 1);
        assert_eq!(message.tool_results().count(), 0);
    }
}
