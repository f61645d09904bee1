//! Prompt rendering and reply decoding for analysis providers

use super::types::AnalysisSuggestion;
use crate::error::{Error, Result};
use crate::types::{Role, Session};

/// Instructions given to every provider ahead of the session material.
pub const SYSTEM_PROMPT: &str = r#"You review coding-agent sessions and extract lessons that will make future sessions go better. You receive:

1. The transcript of one session between a human and a coding agent
2. A summary of the tools the agent called and how many failed
3. The current CLAUDE.md notes for the project and for the user globally

Produce small, independent suggestions for what to add to those notes.

## What to look for

- Preferences: how the human likes to communicate and work, and which technologies they favor
- Workflow: multi-step procedures that worked and confirmation habits the human expects
- Tool usage: wrong parameters, wrong tool for the job, calls that could be batched, redundant reads or searches
- Error prevention: mistakes or bad assumptions that a written rule would have avoided
- Knowledge: project facts or conventions the agent was missing
- Skills: reusable techniques worth capturing as a named procedure

## Output

Reply with a JSON array and nothing else:

[
  {
    "category": "preference|workflow|tool-usage|error-prevention|knowledge|skill",
    "target": "project|global",
    "suggestion": "Exact text to add to CLAUDE.md",
    "reasoning": "Why this helps, briefly",
    "evidence": "Quote or reference from the session"
  }
]

## Rules

- One idea per suggestion, phrased as an instruction rather than an observation
- Be specific and actionable
- Skip anything the existing notes already say
- Favor rules that stop repeated mistakes
- Reply with [] when there is nothing worth adding"#;

/// Plain-text transcript: role headers and text, plus one line per tool call.
pub fn render_transcript(session: &Session) -> String {
    let mut lines: Vec<String> = Vec::new();

    for message in &session.messages {
        let text = message.text_content();
        if !text.is_empty() {
            let header = match message.role {
                Role::Human => "[Human]",
                Role::Agent => "[Assistant]",
            };
            lines.push(header.to_string());
            lines.push(text);
            lines.push(String::new());
        }

        for call in message.tool_calls() {
            lines.push(format!("[Tool: {}]", call.name));
        }
    }

    lines.join("\n")
}

/// Tool call counts by name, most used first, and the failure count.
pub fn render_tool_summary(session: &Session) -> String {
    let stats = &session.stats;

    let mut lines = vec!["Tool calls by name:".to_string()];
    lines.extend(
        stats
            .tools_by_usage()
            .into_iter()
            .map(|(name, count)| format!("- {}: {}", name, count)),
    );

    if stats.error_count > 0 {
        lines.push(String::new());
        lines.push(format!("Failed tool calls: {}", stats.error_count));
    }

    lines.join("\n")
}

/// Full user prompt for one session.
///
/// Notes files are passed through verbatim; `None` means the file was not
/// found.
pub fn render_user_prompt(
    session: &Session,
    project_notes: Option<&str>,
    global_notes: Option<&str>,
) -> String {
    format!(
        "## Session Transcript\n\n{}\n\n\
         ## Tool Usage Summary\n\n{}\n\n\
         ## Current Project CLAUDE.md\n\n{}\n\n\
         ## Current Global CLAUDE.md\n\n{}\n\n\
         ---\n\n\
         Analyze this session and suggest changes that would improve future coding-agent sessions.",
        render_transcript(session),
        render_tool_summary(session),
        project_notes.unwrap_or("(No project CLAUDE.md found)"),
        global_notes.unwrap_or("(No global CLAUDE.md found)"),
    )
}

/// Decode the suggestion array from a provider reply.
///
/// Text around the outermost `[` ... `]` span is ignored.
pub fn parse_suggestions(response: &str) -> Result<Vec<AnalysisSuggestion>> {
    let trimmed = response.trim();
    let json = match (trimmed.find('['), trimmed.rfind(']')) {
        (Some(start), Some(end)) if start < end => &trimmed[start..=end],
        _ => trimmed,
    };

    serde_json::from_str(json)
        .map_err(|e| Error::Analysis(format!("failed to decode suggestions: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::types::{AnalysisCategory, AnalysisTarget};
    use crate::types::{ContentBlock, Message, ToolCall, ToolResult};
    use chrono::Utc;
    use uuid::Uuid;

    fn message(role: Role, content: Vec<ContentBlock>) -> Message {
        Message {
            id: Uuid::new_v4(),
            role,
            content,
            timestamp: Utc::now(),
            parent_id: None,
        }
    }

    fn call(name: &str) -> ContentBlock {
        ContentBlock::ToolInvocation(ToolCall {
            id: format!("toolu_{}", name),
            name: name.to_string(),
            input: serde_json::Map::new(),
        })
    }

    fn failure() -> ContentBlock {
        ContentBlock::ToolOutcome(ToolResult {
            id: Uuid::new_v4(),
            tool_call_id: "toolu_Bash".to_string(),
            content: "command not found".to_string(),
            is_error: true,
        })
    }

    fn session() -> Session {
        Session::new(
            "abc",
            "-Users-alice-Code-widget",
            vec![
                message(Role::Human, vec![ContentBlock::Text("Run the tests".to_string())]),
                message(
                    Role::Agent,
                    vec![
                        ContentBlock::Text("Running them now.".to_string()),
                        call("Bash"),
                        call("Read"),
                    ],
                ),
                message(Role::Human, vec![failure()]),
                message(Role::Agent, vec![call("Bash")]),
            ],
        )
    }

    #[test]
    fn test_render_transcript() {
        let expected = [
            "[Human]",
            "Run the tests",
            "",
            "[Assistant]",
            "Running them now.",
            "",
            "[Tool: Bash]",
            "[Tool: Read]",
            "[Tool: Bash]",
        ]
        .join("\n");
        assert_eq!(render_transcript(&session()), expected);
    }

    #[test]
    fn test_render_tool_summary() {
        let expected = [
            "Tool calls by name:",
            "- Bash: 2",
            "- Read: 1",
            "",
            "Failed tool calls: 1",
        ]
        .join("\n");
        let session = session();
        assert_eq!(render_tool_summary(&session), expected);
        assert_eq!(session.stats.tool_call_count, 3);
        assert_eq!(session.stats.error_count, 1);
    }

    #[test]
    fn test_tool_summary_without_failures() {
        let session = Session::new(
            "abc",
            "-p",
            vec![message(Role::Agent, vec![call("Read"), call("Edit")])],
        );
        assert_eq!(
            render_tool_summary(&session),
            "Tool calls by name:\n- Edit: 1\n- Read: 1"
        );
    }

    #[test]
    fn test_user_prompt_placeholders() {
        let prompt = render_user_prompt(&session(), None, Some("- Use tabs"));
        assert!(prompt.starts_with("## Session Transcript\n\n[Human]"));
        assert!(prompt.contains("## Tool Usage Summary\n\nTool calls by name:"));
        assert!(prompt.contains("## Current Project CLAUDE.md\n\n(No project CLAUDE.md found)"));
        assert!(prompt.contains("## Current Global CLAUDE.md\n\n- Use tabs"));
        assert!(prompt.ends_with("future coding-agent sessions."));
    }

    #[test]
    fn test_parse_suggestions_with_surrounding_text() {
        let reply = r#"Here is what I found:
```json
[
  {"category": "workflow", "target": "project", "suggestion": "Run cargo test before committing", "reasoning": "Broken build", "evidence": "[Tool: Bash]"},
  {"category": "made-up", "target": "somewhere", "suggestion": "s", "reasoning": "r", "evidence": "e"}
]
```
Hope that helps."#;

        let suggestions = parse_suggestions(reply).unwrap();
        assert_eq!(suggestions.len(), 2);
        assert_eq!(suggestions[0].category, AnalysisCategory::Workflow);
        assert_eq!(suggestions[0].suggestion, "Run cargo test before committing");
        assert_eq!(suggestions[1].category, AnalysisCategory::Knowledge);
        assert_eq!(suggestions[1].target, AnalysisTarget::Project);
    }

    #[test]
    fn test_parse_empty_array() {
        assert!(parse_suggestions("  []  ").unwrap().is_empty());
    }

    #[test]
    fn test_parse_failures() {
        for reply in ["", "no suggestions today", "] backwards [", "[{\"category\": 1}]"] {
            assert!(
                matches!(parse_suggestions(reply), Err(Error::Analysis(_))),
                "should fail: {:?}",
                reply
            );
        }
    }
}
