//! Per-session statistics derived from a parsed message sequence.

use crate::types::{ContentBlock, Message, Role};
use chrono::Duration;
use std::collections::HashMap;

/// Immutable snapshot of counts for one session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionStats {
    pub human_message_count: usize,
    pub agent_message_count: usize,
    /// Same as `human_message_count`
    pub turn_count: usize,
    pub tool_call_count: usize,
    pub tool_calls_by_name: HashMap<String, usize>,
    /// Tool outcomes flagged as errors
    pub error_count: usize,
    /// Last timestamp minus first; `None` with fewer than two messages.
    ///
    /// Not clamped: out-of-order timestamps yield a negative duration.
    pub duration: Option<Duration>,
}

impl SessionStats {
    pub fn from_messages(messages: &[Message]) -> Self {
        let mut stats = SessionStats::default();

        for message in messages {
            match message.role {
                Role::Human => stats.human_message_count += 1,
                Role::Agent => stats.agent_message_count += 1,
            }

            for block in &message.content {
                match block {
                    ContentBlock::ToolInvocation(call) => {
                        stats.tool_call_count += 1;
                        *stats.tool_calls_by_name.entry(call.name.clone()).or_insert(0) += 1;
                    }
                    ContentBlock::ToolOutcome(result) if result.is_error => {
                        stats.error_count += 1;
                    }
                    _ => {}
                }
            }
        }

        stats.turn_count = stats.human_message_count;

        if let [first, .., last] = messages {
            stats.duration = Some(last.timestamp - first.timestamp);
        }

        stats
    }

    /// Compact duration such as `2h 5m`, `12m` or `<1m`.
    pub fn formatted_duration(&self) -> Option<String> {
        let seconds = self.duration?.num_seconds();
        let hours = seconds / 3600;
        let minutes = (seconds % 3600) / 60;

        Some(if hours > 0 {
            format!("{}h {}m", hours, minutes)
        } else if minutes > 0 {
            format!("{}m", minutes)
        } else {
            "<1m".to_string()
        })
    }

    /// Tool names with their call counts, most used first.
    pub fn tools_by_usage(&self) -> Vec<(&str, usize)> {
        let mut tools: Vec<(&str, usize)> = self
            .tool_calls_by_name
            .iter()
            .map(|(name, count)| (name.as_str(), *count))
            .collect();
        tools.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        tools
    }
}
