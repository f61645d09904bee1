//! Suggestion and record types for session analysis

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What kind of guidance a suggestion carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", from = "String")]
pub enum AnalysisCategory {
    Preference,
    Workflow,
    ToolUsage,
    ErrorPrevention,
    Knowledge,
    Skill,
}

impl AnalysisCategory {
    pub const ALL: [AnalysisCategory; 6] = [
        AnalysisCategory::Preference,
        AnalysisCategory::Workflow,
        AnalysisCategory::ToolUsage,
        AnalysisCategory::ErrorPrevention,
        AnalysisCategory::Knowledge,
        AnalysisCategory::Skill,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisCategory::Preference => "preference",
            AnalysisCategory::Workflow => "workflow",
            AnalysisCategory::ToolUsage => "tool-usage",
            AnalysisCategory::ErrorPrevention => "error-prevention",
            AnalysisCategory::Knowledge => "knowledge",
            AnalysisCategory::Skill => "skill",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            AnalysisCategory::Preference => "Preference",
            AnalysisCategory::Workflow => "Workflow",
            AnalysisCategory::ToolUsage => "Tool Usage",
            AnalysisCategory::ErrorPrevention => "Error Prevention",
            AnalysisCategory::Knowledge => "Knowledge",
            AnalysisCategory::Skill => "Skill",
        }
    }
}

impl From<String> for AnalysisCategory {
    /// Unrecognized values become [`AnalysisCategory::Knowledge`].
    fn from(value: String) -> Self {
        AnalysisCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == value)
            .unwrap_or(AnalysisCategory::Knowledge)
    }
}

impl std::fmt::Display for AnalysisCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which notes file a suggestion belongs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum AnalysisTarget {
    Project,
    Global,
}

impl AnalysisTarget {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisTarget::Project => "project",
            AnalysisTarget::Global => "global",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            AnalysisTarget::Project => "Project CLAUDE.md",
            AnalysisTarget::Global => "Global CLAUDE.md",
        }
    }
}

impl From<String> for AnalysisTarget {
    /// Anything other than `global` is [`AnalysisTarget::Project`].
    fn from(value: String) -> Self {
        match value.as_str() {
            "global" => AnalysisTarget::Global,
            _ => AnalysisTarget::Project,
        }
    }
}

impl std::fmt::Display for AnalysisTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// External tool that produces suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisProvider {
    #[default]
    Codex,
    Claude,
}

impl AnalysisProvider {
    pub fn display_name(&self) -> &'static str {
        match self {
            AnalysisProvider::Codex => "Codex (GPT-5.2)",
            AnalysisProvider::Claude => "Claude",
        }
    }
}

/// One atomic recommendation derived from a session.
///
/// The id is local to this process: it is never written out and a fresh one
/// is assigned whenever a suggestion is decoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "SuggestionFields")]
pub struct AnalysisSuggestion {
    #[serde(skip_serializing)]
    pub id: Uuid,
    pub category: AnalysisCategory,
    pub target: AnalysisTarget,
    /// Text to add to the notes file
    pub suggestion: String,
    pub reasoning: String,
    pub evidence: String,
}

impl AnalysisSuggestion {
    pub fn new(
        category: AnalysisCategory,
        target: AnalysisTarget,
        suggestion: impl Into<String>,
        reasoning: impl Into<String>,
        evidence: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            category,
            target,
            suggestion: suggestion.into(),
            reasoning: reasoning.into(),
            evidence: evidence.into(),
        }
    }

    /// Equality ignoring the process-local id.
    pub fn same_content(&self, other: &AnalysisSuggestion) -> bool {
        self.category == other.category
            && self.target == other.target
            && self.suggestion == other.suggestion
            && self.reasoning == other.reasoning
            && self.evidence == other.evidence
    }
}

/// Wire shape of a suggestion.
#[derive(Deserialize)]
struct SuggestionFields {
    category: AnalysisCategory,
    target: AnalysisTarget,
    suggestion: String,
    reasoning: String,
    evidence: String,
}

impl From<SuggestionFields> for AnalysisSuggestion {
    fn from(fields: SuggestionFields) -> Self {
        AnalysisSuggestion::new(
            fields.category,
            fields.target,
            fields.suggestion,
            fields.reasoning,
            fields.evidence,
        )
    }
}

/// The stored result of analyzing one log file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    /// Source log path, kept for auditing
    pub session_file_path: String,
    pub analyzed_at: DateTime<Utc>,
    pub suggestions: Vec<AnalysisSuggestion>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_category_round_trip_names() {
        for category in AnalysisCategory::ALL {
            let encoded = serde_json::to_value(category).unwrap();
            assert_eq!(encoded, json!(category.as_str()));
            let decoded: AnalysisCategory = serde_json::from_value(encoded).unwrap();
            assert_eq!(decoded, category);
        }
    }

    #[test]
    fn test_unknown_category_and_target_fall_back() {
        let suggestion: AnalysisSuggestion = serde_json::from_value(json!({
            "category": "vibes",
            "target": "team",
            "suggestion": "Run the linter before committing",
            "reasoning": "Lint failures happened twice",
            "evidence": "cargo clippy failed"
        }))
        .unwrap();

        assert_eq!(suggestion.category, AnalysisCategory::Knowledge);
        assert_eq!(suggestion.target, AnalysisTarget::Project);
    }

    #[test]
    fn test_known_values_decode() {
        let suggestion: AnalysisSuggestion = serde_json::from_value(json!({
            "category": "error-prevention",
            "target": "global",
            "suggestion": "s",
            "reasoning": "r",
            "evidence": "e"
        }))
        .unwrap();

        assert_eq!(suggestion.category, AnalysisCategory::ErrorPrevention);
        assert_eq!(suggestion.target, AnalysisTarget::Global);
        assert_eq!(suggestion.category.display_name(), "Error Prevention");
        assert_eq!(suggestion.target.display_name(), "Global CLAUDE.md");
    }

    #[test]
    fn test_missing_field_is_an_error() {
        let result: std::result::Result<AnalysisSuggestion, _> = serde_json::from_value(json!({
            "category": "workflow",
            "target": "project",
            "suggestion": "s"
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_id_is_not_serialized_and_regenerated() {
        let original = AnalysisSuggestion::new(
            AnalysisCategory::Skill,
            AnalysisTarget::Project,
            "s",
            "r",
            "e",
        );
        let encoded = serde_json::to_value(&original).unwrap();
        assert!(encoded.get("id").is_none());

        let decoded: AnalysisSuggestion = serde_json::from_value(encoded).unwrap();
        assert_ne!(decoded.id, original.id);
        assert!(decoded.same_content(&original));
    }

    #[test]
    fn test_record_uses_camel_case_keys() {
        let record = AnalysisRecord {
            session_file_path: "/r/-p/a.jsonl".to_string(),
            analyzed_at: Utc::now(),
            suggestions: vec![],
        };
        let encoded = serde_json::to_value(&record).unwrap();
        assert!(encoded.get("sessionFilePath").is_some());
        assert!(encoded.get("analyzedAt").is_some());
        assert!(encoded.get("suggestions").is_some());
    }

    #[test]
    fn test_provider_names() {
        assert_eq!(AnalysisProvider::default(), AnalysisProvider::Codex);
        assert_eq!(AnalysisProvider::Codex.display_name(), "Codex (GPT-5.2)");
        let decoded: AnalysisProvider = serde_json::from_value(json!("claude")).unwrap();
        assert_eq!(decoded, AnalysisProvider::Claude);
    }
}
