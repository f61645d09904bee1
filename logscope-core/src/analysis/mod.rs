//! Session analysis: suggestion types, provider prompts and the result cache
//!
//! A provider is any [`AnalysisBackend`] that turns a system prompt and a
//! user prompt into a reply. This module renders the prompts, decodes the
//! reply and leaves persistence to [`AnalysisCache`]:
//!
//! ```rust,ignore
//! use logscope_core::analysis::{analyze, AnalysisCache};
//!
//! let suggestions = analyze(&backend, &session, project_notes, global_notes)?;
//! cache.save(&suggestions, &summary.source_path)?;
//! ```

mod cache;
mod prompt;
mod types;

pub use cache::{cache_key, AnalysisCache};
pub use prompt::{
    parse_suggestions, render_tool_summary, render_transcript, render_user_prompt, SYSTEM_PROMPT,
};
pub use types::{
    AnalysisCategory, AnalysisProvider, AnalysisRecord, AnalysisSuggestion, AnalysisTarget,
};

use crate::error::Result;
use crate::types::Session;

/// A source of completions for analysis prompts.
pub trait AnalysisBackend {
    /// Which provider this backend talks to.
    fn provider(&self) -> AnalysisProvider;

    /// Send both prompts and return the raw reply text.
    fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;
}

/// Render the prompts for `session`, ask `backend`, and decode its reply.
pub fn analyze(
    backend: &dyn AnalysisBackend,
    session: &Session,
    project_notes: Option<&str>,
    global_notes: Option<&str>,
) -> Result<Vec<AnalysisSuggestion>> {
    let user_prompt = render_user_prompt(session, project_notes, global_notes);

    tracing::info!(
        provider = backend.provider().display_name(),
        session_id = %session.id,
        prompt_bytes = user_prompt.len(),
        "Requesting analysis"
    );

    let reply = backend.complete(SYSTEM_PROMPT, &user_prompt)?;
    let suggestions = parse_suggestions(&reply)?;

    tracing::info!(
        session_id = %session.id,
        suggestions = suggestions.len(),
        "Analysis complete"
    );
    Ok(suggestions)
}
