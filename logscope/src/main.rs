//! logscope - browse AI coding agent sessions
//!
//! Lists transcripts under `~/.claude/projects`, shows per-session stats and
//! prints cached analysis results.

use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use logscope_core::analysis::AnalysisCache;
use logscope_core::ingest::parse_transcript_file;
use logscope_core::types::{project_identifier, Role, Session, SessionSummary};
use logscope_core::{Config, SessionCatalog};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "logscope")]
#[command(about = "Browse AI coding agent sessions")]
#[command(version)]
struct Args {
    /// Override the transcript root (default: ~/.claude/projects)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List sessions, newest first
    List {
        /// Only show sessions for this project name
        #[arg(long)]
        project: Option<String>,

        /// Number of pages to load (default: all)
        #[arg(long)]
        pages: Option<usize>,

        /// Print summaries as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show stats and the conversation for one transcript
    Show {
        /// Path to a .jsonl transcript
        path: PathBuf,

        /// Print every message, not just the stats
        #[arg(long)]
        messages: bool,
    },

    /// Print the cached analysis for one transcript
    Analysis {
        /// Path to a .jsonl transcript
        path: PathBuf,

        /// Delete the cached analysis instead of printing it
        #[arg(long)]
        forget: bool,
    },

    /// List distinct project names
    Projects,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load().context("failed to load configuration")?;
    let _log_guard = logscope_core::logging::init(&config.logging).ok();

    if let Some(root) = args.root {
        config.catalog.root = Some(root);
    }

    match args.command {
        Command::List {
            project,
            pages,
            json,
        } => list(&config, project.as_deref(), pages, json).await,
        Command::Show { path, messages } => show(&path, messages),
        Command::Analysis { path, forget } => analysis(&config, &path, forget),
        Command::Projects => projects(&config).await,
    }
}

async fn load_catalog(config: &Config, pages: Option<usize>) -> Result<SessionCatalog> {
    let catalog = SessionCatalog::from_config(config);
    catalog.refresh().await;

    if let Some(error) = catalog.error() {
        anyhow::bail!("failed to scan {}: {}", catalog.root().display(), error);
    }

    let mut loaded = 1;
    while catalog.has_more() && pages.map_or(true, |max| loaded < max) {
        catalog.load_more().await;
        loaded += 1;
    }

    tracing::info!(
        summaries = catalog.summaries().len(),
        discovered = catalog.discovered_count(),
        "Catalog loaded"
    );
    Ok(catalog)
}

async fn list(
    config: &Config,
    project: Option<&str>,
    pages: Option<usize>,
    json: bool,
) -> Result<()> {
    let catalog = load_catalog(config, pages).await?;
    let summaries = catalog.filtered_by_project(project);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summaries).context("failed to encode summaries")?
        );
        return Ok(());
    }

    if summaries.is_empty() {
        println!("No sessions found under {}", catalog.root().display());
        return Ok(());
    }

    println!("{:<17} {:<20} {:>6}  {}", "WHEN", "PROJECT", "TURNS", "FILE");
    for summary in &summaries {
        print_summary_row(summary);
    }

    if catalog.has_more() {
        println!();
        println!(
            "Showing {} of {} sessions; pass --pages to load more",
            catalog.summaries().len(),
            catalog.discovered_count()
        );
    }
    Ok(())
}

fn print_summary_row(summary: &SessionSummary) {
    let file = summary
        .source_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    println!(
        "{:<17} {:<20} {:>6}  {}",
        summary
            .timestamp
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M")
            .to_string(),
        truncate(&summary.project_name, 20),
        summary.turn_count,
        file
    );
}

async fn projects(config: &Config) -> Result<()> {
    let catalog = load_catalog(config, None).await?;
    for name in catalog.projects() {
        println!("{}", name);
    }
    Ok(())
}

fn show(path: &Path, with_messages: bool) -> Result<()> {
    let messages = parse_transcript_file(path)
        .with_context(|| format!("failed to load {}", path.display()))?;
    let session = Session::new(
        SessionSummary::id_for(path),
        project_identifier(path),
        messages,
    );
    let stats = &session.stats;

    println!("Session   {}", session.id);
    println!("Project   {}", session.project_name);
    println!(
        "Messages  {} ({} human, {} agent)",
        session.messages.len(),
        stats.human_message_count,
        stats.agent_message_count
    );
    println!("Turns     {}", stats.turn_count);
    println!(
        "Duration  {}",
        stats.formatted_duration().unwrap_or_else(|| "-".to_string())
    );
    println!(
        "Tools     {} calls, {} failed",
        stats.tool_call_count, stats.error_count
    );
    for (name, count) in stats.tools_by_usage() {
        println!("  {:<20} {}", name, count);
    }

    if with_messages {
        for message in &session.messages {
            println!();
            let who = match message.role {
                Role::Human => "Human",
                Role::Agent => "Agent",
            };
            println!(
                "[{}] {}",
                who,
                message.timestamp.with_timezone(&Local).format("%H:%M:%S")
            );
            let text = message.text_content();
            if !text.is_empty() {
                println!("{}", text);
            }
            for call in message.tool_calls() {
                println!("  -> {} ({})", call.name, call.input_summary());
            }
            for result in message.tool_results() {
                let marker = if result.is_error { "!!" } else { "<-" };
                println!("  {} {}", marker, result.content_preview());
            }
        }
    }
    Ok(())
}

fn analysis(config: &Config, path: &Path, forget: bool) -> Result<()> {
    let cache = AnalysisCache::from_config(config);

    if forget {
        cache
            .delete(path)
            .with_context(|| format!("failed to delete analysis for {}", path.display()))?;
        println!("Deleted analysis for {}", path.display());
        return Ok(());
    }

    let Some(record) = cache.load(path) else {
        println!("No analysis cached for {}", path.display());
        return Ok(());
    };

    println!(
        "Analyzed {} ({} suggestions)",
        record.analyzed_at.with_timezone(&Local).format("%Y-%m-%d %H:%M"),
        record.suggestions.len()
    );
    for suggestion in &record.suggestions {
        println!();
        println!(
            "[{}] -> {}",
            suggestion.category.display_name(),
            suggestion.target.display_name()
        );
        println!("  {}", suggestion.suggestion);
        println!("  Why: {}", suggestion.reasoning);
        println!("  Evidence: {}", suggestion.evidence);
    }
    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max.saturating_sub(3)).collect();
        out.push_str("...");
        out
    }
}
