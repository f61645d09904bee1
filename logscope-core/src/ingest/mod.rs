//! Ingestion layer for transcript files
//!
//! Turns raw files on disk into the domain types in [`crate::types`].
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────┐     ┌──────────────────┐     ┌─────────────────┐
//! │  Source Files   │ ──► │    discovery     │ ──► │  SessionCatalog │
//! │ (~/.claude/...) │     │   (LogFile list) │     │   (summaries)   │
//! └─────────────────┘     └──────────────────┘     └─────────────────┘
//!                                                          │
//!                               ┌──────────────────────────┤
//!                               ▼                          ▼
//!                    ┌──────────────────────┐   ┌──────────────────────┐
//!                    │  summary (head scan) │   │ transcript (full)    │
//!                    └──────────────────────┘   └──────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use logscope_core::ingest::{discover_log_files, extract_summary, parse_transcript_file};
//!
//! for file in discover_log_files(&root)? {
//!     let summary = extract_summary(&file, 10_000)?;
//!     let messages = parse_transcript_file(&summary.source_path)?;
//!     println!("{}: {} messages", summary.project_name, messages.len());
//! }
//! ```

mod discovery;
mod summary;
mod transcript;

pub use discovery::{discover_log_files, LOG_EXTENSION, SUBAGENT_PREFIX};
pub use summary::{count_human_records, extract_summary};
pub use transcript::{parse_record, parse_timestamp, parse_transcript, parse_transcript_file};
