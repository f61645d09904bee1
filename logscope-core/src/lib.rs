//! # logscope-core
//!
//! Core library for logscope - a browser for coding-agent session transcripts.
//!
//! This library provides:
//! - Discovery of JSONL transcripts under `~/.claude/projects`
//! - A paginated, concurrently loaded catalog of session summaries
//! - A tolerant transcript parser and per-session statistics
//! - A file-backed cache for analysis suggestions
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Example
//!
//! ```rust,no_run
//! use logscope_core::{Config, SessionCatalog};
//!
//! # async fn run() -> logscope_core::Result<()> {
//! let config = Config::load()?;
//! let catalog = SessionCatalog::from_config(&config);
//!
//! catalog.refresh().await;
//! while catalog.has_more() {
//!     catalog.load_more().await;
//! }
//!
//! for summary in catalog.summaries().iter() {
//!     let session = catalog.load_full_session(summary).await?;
//!     println!("{}: {} turns", session.project_name, session.stats.turn_count);
//! }
//! # Ok(())
//! # }
//! ```

// Re-export commonly used items at the crate root
pub use analysis::{AnalysisCache, AnalysisRecord, AnalysisSuggestion};
pub use catalog::{CatalogOptions, SessionCatalog};
pub use config::Config;
pub use error::{Error, Result};
pub use stats::SessionStats;
pub use types::*;

// Public modules
pub mod analysis;
pub mod catalog;
pub mod config;
pub mod error;
pub mod ingest;
pub mod logging;
pub mod stats;
pub mod types;
