//! Paginated in-memory catalog of discovered sessions
//!
//! The catalog owns the discovered file list, a cursor into it and the
//! summaries loaded so far. Readers take cheap snapshots; the only writer is
//! the page merge step, which runs under the page lock.
//!
//! ## Lifecycle
//!
//! ```text
//! Idle ──refresh()──► Scanning ──► Idle
//! Idle ──load_more()──► PagingInProgress ──► Idle
//! ```
//!
//! A refresh while another refresh is running is a no-op. A `load_more`
//! while a page is already loading is a no-op. A refresh supersedes any page
//! in flight: its results are dropped instead of merged.

use crate::config::{CatalogConfig, Config};
use crate::error::{Error, Result};
use crate::ingest::{discover_log_files, extract_summary, parse_transcript_file};
use crate::types::{LogFile, Session, SessionSummary};
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::{Mutex, Semaphore};
use tokio::task::JoinSet;

/// Tuning knobs for a [`SessionCatalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogOptions {
    /// Log files summarized per page
    pub page_size: usize,
    /// Files summarized concurrently within one page
    pub max_concurrency: usize,
    /// Head window scanned for the start timestamp
    pub summary_window_bytes: usize,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        CatalogOptions::from(&CatalogConfig::default())
    }
}

impl From<&CatalogConfig> for CatalogOptions {
    fn from(config: &CatalogConfig) -> Self {
        Self {
            page_size: config.page_size.max(1),
            max_concurrency: config.max_concurrency.max(1),
            summary_window_bytes: config.summary_window_bytes.max(1),
        }
    }
}

#[derive(Debug, Default)]
struct CatalogState {
    /// Discovery result, newest first
    files: Vec<LogFile>,
    /// Index of the first file not yet paged in
    cursor: usize,
    /// Sorted newest first, unique by source path
    summaries: Arc<Vec<SessionSummary>>,
    /// Last discovery failure
    error: Option<String>,
}

/// Clears the scanning flag when a refresh ends, however it ends.
struct ScanGuard<'a>(&'a AtomicBool);

impl Drop for ScanGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Paginated view over every transcript under one root.
pub struct SessionCatalog {
    root: PathBuf,
    options: CatalogOptions,
    state: RwLock<CatalogState>,
    /// Held for the whole of a page load or a refresh
    page_lock: Mutex<()>,
    scanning: AtomicBool,
    /// Bumped by every refresh; pages tagged with an older value are dropped
    generation: Arc<AtomicU64>,
    permits: Arc<Semaphore>,
}

impl SessionCatalog {
    pub fn new(root: impl Into<PathBuf>, options: CatalogOptions) -> Self {
        let options = CatalogOptions {
            page_size: options.page_size.max(1),
            max_concurrency: options.max_concurrency.max(1),
            summary_window_bytes: options.summary_window_bytes.max(1),
        };
        Self {
            root: root.into(),
            permits: Arc::new(Semaphore::new(options.max_concurrency)),
            options,
            state: RwLock::new(CatalogState::default()),
            page_lock: Mutex::new(()),
            scanning: AtomicBool::new(false),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Catalog over the configured root with the configured options.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.catalog.root_dir(),
            CatalogOptions::from(&config.catalog),
        )
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn options(&self) -> CatalogOptions {
        self.options
    }

    // ============================================
    // Mutations
    // ============================================

    /// Re-run discovery, reset the cursor and summaries, then load one page.
    ///
    /// A discovery failure leaves the catalog empty and is reported through
    /// [`SessionCatalog::error`].
    pub async fn refresh(&self) {
        if self.scanning.swap(true, Ordering::AcqRel) {
            tracing::debug!("Refresh already in progress, skipping");
            return;
        }
        let _scan = ScanGuard(&self.scanning);

        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        let _page = self.page_lock.lock().await;

        let root = self.root.clone();
        let discovered = tokio::task::spawn_blocking(move || discover_log_files(&root))
            .await
            .map_err(|e| Error::Task(e.to_string()))
            .and_then(|result| result);

        {
            let mut state = self.write_state();
            state.cursor = 0;
            state.summaries = Arc::new(Vec::new());
            match discovered {
                Ok(files) => {
                    state.files = files;
                    state.error = None;
                }
                Err(e) => {
                    tracing::warn!(root = %self.root.display(), error = %e, "Discovery failed");
                    state.files = Vec::new();
                    state.error = Some(e.to_string());
                    return;
                }
            }
        }

        self.load_page(generation).await;
    }

    /// Summarize the next page of discovered files.
    ///
    /// No-op when every file is already paged in or another page is loading.
    pub async fn load_more(&self) {
        let Ok(_page) = self.page_lock.try_lock() else {
            tracing::debug!("Page load already in progress, skipping");
            return;
        };
        let generation = self.generation.load(Ordering::Acquire);
        self.load_page(generation).await;
    }

    /// Parse the complete transcript behind a summary.
    ///
    /// Does not touch the catalog index, so it may run alongside paging.
    pub async fn load_full_session(&self, summary: &SessionSummary) -> Result<Session> {
        let path = summary.source_path.clone();
        let messages = tokio::task::spawn_blocking(move || parse_transcript_file(&path))
            .await
            .map_err(|e| Error::Task(e.to_string()))??;

        Ok(Session::new(
            summary.id.clone(),
            summary.project_identifier.clone(),
            messages,
        ))
    }

    async fn load_page(&self, generation: u64) {
        let (batch, end) = {
            let state = self.read_state();
            let start = state.cursor;
            if start >= state.files.len() {
                return;
            }
            let end = (start + self.options.page_size).min(state.files.len());
            (state.files[start..end].to_vec(), end)
        };
        let batch_len = batch.len();

        let mut tasks = JoinSet::new();
        for file in batch {
            let Ok(permit) = Arc::clone(&self.permits).acquire_owned().await else {
                break;
            };
            let current = Arc::clone(&self.generation);
            let window = self.options.summary_window_bytes;
            tasks.spawn_blocking(move || {
                let _permit = permit;
                if current.load(Ordering::Acquire) != generation {
                    return None;
                }
                match extract_summary(&file, window) {
                    Ok(summary) => Some(summary),
                    Err(e) => {
                        tracing::warn!(
                            path = %file.path.display(),
                            error = %e,
                            "Skipping unreadable log file"
                        );
                        None
                    }
                }
            });
        }

        let mut loaded = Vec::with_capacity(batch_len);
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Some(summary)) => loaded.push(summary),
                Ok(None) => {}
                Err(e) => tracing::warn!(error = %e, "Summary worker failed"),
            }
        }

        if self.generation.load(Ordering::Acquire) != generation {
            tracing::debug!(discarded = loaded.len(), "Dropping superseded page");
            return;
        }

        let mut state = self.write_state();
        let merged = merge_summaries(&state.summaries, loaded);
        let added = merged.len() - state.summaries.len();
        state.summaries = Arc::new(merged);
        state.cursor = end;

        tracing::debug!(
            requested = batch_len,
            added,
            cursor = state.cursor,
            total = state.files.len(),
            "Loaded page"
        );
    }

    // ============================================
    // Readers
    // ============================================

    /// Snapshot of all loaded summaries, newest first.
    pub fn summaries(&self) -> Arc<Vec<SessionSummary>> {
        Arc::clone(&self.read_state().summaries)
    }

    /// Loaded summaries for one project name, or all of them.
    pub fn filtered_by_project(&self, project_name: Option<&str>) -> Vec<SessionSummary> {
        let summaries = self.summaries();
        match project_name {
            Some(name) => summaries
                .iter()
                .filter(|s| s.project_name == name)
                .cloned()
                .collect(),
            None => summaries.as_ref().clone(),
        }
    }

    /// Distinct project names among loaded summaries, sorted.
    pub fn projects(&self) -> Vec<String> {
        self.summaries()
            .iter()
            .map(|s| s.project_name.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Whether discovered files remain beyond the cursor.
    pub fn has_more(&self) -> bool {
        let state = self.read_state();
        state.cursor < state.files.len()
    }

    /// Error from the last refresh, if discovery failed.
    pub fn error(&self) -> Option<String> {
        self.read_state().error.clone()
    }

    pub fn is_scanning(&self) -> bool {
        self.scanning.load(Ordering::Acquire)
    }

    /// Number of files found by the last discovery.
    pub fn discovered_count(&self) -> usize {
        self.read_state().files.len()
    }

    fn read_state(&self) -> RwLockReadGuard<'_, CatalogState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_state(&self) -> RwLockWriteGuard<'_, CatalogState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Union of existing and new summaries, unique by source path, newest first.
fn merge_summaries(
    existing: &[SessionSummary],
    new: Vec<SessionSummary>,
) -> Vec<SessionSummary> {
    let mut seen: HashSet<PathBuf> = existing.iter().map(|s| s.source_path.clone()).collect();
    let mut merged = existing.to_vec();
    for summary in new {
        if seen.insert(summary.source_path.clone()) {
            merged.push(summary);
        }
    }
    merged.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    merged
}
