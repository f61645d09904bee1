//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/logscope/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/logscope/` (~/.config/logscope/)
//! - Data: `$XDG_DATA_HOME/logscope/` (~/.local/share/logscope/)
//! - State/Logs: `$XDG_STATE_HOME/logscope/` (~/.local/state/logscope/)

use crate::analysis::AnalysisProvider;
use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_DATA_HOME or ~/.local/share
fn xdg_data_home() -> PathBuf {
    std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/share"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Session catalog configuration
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Analysis cache and provider configuration
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Session catalog configuration
#[derive(Debug, Deserialize)]
pub struct CatalogConfig {
    /// Override for the transcript root (defaults to ~/.claude/projects)
    pub root: Option<PathBuf>,

    /// Number of log files summarized per page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Upper bound on files parsed concurrently within one page
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Bytes read from the head of each file when looking for a start time
    #[serde(default = "default_summary_window_bytes")]
    pub summary_window_bytes: usize,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            root: None,
            page_size: default_page_size(),
            max_concurrency: default_max_concurrency(),
            summary_window_bytes: default_summary_window_bytes(),
        }
    }
}

impl CatalogConfig {
    /// Resolved transcript root.
    pub fn root_dir(&self) -> PathBuf {
        self.root
            .clone()
            .unwrap_or_else(|| home_dir().join(".claude").join("projects"))
    }
}

fn default_page_size() -> usize {
    50
}

fn default_max_concurrency() -> usize {
    8
}

fn default_summary_window_bytes() -> usize {
    10_000
}

/// Analysis configuration
#[derive(Debug, Deserialize, Default)]
pub struct AnalysisConfig {
    /// Override for the analysis cache directory
    pub cache_dir: Option<PathBuf>,

    /// Which external provider produces suggestions
    #[serde(default)]
    pub provider: AnalysisProvider,
}

impl AnalysisConfig {
    /// Resolved analysis cache directory.
    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir
            .clone()
            .unwrap_or_else(|| Config::data_dir().join("analyses"))
    }
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Maximum number of log files to keep
    #[serde(default = "default_max_log_files")]
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            max_files: default_max_log_files(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_log_files() -> usize {
    5
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        Self::from_toml(&content)
    }

    /// Parse and validate configuration text
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration, returning error message if invalid
    pub fn validate(&self) -> Result<()> {
        if self.catalog.page_size == 0 {
            return Err(Error::Config(
                "catalog.page_size must be at least 1".to_string(),
            ));
        }
        if self.catalog.max_concurrency == 0 {
            return Err(Error::Config(
                "catalog.max_concurrency must be at least 1".to_string(),
            ));
        }
        if self.catalog.summary_window_bytes == 0 {
            return Err(Error::Config(
                "catalog.summary_window_bytes must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/logscope/config.toml` (~/.config/logscope/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("logscope").join("config.toml")
    }

    /// Returns the data directory path (for the analysis cache)
    ///
    /// `$XDG_DATA_HOME/logscope/` (~/.local/share/logscope/)
    pub fn data_dir() -> PathBuf {
        xdg_data_home().join("logscope")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/logscope/` (~/.local/state/logscope/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("logscope")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.catalog.page_size, 50);
        assert_eq!(config.catalog.max_concurrency, 8);
        assert_eq!(config.catalog.summary_window_bytes, 10_000);
        assert_eq!(config.analysis.provider, AnalysisProvider::Codex);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[catalog]
root = "/tmp/transcripts"
page_size = 20

[analysis]
provider = "claude"

[logging]
level = "debug"
"#;
        let config = Config::from_toml(toml).unwrap();

        assert_eq!(config.catalog.root_dir(), PathBuf::from("/tmp/transcripts"));
        assert_eq!(config.catalog.page_size, 20);
        assert_eq!(config.catalog.max_concurrency, 8);
        assert_eq!(config.analysis.provider, AnalysisProvider::Claude);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let toml = r#"
[catalog]
page_size = 0
"#;
        let err = Config::from_toml(toml).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_cache_dir_override() {
        let toml = r#"
[analysis]
cache_dir = "/tmp/analyses"
"#;
        let config = Config::from_toml(toml).unwrap();
        assert_eq!(config.analysis.cache_dir(), PathBuf::from("/tmp/analyses"));
    }

    #[test]
    fn test_default_paths_are_namespaced() {
        assert!(Config::config_path().ends_with("logscope/config.toml"));
        assert!(Config::state_dir().ends_with("logscope"));
        assert!(AnalysisConfig::default().cache_dir().ends_with("analyses"));
    }
}
