//! MCP Terminal configuration
//!
//! Everything lives under one per-user directory (`~/.mcp_terminal/` unless
//! `MCP_TERMINAL_HOME` says otherwise):
//! - `session_history.db` - SQLite store
//! - `config/mcp-terminal.toml` - this configuration
//! - `logs/` - rolling log files

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

use crate::context::ContextLimits;

/// Environment variable overriding the per-user data directory
pub const HOME_ENV_VAR: &str = "MCP_TERMINAL_HOME";

const APP_DIR_NAME: &str = ".mcp_terminal";
const CONFIG_FILE_NAME: &str = "mcp-terminal.toml";

/// Extensions eligible for indexing (compared case-insensitively)
pub const DEFAULT_INDEXED_EXTENSIONS: &[&str] = &[
    ".py", ".js", ".jsx", ".ts", ".tsx", ".go", ".rs", ".cpp", ".c", ".h", ".hpp", ".java",
    ".php", ".rb", ".html", ".css", ".scss", ".json", ".yml", ".yaml", ".md", ".sh", ".bash",
    ".zsh", ".sql",
];

/// Directory names never descended into
pub const DEFAULT_IGNORED_DIRS: &[&str] = &[
    ".git",
    "__pycache__",
    "node_modules",
    "venv",
    "env",
    ".venv",
    ".env",
    "build",
    "dist",
];

/// Configuration for the indexing and retrieval core
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Version of the configuration format
    pub version: String,

    /// Database file name, relative to the data directory
    pub db_file: String,

    /// Extension allow-list, with leading dot
    pub indexed_extensions: Vec<String>,

    /// Directory names pruned from every walk
    pub ignored_dirs: Vec<String>,

    /// Extra glob patterns matched against project-relative paths
    pub ignore_patterns: Vec<String>,

    /// Files larger than this (bytes) are skipped by the worker
    pub max_file_size: u64,

    /// How long the idle worker waits on the queue before re-checking it
    pub worker_poll_interval_ms: u64,

    /// Caps and character budgets for context bundles
    pub context: ContextLimits,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: "0.3.0".to_string(),
            db_file: "session_history.db".to_string(),
            indexed_extensions: DEFAULT_INDEXED_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            ignored_dirs: DEFAULT_IGNORED_DIRS.iter().map(|s| s.to_string()).collect(),
            ignore_patterns: vec![],
            max_file_size: 1024 * 1024, // 1MB default
            worker_poll_interval_ms: 1000,
            context: ContextLimits::default(),
        }
    }
}

impl AppConfig {
    /// Load `config/mcp-terminal.toml` from `data_dir`, writing defaults when
    /// the file does not exist yet.
    pub fn load_or_init(data_dir: &Path) -> Result<Self> {
        let config_path = Self::config_path(data_dir);

        if !config_path.exists() {
            debug!("No configuration at {}, writing defaults", config_path.display());
            let config = Self::default();
            config.save(data_dir)?;
            return Ok(config);
        }

        Self::load(&config_path)
    }

    /// Load configuration from an explicit file
    pub fn load(config_path: &Path) -> Result<Self> {
        let config_content = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file {}", config_path.display()))?;

        match toml::from_str::<AppConfig>(&config_content) {
            Ok(config) => {
                debug!("Loaded configuration from: {}", config_path.display());
                Ok(config)
            }
            Err(e) => {
                // A broken config must not take the whole tool down
                warn!(
                    "Configuration file {} is invalid ({}), using defaults",
                    config_path.display(),
                    e
                );
                Ok(Self::default())
            }
        }
    }

    /// Save configuration to `config/mcp-terminal.toml` under `data_dir`
    pub fn save(&self, data_dir: &Path) -> Result<()> {
        let config_path = Self::config_path(data_dir);
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let toml_content = toml::to_string_pretty(self)
            .map_err(|e| anyhow!("Failed to serialize config: {}", e))?;

        fs::write(&config_path, toml_content)
            .map_err(|e| anyhow!("Failed to write config file: {}", e))?;

        debug!("Saved configuration to: {}", config_path.display());
        Ok(())
    }

    pub fn config_path(data_dir: &Path) -> PathBuf {
        data_dir.join("config").join(CONFIG_FILE_NAME)
    }

    /// Full path of the SQLite file under `data_dir`
    pub fn db_path(&self, data_dir: &Path) -> PathBuf {
        data_dir.join(&self.db_file)
    }

    pub fn worker_poll_interval(&self) -> Duration {
        Duration::from_millis(self.worker_poll_interval_ms.max(10))
    }
}

/// Returns the per-user data directory, creating it if needed.
///
/// `MCP_TERMINAL_HOME` wins; otherwise `$HOME/.mcp_terminal`
/// (`%USERPROFILE%` on Windows).
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os(HOME_ENV_VAR) {
        Some(custom) if !custom.is_empty() => PathBuf::from(custom),
        _ => {
            let home = std::env::var("HOME")
                .or_else(|_| std::env::var("USERPROFILE"))
                .context("Cannot determine home directory (HOME / USERPROFILE not set)")?;
            PathBuf::from(home).join(APP_DIR_NAME)
        }
    };

    if !dir.exists() {
        fs::create_dir_all(&dir).with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    Ok(dir)
}

/// Directory for rolling log files
pub fn logs_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("logs")
}
