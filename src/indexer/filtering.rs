//! File filtering logic for ingestion
//!
//! Decides which discovered paths are indexed, based on an extension
//! allow-list, a directory deny-list and optional glob ignore patterns.
//! Pure path-string checks, no I/O.

use anyhow::Result;
use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::{Component, Path};

use crate::config::AppConfig;

/// Eligibility rules for discovered paths
#[derive(Debug, Clone)]
pub struct FileFilter {
    /// Lower-cased, without the leading dot
    extensions: HashSet<String>,
    ignored_dirs: HashSet<String>,
    ignore_patterns: Vec<glob::Pattern>,
}

impl FileFilter {
    /// Build a filter from an extension allow-list (`".py"` or `"py"`) and a
    /// directory deny-list.
    pub fn new<E, D>(extensions: E, ignored_dirs: D) -> Self
    where
        E: IntoIterator,
        E::Item: AsRef<str>,
        D: IntoIterator,
        D::Item: AsRef<str>,
    {
        let extensions = extensions
            .into_iter()
            .map(|ext| ext.as_ref().trim_start_matches('.').to_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();

        let ignored_dirs = ignored_dirs
            .into_iter()
            .map(|dir| dir.as_ref().to_string())
            .collect();

        Self {
            extensions,
            ignored_dirs,
            ignore_patterns: Vec::new(),
        }
    }

    /// Filter described by the configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(&config.indexed_extensions, &config.ignored_dirs)
            .with_ignore_patterns(&config.ignore_patterns)
    }

    /// Add glob ignore patterns (e.g. `**/*.min.js`)
    pub fn with_ignore_patterns<S: AsRef<str>>(mut self, patterns: &[S]) -> Result<Self> {
        for pattern in patterns {
            let pattern = pattern.as_ref();
            let compiled = glob::Pattern::new(pattern)
                .map_err(|e| anyhow::anyhow!("Invalid glob pattern {}: {}", pattern, e))?;
            self.ignore_patterns.push(compiled);
        }
        Ok(self)
    }

    /// True iff the extension is allowed (case-insensitive), no path segment
    /// is a deny-listed directory and no ignore pattern matches.
    pub fn is_eligible(&self, path: &Path) -> bool {
        let extension_allowed = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.extensions.contains(&ext.to_lowercase()))
            .unwrap_or(false);

        if !extension_allowed {
            return false;
        }

        let in_ignored_dir = path.components().any(|component| match component {
            Component::Normal(segment) => self.is_ignored_dir(segment),
            _ => false,
        });

        if in_ignored_dir {
            return false;
        }

        if !self.ignore_patterns.is_empty() {
            let path_str = path.to_string_lossy().replace('\\', "/");
            if self.ignore_patterns.iter().any(|p| p.matches(&path_str)) {
                return false;
            }
        }

        true
    }

    /// Whether a directory with this name is pruned from walks
    pub fn is_ignored_dir(&self, name: &OsStr) -> bool {
        name.to_str()
            .map(|name| self.ignored_dirs.contains(name))
            .unwrap_or(false)
    }
}
