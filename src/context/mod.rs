//! Context assembly for LLM queries
//!
//! Turns a free-text query into a bounded [`ContextBundle`]: the top code
//! matches and the most recent matching commands, each field cut to a fixed
//! character budget. The bundle is built per query and never stored.

pub mod truncation;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::database::SessionStore;
use crate::utils::best_effort;

pub use truncation::{ContextTruncator, TRUNCATION_MARKER};

/// Fixed caps and budgets for bundles (configuration, not per-call input)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextLimits {
    pub max_code_results: usize,
    pub max_command_results: usize,
    /// Characters of file content kept per snippet
    pub snippet_chars: usize,
    /// Characters of command output kept per command
    pub output_chars: usize,
}

impl Default for ContextLimits {
    fn default() -> Self {
        Self {
            max_code_results: 5,
            max_command_results: 3,
            snippet_chars: 500,
            output_chars: 200,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeSnippet {
    pub file_path: String,
    pub content: String,
    pub language: String,
    pub truncated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSnippet {
    pub command: String,
    pub output: String,
    pub truncated: bool,
}

/// Bounded bundle of matches for a single query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextBundle {
    pub project_path: String,
    pub query: String,
    pub code_snippets: Vec<CodeSnippet>,
    pub command_history: Vec<CommandSnippet>,
    pub timestamp: DateTime<Utc>,
}

pub struct ContextAssembler {
    store: SessionStore,
    limits: ContextLimits,
}

impl ContextAssembler {
    pub fn new(store: SessionStore, limits: ContextLimits) -> Self {
        Self { store, limits }
    }

    /// Build the bundle for `query`.
    ///
    /// Refreshing the project's access time is best-effort. Search failures
    /// are returned; zero matches are not a failure.
    pub fn build_context(&self, query: &str, project_root: &str) -> anyhow::Result<ContextBundle> {
        best_effort("refresh project access", || {
            self.store.upsert_project_access(project_root)
        });

        let code_matches = self
            .store
            .search_files(query, self.limits.max_code_results)?;
        let command_matches = self
            .store
            .search_commands(query, self.limits.max_command_results)?;

        let snippet_truncator = ContextTruncator::new(self.limits.snippet_chars);
        let output_truncator = ContextTruncator::new(self.limits.output_chars);

        let code_snippets: Vec<CodeSnippet> = code_matches
            .into_iter()
            .map(|m| {
                let (content, truncated) = snippet_truncator.truncate(&m.content);
                CodeSnippet {
                    file_path: m.file_path,
                    content,
                    language: m.language,
                    truncated,
                }
            })
            .collect();

        let command_history: Vec<CommandSnippet> = command_matches
            .into_iter()
            .map(|m| {
                let (output, truncated) = output_truncator.truncate(&m.output);
                CommandSnippet {
                    command: m.command,
                    output,
                    truncated,
                }
            })
            .collect();

        debug!(
            "Built context for {:?}: {} snippets, {} commands",
            query,
            code_snippets.len(),
            command_history.len()
        );

        Ok(ContextBundle {
            project_path: project_root.to_string(),
            query: query.to_string(),
            code_snippets,
            command_history,
            timestamp: Utc::now(),
        })
    }
}
