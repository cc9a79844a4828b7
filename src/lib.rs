//! MCP Terminal - session memory for an LLM-assisted terminal
//!
//! Indexes project source files into a local SQLite store, keeps an
//! append-only log of shell commands and assembles bounded context bundles
//! (matching code plus recent matching commands) for a query.

pub mod cli;
pub mod config;
pub mod context;
pub mod database;
pub mod error;
pub mod indexer;
pub mod logging;
pub mod service;
pub mod utils;

#[cfg(test)]
pub mod tests;

// Re-export common types
pub use config::AppConfig;
pub use context::{ContextBundle, ContextLimits};
pub use database::SessionStore;
pub use error::{Result, ServiceError};
pub use indexer::{FileFilter, IndexingQueue, IndexingStatus, WalkSummary};
pub use service::TerminalContextService;
