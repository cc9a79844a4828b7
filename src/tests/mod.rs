// MCP Terminal's Test Infrastructure
//
// Integration-level tests for the store, the ingestion pipeline, context
// assembly and the operation surface. Pure helpers keep their unit tests
// inline next to the code.

pub mod helpers;

// ============================================================================
// CORE TESTS - Store, migrations, configuration
// ============================================================================
pub mod core {
    pub mod config; // Data directory resolution and config loading
    pub mod database; // Store operations against a real SQLite file
    pub mod migrations; // Upgrading files written by the Python release
}

// ============================================================================
// INDEXER TESTS - Walk, worker, status
// ============================================================================
pub mod indexer {
    pub mod pipeline; // End-to-end ingestion and the run state machine
    pub mod walk; // Eligibility and pruning during the walk
}
