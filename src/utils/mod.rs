// Small helpers shared across modules

use std::fmt::Display;
use tracing::warn;

/// Run a side effect whose failure must never fail the caller.
///
/// Returns whether it succeeded; failures are logged at WARN.
pub fn best_effort<T, E, F>(what: &str, operation: F) -> bool
where
    E: Display,
    F: FnOnce() -> Result<T, E>,
{
    match operation() {
        Ok(_) => true,
        Err(e) => {
            warn!("Failed to {}: {:#}", what, e);
            false
        }
    }
}

/// Trimmed input, or `None` when nothing is left
pub fn non_blank(input: &str) -> Option<&str> {
    let trimmed = input.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}
