use thiserror::Error;

/// Failures surfaced by the operation surface.
///
/// Per-file ingestion problems never show up here: the worker logs and skips
/// them. Best-effort side effects (command logging, project access refresh)
/// are swallowed as well.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Rejected before any queue or store work began
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The store could not complete the operation (locked file, disk full, ...)
    #[error("Store error: {0:#}")]
    Store(#[from] anyhow::Error),
}

impl ServiceError {
    pub fn invalid(message: impl Into<String>) -> Self {
        ServiceError::InvalidInput(message.into())
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, ServiceError::InvalidInput(_))
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;
