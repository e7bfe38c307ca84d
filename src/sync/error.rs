use crate::streaming_api::ApiError;
use thiserror::Error;

/// Reason a sync phase stopped early.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("API request failed: {0}")]
    Transport(#[from] ApiError),

    #[error("Unexpected data: {0}")]
    Data(String),

    #[error("Division by zero: {0}")]
    Arithmetic(String),

    #[error("Store error: {0:#}")]
    Store(#[from] anyhow::Error),
}

/// Coarse classification of a [`SyncError`], kept in phase outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    Transport,
    Data,
    Arithmetic,
    Store,
}

impl SyncError {
    pub fn kind(&self) -> FaultKind {
        match self {
            SyncError::Transport(_) => FaultKind::Transport,
            SyncError::Data(_) => FaultKind::Data,
            SyncError::Arithmetic(_) => FaultKind::Arithmetic,
            SyncError::Store(_) => FaultKind::Store,
        }
    }
}
