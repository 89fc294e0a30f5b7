use std::{io, path::PathBuf};

use thiserror::Error;
use uuid::Uuid;

/// Error type that captures ledger validation, lookup and persistence failures.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Transaction not found: {0}")]
    NotFound(Uuid),
    #[error("Ledger file `{}` is unreadable: {reason}", .path.display())]
    CorruptData { path: PathBuf, reason: String },
    #[error("Failed to persist `{}`: {source}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LedgerError {
    pub fn validation(message: impl Into<String>) -> Self {
        LedgerError::Validation(message.into())
    }

    pub fn corrupt(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        LedgerError::CorruptData {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn persistence(path: impl Into<PathBuf>, source: io::Error) -> Self {
        LedgerError::Persistence {
            path: path.into(),
            source,
        }
    }

    /// Whether the error came from writing or encoding the ledger.
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            LedgerError::Persistence { .. } | LedgerError::Serialization(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
