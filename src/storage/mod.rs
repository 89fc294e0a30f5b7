pub mod json_backend;
pub mod legacy;

use std::path::{Path, PathBuf};

use crate::{errors::LedgerError, ledger::Ledger};

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Abstraction over persistence backends that store a whole ledger at once.
pub trait StorageBackend: Send + Sync {
    /// Reads the stored ledger, returning an empty one when nothing was saved yet.
    fn load(&self) -> Result<Ledger>;

    /// Replaces the stored ledger. Implementations must leave the previous
    /// content intact when the write fails.
    fn save(&self, ledger: &Ledger) -> Result<()>;

    fn location(&self) -> Option<&Path> {
        None
    }

    /// Moves unreadable data out of the way so a fresh ledger can be started.
    fn quarantine(&self) -> Result<Option<PathBuf>> {
        Ok(None)
    }
}

pub use json_backend::{load_ledger_from_path, save_ledger_to_path, JsonStorage};
