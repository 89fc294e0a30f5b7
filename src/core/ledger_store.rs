use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{Category, Transaction, TransactionKind};
use crate::errors::LedgerError;
use crate::ledger::Ledger;
use crate::storage::StorageBackend;

/// Owns the session ledger and writes it through to storage after every mutation.
///
/// Mutations are all-or-nothing: when persistence fails the in-memory ledger
/// is restored to the snapshot taken before the change, so memory and disk
/// never disagree.
pub struct LedgerStore {
    ledger: Ledger,
    storage: Box<dyn StorageBackend>,
}

impl LedgerStore {
    /// Loads the stored ledger, starting empty when no file exists yet.
    pub fn open(storage: Box<dyn StorageBackend>) -> Result<Self, LedgerError> {
        let ledger = storage.load()?;
        info!(
            transactions = ledger.transaction_count(),
            "ledger store opened"
        );
        Ok(Self { ledger, storage })
    }

    /// Moves unreadable data aside and starts from an empty ledger.
    /// Returns the store together with where the old data went, if anywhere.
    pub fn open_fresh(
        storage: Box<dyn StorageBackend>,
    ) -> Result<(Self, Option<PathBuf>), LedgerError> {
        let moved = storage.quarantine()?;
        let store = Self {
            ledger: Ledger::new(),
            storage,
        };
        Ok((store, moved))
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.ledger.transactions
    }

    pub fn transaction(&self, id: Uuid) -> Option<&Transaction> {
        self.ledger.transaction(id)
    }

    pub fn transactions_of(&self, kind: TransactionKind) -> Vec<&Transaction> {
        self.ledger.transactions_of(kind).collect()
    }

    pub fn find_by_prefix(&self, prefix: &str) -> Vec<&Transaction> {
        self.ledger.find_by_prefix(prefix)
    }

    pub fn location(&self) -> Option<&Path> {
        self.storage.location()
    }

    /// Validates and records a new transaction, returning the stored copy.
    pub fn add_transaction(
        &mut self,
        kind: TransactionKind,
        description: impl Into<String>,
        amount: f64,
        category: Option<Category>,
        date: NaiveDate,
    ) -> Result<Transaction, LedgerError> {
        let txn = Transaction::new(kind, description, amount, category, date)?;
        if self.ledger.contains(txn.id) {
            return Err(LedgerError::validation(format!(
                "transaction id {} already in use",
                txn.id
            )));
        }
        let created = txn.clone();
        self.mutate(|ledger| {
            ledger.add_transaction(txn);
        })?;
        info!(id = %created.id, kind = %created.kind, amount = created.amount, "transaction added");
        Ok(created)
    }

    /// Removes the transaction identified by `id`, returning the removed record.
    pub fn remove_transaction(&mut self, id: Uuid) -> Result<Transaction, LedgerError> {
        if !self.ledger.contains(id) {
            return Err(LedgerError::NotFound(id));
        }
        let mut removed = None;
        self.mutate(|ledger| {
            removed = ledger.remove_transaction(id);
        })?;
        let removed = removed.ok_or(LedgerError::NotFound(id))?;
        info!(id = %removed.id, kind = %removed.kind, "transaction removed");
        Ok(removed)
    }

    /// Re-reads the ledger from storage, replacing the in-memory copy on success.
    pub fn load(&mut self) -> Result<&Ledger, LedgerError> {
        self.ledger = self.storage.load()?;
        Ok(&self.ledger)
    }

    /// Writes the current ledger to storage.
    pub fn save(&self) -> Result<(), LedgerError> {
        self.storage.save(&self.ledger)
    }

    pub fn into_ledger(self) -> Ledger {
        self.ledger
    }

    fn mutate<F>(&mut self, change: F) -> Result<(), LedgerError>
    where
        F: FnOnce(&mut Ledger),
    {
        let snapshot = self.ledger.clone();
        change(&mut self.ledger);
        if let Err(err) = self.storage.save(&self.ledger) {
            warn!(error = %err, "persisting ledger failed, rolling back");
            self.ledger = snapshot;
            return Err(err);
        }
        Ok(())
    }
}
