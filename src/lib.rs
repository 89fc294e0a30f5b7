#![doc(test(attr(deny(warnings))))]

//! DimeTrack records income and expense transactions in a write-through
//! JSON ledger, derives budget summaries from it and exports reports.
//!
//! ```no_run
//! use chrono::NaiveDate;
//! use dime_track::{compute_summary, JsonStorage, LedgerStore, TransactionKind};
//!
//! let storage = JsonStorage::new("ledger.json");
//! let mut store = LedgerStore::open(Box::new(storage))?;
//! let date = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
//! store.add_transaction(TransactionKind::Income, "Salary", 3000.0, None, date)?;
//! let summary = compute_summary(store.ledger());
//! println!("balance: {}", summary.balance);
//! # Ok::<(), dime_track::LedgerError>(())
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod errors;
pub mod export;
pub mod ledger;
pub mod storage;
pub mod utils;

pub use crate::core::{compute_summary, CategoryTotal, LedgerStore, Summary, SummaryService};
pub use domain::{Category, Transaction, TransactionKind};
pub use errors::LedgerError;
pub use ledger::Ledger;
pub use storage::{JsonStorage, StorageBackend};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("DimeTrack tracing initialized.");
    });
}
