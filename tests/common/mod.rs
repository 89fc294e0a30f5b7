#![allow(dead_code)]

use chrono::NaiveDate;
use dime_track::{JsonStorage, LedgerStore};
use std::path::PathBuf;
use tempfile::TempDir;

/// Opens a store backed by `ledger.json` inside a fresh temp directory.
/// Keep the returned guard alive for the duration of the test.
pub fn temp_store() -> (LedgerStore, TempDir) {
    let temp = TempDir::new().expect("create temp dir");
    let store = reopen(&temp);
    (store, temp)
}

/// Opens a new store over the same directory, simulating an application restart.
pub fn reopen(temp: &TempDir) -> LedgerStore {
    let storage = JsonStorage::in_dir(Some(temp.path().to_path_buf()));
    LedgerStore::open(Box::new(storage)).expect("open ledger store")
}

pub fn ledger_path(temp: &TempDir) -> PathBuf {
    temp.path().join("ledger.json")
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}
