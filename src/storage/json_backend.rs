use chrono::Utc;
use serde_json::Value;
use std::{
    collections::HashSet,
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

use crate::{
    core::utils::{ensure_dir, PathResolver},
    errors::LedgerError,
    ledger::{Ledger, CURRENT_SCHEMA_VERSION},
};

use super::{legacy, Result, StorageBackend};

const TMP_SUFFIX: &str = "tmp";
const QUARANTINE_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Stores the ledger as a single pretty-printed JSON document.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Uses `ledger.json` inside `root`, or inside the default data directory.
    pub fn in_dir(root: Option<PathBuf>) -> Self {
        let base = PathResolver::resolve_base(root);
        Self::new(PathResolver::ledger_file_in(&base))
    }

    pub fn new_default() -> Self {
        Self::in_dir(None)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StorageBackend for JsonStorage {
    fn load(&self) -> Result<Ledger> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no ledger file yet, starting empty");
            return Ok(Ledger::new());
        }
        let ledger = load_ledger_from_path(&self.path)?;
        debug!(
            path = %self.path.display(),
            transactions = ledger.transaction_count(),
            "ledger loaded"
        );
        Ok(ledger)
    }

    fn save(&self, ledger: &Ledger) -> Result<()> {
        save_ledger_to_path(ledger, &self.path)?;
        info!(
            path = %self.path.display(),
            transactions = ledger.transaction_count(),
            "ledger saved"
        );
        Ok(())
    }

    fn location(&self) -> Option<&Path> {
        Some(&self.path)
    }

    fn quarantine(&self) -> Result<Option<PathBuf>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let target = quarantine_target(&self.path);
        fs::rename(&self.path, &target)
            .map_err(|err| LedgerError::persistence(&self.path, err))?;
        warn!(
            from = %self.path.display(),
            to = %target.display(),
            "moved unreadable ledger aside"
        );
        Ok(Some(target))
    }
}

/// `<file>.corrupt-<timestamp>`, with a counter appended when that name is taken.
fn quarantine_target(path: &Path) -> PathBuf {
    let stamp = Utc::now().format(QUARANTINE_TIMESTAMP_FORMAT).to_string();
    let candidate = |suffix: String| {
        let mut name = path.as_os_str().to_owned();
        name.push(format!(".corrupt-{stamp}{suffix}"));
        PathBuf::from(name)
    };
    let mut target = candidate(String::new());
    let mut attempt = 1u32;
    while target.exists() {
        target = candidate(format!("-{attempt}"));
        attempt += 1;
    }
    target
}

/// Writes `ledger` to `path` by staging a sibling temp file and renaming it over the target.
pub fn save_ledger_to_path(ledger: &Ledger, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(ledger)?;
    write_atomic(path, &json)
}

/// Reads and validates a ledger document, upgrading the legacy layout when found.
pub fn load_ledger_from_path(path: &Path) -> Result<Ledger> {
    let data = fs::read_to_string(path).map_err(|err| match err.kind() {
        io::ErrorKind::InvalidData => LedgerError::corrupt(path, err),
        _ => LedgerError::persistence(path, err),
    })?;
    let value: Value =
        serde_json::from_str(&data).map_err(|err| LedgerError::corrupt(path, err))?;

    let ledger = if legacy::is_legacy_document(&value) {
        info!(path = %path.display(), "upgrading legacy ledger document");
        legacy::upgrade(value).map_err(|reason| LedgerError::corrupt(path, reason))?
    } else {
        let ledger: Ledger =
            serde_json::from_value(value).map_err(|err| LedgerError::corrupt(path, err))?;
        if ledger.schema_version > CURRENT_SCHEMA_VERSION {
            return Err(LedgerError::corrupt(
                path,
                format!(
                    "schema version {} is newer than supported version {}",
                    ledger.schema_version, CURRENT_SCHEMA_VERSION
                ),
            ));
        }
        ledger
    };

    check_integrity(&ledger).map_err(|reason| LedgerError::corrupt(path, reason))?;
    Ok(ledger)
}

fn check_integrity(ledger: &Ledger) -> std::result::Result<(), String> {
    let mut seen = HashSet::new();
    for txn in &ledger.transactions {
        if !seen.insert(txn.id) {
            return Err(format!("duplicate transaction id {}", txn.id));
        }
        txn.validate()
            .map_err(|err| format!("transaction {}: {err}", txn.id))?;
    }
    Ok(())
}

pub(crate) fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

/// Replaces `path` with `data` so readers only ever see the old or the new content.
pub(crate) fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent).map_err(|err| LedgerError::persistence(parent, err))?;
    }
    let tmp = tmp_path(path);
    if let Err(err) = write_synced(&tmp, data) {
        let _ = fs::remove_file(&tmp);
        return Err(LedgerError::persistence(path, err));
    }
    if let Err(err) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(LedgerError::persistence(path, err));
    }
    Ok(())
}

fn write_synced(path: &Path, data: &str) -> io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    file.sync_all()
}
