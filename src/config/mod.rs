use serde::{Deserialize, Serialize};
use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
    str::FromStr,
};
use thiserror::Error;

use crate::core::utils::{ensure_dir, PathResolver};
use crate::errors::LedgerError;
use crate::storage::json_backend::write_atomic;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Invalid configuration `{}`: {reason}", .path.display())]
    Invalid { path: PathBuf, reason: String },
    #[error(transparent)]
    Write(#[from] LedgerError),
}

/// What to do when the ledger file exists but cannot be read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CorruptLedgerPolicy {
    /// Refuse to start so the file can be inspected.
    #[default]
    Abort,
    /// Move the file aside and begin with an empty ledger.
    StartEmpty,
}

impl fmt::Display for CorruptLedgerPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CorruptLedgerPolicy::Abort => "abort",
            CorruptLedgerPolicy::StartEmpty => "start_empty",
        })
    }
}

impl FromStr for CorruptLedgerPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(CorruptLedgerPolicy::Abort),
            "start_empty" | "start-empty" | "reset" => Ok(CorruptLedgerPolicy::StartEmpty),
            other => Err(format!("unknown corrupt-ledger policy `{other}`")),
        }
    }
}

/// User-tunable settings persisted next to the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ledger_file: Option<PathBuf>,
    #[serde(default = "Config::default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default)]
    pub on_corrupt: CorruptLedgerPolicy,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_dir: Option<PathBuf>,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ledger_file: None,
            currency_symbol: Self::default_currency_symbol(),
            on_corrupt: CorruptLedgerPolicy::default(),
            report_dir: None,
            ui_color_enabled: Self::default_ui_color_enabled(),
        }
    }
}

impl Config {
    pub fn default_currency_symbol() -> String {
        "$".into()
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    /// Ledger location: the configured file, or `ledger.json` under `base`.
    pub fn resolve_ledger_file(&self, base: &Path) -> PathBuf {
        match &self.ledger_file {
            Some(path) if path.is_absolute() => path.clone(),
            Some(path) => base.join(path),
            None => PathResolver::ledger_file_in(base),
        }
    }

    pub fn resolve_report_dir(&self) -> PathBuf {
        self.report_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

pub struct ConfigManager {
    base: PathBuf,
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, ConfigError> {
        Self::with_base_dir(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        ensure_dir(&base)?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
            base,
        })
    }

    /// Reads the config file, falling back to defaults when none exists.
    pub fn load(&self) -> Result<Config, ConfigError> {
        if !self.path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        serde_json::from_str(&data).map_err(|err| ConfigError::Invalid {
            path: self.path.clone(),
            reason: err.to_string(),
        })
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(config).map_err(LedgerError::from)?;
        write_atomic(&self.path, &json)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.currency_symbol, "$");
        assert_eq!(config.on_corrupt, CorruptLedgerPolicy::Abort);
    }

    #[test]
    fn save_then_load_roundtrip() {
        let temp = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        let config = Config {
            currency_symbol: "€".into(),
            on_corrupt: CorruptLedgerPolicy::StartEmpty,
            report_dir: Some(PathBuf::from("reports")),
            ..Config::default()
        };
        manager.save(&config).unwrap();
        assert_eq!(manager.load().unwrap(), config);
        let raw = fs::read_to_string(manager.path()).unwrap();
        assert!(raw.contains("\"start_empty\""));
    }

    #[test]
    fn partial_files_fill_in_defaults() {
        let temp = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        fs::write(manager.path(), r#"{"ledger_file": "books.json"}"#).unwrap();
        let config = manager.load().unwrap();
        assert_eq!(
            config.resolve_ledger_file(temp.path()),
            temp.path().join("books.json")
        );
        assert!(config.ui_color_enabled);
    }

    #[test]
    fn malformed_file_is_reported() {
        let temp = tempdir().unwrap();
        let manager = ConfigManager::with_base_dir(temp.path().to_path_buf()).unwrap();
        fs::write(manager.path(), "[1, 2").unwrap();
        assert!(matches!(manager.load(), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn policy_parses_aliases() {
        assert_eq!("reset".parse(), Ok(CorruptLedgerPolicy::StartEmpty));
        assert_eq!("ABORT".parse(), Ok(CorruptLedgerPolicy::Abort));
        assert!("explode".parse::<CorruptLedgerPolicy>().is_err());
    }
}
