use std::io;

use thiserror::Error;
use tracing::warn;

use crate::cli::commands;
use crate::cli::output;
use crate::cli::registry::CommandRegistry;
use crate::config::{Config, ConfigError, ConfigManager, CorruptLedgerPolicy};
use crate::core::LedgerStore;
use crate::errors::LedgerError;
use crate::export::{ExportError, ReportContext};
use crate::storage::JsonStorage;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("Unknown command `{name}`{}", suggestion_hint(.suggestion))]
    UnknownCommand {
        name: String,
        suggestion: Option<&'static str>,
    },
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

fn suggestion_hint(suggestion: &Option<&'static str>) -> String {
    suggestion
        .map(|name| format!(". Did you mean `{name}`?"))
        .unwrap_or_default()
}

pub type CommandResult = Result<LoopControl, CommandError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

/// Session state for the shell: the ledger store, settings and command table.
pub struct ShellContext {
    pub mode: CliMode,
    pub running: bool,
    pub last_command: Option<String>,
    pub(crate) store: LedgerStore,
    pub(crate) config: Config,
    registry: CommandRegistry,
}

impl ShellContext {
    /// Loads configuration and opens the ledger it points at, applying the
    /// configured policy when the ledger file is unreadable.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let manager = ConfigManager::new()?;
        let config = manager.load()?;
        output::set_color_enabled(config.ui_color_enabled && mode == CliMode::Interactive);
        let path = config.resolve_ledger_file(manager.base_dir());
        let storage = JsonStorage::new(path);

        let store = match LedgerStore::open(Box::new(storage.clone())) {
            Ok(store) => store,
            Err(err @ LedgerError::CorruptData { .. }) => match config.on_corrupt {
                CorruptLedgerPolicy::Abort => return Err(err.into()),
                CorruptLedgerPolicy::StartEmpty => {
                    warn!(error = %err, "starting with an empty ledger");
                    let (store, moved) = LedgerStore::open_fresh(Box::new(storage))?;
                    output::warning(format!("{err}"));
                    if let Some(moved) = moved {
                        output::warning(format!(
                            "Unreadable ledger moved to {}; starting empty.",
                            moved.display()
                        ));
                    }
                    store
                }
            },
            Err(err) => return Err(err.into()),
        };

        Ok(Self::with_parts(store, config, mode))
    }

    pub fn with_parts(store: LedgerStore, config: Config, mode: CliMode) -> Self {
        Self {
            mode,
            running: true,
            last_command: None,
            store,
            config,
            registry: commands::registry(),
        }
    }

    pub fn store(&self) -> &LedgerStore {
        &self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    pub fn command_names(&self) -> Vec<&'static str> {
        self.registry.names()
    }

    pub fn report_context(&self) -> ReportContext {
        ReportContext::now(&self.config.currency_symbol)
    }

    pub fn prompt(&self) -> String {
        format!("dime [{}]> ", self.store.ledger().transaction_count())
    }

    pub fn dispatch(&mut self, command: &str, args: &[&str]) -> CommandResult {
        match self.registry.handler(command) {
            Some(handler) => handler(self, args),
            None => Err(CommandError::UnknownCommand {
                name: command.to_string(),
                suggestion: self.registry.suggest(command),
            }),
        }
    }

    pub fn report_error(&self, err: CommandError) {
        output::error(err);
    }

    pub fn print_warning(&self, message: &str) {
        output::warning(message);
    }
}
