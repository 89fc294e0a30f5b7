//! Command shell driving the ledger store: interactive via rustyline, or
//! line-by-line from stdin when `DIME_TRACK_CLI_SCRIPT` is set.

mod commands;
mod context;
pub mod output;
mod registry;
mod shell;

pub use context::{CliError, CliMode, CommandError, CommandResult, LoopControl, ShellContext};
pub use registry::{CommandEntry, CommandRegistry};
pub use shell::run_cli;
