//! Ledger model and its persisted representation.

#[allow(clippy::module_inception)]
pub mod ledger;

pub use ledger::{Ledger, CURRENT_SCHEMA_VERSION};
