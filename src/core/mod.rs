pub mod ledger_store;
pub mod services;
pub mod utils;

pub use ledger_store::LedgerStore;
pub use services::{compute_summary, CategoryTotal, Summary, SummaryService};
