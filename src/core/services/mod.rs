pub mod summary_service;

pub use summary_service::{compute_summary, CategoryTotal, Summary, SummaryService};
