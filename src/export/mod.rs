//! Turns a computed [`Summary`] and the ledger it came from into shareable documents.

pub mod csv_export;
pub mod format;
pub mod text_report;

use std::{
    io,
    path::{Path, PathBuf},
};

use chrono::{Local, NaiveDateTime};
use thiserror::Error;
use tracing::info;

use crate::core::Summary;
use crate::errors::LedgerError;
use crate::ledger::Ledger;
use crate::storage::json_backend::write_atomic;

pub use csv_export::CsvExport;
pub use format::{CurrencyFormatter, SymbolFormatter};
pub use text_report::TextReport;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Formatting error: {0}")]
    Format(#[from] std::fmt::Error),
    #[error("Report is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
    #[error(transparent)]
    Write(#[from] LedgerError),
}

/// Presentation details shared by every exporter.
pub struct ReportContext {
    pub generated_at: NaiveDateTime,
    pub currency: Box<dyn CurrencyFormatter>,
}

impl ReportContext {
    pub fn new(generated_at: NaiveDateTime, currency: Box<dyn CurrencyFormatter>) -> Self {
        Self {
            generated_at,
            currency,
        }
    }

    /// Stamped with the current local time.
    pub fn now(currency_symbol: &str) -> Self {
        Self::new(
            Local::now().naive_local(),
            Box::new(SymbolFormatter::new(currency_symbol)),
        )
    }

    pub fn money(&self, amount: f64) -> String {
        self.currency.format_amount(amount)
    }
}

/// A document format the summary and transaction listing can be rendered into.
pub trait ReportExporter {
    fn render(
        &self,
        summary: &Summary,
        ledger: &Ledger,
        ctx: &ReportContext,
    ) -> Result<String, ExportError>;

    fn file_extension(&self) -> &'static str;
}

/// Renders with `exporter` and writes the document to `path` atomically.
pub fn export_to_path(
    exporter: &dyn ReportExporter,
    summary: &Summary,
    ledger: &Ledger,
    ctx: &ReportContext,
    path: &Path,
) -> Result<PathBuf, ExportError> {
    let document = exporter.render(summary, ledger, ctx)?;
    write_atomic(path, &document)?;
    info!(path = %path.display(), format = exporter.file_extension(), "report exported");
    Ok(path.to_path_buf())
}

/// `budget_report_YYYYMMDD_HHMMSS.<ext>`
pub fn default_report_name(generated_at: NaiveDateTime, extension: &str) -> String {
    format!(
        "budget_report_{}.{}",
        generated_at.format("%Y%m%d_%H%M%S"),
        extension
    )
}
