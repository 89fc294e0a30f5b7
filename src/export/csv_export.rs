use crate::core::Summary;
use crate::domain::TransactionKind;
use crate::ledger::Ledger;

use super::format::format_date;
use super::{ExportError, ReportContext, ReportExporter};

const HEADER: [&str; 6] = ["id", "kind", "date", "description", "category", "amount"];

/// One CSV row per transaction in ledger order. Amounts are plain numbers
/// so spreadsheets can sum them.
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvExport;

impl ReportExporter for CsvExport {
    fn render(
        &self,
        _summary: &Summary,
        ledger: &Ledger,
        _ctx: &ReportContext,
    ) -> Result<String, ExportError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(HEADER)?;
        for txn in &ledger.transactions {
            let kind = match txn.kind {
                TransactionKind::Income => "income",
                TransactionKind::Expense => "expense",
            };
            writer.write_record([
                txn.id.to_string(),
                kind.to_string(),
                format_date(txn.date),
                txn.description.clone(),
                txn.category.map(|c| c.label().to_string()).unwrap_or_default(),
                format!("{:.2}", txn.amount),
            ])?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|err| ExportError::Io(err.into_error()))?;
        Ok(String::from_utf8(bytes)?)
    }

    fn file_extension(&self) -> &'static str {
        "csv"
    }
}
