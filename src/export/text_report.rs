use std::fmt::Write;

use crate::core::Summary;
use crate::domain::{Identifiable, Transaction, TransactionKind};
use crate::ledger::Ledger;

use super::format::{format_date, format_percent};
use super::{ExportError, ReportContext, ReportExporter};

const RULE: &str = "========================================";

/// Plain-text budget summary followed by the transaction history.
#[derive(Debug, Default, Clone, Copy)]
pub struct TextReport {
    /// Leave out the per-transaction listing.
    pub summary_only: bool,
}

impl TextReport {
    pub fn summary_only() -> Self {
        Self { summary_only: true }
    }
}

impl ReportExporter for TextReport {
    fn render(
        &self,
        summary: &Summary,
        ledger: &Ledger,
        ctx: &ReportContext,
    ) -> Result<String, ExportError> {
        let mut out = String::new();
        write_summary(&mut out, summary, ctx)?;
        if !self.summary_only {
            write_history(&mut out, ledger, ctx)?;
        }
        Ok(out)
    }

    fn file_extension(&self) -> &'static str {
        "txt"
    }
}

fn write_summary(
    out: &mut String,
    summary: &Summary,
    ctx: &ReportContext,
) -> Result<(), std::fmt::Error> {
    writeln!(out, "Budget Summary Report")?;
    writeln!(
        out,
        "Generated: {}",
        ctx.generated_at.format("%B %d, %Y at %I:%M %p")
    )?;
    writeln!(out, "{RULE}")?;

    writeln!(out)?;
    writeln!(out, "Income Overview")?;
    writeln!(out, "  Total Income: {}", ctx.money(summary.total_income))?;
    writeln!(out, "  Number of Income Entries: {}", summary.income_count)?;

    writeln!(out)?;
    writeln!(out, "Expense Overview")?;
    writeln!(out, "  Total Expenses: {}", ctx.money(summary.total_expense))?;
    writeln!(out, "  Number of Expense Entries: {}", summary.expense_count)?;

    writeln!(out)?;
    writeln!(out, "Balance")?;
    writeln!(out, "  Current Balance: {}", ctx.money(summary.balance))?;
    writeln!(
        out,
        "  Savings Rate: {}",
        format_percent(summary.savings_rate_percent())
    )?;

    writeln!(out)?;
    writeln!(out, "Expenses by Category")?;
    if summary.has_expenses() {
        for entry in &summary.expense_by_category {
            writeln!(
                out,
                "  {}: {} ({})",
                entry.category,
                ctx.money(entry.amount),
                format_percent(entry.percentage)
            )?;
        }
    } else {
        writeln!(out, "  No expenses recorded yet.")?;
    }
    Ok(())
}

fn write_history(
    out: &mut String,
    ledger: &Ledger,
    ctx: &ReportContext,
) -> Result<(), std::fmt::Error> {
    for (title, kind) in [
        ("Income Entries", TransactionKind::Income),
        ("Expense Entries", TransactionKind::Expense),
    ] {
        writeln!(out)?;
        writeln!(out, "{title}")?;
        let mut any = false;
        for txn in ledger.transactions_of(kind) {
            any = true;
            writeln!(out, "  {}", history_line(txn, ctx))?;
        }
        if !any {
            writeln!(out, "  (none)")?;
        }
    }
    Ok(())
}

pub(crate) fn history_line(txn: &Transaction, ctx: &ReportContext) -> String {
    let category = txn.category.map(|c| c.label()).unwrap_or("-");
    format!(
        "{}  {}  {:<28}  {:<22}  {:>14}",
        txn.short_id(),
        format_date(txn.date),
        txn.description,
        category,
        ctx.money(txn.amount)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::compute_summary;
    use crate::domain::Category;
    use crate::export::SymbolFormatter;
    use chrono::NaiveDate;

    fn ctx() -> ReportContext {
        let at = NaiveDate::from_ymd_opt(2025, 1, 5)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        ReportContext::new(at, Box::new(SymbolFormatter::default()))
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, d).unwrap()
    }

    #[test]
    fn renders_totals_and_breakdown() {
        let mut ledger = Ledger::new();
        ledger.add_transaction(Transaction::income("Salary", 3000.0, day(1)).unwrap());
        ledger.add_transaction(
            Transaction::expense("Groceries", 150.0, Category::FoodAndDining, day(2)).unwrap(),
        );
        ledger.add_transaction(
            Transaction::expense("Gas", 50.0, Category::Transportation, day(3)).unwrap(),
        );
        let summary = compute_summary(&ledger);
        let report = TextReport::default()
            .render(&summary, &ledger, &ctx())
            .unwrap();

        assert!(report.contains("Generated: January 05, 2025 at 09:30 AM"));
        assert!(report.contains("Total Income: $3,000.00"));
        assert!(report.contains("Number of Expense Entries: 2"));
        assert!(report.contains("Current Balance: $2,800.00"));
        assert!(report.contains("Savings Rate: 93.3%"));
        let food = report.find("Food & Dining: $150.00 (75.0%)").expect("food line");
        let gas = report.find("Transportation: $50.00 (25.0%)").expect("gas line");
        assert!(food < gas);
        assert!(report.contains("Groceries"));
    }

    #[test]
    fn empty_ledger_reports_no_expenses() {
        let ledger = Ledger::new();
        let report = TextReport::summary_only()
            .render(&compute_summary(&ledger), &ledger, &ctx())
            .unwrap();
        assert!(report.contains("No expenses recorded yet."));
        assert!(report.contains("Savings Rate: 0.0%"));
        assert!(!report.contains("\nIncome Entries\n"));
    }
}
