use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::{Category, TransactionKind};
use crate::ledger::Ledger;

/// Spending attributed to one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub amount: f64,
    /// Share of total expenses, 0 to 100.
    pub percentage: f64,
}

/// Aggregate view over a ledger snapshot. Never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub total_income: f64,
    pub total_expense: f64,
    pub balance: f64,
    /// Sorted by descending amount, ties in category declaration order.
    pub expense_by_category: Vec<CategoryTotal>,
    /// Balance as a fraction of income, 0 when there is no income.
    pub savings_rate: f64,
    pub income_count: usize,
    pub expense_count: usize,
}

impl Summary {
    pub fn category(&self, category: Category) -> Option<&CategoryTotal> {
        self.expense_by_category
            .iter()
            .find(|entry| entry.category == category)
    }

    pub fn savings_rate_percent(&self) -> f64 {
        self.savings_rate * 100.0
    }

    pub fn has_expenses(&self) -> bool {
        !self.expense_by_category.is_empty()
    }
}

pub struct SummaryService;

impl SummaryService {
    /// Computes totals and the category breakdown in a single pass.
    pub fn compute(ledger: &Ledger) -> Summary {
        let mut total_income = 0.0;
        let mut total_expense = 0.0;
        let mut income_count = 0;
        let mut expense_count = 0;
        let mut by_category: BTreeMap<Category, f64> = BTreeMap::new();

        for txn in &ledger.transactions {
            match txn.kind {
                TransactionKind::Income => {
                    total_income += txn.amount;
                    income_count += 1;
                }
                TransactionKind::Expense => {
                    total_expense += txn.amount;
                    expense_count += 1;
                    let category = txn.category.unwrap_or(Category::Miscellaneous);
                    *by_category.entry(category).or_insert(0.0) += txn.amount;
                }
            }
        }

        let mut expense_by_category: Vec<CategoryTotal> = by_category
            .into_iter()
            .map(|(category, amount)| CategoryTotal {
                category,
                amount,
                percentage: ratio(amount, total_expense) * 100.0,
            })
            .collect();
        // BTreeMap yields declaration order; the stable sort keeps it for equal amounts.
        expense_by_category.sort_by(|a, b| b.amount.total_cmp(&a.amount));

        let balance = total_income - total_expense;
        Summary {
            total_income,
            total_expense,
            balance,
            expense_by_category,
            savings_rate: ratio(balance, total_income),
            income_count,
            expense_count,
        }
    }
}

/// Shorthand for [`SummaryService::compute`].
pub fn compute_summary(ledger: &Ledger) -> Summary {
    SummaryService::compute(ledger)
}

fn ratio(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        0.0
    } else {
        part / whole
    }
}
