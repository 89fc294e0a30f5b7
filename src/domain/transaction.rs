use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{category::Category, common::Identifiable};
use crate::errors::LedgerError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn label(self) -> &'static str {
        match self {
            TransactionKind::Income => "Income",
            TransactionKind::Expense => "Expense",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single recorded income or expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub kind: TransactionKind,
    pub description: String,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    pub date: NaiveDate,
    #[serde(default = "Utc::now")]
    pub recorded_at: DateTime<Utc>,
}

impl Transaction {
    /// Builds a validated transaction with a fresh identifier.
    pub fn new(
        kind: TransactionKind,
        description: impl Into<String>,
        amount: f64,
        category: Option<Category>,
        date: NaiveDate,
    ) -> Result<Self, LedgerError> {
        let txn = Self {
            id: Uuid::new_v4(),
            kind,
            description: description.into().trim().to_string(),
            amount,
            category,
            date,
            recorded_at: Utc::now(),
        };
        txn.validate()?;
        Ok(txn)
    }

    pub fn income(
        description: impl Into<String>,
        amount: f64,
        date: NaiveDate,
    ) -> Result<Self, LedgerError> {
        Self::new(TransactionKind::Income, description, amount, None, date)
    }

    pub fn expense(
        description: impl Into<String>,
        amount: f64,
        category: Category,
        date: NaiveDate,
    ) -> Result<Self, LedgerError> {
        Self::new(
            TransactionKind::Expense,
            description,
            amount,
            Some(category),
            date,
        )
    }

    /// Checks amount, description and the category/kind pairing.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(LedgerError::validation(format!(
                "{} amount must be greater than zero (got {})",
                self.kind, self.amount
            )));
        }
        if self.description.trim().is_empty() {
            return Err(LedgerError::validation(format!(
                "please enter a description for the {}",
                self.kind.label().to_lowercase()
            )));
        }
        match (self.kind, self.category) {
            (TransactionKind::Expense, None) => Err(LedgerError::validation(
                "expenses require a category",
            )),
            (TransactionKind::Income, Some(category)) => Err(LedgerError::validation(format!(
                "income cannot carry a category (got `{category}`)"
            ))),
            _ => Ok(()),
        }
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Expense
    }
}

impl Identifiable for Transaction {
    fn id(&self) -> Uuid {
        self.id
    }
}
