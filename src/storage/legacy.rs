//! Reader for the flat document written by the original desktop tracker:
//! separate `income_entries` and `expense_entries` arrays of loose records.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::domain::{Category, Transaction, TransactionKind};
use crate::ledger::Ledger;

const LEGACY_DATE_FORMAT: &str = "%Y-%m-%d";

/// Namespace for ids derived from legacy entries. Upgrading the same file
/// twice must hand out the same ids, since the file is only rewritten on the
/// next mutation.
const LEGACY_ID_NAMESPACE: Uuid = Uuid::from_u128(0x6c1e_4a8d_93f2_4b57_a0d4_2f7e_19c3_b865);

#[derive(Debug, Deserialize)]
struct LegacyDocument {
    #[serde(default)]
    income_entries: Vec<LegacyEntry>,
    #[serde(default)]
    expense_entries: Vec<LegacyEntry>,
}

#[derive(Debug, Deserialize)]
struct LegacyEntry {
    amount: f64,
    label: String,
    #[serde(default)]
    category: Option<String>,
    date: String,
    #[serde(default)]
    timestamp: Option<String>,
}

pub fn is_legacy_document(value: &Value) -> bool {
    value
        .as_object()
        .map(|map| map.contains_key("income_entries") || map.contains_key("expense_entries"))
        .unwrap_or(false)
}

/// Converts a legacy document into a current ledger. Income entries come
/// first, followed by expenses, each in their stored order.
pub fn upgrade(value: Value) -> Result<Ledger, String> {
    let document: LegacyDocument = serde_json::from_value(value).map_err(|err| err.to_string())?;
    let mut ledger = Ledger::new();
    for (index, entry) in document.income_entries.into_iter().enumerate() {
        let txn = convert(entry, TransactionKind::Income, index)
            .map_err(|reason| format!("income entry {index}: {reason}"))?;
        ledger.transactions.push(txn);
    }
    for (index, entry) in document.expense_entries.into_iter().enumerate() {
        let txn = convert(entry, TransactionKind::Expense, index)
            .map_err(|reason| format!("expense entry {index}: {reason}"))?;
        ledger.transactions.push(txn);
    }
    Ok(ledger)
}

fn convert(
    entry: LegacyEntry,
    kind: TransactionKind,
    index: usize,
) -> Result<Transaction, String> {
    let date = NaiveDate::parse_from_str(entry.date.trim(), LEGACY_DATE_FORMAT)
        .map_err(|err| format!("bad date `{}`: {err}", entry.date))?;
    let category = match kind {
        TransactionKind::Income => None,
        TransactionKind::Expense => {
            let label = entry.category.as_deref().unwrap_or_default();
            Some(
                Category::from_label(label)
                    .ok_or_else(|| format!("unknown category `{label}`"))?,
            )
        }
    };
    let id = legacy_id(&entry, kind, index);
    let txn = Transaction {
        id,
        kind,
        description: entry.label.trim().to_string(),
        amount: entry.amount,
        category,
        date,
        recorded_at: entry
            .timestamp
            .as_deref()
            .and_then(parse_timestamp)
            .unwrap_or_else(|| date.and_time(NaiveTime::MIN).and_utc()),
    };
    txn.validate().map_err(|err| err.to_string())?;
    Ok(txn)
}

fn legacy_id(entry: &LegacyEntry, kind: TransactionKind, index: usize) -> Uuid {
    let key = format!(
        "{kind}|{index}|{}|{}|{}|{}",
        entry.label,
        entry.amount,
        entry.date,
        entry.timestamp.as_deref().unwrap_or_default()
    );
    Uuid::new_v5(&LEGACY_ID_NAMESPACE, key.as_bytes())
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn upgrades_income_and_expense_entries() {
        let value = json!({
            "income_entries": [
                {"amount": 3000.0, "label": "Salary", "date": "2025-01-01",
                 "timestamp": "2025-01-01T09:30:00.123456"}
            ],
            "expense_entries": [
                {"amount": 150.0, "label": "Groceries", "category": "Food & Dining",
                 "date": "2025-01-02", "timestamp": "2025-01-02T10:00:00"}
            ]
        });
        assert!(is_legacy_document(&value));
        let ledger = upgrade(value).expect("legacy document converts");
        assert_eq!(ledger.transactions.len(), 2);
        assert_eq!(ledger.transactions[0].kind, TransactionKind::Income);
        assert_eq!(ledger.transactions[0].category, None);
        assert_eq!(
            ledger.transactions[1].category,
            Some(Category::FoodAndDining)
        );
        assert_eq!(
            ledger.transactions[0].recorded_at.format("%H:%M").to_string(),
            "09:30"
        );
    }

    #[test]
    fn upgraded_ids_are_stable_and_distinct() {
        let value = json!({
            "expense_entries": [
                {"amount": 4.5, "label": "Coffee", "category": "Food & Dining", "date": "2025-01-02"},
                {"amount": 4.5, "label": "Coffee", "category": "Food & Dining", "date": "2025-01-02"}
            ]
        });
        let first = upgrade(value.clone()).unwrap();
        let second = upgrade(value).unwrap();
        let ids: Vec<_> = first.transactions.iter().map(|txn| txn.id).collect();
        assert_eq!(
            ids,
            second.transactions.iter().map(|txn| txn.id).collect::<Vec<_>>()
        );
        assert_ne!(ids[0], ids[1]);
        assert_eq!(first.transactions[0].recorded_at, second.transactions[0].recorded_at);
    }

    #[test]
    fn rejects_unknown_categories() {
        let value = json!({
            "expense_entries": [
                {"amount": 10.0, "label": "Snacks", "category": "Candy", "date": "2025-01-02"}
            ]
        });
        let reason = upgrade(value).expect_err("unknown category");
        assert!(reason.contains("Candy"), "{reason}");
    }

    #[test]
    fn current_documents_are_not_legacy() {
        assert!(!is_legacy_document(&json!({"schema_version": 1, "transactions": []})));
        assert!(!is_legacy_document(&json!([])));
    }
}
