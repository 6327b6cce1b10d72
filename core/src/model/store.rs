use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::model::expense::ExpenseRecord;
use crate::model::todo::TodoRecord;

/// The aggregate: every todo and expense record, in insertion order.
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreData {
    pub todos: Vec<TodoRecord>,
    pub expenses: Vec<ExpenseRecord>,
}

/// On-disk shape before per-record validation.
#[derive(Deserialize, Debug, Default)]
pub(crate) struct RawStoreData {
    #[serde(default)]
    todos: Vec<Value>,
    #[serde(default)]
    expenses: Vec<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Todo,
    Expense,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Todo => f.write_str("todo"),
            RecordKind::Expense => f.write_str("expense"),
        }
    }
}

/// A record dropped while loading because it did not match the expected shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    pub kind: RecordKind,
    /// 1-based position within its sequence in the file.
    pub position: usize,
    pub reason: String,
}

impl fmt::Display for SkippedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "skipped malformed {} #{}: {}", self.kind, self.position, self.reason)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub skipped: Vec<SkippedRecord>,
}

impl RawStoreData {
    pub(crate) fn into_store(self) -> (StoreData, LoadReport) {
        let mut report = LoadReport::default();

        let todos = keep_valid(self.todos, RecordKind::Todo, &mut report, |todo: &TodoRecord| {
            if todo.content.trim().is_empty() {
                Some("empty content".to_string())
            } else {
                None
            }
        });
        let expenses = keep_valid(self.expenses, RecordKind::Expense, &mut report, |expense: &ExpenseRecord| {
            if expense.item.trim().is_empty() {
                Some("empty item".to_string())
            } else {
                None
            }
        });

        (StoreData { todos, expenses }, report)
    }
}

fn keep_valid<T, F>(values: Vec<Value>, kind: RecordKind, report: &mut LoadReport, check: F) -> Vec<T>
where
    T: for<'de> Deserialize<'de>,
    F: Fn(&T) -> Option<String>,
{
    let mut records = Vec::with_capacity(values.len());
    for (i, value) in values.into_iter().enumerate() {
        let reason = match serde_json::from_value::<T>(value) {
            Ok(record) => match check(&record) {
                None => {
                    records.push(record);
                    continue;
                }
                Some(reason) => reason,
            },
            Err(e) => e.to_string(),
        };
        let skipped = SkippedRecord {
            kind,
            position: i + 1,
            reason,
        };
        warn!("{}", skipped);
        report.skipped.push(skipped);
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_malformed_records_are_skipped() {
        let raw: RawStoreData = serde_json::from_value(json!({
            "todos": [
                {"id": "6f1c1d2e-8a4b-4c4e-9d7a-0a1b2c3d4e5f", "content": "ok", "done": false, "date": "2026-01-05"},
                {"id": "6f1c1d2e-8a4b-4c4e-9d7a-0a1b2c3d4e60", "content": "bad date", "done": false, "date": "2026-13-40"},
                {"content": "missing id", "date": "2026-01-05"},
                {"id": "6f1c1d2e-8a4b-4c4e-9d7a-0a1b2c3d4e61", "content": "  ", "date": "2026-01-05"}
            ],
            "expenses": [
                {"id": "7f1c1d2e-8a4b-4c4e-9d7a-0a1b2c3d4e5f", "item": "tea", "amount": "3.50", "time": "2026-01-05"},
                {"id": "7f1c1d2e-8a4b-4c4e-9d7a-0a1b2c3d4e60", "item": "refund", "amount": "-3", "time": "2026-01-05"}
            ]
        }))
        .unwrap();

        let (data, report) = raw.into_store();
        assert_eq!(data.todos.len(), 1);
        assert_eq!(data.todos[0].content, "ok");
        assert_eq!(data.expenses.len(), 1);

        let positions: Vec<(RecordKind, usize)> = report.skipped.iter().map(|s| (s.kind, s.position)).collect();
        assert_eq!(
            positions,
            vec![
                (RecordKind::Todo, 2),
                (RecordKind::Todo, 3),
                (RecordKind::Todo, 4),
                (RecordKind::Expense, 2)
            ]
        );
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let raw: RawStoreData = serde_json::from_str("{}").unwrap();
        let (data, report) = raw.into_store();
        assert_eq!(data, StoreData::default());
        assert!(report.skipped.is_empty());
    }
}
