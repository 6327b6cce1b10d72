use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDate};
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::date;
use crate::model::amount::Amount;
use crate::model::store::StoreData;
use crate::repository::traits::MirrorSink;

const SEPARATOR: &str = "----------------------------------------";

#[derive(Tabled)]
struct TodoRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Status")]
    status: &'static str,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Todo")]
    content: String,
}

#[derive(Tabled)]
struct ExpenseRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Item")]
    item: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

/// Renders the aggregate as a plain-text report.
pub fn render_report(data: &StoreData, generated_at: DateTime<Local>) -> String {
    let today: NaiveDate = generated_at.date_naive();
    let mut out = String::new();

    out.push_str("========== POCKETDESK REPORT ==========\n\n");

    let done = data.todos.iter().filter(|t| t.done).count();
    out.push_str(&format!(
        "Todos ({} total, {} done, {} pending)\n",
        data.todos.len(),
        done,
        data.todos.len() - done
    ));
    if data.todos.is_empty() {
        out.push_str("(no todos)\n");
    } else {
        let rows = data.todos.iter().enumerate().map(|(i, todo)| TodoRow {
            index: i + 1,
            status: todo.status().glyph(),
            date: if todo.is_overdue(today) {
                format!("{} (overdue)", date::format(todo.date))
            } else {
                date::format(todo.date)
            },
            content: todo.content.clone(),
        });
        out.push_str(&Table::new(rows).with(Style::ascii()).to_string());
        out.push('\n');
    }

    out.push('\n');
    out.push_str(SEPARATOR);
    out.push_str("\n\n");

    out.push_str(&format!("Expenses ({})\n", data.expenses.len()));
    if data.expenses.is_empty() {
        out.push_str("(no expenses)\n");
    } else {
        let rows = data.expenses.iter().enumerate().map(|(i, expense)| ExpenseRow {
            index: i + 1,
            date: date::format(expense.time),
            item: expense.item.clone(),
            amount: expense.amount.to_string(),
        });
        out.push_str(&Table::new(rows).with(Style::ascii()).to_string());
        out.push('\n');
    }
    let total: Amount = data.expenses.iter().map(|e| &e.amount).sum();
    out.push_str(&format!("Grand total: {}\n\n", total));

    out.push_str(&format!(
        "Generated at {}\n",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    ));
    out.push_str("=======================================\n");
    out
}

#[derive(Debug, Clone)]
pub struct TextReportWriter {
    file_path: PathBuf,
}

impl TextReportWriter {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }
}

impl MirrorSink for TextReportWriter {
    fn render(&self, data: &StoreData) -> Result<()> {
        let report = render_report(data, Local::now());
        fs::write(&self.file_path, report)
            .with_context(|| format!("Could not write report to {}", self.file_path.display()))
    }
}
