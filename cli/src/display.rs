use chrono::NaiveDate;
use pocketdesk_core::{date, Amount, BatchOutcome, ExpenseRecord, MonthlyExpenses, TodoCounts, TodoView};
use tabled::settings::object::{Columns, Rows};
use tabled::settings::{Alignment, Color, Modify, Style};
use tabled::{Table, Tabled};

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
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Item")]
    item: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

fn todo_rows(views: &[TodoView], today: NaiveDate) -> Vec<TodoRow> {
    views
        .iter()
        .map(|view| {
            let mut date = date::format(view.record.date);
            if view.record.is_overdue(today) {
                date.push_str(" !");
            }
            TodoRow {
                index: view.index,
                status: view.record.status().glyph(),
                date,
                content: view.record.content.clone(),
            }
        })
        .collect()
}

pub fn print_todos(views: &[TodoView], today: NaiveDate) {
    if views.is_empty() {
        println!("No todos found.");
        return;
    }
    let table = Table::new(todo_rows(views, today))
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN))
        .to_string();
    println!("{}", table);
}

pub fn print_counts(counts: TodoCounts) {
    println!(
        "{} total | {} done | {} pending",
        counts.total, counts.done, counts.pending
    );
}

pub fn print_overdue_reminder(overdue: &[TodoView]) {
    if overdue.is_empty() {
        return;
    }
    println!("\x1b[1;33mOverdue:\x1b[0m {} pending todo(s) are past their date", overdue.len());
    for view in overdue {
        println!("  {}. {} ({})", view.index, view.record.content, date::format(view.record.date));
    }
    println!();
}

pub fn print_batch(verb: &str, outcome: &BatchOutcome) {
    for view in &outcome.applied {
        println!("{} #{}: {}", verb, view.index, view.record.content);
    }
    if !outcome.already_done.is_empty() {
        println!("Already done: {}", join(&outcome.already_done));
    }
    if !outcome.invalid.is_empty() {
        eprintln!("Warning: ignored invalid index(es): {}", join(&outcome.invalid));
    }
}

fn join(indices: &[usize]) -> String {
    indices.iter().map(|i| i.to_string()).collect::<Vec<_>>().join(", ")
}

fn expense_table(records: &[ExpenseRecord]) -> String {
    let rows = records.iter().map(|expense| ExpenseRow {
        date: date::format(expense.time),
        item: expense.item.clone(),
        amount: expense.amount.to_string(),
    });
    Table::new(rows)
        .with(Style::modern())
        .with(Modify::new(Rows::first()).with(Color::FG_CYAN))
        .with(Modify::new(Columns::last()).with(Alignment::right()))
        .to_string()
}

pub fn print_expenses(records: &[ExpenseRecord]) {
    if records.is_empty() {
        println!("No expenses recorded.");
        return;
    }
    println!("{}", expense_table(records));
    let total: Amount = records.iter().map(|e| &e.amount).sum();
    println!("Total: {}", total);
}

pub fn print_month(monthly: &MonthlyExpenses) {
    if monthly.records.is_empty() {
        println!("No expenses in {}.", monthly.month);
        return;
    }
    println!("\x1b[1;36mExpenses for {}\x1b[0m", monthly.month);
    println!("{}", expense_table(&monthly.records));
    println!("Total: {}", monthly.total);
}
