mod display;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use pocketdesk_core::{date, open_file_store, Completion, FileRecordStore, StorePaths, TodoFilter, TodoSort};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pocketdesk")]
#[command(about = "A personal todo list and expense ledger", long_about = None)]
struct Cli {
    /// Directory holding pocketdesk.json and its pocketdesk.txt report
    #[arg(long, global = true, default_value = ".")]
    data_dir: PathBuf,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Manage todos
    Todo {
        #[command(subcommand)]
        command: TodoCommand,
    },
    /// Record and review expenses
    Expense {
        #[command(subcommand)]
        command: ExpenseCommand,
    },
    /// Date calculator
    Date {
        #[command(subcommand)]
        command: DateCommand,
    },
}

#[derive(clap::Subcommand)]
enum TodoCommand {
    /// Add a todo (usage: todo add Buy milk --date 2026-01-05)
    Add {
        #[arg(required = true)]
        words: Vec<String>,
        /// Scheduled date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
    },
    /// List todos
    List {
        #[arg(long, value_enum, default_value_t = FilterArg::All)]
        filter: FilterArg,
        #[arg(long, value_enum, default_value_t = SortArg::Added)]
        sort: SortArg,
    },
    /// Mark todos as done by their list number
    Done {
        #[arg(required = true)]
        indices: Vec<usize>,
    },
    /// Delete todos by their list number
    Rm {
        #[arg(required = true)]
        indices: Vec<usize>,
    },
    /// Change the text and/or date of a todo
    Edit {
        index: usize,
        #[arg(long)]
        content: Option<String>,
        #[arg(long)]
        date: Option<String>,
    },
    /// Find todos by keyword or date fragment
    Search { keyword: String },
    /// Show pending todos whose date has passed
    Overdue,
}

#[derive(clap::Subcommand)]
enum ExpenseCommand {
    /// Record an expense (usage: expense add coffee 3.50 --date 2026-01-05)
    Add {
        item: String,
        amount: String,
        #[arg(long)]
        date: Option<String>,
    },
    /// List every expense
    List,
    /// List one month's expenses with their total
    Month {
        /// Month as YYYY-MM
        month: String,
    },
}

#[derive(clap::Subcommand)]
enum DateCommand {
    /// Whole days between two dates
    Diff { from: String, to: String },
    /// Shift a date by a number of days (negative allowed)
    Shift {
        date: String,
        #[arg(allow_negative_numbers = true)]
        days: i64,
    },
    /// Check whether a date is valid and whether it has passed
    Check { date: String },
}

#[derive(Clone, Copy, ValueEnum)]
enum FilterArg {
    All,
    Pending,
    Done,
}

impl From<FilterArg> for TodoFilter {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::All => TodoFilter::All,
            FilterArg::Pending => TodoFilter::Pending,
            FilterArg::Done => TodoFilter::Done,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Added,
    Date,
}

impl From<SortArg> for TodoSort {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Added => TodoSort::Added,
            SortArg::Date => TodoSort::Date,
        }
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "error",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn open_store(data_dir: &Path) -> Result<FileRecordStore> {
    let paths = StorePaths::in_dir(data_dir);
    debug!("Using store at {}", paths.primary.display());
    let (store, report) = open_file_store(&paths)
        .with_context(|| format!("Could not open store in {}", data_dir.display()))?;
    for skipped in &report.skipped {
        eprintln!("Warning: {}", skipped);
    }
    Ok(store)
}

/// Prints the mirror failure left by the last commit, if any.
fn report_mirror(store: &mut FileRecordStore) {
    if let Some(warning) = store.take_mirror_warning() {
        eprintln!("Warning: report file not updated: {}", warning);
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Todo { command } => {
            let mut store = open_store(&cli.data_dir)?;
            run_todo(&mut store, command)?;
            report_mirror(&mut store);
        }
        Commands::Expense { command } => {
            let mut store = open_store(&cli.data_dir)?;
            run_expense(&mut store, command)?;
            report_mirror(&mut store);
        }
        Commands::Date { command } => run_date(command)?,
    }
    Ok(())
}

fn run_todo(store: &mut FileRecordStore, command: TodoCommand) -> Result<()> {
    let today = date::today();
    if !matches!(command, TodoCommand::Overdue) {
        display::print_overdue_reminder(&store.overdue_todos(today));
    }

    match command {
        TodoCommand::Add { words, date: scheduled } => {
            let content = words.join(" ");
            if store.has_similar_todo(&content) {
                eprintln!("Warning: a similar todo already exists.");
            }
            let created = store.add_todo(&content, scheduled.as_deref())?;
            println!("Todo added: {} ({})", created.content, date::format(created.date));
            if date::is_past(created.date, today) {
                eprintln!("Warning: that date has already passed.");
            }
        }
        TodoCommand::List { filter, sort } => {
            display::print_counts(store.todo_counts());
            display::print_todos(&store.query_todos(filter.into(), sort.into()), today);
        }
        TodoCommand::Done { indices } => {
            if let [index] = indices.as_slice() {
                match store.complete_todo(*index)? {
                    Completion::Completed(record) => println!("Done #{}: {}", index, record.content),
                    Completion::AlreadyDone(record) => println!("#{} is already done: {}", index, record.content),
                }
            } else {
                display::print_batch("Done", &store.complete_todos(&indices)?);
            }
        }
        TodoCommand::Rm { indices } => {
            if let [index] = indices.as_slice() {
                let removed = store.delete_todo(*index)?;
                println!("Deleted #{}: {}", index, removed.content);
            } else {
                display::print_batch("Deleted", &store.delete_todos(&indices)?);
            }
        }
        TodoCommand::Edit { index, content, date: scheduled } => {
            if content.is_none() && scheduled.is_none() {
                println!("Nothing to change; pass --content and/or --date.");
                return Ok(());
            }
            let edited = store.edit_todo(index, content.as_deref(), scheduled.as_deref())?;
            println!("Updated #{}: {} ({})", index, edited.content, date::format(edited.date));
        }
        TodoCommand::Search { keyword } => {
            let hits = store.search_todos(&keyword)?;
            println!("{} match(es) for '{}'", hits.len(), keyword.trim());
            display::print_todos(&hits, today);
        }
        TodoCommand::Overdue => {
            let overdue = store.overdue_todos(today);
            if overdue.is_empty() {
                println!("Nothing overdue.");
            } else {
                display::print_todos(&overdue, today);
            }
        }
    }
    Ok(())
}

fn run_expense(store: &mut FileRecordStore, command: ExpenseCommand) -> Result<()> {
    match command {
        ExpenseCommand::Add { item, amount, date: spent_on } => {
            let created = store.add_expense(&item, &amount, spent_on.as_deref())?;
            println!(
                "Expense added: {} {} ({})",
                created.item,
                created.amount,
                date::format(created.time)
            );
        }
        ExpenseCommand::List => display::print_expenses(store.list_expenses()),
        ExpenseCommand::Month { month } => display::print_month(&store.expenses_for_month(&month)?),
    }
    Ok(())
}

fn run_date(command: DateCommand) -> Result<()> {
    match command {
        DateCommand::Diff { from, to } => {
            let (from, to) = (date::validate(&from)?, date::validate(&to)?);
            println!("{} day(s)", date::days_between(from, to));
        }
        DateCommand::Shift { date: base, days } => {
            let shifted = date::offset(date::validate(&base)?, days)?;
            println!("{}", date::format(shifted));
        }
        DateCommand::Check { date: text } => {
            let parsed = date::validate(&text)?;
            let today = date::today();
            if date::is_past(parsed, today) {
                println!("{} is valid and {} day(s) in the past", text, date::days_between(parsed, today));
            } else {
                println!("{} is valid and {} day(s) away", text, date::days_between(parsed, today));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_todo_add_with_date() {
        let cli = Cli::try_parse_from(["pocketdesk", "todo", "add", "buy", "milk", "--date", "2026-01-05"]).unwrap();
        match cli.command {
            Commands::Todo { command: TodoCommand::Add { words, date } } => {
                assert_eq!(words, vec!["buy", "milk"]);
                assert_eq!(date.as_deref(), Some("2026-01-05"));
            }
            _ => panic!("expected todo add"),
        }
    }

    #[test]
    fn test_parse_negative_shift_and_data_dir() {
        let cli = Cli::try_parse_from(["pocketdesk", "date", "shift", "2026-01-01", "-3", "--data-dir", "/tmp/desk"]).unwrap();
        assert_eq!(cli.data_dir, PathBuf::from("/tmp/desk"));
        assert!(matches!(cli.command, Commands::Date { command: DateCommand::Shift { days: -3, .. } }));
    }
}
