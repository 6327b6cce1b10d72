use chrono::NaiveDate;
use tracing::{debug, info};

use crate::date;
use crate::error::{StoreError, StoreResult};
use crate::model::amount::Amount;
use crate::model::expense::{ExpenseRecord, MonthlyExpenses, YearMonth};
use crate::model::store::{LoadReport, StoreData};
use crate::model::todo::{TodoCounts, TodoFilter, TodoRecord, TodoSort, TodoView};
use crate::repository::{MirrorSink, PrimaryStore};
use crate::service::durability::DurabilityLayer;

/// Outcome of completing a single todo.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    Completed(TodoRecord),
    /// The record was already done; nothing changed.
    AlreadyDone(TodoRecord),
}

impl Completion {
    pub fn record(&self) -> &TodoRecord {
        match self {
            Completion::Completed(record) | Completion::AlreadyDone(record) => record,
        }
    }
}

/// Outcome of a batch complete/delete. Indices are the 1-based positions as
/// they were before the batch ran.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub applied: Vec<TodoView>,
    pub already_done: Vec<usize>,
    pub invalid: Vec<usize>,
}

/// Owns the aggregate and keeps it in step with the primary store.
///
/// Every mutation runs against a working copy which only replaces the
/// in-memory state once the primary write has succeeded.
pub struct RecordStore<P: PrimaryStore, M: MirrorSink> {
    data: StoreData,
    durability: DurabilityLayer<P, M>,
    mirror_warning: Option<String>,
}

impl<P: PrimaryStore, M: MirrorSink> RecordStore<P, M> {
    pub fn open(durability: DurabilityLayer<P, M>) -> StoreResult<(Self, LoadReport)> {
        let (data, report) = durability.load()?;
        debug!(
            "Opened store with {} todo(s), {} expense(s), {} skipped",
            data.todos.len(),
            data.expenses.len(),
            report.skipped.len()
        );
        let store = Self {
            data,
            durability,
            mirror_warning: None,
        };
        Ok((store, report))
    }

    pub fn data(&self) -> &StoreData {
        &self.data
    }

    /// Returns the mirror failure of the last commit, if any.
    pub fn take_mirror_warning(&mut self) -> Option<String> {
        self.mirror_warning.take()
    }

    fn commit<T>(&mut self, apply: impl FnOnce(&mut StoreData) -> T) -> StoreResult<T> {
        let mut working = self.data.clone();
        let value = apply(&mut working);
        let report = self.durability.persist(&working)?;
        self.data = working;
        self.mirror_warning = report.mirror_error;
        Ok(value)
    }

    fn slot(&self, index: usize) -> StoreResult<usize> {
        let len = self.data.todos.len();
        if index == 0 || index > len {
            return Err(StoreError::IndexOutOfRange { index, len });
        }
        Ok(index - 1)
    }

    // --- Todos ---

    pub fn add_todo(&mut self, content: &str, scheduled: Option<&str>) -> StoreResult<TodoRecord> {
        let content = non_empty(content).ok_or(StoreError::EmptyContent)?;
        let date = date::validate_or_today(scheduled)?;
        let record = TodoRecord::new(content, date);

        let created = record.clone();
        self.commit(move |data| data.todos.push(record))?;
        info!("Added todo #{}", self.data.todos.len());
        Ok(created)
    }

    pub fn list_todos(&self) -> &[TodoRecord] {
        &self.data.todos
    }

    pub fn complete_todo(&mut self, index: usize) -> StoreResult<Completion> {
        let slot = self.slot(index)?;
        let current = &self.data.todos[slot];
        if current.done {
            return Ok(Completion::AlreadyDone(current.clone()));
        }

        let record = self.commit(|data| {
            let todo = &mut data.todos[slot];
            todo.done = true;
            todo.clone()
        })?;
        info!("Completed todo #{}", index);
        Ok(Completion::Completed(record))
    }

    pub fn delete_todo(&mut self, index: usize) -> StoreResult<TodoRecord> {
        let slot = self.slot(index)?;
        let removed = self.commit(|data| data.todos.remove(slot))?;
        info!("Deleted todo #{}", index);
        Ok(removed)
    }

    pub fn edit_todo(&mut self, index: usize, content: Option<&str>, scheduled: Option<&str>) -> StoreResult<TodoRecord> {
        let slot = self.slot(index)?;
        let content = match content {
            Some(text) => Some(non_empty(text).ok_or(StoreError::EmptyContent)?),
            None => None,
        };
        let date = scheduled.map(date::validate).transpose()?;
        if content.is_none() && date.is_none() {
            return Ok(self.data.todos[slot].clone());
        }

        let record = self.commit(|data| {
            let todo = &mut data.todos[slot];
            if let Some(content) = content {
                todo.content = content;
            }
            if let Some(date) = date {
                todo.date = date;
            }
            todo.clone()
        })?;
        info!("Edited todo #{}", index);
        Ok(record)
    }

    pub fn complete_todos(&mut self, indices: &[usize]) -> StoreResult<BatchOutcome> {
        let (valid, invalid) = self.partition_indices(indices)?;
        let mut outcome = BatchOutcome {
            invalid,
            ..BatchOutcome::default()
        };

        let pending: Vec<usize> = valid
            .into_iter()
            .filter(|&index| {
                let done = self.data.todos[index - 1].done;
                if done {
                    outcome.already_done.push(index);
                }
                !done
            })
            .collect();
        if pending.is_empty() {
            return Ok(outcome);
        }

        outcome.applied = self.commit(|data| {
            pending
                .iter()
                .map(|&index| {
                    let todo = &mut data.todos[index - 1];
                    todo.done = true;
                    TodoView {
                        index,
                        record: todo.clone(),
                    }
                })
                .collect::<Vec<_>>()
        })?;
        info!("Completed {} todo(s)", outcome.applied.len());
        Ok(outcome)
    }

    pub fn delete_todos(&mut self, indices: &[usize]) -> StoreResult<BatchOutcome> {
        let (valid, invalid) = self.partition_indices(indices)?;

        let mut applied = self.commit(|data| {
            // Highest first so earlier positions stay put.
            valid
                .iter()
                .rev()
                .map(|&index| TodoView {
                    index,
                    record: data.todos.remove(index - 1),
                })
                .collect::<Vec<_>>()
        })?;
        applied.reverse();
        info!("Deleted {} todo(s)", applied.len());

        Ok(BatchOutcome {
            applied,
            already_done: Vec::new(),
            invalid,
        })
    }

    /// Splits indices into sorted, de-duplicated valid ones and the rest.
    fn partition_indices(&self, indices: &[usize]) -> StoreResult<(Vec<usize>, Vec<usize>)> {
        let len = self.data.todos.len();
        let mut sorted = indices.to_vec();
        sorted.sort_unstable();
        sorted.dedup();

        let (valid, invalid): (Vec<usize>, Vec<usize>) =
            sorted.into_iter().partition(|&index| index >= 1 && index <= len);
        if valid.is_empty() {
            let index = invalid.first().copied().unwrap_or(0);
            return Err(StoreError::IndexOutOfRange { index, len });
        }
        Ok((valid, invalid))
    }

    pub fn query_todos(&self, filter: TodoFilter, sort: TodoSort) -> Vec<TodoView> {
        let mut views: Vec<TodoView> = self
            .views()
            .filter(|view| filter.matches(&view.record))
            .collect();
        if sort == TodoSort::Date {
            views.sort_by_key(|view| view.record.date);
        }
        views
    }

    pub fn search_todos(&self, keyword: &str) -> StoreResult<Vec<TodoView>> {
        let keyword = non_empty(keyword).ok_or(StoreError::EmptyContent)?.to_lowercase();
        Ok(self
            .views()
            .filter(|view| {
                view.record.content.to_lowercase().contains(&keyword)
                    || date::format(view.record.date).contains(&keyword)
            })
            .collect())
    }

    pub fn overdue_todos(&self, reference: NaiveDate) -> Vec<TodoView> {
        self.views()
            .filter(|view| view.record.is_overdue(reference))
            .collect()
    }

    pub fn todo_counts(&self) -> TodoCounts {
        let total = self.data.todos.len();
        let done = self.data.todos.iter().filter(|t| t.done).count();
        TodoCounts {
            total,
            done,
            pending: total - done,
        }
    }

    /// Case-insensitive match on content. Advisory only; duplicates are allowed.
    pub fn has_similar_todo(&self, content: &str) -> bool {
        let needle = content.trim().to_lowercase();
        self.data
            .todos
            .iter()
            .any(|todo| todo.content.to_lowercase() == needle)
    }

    fn views(&self) -> impl Iterator<Item = TodoView> + '_ {
        self.data
            .todos
            .iter()
            .enumerate()
            .map(|(i, record)| TodoView {
                index: i + 1,
                record: record.clone(),
            })
    }

    // --- Expenses ---

    pub fn add_expense(&mut self, item: &str, amount: &str, date: Option<&str>) -> StoreResult<ExpenseRecord> {
        let item = non_empty(item).ok_or(StoreError::EmptyItem)?;
        let raw_amount = amount;
        let amount: Amount = amount.parse()?;
        Amount::checked_total(self.data.expenses.iter().map(|e| &e.amount).chain([&amount]))
            .ok_or_else(|| StoreError::InvalidAmount(raw_amount.to_string()))?;
        let time = date::validate_or_today(date)?;
        let record = ExpenseRecord::new(item, amount, time);

        let created = record.clone();
        self.commit(move |data| data.expenses.push(record))?;
        info!("Added expense #{}", self.data.expenses.len());
        Ok(created)
    }

    pub fn list_expenses(&self) -> &[ExpenseRecord] {
        &self.data.expenses
    }

    pub fn expenses_for_month(&self, year_month: &str) -> StoreResult<MonthlyExpenses> {
        let month: YearMonth = year_month.parse()?;
        let records: Vec<ExpenseRecord> = self
            .data
            .expenses
            .iter()
            .filter(|expense| month.contains(expense.time))
            .cloned()
            .collect();
        let total = records.iter().map(|e| &e.amount).sum();
        Ok(MonthlyExpenses { month, records, total })
    }
}

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
