use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TodoRecord {
    pub id: Uuid,
    pub content: String,
    #[serde(default)]
    pub done: bool,
    /// Creation date, or the scheduled date when the user supplied one.
    #[serde(with = "crate::date::serde_ymd")]
    pub date: NaiveDate,
}

impl TodoRecord {
    pub fn new(content: String, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            content,
            done: false,
            date,
        }
    }

    pub fn status(&self) -> TodoStatus {
        if self.done {
            TodoStatus::Done
        } else {
            TodoStatus::Pending
        }
    }

    pub fn is_overdue(&self, reference: NaiveDate) -> bool {
        !self.done && crate::date::is_past(self.date, reference)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoStatus {
    Pending,
    Done,
}

impl TodoStatus {
    pub fn glyph(self) -> &'static str {
        match self {
            TodoStatus::Pending => "[ ]",
            TodoStatus::Done => "[x]",
        }
    }
}

/// A record together with the 1-based position it currently occupies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoView {
    pub index: usize,
    pub record: TodoRecord,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TodoCounts {
    pub total: usize,
    pub done: usize,
    pub pending: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TodoFilter {
    #[default]
    All,
    Pending,
    Done,
}

impl TodoFilter {
    pub fn matches(self, record: &TodoRecord) -> bool {
        match self {
            TodoFilter::All => true,
            TodoFilter::Pending => !record.done,
            TodoFilter::Done => record.done,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TodoSort {
    #[default]
    Added,
    Date,
}
