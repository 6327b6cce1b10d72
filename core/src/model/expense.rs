use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StoreError;
use crate::model::amount::Amount;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ExpenseRecord {
    pub id: Uuid,
    pub item: String,
    pub amount: Amount,
    #[serde(with = "crate::date::serde_ymd")]
    pub time: NaiveDate,
}

impl ExpenseRecord {
    pub fn new(item: String, amount: Amount, time: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            item,
            amount,
            time,
        }
    }
}

/// `YYYY-MM` month selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        YearMonth::of(date) == *self
    }
}

impl FromStr for YearMonth {
    type Err = StoreError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        // Reuse the strict date check by pinning the day to the 1st.
        let date = crate::date::validate(&format!("{input}-01"))
            .map_err(|_| StoreError::InvalidDate(input.to_string()))?;
        Ok(YearMonth::of(date))
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyExpenses {
    pub month: YearMonth,
    pub records: Vec<ExpenseRecord>,
    pub total: Amount,
}
