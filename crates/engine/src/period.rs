//! Date windows used to scope reports.

use chrono::{DateTime, Datelike as _, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{Transaction, ValidationError};

/// Named report period, resolved against a caller supplied "now".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Day,
    #[default]
    Month,
    Year,
}

/// Calendar window a transaction must fall in to be reported.
///
/// Custom windows are inclusive on both ends: a transaction dated on `start`
/// or on `end` is part of the window.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "window", rename_all = "snake_case")]
pub enum PeriodWindow {
    Day { date: NaiveDate },
    Month { year: i32, month: u32 },
    Year { year: i32 },
    Custom { start: NaiveDate, end: NaiveDate },
}

impl PeriodWindow {
    /// Window of a named period containing `now`.
    pub fn preset(period: Period, now: DateTime<Utc>) -> Self {
        let today = now.date_naive();
        match period {
            Period::Day => Self::Day { date: today },
            Period::Month => Self::Month {
                year: today.year(),
                month: today.month(),
            },
            Period::Year => Self::Year { year: today.year() },
        }
    }

    /// Explicit `[start, end]` window; `start` must not be after `end`.
    pub fn custom(start: NaiveDate, end: NaiveDate) -> Result<Self, ValidationError> {
        if start > end {
            return Err(ValidationError::InvalidRange(format!(
                "start {start} is after end {end}"
            )));
        }
        Ok(Self::Custom { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        match *self {
            Self::Day { date: day } => date == day,
            Self::Month { year, month } => date.year() == year && date.month() == month,
            Self::Year { year } => date.year() == year,
            Self::Custom { start, end } => start <= date && date <= end,
        }
    }

    /// Short human readable label, e.g. for report headers.
    pub fn label(&self) -> String {
        match *self {
            Self::Day { .. } => "Today".to_string(),
            Self::Month { .. } => "Current month".to_string(),
            Self::Year { .. } => "Current year".to_string(),
            Self::Custom { start, end } => {
                format!("{} to {}", start.format("%d/%m"), end.format("%d/%m"))
            }
        }
    }
}

/// Keeps the transactions inside `window`, preserving their order.
pub fn filter(transactions: &[Transaction], window: &PeriodWindow) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|tx| window.contains(tx.day()))
        .cloned()
        .collect()
}
