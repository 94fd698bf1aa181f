//! Grouped view of the ledger.
//!
//! Earnings of the same calendar day are shown and edited as one unit even
//! though every platform keeps its own stored record. Expenses are never
//! merged.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::{MoneyCents, Platform, Transaction};

/// Same-day earnings across platforms.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct EarningsGroup {
    pub date: NaiveDate,
    /// Sum of the member amounts.
    pub total: MoneyCents,
    /// Member records in the order they were seen.
    pub members: Vec<Transaction>,
}

impl EarningsGroup {
    fn new(date: NaiveDate) -> Self {
        Self {
            date,
            total: MoneyCents::ZERO,
            members: Vec::new(),
        }
    }

    fn push(&mut self, tx: &Transaction) {
        self.total += tx.amount;
        self.members.push(tx.clone());
    }

    /// Stored record for `platform`, if the day has one.
    pub fn member(&self, platform: Platform) -> Option<&Transaction> {
        self.members
            .iter()
            .find(|tx| tx.platform() == Some(platform))
    }

    pub fn has(&self, platform: Platform) -> bool {
        self.member(platform).is_some()
    }

    /// Amount recorded for `platform`, zero when absent.
    pub fn amount_for(&self, platform: Platform) -> MoneyCents {
        self.members
            .iter()
            .filter(|tx| tx.platform() == Some(platform))
            .map(|tx| tx.amount)
            .sum()
    }

    /// Platforms present in the group, in enumeration order.
    pub fn platforms(&self) -> Vec<Platform> {
        Platform::ALL
            .into_iter()
            .filter(|p| self.has(*p))
            .collect()
    }

    pub fn member_ids(&self) -> Vec<Uuid> {
        self.members.iter().map(|tx| tx.id).collect()
    }
}

/// One row of the grouped history.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "item", rename_all = "snake_case")]
pub enum DisplayItem {
    Earnings(EarningsGroup),
    Expense(Transaction),
}

impl DisplayItem {
    pub fn date(&self) -> NaiveDate {
        match self {
            Self::Earnings(group) => group.date,
            Self::Expense(tx) => tx.day(),
        }
    }

    /// Amount shown for the row: group total or expense amount.
    pub fn amount(&self) -> MoneyCents {
        match self {
            Self::Earnings(group) => group.total,
            Self::Expense(tx) => tx.amount,
        }
    }
}

/// Collapses same-day earnings into [`EarningsGroup`]s.
///
/// A group is emitted at the position of its first earning; expenses pass
/// through in place. A day with a single platform still yields a group.
pub fn group(transactions: &[Transaction]) -> Vec<DisplayItem> {
    let mut items: Vec<DisplayItem> = Vec::new();
    let mut by_day: HashMap<NaiveDate, usize> = HashMap::new();

    for tx in transactions {
        if !tx.is_earning() {
            items.push(DisplayItem::Expense(tx.clone()));
            continue;
        }
        let day = tx.day();
        let index = *by_day.entry(day).or_insert_with(|| {
            items.push(DisplayItem::Earnings(EarningsGroup::new(day)));
            items.len() - 1
        });
        if let Some(DisplayItem::Earnings(group)) = items.get_mut(index) {
            group.push(tx);
        }
    }

    items
}

/// Builds the earnings group of a single day, if it has any earnings.
pub fn earnings_group_for(transactions: &[Transaction], date: NaiveDate) -> Option<EarningsGroup> {
    let mut group = EarningsGroup::new(date);
    for tx in transactions
        .iter()
        .filter(|tx| tx.is_earning() && tx.day() == date)
    {
        group.push(tx);
    }
    (!group.members.is_empty()).then_some(group)
}
