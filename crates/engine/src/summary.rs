//! Summary statistics over a set of transactions.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::{MoneyCents, Platform, Transaction, TransactionKind};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub gross_earnings: MoneyCents,
    pub total_expenses: MoneyCents,
    /// `gross_earnings - total_expenses`, not clamped.
    pub net_profit: MoneyCents,
    /// Always holds an entry for every [`Platform`].
    pub per_platform_earnings: BTreeMap<Platform, MoneyCents>,
    pub daily_average_profit: MoneyCents,
    /// Distinct calendar days present in the input.
    pub days: u64,
}

impl SummaryStats {
    pub fn platform(&self, platform: Platform) -> MoneyCents {
        self.per_platform_earnings
            .get(&platform)
            .copied()
            .unwrap_or_default()
    }
}

/// Reduces `transactions` into [`SummaryStats`].
///
/// The fold is order independent. The daily average divides net profit by
/// the number of distinct days that have any transaction, and is zero for an
/// empty input.
pub fn summarize(transactions: &[Transaction]) -> SummaryStats {
    let mut per_platform: BTreeMap<Platform, MoneyCents> = Platform::ALL
        .into_iter()
        .map(|p| (p, MoneyCents::ZERO))
        .collect();
    let mut gross = MoneyCents::ZERO;
    let mut expenses = MoneyCents::ZERO;
    let mut days = BTreeSet::new();

    for tx in transactions {
        days.insert(tx.day());
        match tx.kind {
            TransactionKind::Earning { platform } => {
                gross += tx.amount;
                *per_platform.entry(platform).or_default() += tx.amount;
            }
            TransactionKind::Expense { .. } => expenses += tx.amount,
        }
    }

    let net = gross - expenses;
    let days = days.len() as u64;
    let daily_average = if transactions.is_empty() {
        MoneyCents::ZERO
    } else {
        net.div_round(days.max(1))
    };

    SummaryStats {
        gross_earnings: gross,
        total_expenses: expenses,
        net_profit: net,
        per_platform_earnings: per_platform,
        daily_average_profit: daily_average,
        days,
    }
}
