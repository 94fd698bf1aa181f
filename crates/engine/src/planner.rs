//! Mutation planning.
//!
//! Edits are expressed against derived views (an [`EarningsGroup`] or a
//! single expense) but the store only knows individual records. The planner
//! turns an edit into the exact list of record writes, keeping at most one
//! stored earning per (day, platform).

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::{
    EarningsGroup, ExpenseCategory, Liters, MoneyCents, Platform, Transaction, TransactionKind,
    ValidationError,
    util::{ensure_entry_amount, noon_utc},
};

/// Create-or-replace of one record, addressed by its id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UpsertOp {
    pub record: Transaction,
    /// `true` when the id belongs to a record already in the store.
    pub existing: bool,
}

impl UpsertOp {
    pub fn create(record: Transaction) -> Self {
        Self {
            record,
            existing: false,
        }
    }

    pub fn update(record: Transaction) -> Self {
        Self {
            record,
            existing: true,
        }
    }

    pub fn id(&self) -> Uuid {
        self.record.id
    }

    pub fn amount(&self) -> MoneyCents {
        self.record.amount
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DeleteOp {
    pub id: Uuid,
}

/// One write sent to the transaction store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum StoreOp {
    Upsert(UpsertOp),
    Delete(DeleteOp),
}

impl From<UpsertOp> for StoreOp {
    fn from(op: UpsertOp) -> Self {
        Self::Upsert(op)
    }
}

impl From<DeleteOp> for StoreOp {
    fn from(op: DeleteOp) -> Self {
        Self::Delete(op)
    }
}

/// Per-platform amounts entered for one day.
pub type PlatformAmounts = BTreeMap<Platform, MoneyCents>;

fn ensure_amounts(amounts: &PlatformAmounts) -> Result<(), ValidationError> {
    for (platform, &amount) in amounts {
        ensure_entry_amount(amount, &format!("amount for {platform}"))?;
    }
    Ok(())
}

/// Plans the writes for an edited earnings day.
///
/// Exactly one upsert is produced for every platform in
/// [`Platform::EDITABLE`], even when its amount is zero: a zero keeps the
/// slot occupied instead of dropping the record. Existing member ids are
/// reused; missing platforms get a fresh id. Amounts missing from
/// `edited_amounts` count as zero.
///
/// Members on other platforms keep their amount (unless one is supplied) and
/// follow the group to `edited_date`.
pub fn plan_earnings_update(
    group: &EarningsGroup,
    edited_amounts: &PlatformAmounts,
    edited_date: NaiveDate,
) -> Result<Vec<UpsertOp>, ValidationError> {
    ensure_amounts(edited_amounts)?;
    let occurred_at = noon_utc(edited_date);
    let mut ops = Vec::with_capacity(Platform::EDITABLE.len());

    for platform in Platform::EDITABLE {
        let amount = edited_amounts
            .get(&platform)
            .copied()
            .unwrap_or_default();
        let op = match group.member(platform) {
            Some(existing) => UpsertOp::update(Transaction {
                amount,
                occurred_at,
                ..existing.clone()
            }),
            None => UpsertOp::create(Transaction::earning(platform, amount, edited_date)?),
        };
        ops.push(op);
    }

    for member in &group.members {
        let Some(platform) = member.platform() else {
            continue;
        };
        if Platform::EDITABLE.contains(&platform) {
            continue;
        }
        let amount = edited_amounts
            .get(&platform)
            .copied()
            .unwrap_or(member.amount);
        if amount != member.amount || member.occurred_at != occurred_at {
            ops.push(UpsertOp::update(Transaction {
                amount,
                occurred_at,
                ..member.clone()
            }));
        }
    }

    Ok(ops)
}

/// Plans the writes for newly entered earnings of `date`.
///
/// Zero amounts are skipped. A platform that already has a record on that day
/// is topped up in place so the day never holds two records for it.
pub fn plan_new_earnings(
    existing: Option<&EarningsGroup>,
    amounts: &PlatformAmounts,
    date: NaiveDate,
) -> Result<Vec<UpsertOp>, ValidationError> {
    ensure_amounts(amounts)?;
    if amounts.values().all(|amount| amount.is_zero()) {
        return Err(ValidationError::InvalidAmount(
            "at least one platform amount must be > 0".to_string(),
        ));
    }

    let mut ops = Vec::new();
    for (&platform, &amount) in amounts.iter().filter(|(_, a)| a.is_positive()) {
        match existing.and_then(|group| group.member(platform)) {
            Some(current) => {
                let total = current.amount.checked_add(amount).ok_or_else(|| {
                    ValidationError::InvalidAmount("amount too large".to_string())
                })?;
                ensure_entry_amount(total, &format!("total for {platform}"))?;
                ops.push(UpsertOp::update(Transaction {
                    amount: total,
                    ..current.clone()
                }));
            }
            None => ops.push(UpsertOp::create(Transaction::earning(
                platform, amount, date,
            )?)),
        }
    }
    Ok(ops)
}

/// Replacement values for an expense.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExpenseEdit {
    pub amount: MoneyCents,
    pub category: ExpenseCategory,
    pub liters: Option<Liters>,
    pub date: NaiveDate,
    pub description: Option<String>,
}

impl ExpenseEdit {
    /// Edit prefilled with the current values of `tx`; `None` for earnings.
    pub fn from_expense(tx: &Transaction) -> Option<Self> {
        match tx.kind {
            TransactionKind::Expense { category, liters } => Some(Self {
                amount: tx.amount,
                category,
                liters,
                date: tx.day(),
                description: tx.description.clone(),
            }),
            TransactionKind::Earning { .. } => None,
        }
    }

    /// Switches to `category`, dropping liters it does not track.
    #[must_use]
    pub fn with_category(mut self, category: ExpenseCategory) -> Self {
        self.category = category;
        if !category.tracks_liters() {
            self.liters = None;
        }
        self
    }
}

/// Plans the single replace of an edited expense, keeping its id.
pub fn plan_expense_update(
    original: &Transaction,
    edits: ExpenseEdit,
) -> Result<UpsertOp, ValidationError> {
    if original.is_earning() {
        return Err(ValidationError::UnexpectedField {
            field: "category",
            kind: "earning",
        });
    }
    let mut record = Transaction::expense(edits.category, edits.liters, edits.amount, edits.date)?;
    record.id = original.id;
    record.description = edits.description;
    Ok(UpsertOp::update(record))
}

/// Plans the deletion of every record of an earnings day.
///
/// The store must apply the returned operations all together or not at all.
pub fn plan_group_delete(group: &EarningsGroup) -> Vec<DeleteOp> {
    group
        .member_ids()
        .into_iter()
        .map(|id| DeleteOp { id })
        .collect()
}
