//! Earning goals.
//!
//! Progress is always derived from the transaction snapshot: a goal stores
//! only its target.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    EngineError, MoneyCents, Transaction, ValidationError, summarize,
    util::{ensure_entry_amount, normalize_required_name, parse_uuid},
};

/// Named savings target tracked from its creation day onwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub id: Uuid,
    pub name: String,
    pub target: MoneyCents,
    pub created_at: DateTime<Utc>,
}

impl Goal {
    pub fn new(
        name: &str,
        target: MoneyCents,
        now: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let name = normalize_required_name(name)?;
        if !target.is_positive() {
            return Err(ValidationError::InvalidAmount(
                "goal target must be > 0".to_string(),
            ));
        }
        ensure_entry_amount(target, "goal target")?;
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            target,
            created_at: now,
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalProgress {
    pub target: MoneyCents,
    pub achieved: MoneyCents,
    /// What is left to reach the target, never below zero.
    pub remaining: MoneyCents,
    /// Completion in whole percent, 0 to 100.
    pub percent: u8,
}

impl GoalProgress {
    pub fn new(target: MoneyCents, achieved: MoneyCents) -> Self {
        let remaining = if achieved >= target {
            MoneyCents::ZERO
        } else {
            target - achieved
        };
        let percent = if !target.is_positive() {
            100
        } else if !achieved.is_positive() {
            0
        } else {
            let ratio = i128::from(achieved.cents()) * 100 / i128::from(target.cents());
            ratio.min(100) as u8
        };
        Self {
            target,
            achieved,
            remaining,
            percent,
        }
    }

    pub fn is_reached(&self) -> bool {
        self.remaining.is_zero()
    }
}

/// Today's net profit measured against a daily target.
pub fn daily_goal_progress(
    transactions: &[Transaction],
    target: MoneyCents,
    now: DateTime<Utc>,
) -> GoalProgress {
    let today = now.date_naive();
    let todays: Vec<Transaction> = transactions
        .iter()
        .filter(|tx| tx.day() == today)
        .cloned()
        .collect();
    GoalProgress::new(target, summarize(&todays).net_profit)
}

/// Net profit accumulated since the goal's creation day.
pub fn goal_progress(goal: &Goal, transactions: &[Transaction]) -> GoalProgress {
    let since = goal.created_at.date_naive();
    let counted: Vec<Transaction> = transactions
        .iter()
        .filter(|tx| tx.day() >= since)
        .cloned()
        .collect();
    GoalProgress::new(goal.target, summarize(&counted).net_profit)
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "goals")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub name: String,
    pub target_minor: i64,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Goal> for ActiveModel {
    fn from(goal: &Goal) -> Self {
        Self {
            id: ActiveValue::Set(goal.id.to_string()),
            name: ActiveValue::Set(goal.name.clone()),
            target_minor: ActiveValue::Set(goal.target.cents()),
            created_at: ActiveValue::Set(goal.created_at),
        }
    }
}

impl TryFrom<Model> for Goal {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "goal")?,
            name: model.name,
            target: MoneyCents::new(model.target_minor),
            created_at: model.created_at,
        })
    }
}
