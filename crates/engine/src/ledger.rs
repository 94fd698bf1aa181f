//! High level operations over a [`TransactionStore`].
//!
//! Each call fetches a fresh snapshot, runs the pure core on it and sends the
//! planned writes back. Nothing is cached between calls, so any operation can
//! be retried against a newer snapshot.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::{
    DeleteOp, DisplayItem, EarningsGroup, EngineError, EntryType, ExpenseEdit, Goal, GoalProgress,
    MoneyCents, PeriodWindow, PlatformAmounts, Report, ResultEngine, StoreOp, SummaryStats,
    Transaction, TransactionDraft, TransactionStore, UpsertOp, ValidationError,
    daily_goal_progress, earnings_group_for, goal_progress, group, plan_earnings_update,
    plan_expense_update, plan_group_delete, plan_new_earnings, summarize,
};

#[derive(Debug)]
pub struct Ledger<S> {
    store: S,
}

impl<S: TransactionStore> Ledger<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Current content of the store, newest first.
    pub async fn snapshot(&self) -> ResultEngine<Vec<Transaction>> {
        let snapshot = self.store.fetch_all().await?;
        tracing::debug!(transactions = snapshot.len(), "fetched snapshot");
        Ok(snapshot)
    }

    async fn apply(&self, ops: Vec<StoreOp>) -> ResultEngine<()> {
        tracing::debug!(ops = ops.len(), "applying store operations");
        self.store.apply(&ops).await?;
        tracing::info!(ops = ops.len(), "store updated");
        Ok(())
    }

    /// Records the earnings entered for `date`, one amount per platform.
    ///
    /// Zero amounts are skipped and platforms already recorded that day are
    /// topped up. Returns the ids written.
    pub async fn record_earnings(
        &self,
        amounts: &PlatformAmounts,
        date: NaiveDate,
    ) -> ResultEngine<Vec<Uuid>> {
        let snapshot = self.snapshot().await?;
        let existing = earnings_group_for(&snapshot, date);
        let ops = plan_new_earnings(existing.as_ref(), amounts, date)?;
        let ids = ops.iter().map(UpsertOp::id).collect();
        self.apply(ops.into_iter().map(StoreOp::from).collect())
            .await?;
        Ok(ids)
    }

    /// Validates and records a single transaction.
    ///
    /// Earnings go through [`Ledger::record_earnings`] so a day never holds two
    /// records for one platform, and so cannot carry a description. Expenses
    /// must have a positive amount.
    pub async fn record(&self, draft: TransactionDraft, now: DateTime<Utc>) -> ResultEngine<Uuid> {
        let tx = draft.validate_at(now)?;
        match tx.platform() {
            Some(platform) => {
                let amounts = PlatformAmounts::from([(platform, tx.amount)]);
                let ids = self.record_earnings(&amounts, tx.day()).await?;
                ids.into_iter()
                    .next()
                    .ok_or_else(|| EngineError::Store("no earning recorded".to_string()))
            }
            None => {
                if !tx.amount.is_positive() {
                    return Err(ValidationError::InvalidAmount(
                        "expense amount must be > 0".to_string(),
                    )
                    .into());
                }
                let id = tx.id;
                self.apply(vec![UpsertOp::create(tx).into()]).await?;
                Ok(id)
            }
        }
    }

    /// Grouped history, newest first.
    pub async fn history(&self) -> ResultEngine<Vec<DisplayItem>> {
        Ok(group(&self.snapshot().await?))
    }

    /// Totals over every stored transaction.
    pub async fn dashboard(&self) -> ResultEngine<SummaryStats> {
        Ok(summarize(&self.snapshot().await?))
    }

    pub async fn report(&self, window: PeriodWindow) -> ResultEngine<Report> {
        Ok(Report::new(&self.snapshot().await?, window))
    }

    /// Earnings group of `date`.
    pub async fn earnings_group(&self, date: NaiveDate) -> ResultEngine<EarningsGroup> {
        let snapshot = self.snapshot().await?;
        earnings_group_for(&snapshot, date)
            .ok_or_else(|| EngineError::KeyNotFound(format!("earnings on {date}")))
    }

    /// Rewrites the earnings of `date` with `amounts`, optionally moving them
    /// to `new_date`.
    ///
    /// Moving onto a day that already has earnings is rejected.
    pub async fn edit_earnings(
        &self,
        date: NaiveDate,
        amounts: &PlatformAmounts,
        new_date: Option<NaiveDate>,
    ) -> ResultEngine<Vec<UpsertOp>> {
        let snapshot = self.snapshot().await?;
        let Some(group) = earnings_group_for(&snapshot, date) else {
            tracing::warn!(%date, "edit of a day without earnings");
            return Err(EngineError::KeyNotFound(format!("earnings on {date}")));
        };
        let target = new_date.unwrap_or(date);
        if target != date && earnings_group_for(&snapshot, target).is_some() {
            return Err(EngineError::ExistingKey(format!("earnings on {target}")));
        }
        let ops = plan_earnings_update(&group, amounts, target)?;
        self.apply(ops.iter().cloned().map(StoreOp::from).collect())
            .await?;
        Ok(ops)
    }

    /// Stored expense with `id`.
    pub async fn expense(&self, id: Uuid) -> ResultEngine<Transaction> {
        self.snapshot()
            .await?
            .into_iter()
            .find(|tx| tx.id == id && tx.kind.entry_type() == EntryType::Expense)
            .ok_or_else(|| EngineError::KeyNotFound(id.to_string()))
    }

    /// Replaces the expense `id` with `edit`, keeping the id.
    pub async fn edit_expense(&self, id: Uuid, edit: ExpenseEdit) -> ResultEngine<UpsertOp> {
        let original = self.expense(id).await?;
        let op = plan_expense_update(&original, edit)?;
        self.apply(vec![op.clone().into()]).await?;
        Ok(op)
    }

    /// Deletes every record of the earnings day `date`. Returns the ids removed.
    pub async fn delete_earnings(&self, date: NaiveDate) -> ResultEngine<Vec<Uuid>> {
        let group = self.earnings_group(date).await.inspect_err(|_| {
            tracing::warn!(%date, "delete of a day without earnings");
        })?;
        let ops = plan_group_delete(&group);
        let ids = ops.iter().map(|op| op.id).collect();
        self.apply(ops.into_iter().map(StoreOp::from).collect())
            .await?;
        Ok(ids)
    }

    pub async fn delete_expense(&self, id: Uuid) -> ResultEngine<()> {
        let expense = self.expense(id).await?;
        self.apply(vec![StoreOp::Delete(DeleteOp { id: expense.id })])
            .await
    }

    /// Today's net profit against `target`.
    pub async fn daily_goal(
        &self,
        target: MoneyCents,
        now: DateTime<Utc>,
    ) -> ResultEngine<GoalProgress> {
        Ok(daily_goal_progress(&self.snapshot().await?, target, now))
    }

    pub async fn add_goal(
        &self,
        name: &str,
        target: MoneyCents,
        now: DateTime<Utc>,
    ) -> ResultEngine<Goal> {
        let goal = Goal::new(name, target, now)?;
        self.store.insert_goal(&goal).await?;
        tracing::info!(goal = %goal.id, "goal created");
        Ok(goal)
    }

    /// Every goal with its current progress.
    pub async fn goals(&self) -> ResultEngine<Vec<(Goal, GoalProgress)>> {
        let snapshot = self.snapshot().await?;
        let goals = self.store.fetch_goals().await?;
        Ok(goals
            .into_iter()
            .map(|goal| {
                let progress = goal_progress(&goal, &snapshot);
                (goal, progress)
            })
            .collect())
    }

    pub async fn remove_goal(&self, id: Uuid) -> ResultEngine<()> {
        self.store.delete_goal(id).await?;
        tracing::info!(goal = %id, "goal removed");
        Ok(())
    }
}
