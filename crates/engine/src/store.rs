//! Boundary to the durable transaction store.
//!
//! The engine never holds records between calls: every operation fetches a
//! fresh snapshot, computes on it and hands a batch of [`StoreOp`]s back.

use std::future::Future;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{DeleteOp, EngineError, Goal, ResultEngine, StoreOp, Transaction};

/// Durable collection of transactions and goals.
pub trait TransactionStore: Send + Sync {
    /// Every stored transaction, newest first.
    fn fetch_all(&self) -> impl Future<Output = ResultEngine<Vec<Transaction>>> + Send;

    /// Applies `ops` all together or not at all.
    fn apply(&self, ops: &[StoreOp]) -> impl Future<Output = ResultEngine<()>> + Send;

    /// Every stored goal, oldest first.
    fn fetch_goals(&self) -> impl Future<Output = ResultEngine<Vec<Goal>>> + Send;

    fn insert_goal(&self, goal: &Goal) -> impl Future<Output = ResultEngine<()>> + Send;

    fn delete_goal(&self, id: Uuid) -> impl Future<Output = ResultEngine<()>> + Send;
}

/// Newest first, id as tie breaker.
pub(crate) fn sort_newest_first(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| {
        b.occurred_at
            .cmp(&a.occurred_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}

/// Process-local store, mostly useful for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    transactions: RwLock<Vec<Transaction>>,
    goals: RwLock<Vec<Goal>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TransactionStore for MemoryStore {
    async fn fetch_all(&self) -> ResultEngine<Vec<Transaction>> {
        let mut snapshot = self.transactions.read().await.clone();
        sort_newest_first(&mut snapshot);
        Ok(snapshot)
    }

    async fn apply(&self, ops: &[StoreOp]) -> ResultEngine<()> {
        let mut guard = self.transactions.write().await;
        let mut next = guard.clone();
        for op in ops {
            match op {
                StoreOp::Upsert(upsert) => {
                    match next.iter_mut().find(|tx| tx.id == upsert.id()) {
                        Some(slot) => *slot = upsert.record.clone(),
                        None => next.push(upsert.record.clone()),
                    }
                }
                StoreOp::Delete(DeleteOp { id }) => {
                    let before = next.len();
                    next.retain(|tx| tx.id != *id);
                    if next.len() == before {
                        return Err(EngineError::KeyNotFound(id.to_string()));
                    }
                }
            }
        }
        *guard = next;
        Ok(())
    }

    async fn fetch_goals(&self) -> ResultEngine<Vec<Goal>> {
        let mut goals = self.goals.read().await.clone();
        goals.sort_by_key(|goal| goal.created_at);
        Ok(goals)
    }

    async fn insert_goal(&self, goal: &Goal) -> ResultEngine<()> {
        let mut goals = self.goals.write().await;
        if goals.iter().any(|g| g.id == goal.id) {
            return Err(EngineError::ExistingKey(goal.id.to_string()));
        }
        goals.push(goal.clone());
        Ok(())
    }

    async fn delete_goal(&self, id: Uuid) -> ResultEngine<()> {
        let mut goals = self.goals.write().await;
        let before = goals.len();
        goals.retain(|g| g.id != id);
        if goals.len() == before {
            return Err(EngineError::KeyNotFound(id.to_string()));
        }
        Ok(())
    }
}
