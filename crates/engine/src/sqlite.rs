//! SQLite-backed store built on `sea-orm`.
//!
//! The schema is owned by the `migration` crate; run it before building a
//! [`SqliteStore`].

use sea_orm::{
    DatabaseConnection, EntityTrait, QueryOrder, TransactionTrait, sea_query::OnConflict,
};
use uuid::Uuid;

use crate::{
    EngineError, Goal, ResultEngine, StoreOp, Transaction, TransactionStore, goals,
    store::sort_newest_first, transactions,
};

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

#[derive(Clone, Debug)]
pub struct SqliteStore {
    database: DatabaseConnection,
}

impl SqliteStore {
    pub fn new(database: DatabaseConnection) -> Self {
        Self { database }
    }
}

impl TransactionStore for SqliteStore {
    async fn fetch_all(&self) -> ResultEngine<Vec<Transaction>> {
        let models = transactions::Entity::find()
            .order_by_desc(transactions::Column::OccurredAt)
            .all(&self.database)
            .await?;
        let mut snapshot = models
            .into_iter()
            .map(Transaction::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;
        // Ids are stored as text; re-sort so ties break on the parsed UUID.
        sort_newest_first(&mut snapshot);
        Ok(snapshot)
    }

    async fn apply(&self, ops: &[StoreOp]) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            async {
                for op in ops {
                    match op {
                        StoreOp::Upsert(upsert) => {
                            transactions::Entity::insert(transactions::ActiveModel::from(
                                &upsert.record,
                            ))
                            .on_conflict(
                                OnConflict::column(transactions::Column::Id)
                                    .update_columns([
                                        transactions::Column::Kind,
                                        transactions::Column::AmountMinor,
                                        transactions::Column::OccurredAt,
                                        transactions::Column::Platform,
                                        transactions::Column::Category,
                                        transactions::Column::LitersCenti,
                                        transactions::Column::Description,
                                    ])
                                    .to_owned(),
                            )
                            .exec(&db_tx)
                            .await?;
                        }
                        StoreOp::Delete(delete) => {
                            let result = transactions::Entity::delete_by_id(delete.id.to_string())
                                .exec(&db_tx)
                                .await?;
                            if result.rows_affected == 0 {
                                return Err(EngineError::KeyNotFound(delete.id.to_string()));
                            }
                        }
                    }
                }
                Ok::<(), EngineError>(())
            }
            .await
        })
    }

    async fn fetch_goals(&self) -> ResultEngine<Vec<Goal>> {
        goals::Entity::find()
            .order_by_asc(goals::Column::CreatedAt)
            .all(&self.database)
            .await?
            .into_iter()
            .map(Goal::try_from)
            .collect()
    }

    async fn insert_goal(&self, goal: &Goal) -> ResultEngine<()> {
        if goals::Entity::find_by_id(goal.id.to_string())
            .one(&self.database)
            .await?
            .is_some()
        {
            return Err(EngineError::ExistingKey(goal.id.to_string()));
        }
        goals::Entity::insert(goals::ActiveModel::from(goal))
            .exec(&self.database)
            .await?;
        Ok(())
    }

    async fn delete_goal(&self, id: Uuid) -> ResultEngine<()> {
        let result = goals::Entity::delete_by_id(id.to_string())
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound(id.to_string()));
        }
        Ok(())
    }
}
