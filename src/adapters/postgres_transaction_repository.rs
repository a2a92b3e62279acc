//! Postgres implementation of TransactionRepository.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::db::models::TransactionRow;
use crate::db::queries;
use crate::domain::{Transaction, TransactionStatus};
use crate::ports::{RepositoryResult, TransactionRepository, UpdateOutcome};

/// Postgres-backed transaction repository.
#[derive(Clone)]
pub struct PostgresTransactionRepository {
    pool: PgPool,
}

impl PostgresTransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransactionRepository for PostgresTransactionRepository {
    async fn create(&self, tx: &Transaction) -> RepositoryResult<()> {
        queries::upsert_transaction(&self.pool, &TransactionRow::from(tx)).await?;
        Ok(())
    }

    async fn get(&self, transaction_id: &str) -> RepositoryResult<Option<Transaction>> {
        queries::get_transaction(&self.pool, transaction_id)
            .await?
            .map(TransactionRow::into_domain)
            .transpose()
    }

    async fn update_status(
        &self,
        account_id: &str,
        transaction_id: &str,
        status: TransactionStatus,
    ) -> RepositoryResult<UpdateOutcome> {
        // The row lock keeps the ownership check and the write consistent
        // against a concurrent update of the same transaction.
        let mut db_tx = self.pool.begin().await?;

        let Some(row) = queries::lock_transaction(&mut db_tx, transaction_id).await? else {
            db_tx.rollback().await?;
            return Ok(UpdateOutcome::NotFound);
        };

        if row.account_id != account_id {
            db_tx.rollback().await?;
            return Ok(UpdateOutcome::OwnershipMismatch);
        }

        // A row that cannot be read back is left untouched.
        let mut updated = match row.into_domain() {
            Ok(tx) => tx,
            Err(e) => {
                db_tx.rollback().await?;
                return Err(e);
            }
        };

        queries::update_transaction_status(&mut db_tx, account_id, transaction_id, status.as_str())
            .await?;
        db_tx.commit().await?;

        updated.status = status;
        Ok(UpdateOutcome::Updated(updated))
    }
}
