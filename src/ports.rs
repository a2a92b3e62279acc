//! Storage port for transactions.
//! The service depends on this trait only; Postgres and in-memory adapters
//! implement it.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{Transaction, TransactionStatus};

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Corrupt row for transaction {transaction_id}: {reason}")]
    CorruptRow {
        transaction_id: String,
        reason: String,
    },
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Result of a guarded status update. Not-found and ownership mismatch are
/// ordinary outcomes, not errors.
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateOutcome {
    Updated(Transaction),
    NotFound,
    OwnershipMismatch,
}

#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// Inserts the record, or overwrites only `status` when
    /// `(account_id, transaction_id)` already exists. Single atomic statement.
    async fn create(&self, tx: &Transaction) -> RepositoryResult<()>;

    /// Looks a record up by transaction id alone.
    async fn get(&self, transaction_id: &str) -> RepositoryResult<Option<Transaction>>;

    /// Sets `status` on the record owned by `account_id`, leaving every other
    /// field untouched.
    async fn update_status(
        &self,
        account_id: &str,
        transaction_id: &str,
        status: TransactionStatus,
    ) -> RepositoryResult<UpdateOutcome>;
}
