use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::{Transaction, TransactionStatus};
use crate::ports::{RepositoryResult, TransactionRepository, UpdateOutcome};

type Key = (String, String);

/// A thread-safe in-memory transaction store keyed by
/// `(account_id, transaction_id)`.
///
/// Every operation runs under a single lock acquisition, so create and update
/// are atomic with respect to each other. Lookups by transaction id resolve a
/// shared id to the smallest `account_id`, matching the Postgres store.
#[derive(Default, Clone)]
pub struct InMemoryTransactionRepository {
    transactions: Arc<RwLock<HashMap<Key, Transaction>>>,
}

impl InMemoryTransactionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.transactions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.transactions.read().await.is_empty()
    }
}

#[async_trait]
impl TransactionRepository for InMemoryTransactionRepository {
    async fn create(&self, tx: &Transaction) -> RepositoryResult<()> {
        let mut transactions = self.transactions.write().await;
        transactions
            .entry((tx.account_id.clone(), tx.transaction_id.clone()))
            .and_modify(|existing| existing.status = tx.status)
            .or_insert_with(|| tx.clone());
        Ok(())
    }

    async fn get(&self, transaction_id: &str) -> RepositoryResult<Option<Transaction>> {
        let transactions = self.transactions.read().await;
        Ok(transactions
            .values()
            .filter(|tx| tx.transaction_id == transaction_id)
            .min_by(|a, b| a.account_id.cmp(&b.account_id))
            .cloned())
    }

    async fn update_status(
        &self,
        account_id: &str,
        transaction_id: &str,
        status: TransactionStatus,
    ) -> RepositoryResult<UpdateOutcome> {
        let mut transactions = self.transactions.write().await;

        let Some(existing) = transactions
            .values_mut()
            .filter(|tx| tx.transaction_id == transaction_id)
            .min_by(|a, b| a.account_id.cmp(&b.account_id))
        else {
            return Ok(UpdateOutcome::NotFound);
        };

        if existing.account_id != account_id {
            return Ok(UpdateOutcome::OwnershipMismatch);
        }

        existing.status = status;
        Ok(UpdateOutcome::Updated(existing.clone()))
    }
}
