//! Transaction orchestration service.
//!
//! Composes the gateway failover engine with the transaction store. There is no
//! rollback between the two: once a gateway has accepted a transaction, a failed
//! write is reported and logged for manual reconciliation.

use bigdecimal::BigDecimal;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::domain::{RequestContext, Transaction, TransactionStatus, TransactionType};
use crate::gateway::{Orchestrator, OrchestratorError};
use crate::ports::{RepositoryError, TransactionRepository, UpdateOutcome};

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Gateway(#[from] OrchestratorError),

    /// The gateway completed the transaction but the local record was not saved.
    #[error("Transaction {transaction_id} was accepted by the gateway but could not be saved: {source}")]
    Persistence {
        transaction_id: String,
        #[source]
        source: RepositoryError,
    },

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("Request cancelled")]
    Cancelled,
}

pub struct TransactionService {
    orchestrator: Orchestrator,
    repository: Arc<dyn TransactionRepository>,
}

impl TransactionService {
    pub fn new(orchestrator: Orchestrator, repository: Arc<dyn TransactionRepository>) -> Self {
        Self {
            orchestrator,
            repository,
        }
    }

    pub async fn create_transaction(
        &self,
        ctx: &RequestContext,
        account_id: &str,
        amount: &BigDecimal,
        transaction_type: TransactionType,
    ) -> Result<Transaction, ServiceError> {
        let tx = self
            .orchestrator
            .execute(ctx, account_id, amount, transaction_type)
            .await?;

        // Not cancellable: the gateway side effect has already happened.
        if let Err(e) = self.repository.create(&tx).await {
            error!(
                request_id = %ctx.request_id,
                account_id = %tx.account_id,
                transaction_id = %tx.transaction_id,
                amount = %tx.amount,
                transaction_type = %tx.transaction_type,
                status = %tx.status,
                error = %e,
                "Gateway transaction not persisted, manual reconciliation required"
            );
            return Err(ServiceError::Persistence {
                transaction_id: tx.transaction_id,
                source: e,
            });
        }

        info!(
            request_id = %ctx.request_id,
            transaction_id = %tx.transaction_id,
            status = %tx.status,
            "Transaction recorded"
        );
        Ok(tx)
    }

    pub async fn get_transaction(
        &self,
        ctx: &RequestContext,
        transaction_id: &str,
    ) -> Result<Option<Transaction>, ServiceError> {
        let found = cancellable(ctx, self.repository.get(transaction_id)).await??;

        match &found {
            Some(tx) => info!(
                request_id = %ctx.request_id,
                transaction_id = %tx.transaction_id,
                status = %tx.status,
                "Transaction found"
            ),
            None => info!(
                request_id = %ctx.request_id,
                transaction_id = %transaction_id,
                "Transaction not found"
            ),
        }

        Ok(found)
    }

    pub async fn update_transaction(
        &self,
        ctx: &RequestContext,
        account_id: &str,
        transaction_id: &str,
        status: TransactionStatus,
    ) -> Result<UpdateOutcome, ServiceError> {
        let outcome = cancellable(
            ctx,
            self.repository
                .update_status(account_id, transaction_id, status),
        )
        .await??;

        match &outcome {
            UpdateOutcome::Updated(_) => info!(
                request_id = %ctx.request_id,
                transaction_id = %transaction_id,
                status = %status,
                "Transaction status updated"
            ),
            UpdateOutcome::NotFound => info!(
                request_id = %ctx.request_id,
                transaction_id = %transaction_id,
                "Transaction not found for update"
            ),
            UpdateOutcome::OwnershipMismatch => warn!(
                request_id = %ctx.request_id,
                transaction_id = %transaction_id,
                account_id = %account_id,
                "Transaction does not belong to account"
            ),
        }

        Ok(outcome)
    }
}

/// Races a store operation against the caller's cancellation. Dropping the
/// losing future abandons the in-flight query.
async fn cancellable<T, F>(ctx: &RequestContext, fut: F) -> Result<T, ServiceError>
where
    F: Future<Output = T>,
{
    tokio::select! {
        biased;
        _ = ctx.cancel.cancelled() => Err(ServiceError::Cancelled),
        value = fut => Ok(value),
    }
}
