mod common;

use async_trait::async_trait;
use common::{amount, as_gateways, transaction, Script, StubGateway};
use paygate_core::adapters::InMemoryTransactionRepository;
use paygate_core::domain::{RequestContext, Transaction, TransactionStatus, TransactionType};
use paygate_core::gateway::{Orchestrator, OrchestratorError};
use paygate_core::ports::{
    RepositoryError, RepositoryResult, TransactionRepository, UpdateOutcome,
};
use paygate_core::services::{ServiceError, TransactionService};
use std::sync::Arc;

/// Store whose writes always fail.
struct BrokenRepository;

#[async_trait]
impl TransactionRepository for BrokenRepository {
    async fn create(&self, _tx: &Transaction) -> RepositoryResult<()> {
        Err(RepositoryError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn get(&self, _transaction_id: &str) -> RepositoryResult<Option<Transaction>> {
        Err(RepositoryError::Database(sqlx::Error::PoolTimedOut))
    }

    async fn update_status(
        &self,
        _account_id: &str,
        _transaction_id: &str,
        _status: TransactionStatus,
    ) -> RepositoryResult<UpdateOutcome> {
        Err(RepositoryError::Database(sqlx::Error::PoolTimedOut))
    }
}

fn service_with(
    scripts: Vec<Script>,
    repository: Arc<dyn TransactionRepository>,
) -> (TransactionService, Vec<Arc<StubGateway>>) {
    let stubs: Vec<_> = scripts.into_iter().map(StubGateway::new).collect();
    let orchestrator = Orchestrator::new(as_gateways(&stubs)).unwrap();
    (TransactionService::new(orchestrator, repository), stubs)
}

fn deposit(transaction_id: &str, status: TransactionStatus) -> Script {
    Script::Success(transaction(
        "acc123",
        transaction_id,
        status,
        TransactionType::Deposit,
        "100.50",
    ))
}

#[tokio::test]
async fn test_create_persists_gateway_result() {
    let repo = InMemoryTransactionRepository::new();
    let (service, _) = service_with(
        vec![deposit("txn1", TransactionStatus::Success)],
        Arc::new(repo.clone()),
    );
    let ctx = RequestContext::detached();

    let tx = service
        .create_transaction(&ctx, "acc123", &amount("100.50"), TransactionType::Deposit)
        .await
        .unwrap();

    assert_eq!(tx.transaction_id, "txn1");
    let stored = service.get_transaction(&ctx, "txn1").await.unwrap().unwrap();
    assert_eq!(stored, tx);
    assert_eq!(repo.len().await, 1);
}

#[tokio::test]
async fn test_repeated_create_keeps_one_record_with_latest_status() {
    let repo = InMemoryTransactionRepository::new();
    let ctx = RequestContext::detached();

    let (first, _) = service_with(
        vec![deposit("txn1", TransactionStatus::Pending)],
        Arc::new(repo.clone()),
    );
    first
        .create_transaction(&ctx, "acc123", &amount("100.50"), TransactionType::Deposit)
        .await
        .unwrap();

    let (second, _) = service_with(
        vec![deposit("txn1", TransactionStatus::Success)],
        Arc::new(repo.clone()),
    );
    second
        .create_transaction(&ctx, "acc123", &amount("100.50"), TransactionType::Deposit)
        .await
        .unwrap();

    assert_eq!(repo.len().await, 1);
    let stored = repo.get("txn1").await.unwrap().unwrap();
    assert_eq!(stored.status, TransactionStatus::Success);
}

#[tokio::test]
async fn test_gateway_failure_persists_nothing() {
    let repo = InMemoryTransactionRepository::new();
    let (service, _) = service_with(
        vec![Script::Status(500), Script::NoResponse],
        Arc::new(repo.clone()),
    );

    let err = service
        .create_transaction(
            &RequestContext::detached(),
            "acc123",
            &amount("1"),
            TransactionType::Deposit,
        )
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ServiceError::Gateway(OrchestratorError::AllGatewaysFailed { .. })
    ));
    assert!(repo.is_empty().await);
}

#[tokio::test]
async fn test_persistence_failure_after_gateway_success_is_reported() {
    let (service, stubs) = service_with(
        vec![deposit("txn-lost", TransactionStatus::Success)],
        Arc::new(BrokenRepository),
    );

    let err = service
        .create_transaction(
            &RequestContext::detached(),
            "acc123",
            &amount("100.50"),
            TransactionType::Deposit,
        )
        .await
        .unwrap_err();

    match err {
        ServiceError::Persistence { transaction_id, .. } => {
            assert_eq!(transaction_id, "txn-lost")
        }
        other => panic!("expected persistence error, got {other:?}"),
    }
    assert_eq!(stubs[0].calls(), 1);
}

#[tokio::test]
async fn test_get_unknown_transaction_is_none() {
    let (service, _) = service_with(
        vec![deposit("txn1", TransactionStatus::Success)],
        Arc::new(InMemoryTransactionRepository::new()),
    );

    let found = service
        .get_transaction(&RequestContext::detached(), "missing")
        .await
        .unwrap();

    assert!(found.is_none());
}

#[tokio::test]
async fn test_update_checks_ownership() {
    let repo = InMemoryTransactionRepository::new();
    repo.create(&transaction(
        "acc123",
        "txn1",
        TransactionStatus::Pending,
        TransactionType::Withdraw,
        "20",
    ))
    .await
    .unwrap();
    let (service, _) = service_with(
        vec![deposit("unused", TransactionStatus::Success)],
        Arc::new(repo.clone()),
    );
    let ctx = RequestContext::detached();

    let outcome = service
        .update_transaction(&ctx, "someone-else", "txn1", TransactionStatus::Failed)
        .await
        .unwrap();
    assert_eq!(outcome, UpdateOutcome::OwnershipMismatch);

    let outcome = service
        .update_transaction(&ctx, "acc123", "missing", TransactionStatus::Failed)
        .await
        .unwrap();
    assert_eq!(outcome, UpdateOutcome::NotFound);

    let outcome = service
        .update_transaction(&ctx, "acc123", "txn1", TransactionStatus::Failed)
        .await
        .unwrap();
    match outcome {
        UpdateOutcome::Updated(tx) => {
            assert_eq!(tx.status, TransactionStatus::Failed);
            assert_eq!(tx.amount, amount("20"));
        }
        other => panic!("expected update, got {other:?}"),
    }

    let stored = repo.get("txn1").await.unwrap().unwrap();
    assert_eq!(stored.status, TransactionStatus::Failed);
}

#[tokio::test]
async fn test_cancelled_lookup_returns_cancelled() {
    let (service, _) = service_with(
        vec![deposit("txn1", TransactionStatus::Success)],
        Arc::new(InMemoryTransactionRepository::new()),
    );
    let ctx = RequestContext::detached();
    ctx.cancel.cancel();

    let err = service.get_transaction(&ctx, "txn1").await.unwrap_err();
    assert!(matches!(err, ServiceError::Cancelled));
}
