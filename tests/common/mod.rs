#![allow(dead_code)]

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use paygate_core::domain::{Transaction, TransactionStatus, TransactionType};
use paygate_core::gateway::{GatewayError, GatewayOutcome, PaymentGateway};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Scripted behaviour of a [`StubGateway`].
#[derive(Clone)]
pub enum Script {
    /// 200 with the given normalized response.
    Success(Transaction),
    /// Response received with this status, no body and an error.
    Status(u16),
    /// Response received with this status and no body, no error.
    StatusOnly(u16),
    /// Nothing came back.
    NoResponse,
    /// Never completes.
    Hang,
}

pub struct StubGateway {
    script: Script,
    deposits: AtomicUsize,
    withdrawals: AtomicUsize,
    amounts: Mutex<Vec<BigDecimal>>,
}

impl StubGateway {
    pub fn new(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script,
            deposits: AtomicUsize::new(0),
            withdrawals: AtomicUsize::new(0),
            amounts: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> usize {
        self.deposits() + self.withdrawals()
    }

    pub fn deposits(&self) -> usize {
        self.deposits.load(Ordering::SeqCst)
    }

    pub fn withdrawals(&self) -> usize {
        self.withdrawals.load(Ordering::SeqCst)
    }

    /// Amounts received, in call order.
    pub fn amounts(&self) -> Vec<BigDecimal> {
        self.amounts.lock().unwrap().clone()
    }

    async fn respond(&self) -> GatewayOutcome {
        match &self.script {
            Script::Success(tx) => GatewayOutcome::success(200, tx.clone()),
            Script::Status(status) => GatewayOutcome::failure(
                Some(*status),
                GatewayError::Status {
                    status: *status,
                    body: "stub failure".to_string(),
                },
            ),
            Script::StatusOnly(status) => GatewayOutcome {
                response: None,
                status: Some(*status),
                error: None,
            },
            Script::NoResponse => GatewayOutcome::failure(
                None,
                GatewayError::Decode("connection closed".to_string()),
            ),
            Script::Hang => std::future::pending().await,
        }
    }
}

#[async_trait]
impl PaymentGateway for StubGateway {
    async fn deposit(&self, _account_id: &str, amount: &BigDecimal) -> GatewayOutcome {
        self.deposits.fetch_add(1, Ordering::SeqCst);
        self.amounts.lock().unwrap().push(amount.clone());
        self.respond().await
    }

    async fn withdraw(&self, _account_id: &str, amount: &BigDecimal) -> GatewayOutcome {
        self.withdrawals.fetch_add(1, Ordering::SeqCst);
        self.amounts.lock().unwrap().push(amount.clone());
        self.respond().await
    }
}

pub fn as_gateways(stubs: &[Arc<StubGateway>]) -> Vec<Arc<dyn PaymentGateway>> {
    stubs
        .iter()
        .map(|stub| stub.clone() as Arc<dyn PaymentGateway>)
        .collect()
}

pub fn amount(value: &str) -> BigDecimal {
    value.parse().unwrap()
}

pub fn transaction(
    account_id: &str,
    transaction_id: &str,
    status: TransactionStatus,
    transaction_type: TransactionType,
    value: &str,
) -> Transaction {
    Transaction::new(
        account_id,
        transaction_id,
        status,
        transaction_type,
        amount(value),
    )
}
