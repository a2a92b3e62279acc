//! Ordered failover across payment gateways.
//!
//! Gateways are tried strictly in list order, one at a time. The first success
//! wins. A rejection of the request itself (HTTP status 400 or below together
//! with an error) stops the loop, since no other gateway would accept it either.
//! Everything else moves on to the next gateway.

use bigdecimal::BigDecimal;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

use super::{GatewayError, GatewayOutcome, PaymentGateway};
use crate::domain::{RequestContext, Transaction, TransactionType};

#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error("No payment gateways configured")]
    NoGateways,

    #[error("Payment gateway rejected the request: {source}")]
    Rejected {
        gateway: usize,
        #[source]
        source: GatewayError,
    },

    #[error("All payment gateways failed ({attempts} attempted)")]
    AllGatewaysFailed { attempts: usize },

    #[error("Transaction cancelled before a gateway succeeded")]
    Cancelled,
}

/// How the failover loop treats one gateway outcome.
#[derive(Debug)]
pub enum Classification {
    Success(Transaction),
    Retryable(Option<GatewayError>),
    Terminal(GatewayError),
}

/// Classifies an outcome. Status is checked before the error: an unknown status
/// or a status above 400 is always retryable, whatever else came back.
pub fn classify(outcome: GatewayOutcome) -> Classification {
    let GatewayOutcome {
        response,
        status,
        error,
    } = outcome;

    match status {
        None | Some(0) => return Classification::Retryable(error),
        Some(code) if code > 400 => return Classification::Retryable(error),
        Some(_) => {}
    }

    match (error, response) {
        (Some(err), _) => Classification::Terminal(err),
        (None, Some(tx)) => Classification::Success(tx),
        (None, None) => Classification::Retryable(None),
    }
}

#[derive(Clone)]
pub struct Orchestrator {
    gateways: Vec<Arc<dyn PaymentGateway>>,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("gateways", &self.gateways.len())
            .finish()
    }
}

impl Orchestrator {
    /// Builds an orchestrator over `gateways` in priority order.
    pub fn new(gateways: Vec<Arc<dyn PaymentGateway>>) -> Result<Self, OrchestratorError> {
        if gateways.is_empty() {
            return Err(OrchestratorError::NoGateways);
        }
        Ok(Self { gateways })
    }

    pub fn len(&self) -> usize {
        self.gateways.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gateways.is_empty()
    }

    pub async fn execute(
        &self,
        ctx: &RequestContext,
        account_id: &str,
        amount: &BigDecimal,
        transaction_type: TransactionType,
    ) -> Result<Transaction, OrchestratorError> {
        for (position, gateway) in self.gateways.iter().enumerate() {
            if ctx.cancel.is_cancelled() {
                warn!(
                    request_id = %ctx.request_id,
                    gateway = position,
                    "Transaction cancelled, no further gateways will be called"
                );
                return Err(OrchestratorError::Cancelled);
            }

            let call = async {
                match transaction_type {
                    TransactionType::Deposit => gateway.deposit(account_id, amount).await,
                    TransactionType::Withdraw => gateway.withdraw(account_id, amount).await,
                }
            };

            let outcome = tokio::select! {
                biased;
                _ = ctx.cancel.cancelled() => {
                    warn!(
                        request_id = %ctx.request_id,
                        gateway = position,
                        "Transaction cancelled during gateway call"
                    );
                    return Err(OrchestratorError::Cancelled);
                }
                outcome = call => outcome,
            };
            let status = outcome.status;

            match classify(outcome) {
                Classification::Success(tx) => {
                    info!(
                        request_id = %ctx.request_id,
                        gateway = position,
                        status = ?status,
                        transaction_id = %tx.transaction_id,
                        "Payment gateway succeeded"
                    );
                    return Ok(tx);
                }
                Classification::Terminal(err) => {
                    error!(
                        request_id = %ctx.request_id,
                        gateway = position,
                        status = ?status,
                        error = %err,
                        "Payment gateway rejected the request"
                    );
                    return Err(OrchestratorError::Rejected {
                        gateway: position,
                        source: err,
                    });
                }
                Classification::Retryable(err) => {
                    error!(
                        request_id = %ctx.request_id,
                        gateway = position,
                        status = ?status,
                        error = %err.as_ref().map(ToString::to_string).unwrap_or_default(),
                        "Payment gateway failed, trying next gateway"
                    );
                }
            }
        }

        Err(OrchestratorError::AllGatewaysFailed {
            attempts: self.gateways.len(),
        })
    }
}
