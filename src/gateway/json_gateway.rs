//! Gateway A: JSON over HTTP, responses wrapped in a `data` envelope.

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{exchange, GatewayError, GatewayOutcome, HttpTransport, PaymentGateway};
use crate::domain::{amount_serde, Transaction, TransactionStatus, TransactionType};

const CONTENT_TYPE_JSON: &str = "application/json";

#[derive(Debug, Serialize)]
struct JsonTransactionRequest<'a> {
    account_id: &'a str,
    amount: &'a BigDecimal,
}

/// Response from gateway A: `{ "data": { ... } }`
#[derive(Debug, Deserialize)]
struct JsonTransactionEnvelope {
    data: JsonTransactionData,
}

#[derive(Debug, Deserialize)]
struct JsonTransactionData {
    account_id: String,
    transaction_id: String,
    status: TransactionStatus,
    #[serde(rename = "type")]
    transaction_type: TransactionType,
    #[serde(deserialize_with = "amount_serde::deserialize")]
    amount: BigDecimal,
}

impl From<JsonTransactionEnvelope> for Transaction {
    fn from(envelope: JsonTransactionEnvelope) -> Self {
        let data = envelope.data;
        Transaction {
            account_id: data.account_id,
            transaction_id: data.transaction_id,
            status: data.status,
            transaction_type: data.transaction_type,
            amount: data.amount,
        }
    }
}

/// Client for the JSON-speaking gateway.
#[derive(Debug, Clone)]
pub struct JsonGateway {
    transport: HttpTransport,
}

impl JsonGateway {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            transport: HttpTransport::new(endpoint, timeout)?,
        })
    }

    async fn submit(&self, path: &str, account_id: &str, amount: &BigDecimal) -> GatewayOutcome {
        let payload = serde_json::to_string(&JsonTransactionRequest { account_id, amount })
            .map_err(|e| GatewayError::Encode(e.to_string()));

        exchange(&self.transport, path, CONTENT_TYPE_JSON, payload, decode).await
    }
}

pub(crate) fn decode(body: &str) -> Result<Transaction, GatewayError> {
    serde_json::from_str::<JsonTransactionEnvelope>(body)
        .map(Transaction::from)
        .map_err(|e| GatewayError::Decode(e.to_string()))
}

#[async_trait]
impl PaymentGateway for JsonGateway {
    async fn deposit(&self, account_id: &str, amount: &BigDecimal) -> GatewayOutcome {
        self.submit("deposit", account_id, amount).await
    }

    async fn withdraw(&self, account_id: &str, amount: &BigDecimal) -> GatewayOutcome {
        self.submit("withdraw", account_id, amount).await
    }
}
