//! Gateway B: SOAP-style XML over HTTP. Response fields are flat children of
//! the root element, without a data wrapper.

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{exchange, GatewayError, GatewayOutcome, HttpTransport, PaymentGateway};
use crate::domain::Transaction;

const CONTENT_TYPE_XML: &str = "application/xml";

#[derive(Debug, Serialize)]
struct XmlTransactionRequest<'a> {
    #[serde(rename = "AccountID")]
    account_id: &'a str,
    #[serde(rename = "Amount")]
    amount: String,
}

#[derive(Debug, Deserialize)]
struct XmlTransactionResponse {
    #[serde(rename = "AccountID")]
    account_id: String,
    #[serde(rename = "TransactionID")]
    transaction_id: String,
    #[serde(rename = "Status")]
    status: String,
    #[serde(rename = "Type")]
    transaction_type: String,
    #[serde(rename = "Amount")]
    amount: String,
}

impl TryFrom<XmlTransactionResponse> for Transaction {
    type Error = GatewayError;

    fn try_from(response: XmlTransactionResponse) -> Result<Self, Self::Error> {
        let status = response
            .status
            .trim()
            .parse()
            .map_err(|e| GatewayError::Decode(format!("{e}")))?;
        let transaction_type = response
            .transaction_type
            .trim()
            .parse()
            .map_err(|e| GatewayError::Decode(format!("{e}")))?;
        let amount = response
            .amount
            .trim()
            .parse::<BigDecimal>()
            .map_err(|e| GatewayError::Decode(format!("invalid amount: {e}")))?;

        Ok(Transaction {
            account_id: response.account_id.trim().to_string(),
            transaction_id: response.transaction_id.trim().to_string(),
            status,
            transaction_type,
            amount,
        })
    }
}

/// Client for the XML-speaking gateway.
#[derive(Debug, Clone)]
pub struct XmlGateway {
    transport: HttpTransport,
}

impl XmlGateway {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            transport: HttpTransport::new(endpoint, timeout)?,
        })
    }

    async fn submit(
        &self,
        path: &str,
        root: &str,
        account_id: &str,
        amount: &BigDecimal,
    ) -> GatewayOutcome {
        let payload = encode(root, account_id, amount);
        exchange(&self.transport, path, CONTENT_TYPE_XML, payload, decode).await
    }
}

pub(crate) fn encode(
    root: &str,
    account_id: &str,
    amount: &BigDecimal,
) -> Result<String, GatewayError> {
    let request = XmlTransactionRequest {
        account_id,
        amount: amount.to_string(),
    };
    quick_xml::se::to_string_with_root(root, &request)
        .map_err(|e| GatewayError::Encode(e.to_string()))
}

pub(crate) fn decode(body: &str) -> Result<Transaction, GatewayError> {
    let response = quick_xml::de::from_str::<XmlTransactionResponse>(body)
        .map_err(|e| GatewayError::Decode(e.to_string()))?;
    Transaction::try_from(response)
}

#[async_trait]
impl PaymentGateway for XmlGateway {
    async fn deposit(&self, account_id: &str, amount: &BigDecimal) -> GatewayOutcome {
        self.submit("deposit", "DepositRequest", account_id, amount)
            .await
    }

    async fn withdraw(&self, account_id: &str, amount: &BigDecimal) -> GatewayOutcome {
        self.submit("withdraw", "WithdrawRequest", account_id, amount)
            .await
    }
}
