//! Payment gateway adapters.
//!
//! Each external backend speaks its own wire format. An adapter encodes the
//! request, performs one HTTP POST and normalizes whatever comes back into a
//! [`GatewayOutcome`]. Adapters never decide whether a failure is worth another
//! gateway; that is the orchestrator's job.

pub mod json_gateway;
pub mod orchestrator;
pub mod xml_gateway;

use async_trait::async_trait;
use bigdecimal::{BigDecimal, Zero};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

use crate::domain::Transaction;

pub use json_gateway::JsonGateway;
pub use orchestrator::{classify, Classification, Orchestrator, OrchestratorError};
pub use xml_gateway::XmlGateway;

/// Fixed bound on a single outbound gateway call.
pub const DEFAULT_GATEWAY_TIMEOUT: Duration = Duration::from_secs(60);

const MAX_ERROR_BODY_LEN: usize = 512;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Failed to encode gateway request: {0}")]
    Encode(String),

    #[error("Gateway request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Gateway did not respond within {0:?}")]
    Timeout(Duration),

    #[error("Invalid response from gateway: {0}")]
    Decode(String),

    #[error("Gateway responded with HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

/// What one gateway call produced.
///
/// `status` is `None` whenever no usable HTTP status exists: the request never
/// left, the connection failed or timed out, or the body could not be read.
#[derive(Debug, Default)]
pub struct GatewayOutcome {
    pub response: Option<Transaction>,
    pub status: Option<u16>,
    pub error: Option<GatewayError>,
}

impl GatewayOutcome {
    pub fn success(status: u16, response: Transaction) -> Self {
        Self {
            response: Some(response),
            status: Some(status),
            error: None,
        }
    }

    pub fn failure(status: Option<u16>, error: GatewayError) -> Self {
        Self {
            response: None,
            status,
            error: Some(error),
        }
    }
}

/// Capability shared by every payment backend.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn deposit(&self, account_id: &str, amount: &BigDecimal) -> GatewayOutcome;
    async fn withdraw(&self, account_id: &str, amount: &BigDecimal) -> GatewayOutcome;
}

/// Outbound HTTP transport owned by a single adapter.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        let endpoint = endpoint.into().trim_end_matches('/').to_string();

        Ok(Self {
            client,
            endpoint,
            timeout,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn post(
        &self,
        path: &str,
        content_type: &'static str,
        payload: String,
    ) -> Result<RawResponse, GatewayError> {
        let url = format!("{}/{}", self.endpoint, path.trim_start_matches('/'));

        let response = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, content_type)
            .body(payload)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;

        Ok(RawResponse { status, body })
    }

    fn transport_error(&self, err: reqwest::Error) -> GatewayError {
        if err.is_timeout() {
            GatewayError::Timeout(self.timeout)
        } else {
            GatewayError::Transport(err)
        }
    }
}

/// Runs one request/response exchange and folds every failure mode into a
/// [`GatewayOutcome`].
pub(crate) async fn exchange<D>(
    transport: &HttpTransport,
    path: &str,
    content_type: &'static str,
    payload: Result<String, GatewayError>,
    decode: D,
) -> GatewayOutcome
where
    D: FnOnce(&str) -> Result<Transaction, GatewayError>,
{
    // Encoding failures never reach the network.
    let payload = match payload {
        Ok(payload) => payload,
        Err(e) => return GatewayOutcome::failure(None, e),
    };

    let raw = match transport.post(path, content_type, payload).await {
        Ok(raw) => raw,
        Err(e) => return GatewayOutcome::failure(None, e),
    };

    if !(200..300).contains(&raw.status) {
        return GatewayOutcome::failure(
            Some(raw.status),
            GatewayError::Status {
                status: raw.status,
                body: truncate(&raw.body, MAX_ERROR_BODY_LEN),
            },
        );
    }

    // A body we cannot read is no better than no response at all.
    match decode(&raw.body).and_then(validate_normalized) {
        Ok(tx) => GatewayOutcome::success(raw.status, tx),
        Err(e) => GatewayOutcome::failure(None, e),
    }
}

fn validate_normalized(tx: Transaction) -> Result<Transaction, GatewayError> {
    if tx.account_id.trim().is_empty() {
        return Err(GatewayError::Decode("missing account id".to_string()));
    }
    if tx.transaction_id.trim().is_empty() {
        return Err(GatewayError::Decode("missing transaction id".to_string()));
    }
    if tx.amount <= BigDecimal::zero() {
        return Err(GatewayError::Decode(format!(
            "non-positive amount {}",
            tx.amount
        )));
    }
    Ok(tx)
}

fn truncate(body: &str, max: usize) -> String {
    if body.len() <= max {
        return body.to_string();
    }
    let mut end = max;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
