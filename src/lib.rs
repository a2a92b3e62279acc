pub mod adapters;
pub mod cli;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod gateway;
pub mod handlers;
pub mod middleware;
pub mod ports;
pub mod services;
pub mod utils;
pub mod validation;

use axum::{
    Router,
    routing::{get, post, put},
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::{compression::CompressionLayer, cors::CorsLayer};

use crate::adapters::PostgresTransactionRepository;
use crate::config::Config;
use crate::gateway::{JsonGateway, Orchestrator, PaymentGateway, XmlGateway};
use crate::middleware::request_logger::{RequestLogging, request_logger_middleware};
use crate::services::TransactionService;

#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub transaction_service: Arc<TransactionService>,
    /// Cancelled on shutdown; each request holds a child token.
    pub shutdown: CancellationToken,
    pub log_request_body: bool,
}

pub fn create_app(state: AppState) -> Router {
    let logging = RequestLogging::new(state.shutdown.clone(), state.log_request_body);

    let api = Router::new()
        .route("/deposit", post(handlers::transactions::create_deposit))
        .route("/withdraw", post(handlers::transactions::create_withdraw))
        .route("/transaction", put(handlers::transactions::update_transaction))
        .route(
            "/transaction/:transaction_id",
            get(handlers::transactions::get_transaction),
        );

    Router::new()
        .route("/-/healthy", get(handlers::healthy))
        .route("/health", get(handlers::health))
        .nest("/api/v1", api)
        .layer(axum::middleware::from_fn_with_state(
            logging,
            request_logger_middleware,
        ))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Builds the gateway chain in priority order: gateway A (JSON) first, then
/// gateway B (XML).
pub fn build_orchestrator(config: &Config) -> anyhow::Result<Orchestrator> {
    let gateways: Vec<Arc<dyn PaymentGateway>> = vec![
        Arc::new(JsonGateway::new(
            config.gateway_a_endpoint.clone(),
            config.gateway_timeout,
        )?),
        Arc::new(XmlGateway::new(
            config.gateway_b_endpoint.clone(),
            config.gateway_timeout,
        )?),
    ];

    Ok(Orchestrator::new(gateways)?)
}

pub fn build_transaction_service(
    config: &Config,
    pool: sqlx::PgPool,
) -> anyhow::Result<TransactionService> {
    let orchestrator = build_orchestrator(config)?;
    let repository = Arc::new(PostgresTransactionRepository::new(pool));
    Ok(TransactionService::new(orchestrator, repository))
}
