use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    response::IntoResponse,
};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::domain::{amount_serde, RequestContext, TransactionType};
use crate::error::AppError;
use crate::ports::UpdateOutcome;
use crate::validation;

#[derive(Debug, Deserialize, Serialize)]
pub struct TransactionRequest {
    #[serde(default)]
    pub account_id: String,
    #[serde(default, with = "amount_serde::option")]
    pub amount: Option<BigDecimal>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct UpdateTransactionRequest {
    #[serde(default)]
    pub account_id: String,
    #[serde(default)]
    pub transaction_id: String,
    #[serde(default)]
    pub status: String,
}

/// Success envelope: `{ "data": ... }`
#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}

pub async fn create_deposit(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    payload: Result<Json<TransactionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    create_transaction(state, ctx, payload, TransactionType::Deposit).await
}

pub async fn create_withdraw(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    payload: Result<Json<TransactionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    create_transaction(state, ctx, payload, TransactionType::Withdraw).await
}

async fn create_transaction(
    state: AppState,
    ctx: RequestContext,
    payload: Result<Json<TransactionRequest>, JsonRejection>,
    transaction_type: TransactionType,
) -> Result<Json<DataResponse<crate::domain::Transaction>>, AppError> {
    let Json(request) =
        payload.map_err(|e| AppError::BadRequest(format!("invalid request body: {}", e)))?;

    validation::validate_account_id(&request.account_id)?;
    let amount = validation::validate_amount(request.amount.as_ref())?;

    let tx = state
        .transaction_service
        .create_transaction(&ctx, request.account_id.trim(), &amount, transaction_type)
        .await?;

    Ok(Json(DataResponse { data: tx }))
}

pub async fn get_transaction(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(transaction_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    validation::validate_transaction_id(&transaction_id)?;

    let tx = state
        .transaction_service
        .get_transaction(&ctx, transaction_id.trim())
        .await?
        .ok_or_else(|| AppError::NotFound("transaction not found".to_string()))?;

    Ok(Json(DataResponse { data: tx }))
}

pub async fn update_transaction(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    payload: Result<Json<UpdateTransactionRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(request) =
        payload.map_err(|e| AppError::BadRequest(format!("invalid request body: {}", e)))?;

    validation::validate_account_id(&request.account_id)?;
    validation::validate_transaction_id(&request.transaction_id)?;
    let status = validation::validate_status(request.status.trim())?;

    let outcome = state
        .transaction_service
        .update_transaction(
            &ctx,
            request.account_id.trim(),
            request.transaction_id.trim(),
            status,
        )
        .await?;

    match outcome {
        UpdateOutcome::Updated(_) => Ok(Json(DataResponse { data: "success" })),
        UpdateOutcome::NotFound => Err(AppError::NotFound("transaction not found".to_string())),
        UpdateOutcome::OwnershipMismatch => Err(AppError::Forbidden(
            "transaction does not belong to account".to_string(),
        )),
    }
}
