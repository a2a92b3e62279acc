use bigdecimal::{BigDecimal, Zero};
use std::fmt;

use crate::domain::TransactionStatus;

pub const ACCOUNT_ID_MAX_LEN: usize = 255;
pub const TRANSACTION_ID_MAX_LEN: usize = 255;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

pub type ValidationResult = Result<(), ValidationError>;

pub fn validate_required(field: &'static str, value: &str) -> ValidationResult {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "is required"));
    }

    Ok(())
}

pub fn validate_max_len(field: &'static str, value: &str, max_len: usize) -> ValidationResult {
    if value.len() > max_len {
        return Err(ValidationError::new(
            field,
            format!("must be at most {} characters", max_len),
        ));
    }

    Ok(())
}

pub fn validate_account_id(account_id: &str) -> ValidationResult {
    validate_required("account_id", account_id)?;
    validate_max_len("account_id", account_id, ACCOUNT_ID_MAX_LEN)
}

pub fn validate_transaction_id(transaction_id: &str) -> ValidationResult {
    validate_required("transaction_id", transaction_id)?;
    validate_max_len("transaction_id", transaction_id, TRANSACTION_ID_MAX_LEN)
}

/// Amount must be present, non-zero and positive.
pub fn validate_amount(amount: Option<&BigDecimal>) -> Result<BigDecimal, ValidationError> {
    let amount = match amount {
        Some(amount) if !amount.is_zero() => amount,
        _ => return Err(ValidationError::new("amount", "is required")),
    };

    if *amount < BigDecimal::zero() {
        return Err(ValidationError::new("amount", "must be positive"));
    }

    Ok(amount.clone())
}

pub fn validate_status(status: &str) -> Result<TransactionStatus, ValidationError> {
    validate_required("status", status)?;

    status.parse().map_err(|_| {
        let allowed = TransactionStatus::ALL
            .iter()
            .map(TransactionStatus::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        ValidationError::new("status", format!("must be one of: {}", allowed))
    })
}
