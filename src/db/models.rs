use bigdecimal::BigDecimal;
use sqlx::FromRow;

use crate::domain::Transaction;
use crate::ports::RepositoryError;

/// Persisted shape of a transaction. Amount, status and type are stored as
/// text; the amount keeps its exact decimal representation.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct TransactionRow {
    pub account_id: String,
    pub transaction_id: String,
    pub amount: String,
    pub status: String,
    #[sqlx(rename = "type")]
    pub transaction_type: String,
}

impl From<&Transaction> for TransactionRow {
    fn from(tx: &Transaction) -> Self {
        Self {
            account_id: tx.account_id.clone(),
            transaction_id: tx.transaction_id.clone(),
            amount: tx.amount.to_string(),
            status: tx.status.as_str().to_string(),
            transaction_type: tx.transaction_type.as_str().to_string(),
        }
    }
}

impl TransactionRow {
    pub fn into_domain(self) -> Result<Transaction, RepositoryError> {
        let corrupt = |reason: String| RepositoryError::CorruptRow {
            transaction_id: self.transaction_id.clone(),
            reason,
        };

        let amount = self
            .amount
            .parse::<BigDecimal>()
            .map_err(|e| corrupt(format!("amount {:?}: {}", self.amount, e)))?;
        let status = self.status.parse().map_err(|e| corrupt(format!("{e}")))?;
        let transaction_type = self
            .transaction_type
            .parse()
            .map_err(|e| corrupt(format!("{e}")))?;

        Ok(Transaction {
            account_id: self.account_id,
            transaction_id: self.transaction_id,
            status,
            transaction_type,
            amount,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{TransactionStatus, TransactionType};

    fn sample(amount: &str) -> Transaction {
        Transaction::new(
            "acc123",
            "txn123",
            TransactionStatus::Pending,
            TransactionType::Withdraw,
            amount.parse().unwrap(),
        )
    }

    #[test]
    fn test_row_round_trip_preserves_fields() {
        for amount in ["100", "100.50", "0.000001", "123456789012345678901234567890.123"] {
            let tx = sample(amount);
            let row = TransactionRow::from(&tx);

            assert_eq!(row.status, "pending");
            assert_eq!(row.transaction_type, "withdraw");

            let back = row.into_domain().unwrap();
            assert_eq!(back, tx);
            assert_eq!(back.amount, amount.parse::<BigDecimal>().unwrap());
        }
    }

    #[test]
    fn test_corrupt_amount_is_reported() {
        let mut row = TransactionRow::from(&sample("1"));
        row.amount = "one".to_string();

        match row.into_domain() {
            Err(RepositoryError::CorruptRow { transaction_id, .. }) => {
                assert_eq!(transaction_id, "txn123")
            }
            other => panic!("expected corrupt row, got {other:?}"),
        }
    }

    #[test]
    fn test_corrupt_status_is_reported() {
        let mut row = TransactionRow::from(&sample("1"));
        row.status = "completed".to_string();
        assert!(matches!(
            row.into_domain(),
            Err(RepositoryError::CorruptRow { .. })
        ));
    }
}
