use sqlx::{PgPool, Postgres, Result, Transaction as SqlxTransaction};

use crate::db::models::TransactionRow;

// --- Transaction Queries ---

/// Inserts the row; on an existing `(account_id, transaction_id)` only the
/// status is overwritten.
pub async fn upsert_transaction(pool: &PgPool, row: &TransactionRow) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO transactions (account_id, transaction_id, amount, status, type)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (account_id, transaction_id) DO UPDATE SET status = EXCLUDED.status
        "#,
    )
    .bind(&row.account_id)
    .bind(&row.transaction_id)
    .bind(&row.amount)
    .bind(&row.status)
    .bind(&row.transaction_type)
    .execute(pool)
    .await?;

    Ok(())
}

/// Lookup by transaction id alone. Should several accounts hold the same id,
/// the row with the smallest `account_id` is returned.
pub async fn get_transaction(pool: &PgPool, transaction_id: &str) -> Result<Option<TransactionRow>> {
    sqlx::query_as::<_, TransactionRow>(
        r#"
        SELECT account_id, transaction_id, amount, status, type
        FROM transactions
        WHERE transaction_id = $1
        ORDER BY account_id
        LIMIT 1
        "#,
    )
    .bind(transaction_id)
    .fetch_optional(pool)
    .await
}

/// Same lookup as [`get_transaction`], holding a row lock until the enclosing
/// transaction ends.
pub async fn lock_transaction(
    executor: &mut SqlxTransaction<'_, Postgres>,
    transaction_id: &str,
) -> Result<Option<TransactionRow>> {
    sqlx::query_as::<_, TransactionRow>(
        r#"
        SELECT account_id, transaction_id, amount, status, type
        FROM transactions
        WHERE transaction_id = $1
        ORDER BY account_id
        LIMIT 1
        FOR UPDATE
        "#,
    )
    .bind(transaction_id)
    .fetch_optional(&mut **executor)
    .await
}

pub async fn update_transaction_status(
    executor: &mut SqlxTransaction<'_, Postgres>,
    account_id: &str,
    transaction_id: &str,
    status: &str,
) -> Result<u64> {
    let result = sqlx::query(
        "UPDATE transactions SET status = $3 WHERE account_id = $1 AND transaction_id = $2",
    )
    .bind(account_id)
    .bind(transaction_id)
    .bind(status)
    .execute(&mut **executor)
    .await?;

    Ok(result.rows_affected())
}

pub async fn ping(pool: &PgPool) -> Result<()> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
