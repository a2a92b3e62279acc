use clap::{Parser, Subcommand};
use sqlx::PgPool;

use crate::adapters::PostgresTransactionRepository;
use crate::config::Config;
use crate::domain::TransactionStatus;
use crate::ports::{TransactionRepository, UpdateOutcome};

#[derive(Parser)]
#[command(name = "paygate-core")]
#[command(about = "Paygate Core - multi-gateway deposit and withdrawal service", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Transaction management commands
    #[command(subcommand)]
    Tx(TxCommands),

    /// Database management commands
    #[command(subcommand)]
    Db(DbCommands),

    /// Validate configuration and database connectivity
    Config,
}

#[derive(Subcommand)]
pub enum TxCommands {
    /// Print a stored transaction
    Show {
        #[arg(value_name = "TRANSACTION_ID")]
        transaction_id: String,
    },

    /// Set the status of a stored transaction, e.g. after a gateway call whose
    /// local record failed to save
    SetStatus {
        #[arg(value_name = "ACCOUNT_ID")]
        account_id: String,
        #[arg(value_name = "TRANSACTION_ID")]
        transaction_id: String,
        /// success, failed or pending
        #[arg(value_name = "STATUS")]
        status: TransactionStatus,
    },
}

#[derive(Subcommand)]
pub enum DbCommands {
    /// Run database migrations
    Migrate,
}

pub async fn handle_tx_show(pool: &PgPool, transaction_id: &str) -> anyhow::Result<()> {
    let repository = PostgresTransactionRepository::new(pool.clone());

    match repository.get(transaction_id).await? {
        Some(tx) => {
            println!("{}", serde_json::to_string_pretty(&tx)?);
            Ok(())
        }
        None => anyhow::bail!("Transaction {} not found", transaction_id),
    }
}

pub async fn handle_tx_set_status(
    pool: &PgPool,
    account_id: &str,
    transaction_id: &str,
    status: TransactionStatus,
) -> anyhow::Result<()> {
    let repository = PostgresTransactionRepository::new(pool.clone());

    match repository
        .update_status(account_id, transaction_id, status)
        .await?
    {
        UpdateOutcome::Updated(_) => {
            tracing::info!(
                transaction_id = %transaction_id,
                status = %status,
                "Transaction status set from CLI"
            );
            println!("✓ Transaction {} marked as {}", transaction_id, status);
            Ok(())
        }
        UpdateOutcome::NotFound => anyhow::bail!("Transaction {} not found", transaction_id),
        UpdateOutcome::OwnershipMismatch => anyhow::bail!(
            "Transaction {} does not belong to account {}",
            transaction_id,
            account_id
        ),
    }
}

pub async fn handle_db_migrate(config: &Config) -> anyhow::Result<()> {
    let pool = crate::db::create_pool(config).await?;

    tracing::info!("Running database migrations...");
    crate::db::run_migrations(&pool).await?;

    tracing::info!("Database migrations completed");
    println!("✓ Database migrations completed");

    Ok(())
}

pub async fn handle_config_validate(config: &Config) -> anyhow::Result<()> {
    tracing::info!("Validating configuration...");

    println!("Configuration:");
    println!("  Server Port: {}", config.server_port);
    println!("  Database URL: {}", mask_password(&config.database_url));
    println!("  Gateway A (JSON): {}", config.gateway_a_endpoint);
    println!("  Gateway B (XML): {}", config.gateway_b_endpoint);
    println!("  Gateway Timeout: {}s", config.gateway_timeout.as_secs());

    crate::build_orchestrator(config)?;

    let pool = crate::db::create_pool(config).await?;
    crate::db::queries::ping(&pool).await?;
    println!("  Database: connected");

    tracing::info!("Configuration is valid");
    println!("✓ Configuration is valid");

    Ok(())
}

fn mask_password(url: &str) -> String {
    if let Some(at_pos) = url.rfind('@') {
        if let Some(colon_pos) = url[..at_pos].rfind(':') {
            if let Some(slash_pos) = url[..colon_pos].rfind("//") {
                let prefix = &url[..slash_pos + 2];
                let user = &url[slash_pos + 2..colon_pos];
                let suffix = &url[at_pos..];
                return format!("{}{}:****{}", prefix, user, suffix);
            }
        }
    }
    url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_password() {
        assert_eq!(
            mask_password("postgres://paygate:s3cret@db:5432/paygate"),
            "postgres://paygate:****@db:5432/paygate"
        );
        assert_eq!(mask_password("postgres://db/paygate"), "postgres://db/paygate");
    }

    #[test]
    fn test_parse_set_status() {
        let cli = Cli::parse_from(["paygate-core", "tx", "set-status", "acc1", "txn1", "failed"]);
        match cli.command {
            Some(Commands::Tx(TxCommands::SetStatus {
                account_id,
                transaction_id,
                status,
            })) => {
                assert_eq!(account_id, "acc1");
                assert_eq!(transaction_id, "txn1");
                assert_eq!(status, TransactionStatus::Failed);
            }
            _ => panic!("expected tx set-status"),
        }
    }

    #[test]
    fn test_invalid_status_is_rejected() {
        let result =
            Cli::try_parse_from(["paygate-core", "tx", "set-status", "acc1", "txn1", "done"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_no_subcommand_defaults_to_none() {
        let cli = Cli::parse_from(["paygate-core"]);
        assert!(cli.command.is_none());
    }
}
