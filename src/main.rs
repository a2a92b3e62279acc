use clap::Parser;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use paygate_core::cli::{self, Cli, Commands, DbCommands, TxCommands};
use paygate_core::config::{Config, LogFormat};
use paygate_core::{AppState, build_transaction_service, create_app, db};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    init_tracing(config.log_format);

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::Db(DbCommands::Migrate) => cli::handle_db_migrate(&config).await,
        Commands::Config => cli::handle_config_validate(&config).await,
        Commands::Tx(command) => {
            let pool = db::create_pool(&config).await?;
            let result = match command {
                TxCommands::Show { transaction_id } => {
                    cli::handle_tx_show(&pool, &transaction_id).await
                }
                TxCommands::SetStatus {
                    account_id,
                    transaction_id,
                    status,
                } => cli::handle_tx_set_status(&pool, &account_id, &transaction_id, status).await,
            };
            pool.close().await;
            result
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

async fn serve(config: Config) -> anyhow::Result<()> {
    // Database pool, held for the lifetime of the process
    let pool = db::create_pool(&config).await?;

    db::run_migrations(&pool).await?;
    tracing::info!("Database migrations completed");

    let transaction_service = build_transaction_service(&config, pool.clone())?;
    tracing::info!(
        gateway_a = %config.gateway_a_endpoint,
        gateway_b = %config.gateway_b_endpoint,
        timeout_secs = config.gateway_timeout.as_secs(),
        "Payment gateways initialized"
    );

    let shutdown = CancellationToken::new();
    let app = create_app(AppState {
        db: pool.clone(),
        transaction_service: Arc::new(transaction_service),
        shutdown: shutdown.clone(),
        log_request_body: config.log_request_body,
    });

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    tracing::info!("listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    pool.close().await;
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal(shutdown: CancellationToken) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, cancelling in-flight requests");
    shutdown.cancel();
}
