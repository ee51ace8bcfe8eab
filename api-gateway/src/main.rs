//! Azar Finance web server

use std::sync::Arc;
use std::time::Duration;

use account_service::{AccountService, RepositoryType as AccountRepositoryType};
use api_gateway::config::AppConfig;
use api_gateway::{app, spawn_session_purger, AppState};
use clap::Parser;
use common::db;
use dotenv::dotenv;
use loan_ledger::{LoanLedger, RepositoryType as LoanRepositoryType};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{debug, info, Level};
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter, FmtSubscriber};

/// Azar Finance web server
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Listening port, overrides PORT
    #[clap(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv().ok();

    // Parse command line arguments
    let args = Args::parse();

    let mut config = AppConfig::from_env()?;
    if let Some(port) = args.port {
        config.port = port;
    }

    // Initialize logging with debug level when DEBUG=1 env var is set
    let log_level = if config.debug { Level::DEBUG } else { Level::INFO };

    let env_filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .parse("tower_http=debug,api_gateway=debug")?;

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    debug!("Debug logging enabled");

    // Initialize storage and services
    let pool = db::init_db_pool(&config.database_url, config.db_pool_size).await?;
    db::run_migrations(&pool).await?;

    let account_config = config.account_config();
    let account_service = Arc::new(
        AccountService::with_repository(AccountRepositoryType::Sqlite(pool.clone()))
            .with_session_ttl(chrono::Duration::seconds(account_config.session_ttl_secs))
            .with_bcrypt_cost(account_config.bcrypt_cost),
    );
    let loan_ledger = Arc::new(LoanLedger::with_repository(LoanRepositoryType::Sqlite(pool.clone())));

    let purger = spawn_session_purger(
        account_service.clone(),
        Duration::from_secs(config.session_purge_interval_secs),
    );

    let state = AppState::new(account_service, loan_ledger, Some(pool.clone()), &config);
    let router = app(state, log_level);

    // Start the server
    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    // Run until interrupt signal
    axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;

    purger.abort();
    pool.close().await;

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown");
}
