use account_service::{AccountService, AccountServiceConfig};
use clap::{Parser, Subcommand};
use common::model::user::Role;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Account Service CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Set the log level
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Database URL
    #[arg(short, long)]
    database_url: Option<String>,

    /// Commands
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an account directly, including collector and admin accounts
    CreateUser {
        /// Display name
        #[arg(long)]
        name: String,

        /// Phone number used to log in
        #[arg(long)]
        phone: String,

        /// Initial password
        #[arg(long)]
        password: String,

        /// One of client, collector, admin
        #[arg(long, default_value = "client")]
        role: String,
    },
    /// Remove expired sessions
    PurgeSessions,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    // Parse command line arguments
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!("account_service={},common={}", cli.log_level, cli.log_level)))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = AccountServiceConfig::from_env();
    if let Some(url) = cli.database_url {
        config.database_url = url;
    }

    let service = AccountService::with_config(&config).await?;

    match cli.command {
        Commands::CreateUser { name, phone, password, role } => {
            let role = role.parse::<Role>()?;
            match service.register_with_role(&name, &phone, &password, role).await {
                Ok(id) => info!("Created {} account {}", role, id),
                Err(e) => {
                    error!("Could not create account: {}", e);
                    return Err(e.into());
                }
            }
        }
        Commands::PurgeSessions => {
            let removed = service.purge_expired_sessions().await?;
            info!("Removed {} expired sessions", removed);
        }
    }

    Ok(())
}
