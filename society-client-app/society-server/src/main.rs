use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info, warn};

use society_api::{build_router, AppState};
use society_core::domain::NewAccount;
use society_core::repositories::Repositories;
use society_infrastructure::{create_pool, notifier_from_settings, pg_repositories, MIGRATOR};
use society_shared::config::{AppConfig, DatabaseSettings};
use society_shared::utils::mask_email;
use sqlx::PgPool;

/// Society management web application
#[derive(Parser, Debug)]
#[command(name = "society-server")]
#[command(about = "Run and administer the society management server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Apply migrations and start the HTTP server (default)
    Serve,

    /// Apply pending database migrations and exit
    Migrate,

    /// Create an active administrator account
    CreateSuperuser {
        #[arg(long, env = "SUPERUSER_EMAIL")]
        email: String,

        #[arg(long, env = "SUPERUSER_USERNAME")]
        username: String,

        #[arg(long, env = "SUPERUSER_PASSWORD")]
        password: String,

        #[arg(long, default_value = "")]
        first_name: String,

        #[arg(long, default_value = "")]
        last_name: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    society_shared::telemetry::init_telemetry();

    let cli = Cli::parse();
    let config = AppConfig::load().context("Failed to load configuration")?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(config).await,
        Commands::Migrate => {
            migrate(&config.database).await?;
            Ok(())
        }
        Commands::CreateSuperuser { email, username, password, first_name, last_name } => {
            let account = NewAccount { email, username, first_name, last_name, phone: None, password };
            create_superuser(&config, account).await
        }
    }
}

/// Repositories for the configured store. Postgres is migrated first.
async fn repositories(database: &DatabaseSettings) -> Result<Repositories> {
    if database.is_memory() {
        warn!("Using the in-memory store; data is lost on shutdown");
        return Ok(Repositories::in_memory());
    }
    let pool = migrate(database).await?;
    Ok(pg_repositories(pool))
}

async fn migrate(database: &DatabaseSettings) -> Result<PgPool> {
    info!("Connecting to database...");
    let pool = create_pool(database).await.context("Failed to connect to database")?;
    MIGRATOR.run(&pool).await.context("Failed to apply migrations")?;
    info!("Database migrations applied.");
    Ok(pool)
}

async fn create_superuser(config: &AppConfig, account: NewAccount) -> Result<()> {
    if config.database.is_memory() {
        anyhow::bail!("create-superuser needs a persistent database; database.url is set to the in-memory store");
    }
    let repos = repositories(&config.database).await?;
    let state = AppState::new(repos, notifier_from_settings(&config.mail)?, &config.session)?;
    let user = state.auth.create_superuser(account).await?;
    info!("Superuser {} ({}) created", user.username, mask_email(&user.email));
    Ok(())
}

async fn serve(config: AppConfig) -> Result<()> {
    info!("{} starting ({})", config.app.name, config.app.env);

    let repos = repositories(&config.database).await?;
    let notifier = notifier_from_settings(&config.mail)?;
    let state = AppState::new(repos, notifier, &config.session)?;
    let app = build_router(state);

    let host: std::net::IpAddr = config.app.host.parse()?;
    let addr = SocketAddr::from((host, config.app.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
