//! murmurd - the murmur posting service daemon
//!
//! Loads configuration from the environment (and `.env`), connects to
//! Postgres, applies migrations, and serves the HTTP API.

use std::net::SocketAddr;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use murmur_core::AppConfig;
use murmur_server::db;
use murmur_server::run_server;

#[derive(Parser, Debug)]
#[command(
    name = "murmurd",
    author,
    version,
    about = "Murmur social-posting service"
)]
struct Cli {
    /// Address to bind, overriding MURMUR_BIND
    #[arg(long)]
    bind: Option<SocketAddr>,

    /// Browser origin for CORS, overriding CORS_ORIGIN
    #[arg(long)]
    cors_origin: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "murmur_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::load()?;
    if let Some(bind) = cli.bind {
        config.bind_addr = bind;
    }
    if let Some(origin) = cli.cors_origin {
        config.cors_origin = origin;
    }

    info!("Starting murmurd");

    let pool = db::create_pool_with_options(&config.database_url, config.max_connections).await?;
    db::migrations::run(&pool).await?;
    info!("Database connected");

    run_server(pool, config).await?;

    Ok(())
}
