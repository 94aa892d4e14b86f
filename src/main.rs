use std::net::SocketAddr;

use anyhow::Context;

use jobboard_api::api::{router, AppState};
use jobboard_api::config::Config;
use jobboard_api::infrastructure::db;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;

    // Connect to database
    tracing::info!("Connecting to database...");
    let pool = db::connect_pool(&config)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected successfully");

    if config.run_migrations {
        db::migrate(&pool).await.context("Failed to run migrations")?;
        tracing::info!("Migrations applied");
    }

    tokio::fs::create_dir_all(&config.media_root)
        .await
        .with_context(|| format!("Failed to create media root {}", config.media_root))?;

    let addr: SocketAddr = format!("{}:{}", config.api_host, config.api_port)
        .parse()
        .context("Invalid API_HOST/API_PORT")?;

    let app = router(AppState::new(pool, config));

    // Start server
    tracing::info!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind address")?;

    axum::serve(listener, app).await.context("Server failed")?;
    Ok(())
}
