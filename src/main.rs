use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use devconnect_api::store::postgres::PgStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "devconnect_api=debug,tower_http=info".into()),
        )
        .init();

    let config = devconnect_api::config::config();
    tracing::info!("Starting DevConnect API in {:?} mode", config.environment);

    let store = PgStore::connect(&config.database)
        .await
        .context("failed to connect to database")?;
    store
        .ensure_schema()
        .await
        .context("failed to ensure database schema")?;

    let app = devconnect_api::app(Arc::new(store));

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("DevConnect API listening on http://{}", bind_addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
