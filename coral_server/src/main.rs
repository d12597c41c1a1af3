//! Coral server process.
//!
//! `cargo run -p coral-server` serves against `DATABASE_URL`;
//! `cargo run -p coral-server -- --memory` keeps everything in process memory.

use coral::{app, ensure_database_exists, ensure_tables, AppState, Config, HeaderRoleAccess};
use sqlx::mysql::MySqlPoolOptions;
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("coral=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;
    let memory = std::env::args().skip(1).any(|a| a == "--memory");

    let state = if memory {
        tracing::info!("using in-memory store");
        AppState::in_memory(&config)
    } else {
        ensure_database_exists(&config.database_url).await?;
        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.database_url)
            .await?;
        ensure_tables(&pool).await?;
        AppState::mysql(pool, &config)
    };
    let state = state.with_access(Arc::new(HeaderRoleAccess));

    let listener = TcpListener::bind(config.listen_addr()).await?;
    tracing::info!("coral listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app(state, &config)).await?;
    Ok(())
}
