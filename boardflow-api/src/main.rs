//! # Boardflow API Server
//!
//! HTTP entrypoint for the Boardflow Kanban backend: boards, columns,
//! tasks, members, and notifications over PostgreSQL, with bearer tokens
//! issued by an external identity service.
//!
//! ## Usage
//!
//! ```bash
//! DATABASE_URL=postgresql://localhost/boardflow \
//! JWT_SECRET=<shared secret> \
//! cargo run -p boardflow-api
//! ```

use boardflow_api::app::{build_router, AppState};
use boardflow_api::config::Config;
use boardflow_shared::db::migrations::run_migrations;
use boardflow_shared::db::pool::{create_pool, DatabaseConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "boardflow_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Boardflow API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let pool = create_pool(DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    run_migrations(&pool).await?;

    let bind_address = config.bind_address();
    let state = AppState::new(pool, config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
